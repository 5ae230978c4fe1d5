// ABOUTME: Command-line flags for the server binary
// ABOUTME: Flags override the environment-derived configuration

use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "todolist")]
#[command(about = "Todolist HTTP service")]
#[command(version)]
pub struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Address to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// SQLite connection string (overrides DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

impl Cli {
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(database_url) = self.database_url {
            config.database_url = database_url;
        }
        config
    }
}
