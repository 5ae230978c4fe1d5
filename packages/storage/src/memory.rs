// ABOUTME: In-memory task store for lifecycle and HTTP tests
// ABOUTME: Transactions work on a private copy that replaces shared state on commit

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use todolist_core::{Task, TaskChanges, TaskCreateInput};

use crate::error::{Result, StorageError};
use crate::repository::{TaskRepository, TaskStore, TaskTransaction};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    tasks: BTreeMap<i64, Task>,
    next_id: i64,
}

/// Shared, cloneable store. Clones see the same tasks and counters.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<Mutex<MemoryState>>,
    lookups: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `find_by_id` calls made through any session
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn reset_lookups(&self) {
        self.lookups.store(0, Ordering::SeqCst);
    }

    /// Make every subsequent operation fail with `StorageError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Committed task count
    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "in-memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn connection(&self) -> Result<Box<dyn TaskRepository>> {
        self.check_available()?;
        Ok(Box::new(MemorySession {
            store: self.clone(),
            pending: None,
        }))
    }

    async fn begin(&self) -> Result<Box<dyn TaskTransaction>> {
        self.check_available()?;
        let snapshot = self.lock().clone();
        Ok(Box::new(MemorySession {
            store: self.clone(),
            pending: Some(snapshot),
        }))
    }
}

/// `pending` holds the transaction's working copy; `None` means autocommit
struct MemorySession {
    store: InMemoryTaskStore,
    pending: Option<MemoryState>,
}

impl MemorySession {
    fn apply<T>(&mut self, op: impl FnOnce(&mut MemoryState) -> T) -> Result<T> {
        self.store.check_available()?;
        match self.pending.as_mut() {
            Some(state) => Ok(op(state)),
            None => {
                let mut state = self.store.lock();
                Ok(op(&mut state))
            }
        }
    }
}

#[async_trait]
impl TaskRepository for MemorySession {
    async fn find_by_id(&mut self, id: i64) -> Result<Option<Task>> {
        self.store.lookups.fetch_add(1, Ordering::SeqCst);
        self.apply(|state| state.tasks.get(&id).cloned())
    }

    async fn find_page(&mut self, limit: i64, offset: i64) -> Result<(Vec<Task>, i64)> {
        self.apply(|state| {
            let mut tasks: Vec<Task> = state.tasks.values().cloned().collect();
            tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

            let total = tasks.len() as i64;
            let page = tasks
                .into_iter()
                .skip(offset.max(0) as usize)
                .take(limit.max(0) as usize)
                .collect();
            (page, total)
        })
    }

    async fn insert(&mut self, input: &TaskCreateInput) -> Result<Task> {
        self.apply(|state| {
            state.next_id += 1;
            let now = Utc::now();
            let task = Task {
                id: state.next_id,
                title: input.title.clone(),
                description: input.description.clone(),
                completed: input.completed,
                version: 0,
                created_at: now,
                updated_at: now,
            };
            state.tasks.insert(task.id, task.clone());
            task
        })
    }

    async fn update(&mut self, id: i64, changes: &TaskChanges, version: i64) -> Result<u64> {
        self.apply(|state| match state.tasks.get_mut(&id) {
            Some(task) if task.version == version => {
                if let Some(title) = &changes.title {
                    task.title = title.clone();
                }
                if let Some(description) = &changes.description {
                    task.description = description.clone();
                }
                if let Some(completed) = changes.completed {
                    task.completed = completed;
                }
                task.version += 1;
                task.updated_at = Utc::now();
                1
            }
            _ => 0,
        })
    }

    async fn delete(&mut self, task: &Task) -> Result<u64> {
        self.apply(|state| match state.tasks.remove(&task.id) {
            Some(_) => 1,
            None => 0,
        })
    }
}

#[async_trait]
impl TaskTransaction for MemorySession {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.store.check_available()?;
        let session = *self;
        if let Some(pending) = session.pending {
            *session.store.lock() = pending;
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
