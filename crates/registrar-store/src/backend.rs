use crate::error::Result;
use registrar_core::{Record, RecordRow};
use std::fmt;
use std::sync::Arc;

/// A place records are persisted. Implementations block on I/O.
pub trait RecordStore: Send + Sync {
    fn backend_name(&self) -> &'static str;
    fn contains_phone(&self, phone: &str) -> Result<bool>;
    fn insert(&self, record: &Record) -> Result<()>;
    fn list(&self) -> Result<Vec<RecordRow>>;
}

/// What a duplicate lookup does when the store cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupPolicy {
    /// Treat the phone as unseen and let the write proceed.
    FailOpen,
    /// Surface the lookup error and write nothing.
    FailClosed,
}

#[derive(Clone)]
pub struct StoreTarget {
    pub name: String,
    pub store: Arc<dyn RecordStore>,
    pub lookup: LookupPolicy,
}

impl StoreTarget {
    pub fn new(name: impl Into<String>, store: Arc<dyn RecordStore>, lookup: LookupPolicy) -> Self {
        Self {
            name: name.into(),
            store,
            lookup,
        }
    }
}

impl fmt::Debug for StoreTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreTarget")
            .field("name", &self.name)
            .field("backend", &self.store.backend_name())
            .field("lookup", &self.lookup)
            .finish()
    }
}
