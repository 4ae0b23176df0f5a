use crate::backend::StoreTarget;
use crate::dedup::phone_exists;
use crate::error::StoreError;
use chrono::{DateTime, Utc};
use registrar_core::{Record, Submission};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("phone already registered: {0}")]
    Conflict(String),
    #[error("store {store} failed: {source}")]
    Store {
        store: String,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorFailure {
    pub store: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
    pub attempted: usize,
    pub failures: Vec<MirrorFailure>,
}

/// Writes to one primary store and mirrors into any number of secondaries.
#[derive(Debug, Clone)]
pub struct SubmissionWriter {
    primary: StoreTarget,
    secondaries: Vec<StoreTarget>,
}

impl SubmissionWriter {
    pub fn new(primary: StoreTarget, secondaries: Vec<StoreTarget>) -> Self {
        Self {
            primary,
            secondaries,
        }
    }

    pub fn primary(&self) -> &StoreTarget {
        &self.primary
    }

    pub fn secondaries(&self) -> &[StoreTarget] {
        &self.secondaries
    }

    pub fn target(&self, name: &str) -> Option<&StoreTarget> {
        std::iter::once(&self.primary)
            .chain(self.secondaries.iter())
            .find(|target| target.name == name)
    }

    /// Duplicate check and durable primary write. Secondaries are left to
    /// [`SubmissionWriter::mirror`] so callers can run them off the response path.
    pub fn submit(
        &self,
        now: DateTime<Utc>,
        submission: Submission,
    ) -> Result<Record, SubmitError> {
        let record = Record::new(submission, now);
        let primary = &self.primary;

        let exists = phone_exists(primary, &record.phone).map_err(|source| {
            error!(store = %primary.name, error = %source, "duplicate lookup failed");
            SubmitError::Store {
                store: primary.name.clone(),
                source,
            }
        })?;
        if exists {
            info!(store = %primary.name, "phone already registered");
            return Err(SubmitError::Conflict(record.phone));
        }

        match primary.store.insert(&record) {
            Ok(()) => Ok(record),
            Err(StoreError::DuplicatePhone(phone)) => {
                info!(store = %primary.name, "phone already registered (constraint)");
                Err(SubmitError::Conflict(phone))
            }
            Err(source) => {
                error!(store = %primary.name, error = %source, "primary write failed");
                Err(SubmitError::Store {
                    store: primary.name.clone(),
                    source,
                })
            }
        }
    }

    /// One attempt per secondary; failures are logged and reported, never raised.
    pub fn mirror(&self, record: &Record) -> MirrorReport {
        let mut report = MirrorReport::default();
        for target in &self.secondaries {
            report.attempted += 1;
            if let Err(err) = target.store.insert(record) {
                warn!(store = %target.name, error = %err, "secondary write failed");
                report.failures.push(MirrorFailure {
                    store: target.name.clone(),
                    reason: err.reason(),
                });
            }
        }
        report
    }
}
