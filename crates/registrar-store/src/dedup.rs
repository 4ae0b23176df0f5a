use crate::backend::{LookupPolicy, StoreTarget};
use crate::error::Result;
use tracing::warn;

pub fn phone_exists(target: &StoreTarget, phone: &str) -> Result<bool> {
    match target.store.contains_phone(phone) {
        Ok(found) => Ok(found),
        Err(err) if target.lookup == LookupPolicy::FailOpen => {
            warn!(
                store = %target.name,
                error = %err,
                "duplicate lookup failed, treating phone as new"
            );
            Ok(false)
        }
        Err(err) => Err(err),
    }
}
