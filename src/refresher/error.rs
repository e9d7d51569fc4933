use crate::store::error::StoreError;
use thiserror::Error;

/// Conditions that stop the refresher. Fetch and persistence failures are not
/// among them; those are logged and the loop carries on.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Reading store is out of sync with the location catalog")]
    Desync(#[from] StoreError),
}
