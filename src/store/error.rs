use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store's membership is fixed to the catalog it was built from, so this
    /// means the caller and the store disagree about the catalog.
    #[error("No reading for location '{0}' in the store")]
    UnknownLocation(String),
}
