use crate::config::error::ConfigError;
use crate::fetch::error::FetchError;
use crate::persistence::error::PersistenceError;
use crate::refresher::error::RefreshError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Refresh(#[from] RefreshError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
