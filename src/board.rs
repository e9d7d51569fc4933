//! Startup and wiring: restores the store, then runs the refresher in the
//! background and the renderer in the foreground until cancelled.

use crate::catalog::LocationCatalog;
use crate::config::RefreshPeriod;
use crate::error::BoardError;
use crate::fetch::TemperatureSource;
use crate::persistence::error::PersistenceError;
use crate::persistence::SnapshotFile;
use crate::refresher::Refresher;
use crate::render::{ChartBackend, Renderer};
use crate::store::ReadingStore;
use crate::types::reading::now_local;
use bon::bon;
use log::{error, info};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A temperature board: catalog, live readings, and where they are persisted.
///
/// # Examples
///
/// ```no_run
/// # use citytemp::*;
/// # use std::time::Duration;
/// # use tokio_util::sync::CancellationToken;
/// # #[tokio::main]
/// # async fn main() -> Result<(), BoardError> {
/// let board = Board::open()
///     .catalog(LocationCatalog::ukraine())
///     .source(OpenWeatherClient::new("api-key", Duration::from_secs(30))?)
///     .period(RefreshPeriod::from_minutes(10)?)
///     .snapshot(SnapshotFile::new("last.json"))
///     .call()
///     .await?;
///
/// let cancel = CancellationToken::new();
/// board.run(TextChart::new(std::io::stdout()), cancel).await?;
/// # Ok(())
/// # }
/// ```
pub struct Board<S> {
    catalog: Arc<LocationCatalog>,
    store: ReadingStore,
    snapshot: SnapshotFile,
    source: S,
    period: RefreshPeriod,
    max_in_flight: usize,
}

#[bon]
impl<S: TemperatureSource + 'static> Board<S> {
    /// Restores the readings from `snapshot`, or starts every location at 0 °C if
    /// there is no snapshot yet.
    ///
    /// # Errors
    ///
    /// [`BoardError::Persistence`] if a snapshot exists but cannot be read or does
    /// not match the catalog. Nothing is started in that case.
    #[builder]
    pub async fn open(
        catalog: LocationCatalog,
        source: S,
        period: RefreshPeriod,
        snapshot: SnapshotFile,
        #[builder(default = 1)] max_in_flight: usize,
    ) -> Result<Self, BoardError> {
        let store = load_or_zeroed(&catalog, &snapshot).await?;
        Ok(Self {
            catalog: Arc::new(catalog),
            store,
            snapshot,
            source,
            period,
            max_in_flight,
        })
    }

    pub fn store(&self) -> &ReadingStore {
        &self.store
    }

    /// Runs both loops until `cancel` fires, then hands the backend back.
    ///
    /// The refresher is spawned onto the runtime; the renderer runs on the calling
    /// task. If the refresher stops with an error it cancels the renderer too and
    /// the error is returned.
    pub async fn run<B: ChartBackend>(
        self,
        backend: B,
        cancel: CancellationToken,
    ) -> Result<B, BoardError> {
        let refresher = Refresher::builder()
            .catalog(self.catalog)
            .store(self.store.clone())
            .snapshot(self.snapshot)
            .source(self.source)
            .max_in_flight(self.max_in_flight)
            .build();

        let period = self.period;
        let refresher_cancel = cancel.clone();
        let refresh_task = tokio::spawn(async move {
            let result = refresher.run(period, refresher_cancel.clone()).await;
            if let Err(e) = &result {
                error!("Refresher failed: {}", e);
                refresher_cancel.cancel();
            }
            result
        });

        let backend = Renderer::new(self.store, backend).run(period, cancel).await;
        refresh_task.await??;
        Ok(backend)
    }
}

/// Snapshot contents if there is a snapshot, zero readings stamped with the
/// current time otherwise.
pub async fn load_or_zeroed(
    catalog: &LocationCatalog,
    snapshot: &SnapshotFile,
) -> Result<ReadingStore, PersistenceError> {
    match snapshot.load_for(catalog).await {
        Ok(readings) => Ok(ReadingStore::from_readings(readings)),
        Err(PersistenceError::NotFound(path)) => {
            info!(
                "No snapshot at {}, starting {} locations at zero",
                path.display(),
                catalog.len()
            );
            Ok(ReadingStore::zeroed(catalog, now_local()))
        }
        Err(e) => Err(e),
    }
}
