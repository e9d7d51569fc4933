//! Background producer: fetches every catalog location once per period, writes the
//! results into the store and persists the store afterwards.

pub mod error;

use crate::catalog::LocationCatalog;
use crate::config::RefreshPeriod;
use crate::fetch::{kelvin_to_celsius, TemperatureSource};
use crate::persistence::SnapshotFile;
use crate::refresher::error::RefreshError;
use crate::schedule::Ticker;
use crate::store::ReadingStore;
use crate::types::reading::now_local;
use crate::utils::error_chain;
use bon::Builder;
use futures_util::{stream, StreamExt};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Outcome of one refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub updated: usize,
    pub failed: usize,
    pub saved: bool,
    /// Cancelled before every location was fetched.
    pub interrupted: bool,
}

/// The sole writer of a [`ReadingStore`].
///
/// # Examples
///
/// ```no_run
/// # use citytemp::*;
/// # use std::sync::Arc;
/// # use std::time::Duration;
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = Arc::new(LocationCatalog::ukraine());
/// let store = ReadingStore::zeroed(&catalog, citytemp::now_local());
/// let refresher = Refresher::builder()
///     .catalog(catalog)
///     .store(store.clone())
///     .snapshot(SnapshotFile::new("last.json"))
///     .source(OpenWeatherClient::new("api-key", Duration::from_secs(30))?)
///     .build();
///
/// let report = refresher.refresh_once().await?;
/// println!("{} updated, {} failed", report.updated, report.failed);
/// # Ok(())
/// # }
/// ```
#[derive(Builder)]
pub struct Refresher<S> {
    catalog: Arc<LocationCatalog>,
    store: ReadingStore,
    snapshot: SnapshotFile,
    source: S,
    /// How many fetches may be outstanding at once; 1 means one after another.
    #[builder(default = 1)]
    max_in_flight: usize,
}

impl<S: TemperatureSource> Refresher<S> {
    /// Runs a single tick: fetch all locations, update the store, save a snapshot.
    ///
    /// A location whose fetch fails keeps its previous reading. A failed save is
    /// logged and reported through [`TickReport::saved`].
    ///
    /// # Errors
    ///
    /// [`RefreshError::Desync`] if the store has no reading for a catalog location.
    pub async fn refresh_once(&self) -> Result<TickReport, RefreshError> {
        self.refresh_until(&CancellationToken::new()).await
    }

    /// Like [`refresh_once`](Self::refresh_once), but stops fetching as soon as
    /// `cancel` fires. Readings updated before that are kept and still saved.
    pub async fn refresh_until(
        &self,
        cancel: &CancellationToken,
    ) -> Result<TickReport, RefreshError> {
        let mut report = TickReport::default();

        // `buffered` yields results in catalog order whatever the fetch concurrency.
        let source = &self.source;
        let mut fetches = stream::iter(self.catalog.iter().cloned())
            .map(|location| async move {
                let result = source.kelvin(&location.fetch_key).await;
                (location, result)
            })
            .buffered(self.max_in_flight.max(1));

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    report.interrupted = true;
                    None
                }
                next = fetches.next() => next,
            };
            let Some((location, result)) = next else {
                break;
            };
            match result {
                Ok(kelvin) => {
                    let celsius = kelvin_to_celsius(kelvin);
                    self.store
                        .upsert(&location.name, celsius, now_local())
                        .await?;
                    debug!("{}: {} °C", location.name, celsius);
                    report.updated += 1;
                }
                Err(e) => {
                    warn!(
                        "Keeping previous reading for {}: {}",
                        location.name,
                        error_chain(&e)
                    );
                    report.failed += 1;
                }
            }
        }

        drop(fetches);
        if report.interrupted {
            info!(
                "Refresh cancelled after {} of {} locations",
                report.updated + report.failed,
                self.catalog.len()
            );
        }

        match self.snapshot.save(&self.store.snapshot().await).await {
            Ok(()) => report.saved = true,
            Err(e) => error!(
                "Failed to persist snapshot to {}: {}",
                self.snapshot.path().display(),
                error_chain(&e)
            ),
        }

        Ok(report)
    }

    /// Refreshes once per `period` until `cancel` fires, whether between ticks or
    /// in the middle of one.
    ///
    /// Only a store/catalog desync ends the loop early.
    pub async fn run(
        self,
        period: RefreshPeriod,
        cancel: CancellationToken,
    ) -> Result<(), RefreshError> {
        info!(
            "Refreshing {} locations every {}",
            self.catalog.len(),
            period
        );
        let mut ticker = Ticker::new(period, cancel.clone());
        while let Some(started) = ticker.tick().await {
            let report = self.refresh_until(&cancel).await?;
            info!(
                "Refreshed {}/{} locations in {:?}{}",
                report.updated,
                self.catalog.len(),
                started.elapsed(),
                if report.saved { "" } else { " (snapshot not saved)" }
            );
        }
        info!("Refresher stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::error::FetchError;
    use crate::store::error::StoreError;
    use crate::types::reading::Reading;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    /// Kelvin values by fetch key; keys without a value fail to fetch.
    struct FakeSource {
        kelvins: HashMap<&'static str, f64>,
        delays: HashMap<&'static str, Duration>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn new(kelvins: &[(&'static str, f64)]) -> Self {
            Self {
                kelvins: kelvins.iter().copied().collect(),
                delays: HashMap::new(),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl TemperatureSource for FakeSource {
        async fn kelvin(&self, fetch_key: &str) -> Result<f64, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(fetch_key) {
                tokio::time::sleep(*delay).await;
            }
            self.kelvins.get(fetch_key).copied().ok_or_else(|| {
                FetchError::JsonParse(
                    fetch_key.to_string(),
                    serde_json::from_str::<f64>("{}").unwrap_err(),
                )
            })
        }
    }

    fn boot_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn catalog() -> Arc<LocationCatalog> {
        Arc::new(
            LocationCatalog::new([
                ("Kharkiv", "Kharkiv"),
                ("Kyiv", "Kiev"),
                ("Lviv", "Lviv"),
                ("Odesa", "Odesa"),
            ])
            .unwrap(),
        )
    }

    fn all_ok() -> FakeSource {
        FakeSource::new(&[
            ("Kharkiv", 293.15),
            ("Kiev", 290.15),
            ("Lviv", 291.15),
            ("Odesa", 288.15),
        ])
    }

    fn refresher(
        source: FakeSource,
        dir: &TempDir,
        max_in_flight: usize,
    ) -> (Refresher<FakeSource>, ReadingStore, SnapshotFile) {
        let catalog = catalog();
        let store = ReadingStore::zeroed(&catalog, boot_time());
        let snapshot = SnapshotFile::new(dir.path().join("last.json"));
        let refresher = Refresher::builder()
            .catalog(catalog)
            .store(store.clone())
            .snapshot(snapshot.clone())
            .source(source)
            .max_in_flight(max_in_flight)
            .build();
        (refresher, store, snapshot)
    }

    #[tokio::test]
    async fn test_refresh_updates_every_location_and_persists() {
        let dir = tempdir().unwrap();
        let (refresher, store, snapshot) = refresher(all_ok(), &dir, 1);

        let report = refresher.refresh_once().await.unwrap();

        assert_eq!(
            report,
            TickReport {
                updated: 4,
                failed: 0,
                saved: true,
                interrupted: false,
            }
        );
        let readings = store.snapshot().await;
        let temps: Vec<i32> = readings.iter().map(|r| r.temperature).collect();
        assert_eq!(temps, [20, 17, 18, 15]);
        assert!(readings.iter().all(|r| r.last_updated > boot_time()));
        assert_eq!(snapshot.load().await.unwrap(), readings);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_reading() {
        let dir = tempdir().unwrap();
        let source = FakeSource::new(&[("Kharkiv", 293.15), ("Kiev", 290.15), ("Odesa", 288.15)]);
        let (refresher, store, snapshot) = refresher(source, &dir, 1);

        let report = refresher.refresh_once().await.unwrap();

        assert_eq!(report.updated, 3);
        assert_eq!(report.failed, 1);
        let readings = store.snapshot().await;
        assert_eq!(readings[2], Reading::zeroed("Lviv", boot_time()));
        assert_eq!(readings[3].temperature, 15);
        assert_eq!(snapshot.load().await.unwrap(), readings);
    }

    #[tokio::test]
    async fn test_failed_save_does_not_fail_tick() {
        let dir = tempdir().unwrap();
        let catalog = catalog();
        let store = ReadingStore::zeroed(&catalog, boot_time());
        // A directory cannot be replaced by the snapshot file.
        let refresher = Refresher::builder()
            .catalog(catalog)
            .store(store.clone())
            .snapshot(SnapshotFile::new(dir.path()))
            .source(all_ok())
            .build();

        let report = refresher.refresh_once().await.unwrap();

        assert!(!report.saved);
        assert_eq!(report.updated, 4);
        assert_eq!(store.snapshot().await[0].temperature, 20);
    }

    #[tokio::test]
    async fn test_store_without_catalog_location_is_desync() {
        let dir = tempdir().unwrap();
        let other = LocationCatalog::new([("Kharkiv", "Kharkiv")]).unwrap();
        let refresher = Refresher::builder()
            .catalog(catalog())
            .store(ReadingStore::zeroed(&other, boot_time()))
            .snapshot(SnapshotFile::new(dir.path().join("last.json")))
            .source(all_ok())
            .build();

        let err = refresher.refresh_once().await.unwrap_err();

        assert!(matches!(
            err,
            RefreshError::Desync(StoreError::UnknownLocation(name)) if name == "Kyiv"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_fetches_finish_out_of_order() {
        let dir = tempdir().unwrap();
        let mut source = all_ok();
        source.delays = [
            ("Kharkiv", Duration::from_secs(4)),
            ("Kiev", Duration::from_secs(1)),
            ("Lviv", Duration::from_secs(3)),
            ("Odesa", Duration::from_secs(2)),
        ]
        .into_iter()
        .collect();
        let calls = source.calls.clone();
        let (refresher, store, _) = refresher(source, &dir, 4);

        let started = tokio::time::Instant::now();
        let report = refresher.refresh_once().await.unwrap();

        assert_eq!(report.updated, 4);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // All four ran side by side, so the tick took as long as the slowest one.
        assert!(started.elapsed() < Duration::from_secs(5));
        let temps: Vec<i32> = store.snapshot().await.iter().map(|r| r.temperature).collect();
        assert_eq!(temps, [20, 17, 18, 15]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ticks_until_cancelled() {
        let dir = tempdir().unwrap();
        let source = all_ok();
        let calls = source.calls.clone();
        let (refresher, _, snapshot) = refresher(source, &dir, 1);
        let period = RefreshPeriod::from_minutes(1).unwrap();
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(refresher.run(period, cancel.clone()));
        tokio::time::sleep(Duration::from_secs(150)).await;
        cancel.cancel();
        handle.await.unwrap().unwrap();

        // Ticks at 0s, 60s and 120s.
        assert_eq!(calls.load(Ordering::SeqCst), 12);
        assert_eq!(snapshot.load().await.unwrap().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_a_slow_tick_and_keeps_finished_readings() {
        let dir = tempdir().unwrap();
        let mut source = all_ok();
        for key in ["Kiev", "Lviv", "Odesa"] {
            source.delays.insert(key, Duration::from_secs(30));
        }
        let calls = source.calls.clone();
        let (refresher, store, snapshot) = refresher(source, &dir, 1);
        let period = RefreshPeriod::from_minutes(60).unwrap();
        let cancel = CancellationToken::new();

        let started = tokio::time::Instant::now();
        let handle = tokio::spawn(refresher.run(period, cancel.clone()));
        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
        handle.await.unwrap().unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
        // Kharkiv finished, Kyiv was in flight, Lviv and Odesa never started.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let saved = snapshot.load().await.unwrap();
        assert_eq!(saved, store.snapshot().await);
        assert_eq!(saved[0].temperature, 20);
        assert!(saved[1..].iter().all(|r| r.temperature == 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_until_reports_interruption() {
        let dir = tempdir().unwrap();
        let mut source = all_ok();
        source.delays.insert("Lviv", Duration::from_secs(30));
        let (refresher, _, _) = refresher(source, &dir, 1);
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });
        let report = refresher.refresh_until(&cancel).await.unwrap();

        assert_eq!(
            report,
            TickReport {
                updated: 2,
                failed: 0,
                saved: true,
                interrupted: true,
            }
        );
    }
}
