//! Search orchestrator.
//!
//! Owns the selection, the request bookkeeping and the last result set, and
//! drives the catalog through the retry scheduler. Observers follow changes
//! through a version counter on a watch channel.

use carsearch_core::{
    CatalogRow, Notifier, ResultsDisplay, SearchSignature, Selection, ValidationError, VehicleMake,
    VehicleType, YearRange,
};
use carsearch_fetch::{CatalogApi, FetchError, RetryPolicy};
use futures::future::try_join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;
use crate::gate::{search_block, SearchBlock, SearchRequestState};
use crate::selection::{SelectionPhase, SelectionState};

/// Result of a [`SearchStore::submit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The gate was closed; nothing was requested.
    Skipped(SearchBlock),
    /// Rows were merged and handed to the display.
    Published {
        /// Merged rows in make-selection order.
        rows: Vec<CatalogRow>,
    },
    /// The vehicle type changed while the search was running.
    Abandoned,
}

// ============================================================================
// Inner State
// ============================================================================

#[derive(Default)]
struct SearchStoreInner {
    vehicle_types: Vec<VehicleType>,
    selection: SelectionState,
    request: SearchRequestState,
    results: Vec<CatalogRow>,
}

/// Everything a submission needs, captured when it starts.
struct SubmissionPlan {
    vehicle_type: VehicleType,
    makes: Vec<VehicleMake>,
    year: Option<i32>,
    generation: u64,
    signature: SearchSignature,
}

// ============================================================================
// Search Store
// ============================================================================

/// Coordinates selection, gating and submission against a catalog.
///
/// Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct SearchStore {
    inner: Arc<RwLock<SearchStoreInner>>,
    catalog: Arc<dyn CatalogApi>,
    notifier: Arc<dyn Notifier>,
    display: Arc<dyn ResultsDisplay>,
    retry: RetryPolicy,
    /// Bumped on every observable change.
    notify: Arc<watch::Sender<u64>>,
    /// Mirrors the vehicle-type generation.
    generation: Arc<watch::Sender<u64>>,
}

impl SearchStore {
    /// Creates a store with an unbounded retry policy.
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        notifier: Arc<dyn Notifier>,
        display: Arc<dyn ResultsDisplay>,
    ) -> Self {
        let (notify, _) = watch::channel(0);
        let (generation, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(SearchStoreInner::default())),
            catalog,
            notifier,
            display,
            retry: RetryPolicy::default(),
            notify: Arc::new(notify),
            generation: Arc::new(generation),
        }
    }

    /// Sets the retry policy used for every catalog request.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Validates model years against a fixed range instead of
    /// `[1886, current year]`.
    pub fn with_year_range(self, range: YearRange) -> Self {
        let inner = SearchStoreInner {
            selection: SelectionState::with_year_range(range),
            ..Default::default()
        };
        Self {
            inner: Arc::new(RwLock::new(inner)),
            ..self
        }
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    fn touch(&self) {
        self.notify.send_modify(|version| *version += 1);
    }

    /// Moves the generation watch forward. Older generations are ignored.
    fn publish_generation(&self, generation: u64) {
        self.generation.send_if_modified(|current| {
            if *current < generation {
                *current = generation;
                true
            } else {
                false
            }
        });
    }

    // ========================================================================
    // Snapshot Access
    // ========================================================================

    /// Loaded vehicle types.
    pub async fn vehicle_types(&self) -> Vec<VehicleType> {
        self.inner.read().await.vehicle_types.clone()
    }

    /// Makes available for the selected type.
    pub async fn available_makes(&self) -> Vec<VehicleMake> {
        self.inner.read().await.selection.available_makes().to_vec()
    }

    /// Current selection.
    pub async fn selection(&self) -> Selection {
        self.inner.read().await.selection.selection().clone()
    }

    /// Current selection phase.
    pub async fn phase(&self) -> SelectionPhase {
        self.inner.read().await.selection.phase()
    }

    /// Current request bookkeeping.
    pub async fn request_state(&self) -> SearchRequestState {
        self.inner.read().await.request.clone()
    }

    /// Rows of the last published search.
    pub async fn results(&self) -> Vec<CatalogRow> {
        self.inner.read().await.results.clone()
    }

    /// The inline year error, if one should be shown.
    pub async fn year_error(&self) -> Option<ValidationError> {
        self.inner.read().await.selection.selection().year.error()
    }

    /// Why a search cannot be submitted right now, if it cannot.
    pub async fn search_block(&self) -> Option<SearchBlock> {
        let inner = self.inner.read().await;
        search_block(inner.selection.selection(), &inner.request)
    }

    /// Returns true if a search can be submitted right now.
    pub async fn can_search(&self) -> bool {
        self.search_block().await.is_none()
    }

    // ========================================================================
    // Vehicle Types
    // ========================================================================

    /// Loads the vehicle-type list, retrying until it arrives.
    ///
    /// The list is fetched once; later calls return the cached list.
    #[instrument(skip(self))]
    pub async fn load_vehicle_types(&self) -> Result<Vec<VehicleType>, StoreError> {
        {
            let inner = self.inner.read().await;
            if !inner.vehicle_types.is_empty() {
                return Ok(inner.vehicle_types.clone());
            }
        }

        let notifier = Arc::clone(&self.notifier);
        let result = self
            .retry
            .run_with_retry(
                || self.catalog.list_vehicle_types(),
                |attempt, delay, _| {
                    notifier.notify(&retry_message("vehicle types", attempt, delay));
                },
            )
            .await;

        let types = match result {
            Ok(types) => types,
            Err(e) => {
                self.notify_gave_up("vehicle types", &e);
                return Err(e.into());
            }
        };

        info!(count = types.len(), "Vehicle types loaded");
        self.inner.write().await.vehicle_types = types.clone();
        self.touch();
        Ok(types)
    }

    /// Selects a vehicle type by name (trimmed, case-insensitive).
    ///
    /// Clears the make selection and starts loading the make list in the
    /// background. The returned handle resolves to true if that list was
    /// applied, false if it was superseded or given up on. Returns `None`
    /// when the type is already selected.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is not a loaded vehicle type.
    #[instrument(skip(self))]
    pub async fn select_vehicle_type(
        &self,
        name: &str,
    ) -> Result<Option<JoinHandle<bool>>, StoreError> {
        let (vehicle_type, generation) = {
            let mut inner = self.inner.write().await;
            let vehicle_type = inner
                .vehicle_types
                .iter()
                .find(|vt| vt.matches(name))
                .cloned()
                .ok_or_else(|| ValidationError::UnknownVehicleType(name.trim().to_string()))?;

            let Some(generation) = inner.selection.begin_type_selection(vehicle_type.clone())
            else {
                return Ok(None);
            };
            self.publish_generation(generation);
            (vehicle_type, generation)
        };

        self.touch();
        info!(vehicle_type = %vehicle_type, generation, "Loading makes");

        let store = self.clone();
        Ok(Some(tokio::spawn(async move {
            store.load_makes(vehicle_type, generation).await
        })))
    }

    async fn load_makes(&self, vehicle_type: VehicleType, generation: u64) -> bool {
        let label = format!("makes for {vehicle_type}");
        let notifier = Arc::clone(&self.notifier);
        let fetch = self.retry.run_with_retry(
            || self.catalog.list_makes(&vehicle_type),
            |attempt, delay, _| notifier.notify(&retry_message(&label, attempt, delay)),
        );

        match until_superseded(self.generation.subscribe(), generation, fetch).await {
            None => {
                debug!(generation, "Make load superseded");
                false
            }
            Some(Ok(makes)) => {
                let count = makes.len();
                let applied = self.inner.write().await.selection.apply_makes(generation, makes);
                if applied {
                    debug!(count, "Makes ready");
                    self.touch();
                }
                applied
            }
            Some(Err(e)) => {
                if self.inner.write().await.selection.abandon_load(generation) {
                    self.notify_gave_up(&label, &e);
                    self.touch();
                }
                false
            }
        }
    }

    // ========================================================================
    // Makes & Year
    // ========================================================================

    /// Replaces the selected makes.
    pub async fn select_makes(&self, ids: &[i64]) -> Result<(), StoreError> {
        self.inner.write().await.selection.select_makes(ids)?;
        self.touch();
        Ok(())
    }

    /// Adds or removes one make. Returns true if it is selected afterwards.
    pub async fn toggle_make(&self, id: i64) -> Result<bool, StoreError> {
        let selected = self.inner.write().await.selection.toggle_make(id)?;
        self.touch();
        Ok(selected)
    }

    /// Turns the year filter on or off.
    pub async fn set_year_enabled(&self, enabled: bool) {
        self.inner.write().await.selection.set_year_enabled(enabled);
        self.touch();
    }

    /// Replaces the typed year.
    pub async fn set_year_input(&self, raw: impl Into<String>) {
        self.inner.write().await.selection.set_year_input(raw);
        self.touch();
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Submits the current selection.
    ///
    /// Requests the models of every selected make concurrently, merges them
    /// in make-selection order and hands them to the display. The work runs
    /// on its own task, so dropping this future does not leave the request
    /// marked in flight.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Fetch`] if a retry ceiling is configured and a
    /// request exhausted it, or [`StoreError::Task`] if the search task
    /// panicked. Either way the request is no longer in flight.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<SubmitOutcome, StoreError> {
        let plan = {
            let mut inner = self.inner.write().await;
            let selection = inner.selection.selection();

            if let Some(block) = search_block(selection, &inner.request) {
                debug!(?block, "Search gate closed");
                return Ok(SubmitOutcome::Skipped(block));
            }

            let plan = SubmissionPlan {
                vehicle_type: selection
                    .vehicle_type
                    .clone()
                    .ok_or(StoreError::NoVehicleType)?,
                makes: selection.makes.clone(),
                year: selection.year.effective_year(),
                generation: inner.selection.generation(),
                signature: selection.signature(),
            };

            inner.request.begin(plan.signature.clone());
            inner.results.clear();
            plan
        };

        self.touch();
        info!(
            signature = %plan.signature,
            makes = plan.makes.len(),
            "Submitting search"
        );

        let store = self.clone();
        match tokio::spawn(async move { store.run_submission(plan).await }).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Search task failed");
                self.inner.write().await.request.abandon();
                self.touch();
                Err(e.into())
            }
        }
    }

    async fn run_submission(&self, plan: SubmissionPlan) -> Result<SubmitOutcome, StoreError> {
        let catalog = &self.catalog;
        let vehicle_type = &plan.vehicle_type;
        let year = plan.year;

        let requests = plan.makes.iter().map(|make| {
            let notifier = Arc::clone(&self.notifier);
            let label = format!("models for {make}");
            self.retry.run_with_retry(
                move || catalog.list_models(vehicle_type, make, year),
                move |attempt, delay, _| notifier.notify(&retry_message(&label, attempt, delay)),
            )
        });

        let fan_in = try_join_all(requests);

        match until_superseded(self.generation.subscribe(), plan.generation, fan_in).await {
            None => {
                self.abandon_submission().await;
                Ok(SubmitOutcome::Abandoned)
            }
            Some(Ok(batches)) => {
                let rows: Vec<CatalogRow> = batches.into_iter().flatten().collect();
                {
                    let mut inner = self.inner.write().await;
                    if inner.selection.generation() != plan.generation {
                        inner.request.abandon();
                        drop(inner);
                        debug!("Discarding results for a previous vehicle type");
                        self.touch();
                        return Ok(SubmitOutcome::Abandoned);
                    }
                    inner.request.complete();
                    inner.results = rows.clone();
                }

                info!(rows = rows.len(), "Search published");
                self.touch();
                self.display.show(&rows);
                Ok(SubmitOutcome::Published { rows })
            }
            Some(Err(e)) => {
                self.inner.write().await.request.abandon();
                self.touch();
                self.notify_gave_up("search", &e);
                Err(e.into())
            }
        }
    }

    async fn abandon_submission(&self) {
        debug!("Search abandoned after vehicle type change");
        self.inner.write().await.request.abandon();
        self.touch();
    }

    fn notify_gave_up(&self, what: &str, error: &FetchError) {
        warn!(what, error = %error, "Giving up");
        self.notifier
            .notify(&format!("Gave up loading {what}: {error}"));
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn retry_message(what: &str, attempt: u32, delay: Duration) -> String {
    format!(
        "Couldn't load {what} (attempt {attempt}). Retrying in {}s.",
        delay.as_secs()
    )
}

/// Runs `fut` until it completes or the generation moves past `generation`.
///
/// Returns `None` if the generation changed first; `fut` is dropped at its
/// current suspension point.
async fn until_superseded<F: Future>(
    mut generation_rx: watch::Receiver<u64>,
    generation: u64,
    fut: F,
) -> Option<F::Output> {
    if *generation_rx.borrow_and_update() != generation {
        return None;
    }

    tokio::pin!(fut);
    loop {
        tokio::select! {
            output = &mut fut => return Some(output),
            changed = generation_rx.changed() => {
                if changed.is_err() || *generation_rx.borrow_and_update() != generation {
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carsearch_core::SilentNotifier;

    /// Make lists arrive after five seconds; model requests may panic.
    #[derive(Default)]
    struct SlowCatalog {
        panic_on_models: bool,
    }

    #[async_trait::async_trait]
    impl CatalogApi for SlowCatalog {
        async fn list_vehicle_types(&self) -> Result<Vec<VehicleType>, FetchError> {
            Ok(vec![VehicleType::new("Car"), VehicleType::new("Truck")])
        }

        async fn list_makes(
            &self,
            vehicle_type: &VehicleType,
        ) -> Result<Vec<VehicleMake>, FetchError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![VehicleMake::new(1, vehicle_type.name.clone())])
        }

        async fn list_models(
            &self,
            _vehicle_type: &VehicleType,
            make: &VehicleMake,
            _year: Option<i32>,
        ) -> Result<Vec<CatalogRow>, FetchError> {
            assert!(!self.panic_on_models, "catalog blew up");
            Ok(vec![CatalogRow::new(make.id, make.name.clone(), 10, "Model")])
        }
    }

    struct NoDisplay;

    impl ResultsDisplay for NoDisplay {
        fn show(&self, _rows: &[CatalogRow]) {}
    }

    fn store(catalog: SlowCatalog) -> SearchStore {
        SearchStore::new(
            Arc::new(catalog),
            Arc::new(SilentNotifier),
            Arc::new(NoDisplay),
        )
        .with_year_range(YearRange::new(1886, 2024))
    }

    #[test]
    fn test_retry_message() {
        assert_eq!(
            retry_message("makes for Car", 2, Duration::from_secs(10)),
            "Couldn't load makes for Car (attempt 2). Retrying in 10s."
        );
    }

    #[tokio::test]
    async fn test_until_superseded_completes() {
        let (tx, rx) = watch::channel(3);
        let out = until_superseded(rx, 3, async { 7 }).await;
        assert_eq!(out, Some(7));
        drop(tx);
    }

    #[tokio::test]
    async fn test_until_superseded_already_stale() {
        let (_tx, rx) = watch::channel(4);
        assert_eq!(until_superseded(rx, 3, async { 7 }).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_until_superseded_stops_pending_work() {
        let (tx, rx) = watch::channel(1);
        let task = tokio::spawn(until_superseded(rx, 1, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            "late"
        }));

        tokio::time::sleep(Duration::from_secs(1)).await;
        tx.send_replace(2);

        assert_eq!(task.await.unwrap(), None);
    }

    #[test]
    fn test_generation_only_moves_forward() {
        let store = store(SlowCatalog::default());
        store.publish_generation(2);
        store.publish_generation(1);
        assert_eq!(*store.generation.borrow(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_older_generation_does_not_stall_current_load() {
        let store = store(SlowCatalog::default());
        store.load_vehicle_types().await.unwrap();

        let first = store.select_vehicle_type("Car").await.unwrap().unwrap();
        let second = store.select_vehicle_type("Truck").await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        // A broadcast of the first selection arriving after the second one.
        store.publish_generation(1);

        assert!(second.await.unwrap());
        assert!(!first.await.unwrap());
        assert_eq!(store.phase().await, SelectionPhase::MakesReady);
        assert_eq!(store.available_makes().await, vec![VehicleMake::new(1, "Truck")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_search_task_clears_in_flight() {
        let store = store(SlowCatalog {
            panic_on_models: true,
        });
        store.load_vehicle_types().await.unwrap();
        let loading = store.select_vehicle_type("Car").await.unwrap().unwrap();
        assert!(loading.await.unwrap());
        store.select_makes(&[1]).await.unwrap();

        let err = store.submit().await.unwrap_err();

        assert!(matches!(err, StoreError::Task(_)));
        let request = store.request_state().await;
        assert!(!request.in_flight);
        assert!(request.pending.is_none());
        assert!(request.last_issued.is_none());
        assert!(store.can_search().await);
    }
}
