//! Search controller: the state behind the weather lookup screen.
//!
//! The controller owns the query text, the lifecycle of the current lookup,
//! the last successfully fetched record, the recent-search history and the
//! unit preference. History and unit are read from the [`PreferenceStore`]
//! once, in [`SearchController::new`], and written back after every change.
//!
//! Only one lookup may be in flight. A submission made while another is
//! loading is skipped with [`SkipReason::AlreadyLoading`]. Each lookup gets a
//! ticket, and [`SearchController::complete`] only applies a result whose
//! ticket matches the lookup in flight. A lookup abandoned before it
//! completes (dropped `submit` future, or [`SearchController::cancel`])
//! returns the controller to [`RequestState::Idle`].

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::{
    FetchError, SearchHistory, TemperatureUnit, WeatherClient, WeatherRecord,
    storage::{PreferenceStore, RECENT_SEARCHES_KEY, TEMPERATURE_UNIT_KEY},
};

/// Process-wide so tickets from different controllers never collide.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Lifecycle of the current (or last) lookup. Never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(WeatherRecord),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Query was empty after trimming.
    EmptyQuery,
    AlreadyLoading,
    /// Recent-search index out of range.
    NoSuchRecent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Skipped(SkipReason),
    Succeeded,
    Failed,
    /// The result did not belong to the lookup in flight.
    Discarded,
}

/// A lookup that has been started with [`SearchController::begin_submit`].
///
/// Hand it back to [`SearchController::complete`] with the fetch result, or
/// to [`SearchController::cancel`]; until then the controller stays in
/// [`RequestState::Loading`].
#[derive(Debug)]
#[must_use = "a pending fetch keeps the controller loading until it is completed or cancelled"]
pub struct PendingFetch {
    ticket: u64,
    city: String,
}

impl PendingFetch {
    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug)]
pub struct SearchController<C, S> {
    client: C,
    store: S,
    query: String,
    state: RequestState,
    in_flight: Option<u64>,
    record: Option<WeatherRecord>,
    history: SearchHistory,
    unit: TemperatureUnit,
}

/// Resets the controller to `Idle` if a `submit` future is dropped mid-fetch.
struct InFlightGuard<'a> {
    state: &'a mut RequestState,
    in_flight: &'a mut Option<u64>,
    ticket: u64,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed && *self.in_flight == Some(self.ticket) {
            tracing::debug!(ticket = self.ticket, "lookup abandoned before completion");
            *self.in_flight = None;
            *self.state = RequestState::Idle;
        }
    }
}

impl<C: WeatherClient, S: PreferenceStore> SearchController<C, S> {
    /// Build a controller, restoring history and unit from `store`.
    /// Missing or malformed stored values fall back to defaults.
    pub fn new(client: C, store: S) -> Self {
        let history = store
            .load(RECENT_SEARCHES_KEY)
            .map(|v| SearchHistory::from_stored(&v))
            .unwrap_or_default();

        let unit = store
            .load(TEMPERATURE_UNIT_KEY)
            .and_then(|v| TemperatureUnit::from_stored(&v))
            .unwrap_or_default();

        tracing::debug!(recent = history.len(), unit = %unit, "restored preferences");

        Self {
            client,
            store,
            query: String::new(),
            state: RequestState::Idle,
            in_flight: None,
            record: None,
            history,
            unit,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Message for the error banner, if the last lookup failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Record currently on screen. Survives failed lookups.
    pub fn record(&self) -> Option<&WeatherRecord> {
        self.record.as_ref()
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look up `city` and apply the result.
    pub async fn submit(&mut self, city: &str) -> SubmitOutcome {
        match self.begin_submit(city) {
            Ok(pending) => self.run(pending).await,
            Err(reason) => SubmitOutcome::Skipped(reason),
        }
    }

    /// Submit whatever is in the query field.
    pub async fn submit_query(&mut self) -> SubmitOutcome {
        let query = self.query.clone();
        self.submit(&query).await
    }

    /// Put `city` in the query field and submit it.
    pub async fn select_recent(&mut self, city: &str) -> SubmitOutcome {
        let pending = match self.begin_submit(city) {
            Ok(pending) => pending,
            Err(reason) => return SubmitOutcome::Skipped(reason),
        };
        self.query = city.to_string();
        self.run(pending).await
    }

    /// Like [`select_recent`](Self::select_recent), by position in the history (0 = newest).
    pub async fn select_recent_index(&mut self, index: usize) -> SubmitOutcome {
        let Some(city) = self.history.get(index).map(str::to_string) else {
            return SubmitOutcome::Skipped(SkipReason::NoSuchRecent);
        };
        self.select_recent(&city).await
    }

    /// Flip the unit preference and persist it.
    pub fn toggle_unit(&mut self) -> TemperatureUnit {
        self.unit = self.unit.toggled();
        self.persist(TEMPERATURE_UNIT_KEY, self.unit.to_stored());
        self.unit
    }

    /// Validate `city` and move to `Loading`, clearing any previous error.
    ///
    /// Hosts that drive the fetch themselves call this, run the fetch for
    /// [`PendingFetch::city`], then call [`complete`](Self::complete).
    pub fn begin_submit(&mut self, city: &str) -> Result<PendingFetch, SkipReason> {
        let city = city.trim();
        if city.is_empty() {
            return Err(SkipReason::EmptyQuery);
        }
        if self.is_loading() {
            tracing::debug!(city, "lookup already in flight, ignoring submission");
            return Err(SkipReason::AlreadyLoading);
        }

        let ticket = NEXT_TICKET.fetch_add(1, Ordering::Relaxed);
        tracing::info!(city, ticket, "looking up weather");
        self.state = RequestState::Loading;
        self.in_flight = Some(ticket);

        Ok(PendingFetch { ticket, city: city.to_string() })
    }

    /// Apply the result of a fetch started with [`begin_submit`](Self::begin_submit).
    pub fn complete(
        &mut self,
        pending: PendingFetch,
        result: Result<WeatherRecord, FetchError>,
    ) -> SubmitOutcome {
        if self.in_flight != Some(pending.ticket) {
            tracing::debug!(city = pending.city(), ticket = pending.ticket, "stale result, discarding");
            return SubmitOutcome::Discarded;
        }
        self.in_flight = None;

        match result {
            Ok(record) => {
                tracing::info!(city = pending.city(), resolved = %record.location.name, "lookup succeeded");

                self.query.clear();
                self.history.record(&record.location.name);
                self.persist(RECENT_SEARCHES_KEY, self.history.to_stored());

                self.state = RequestState::Succeeded(record.clone());
                self.record = Some(record);
                SubmitOutcome::Succeeded
            }
            Err(err) => {
                tracing::info!(city = pending.city(), error = %err, "lookup failed");
                self.state = RequestState::Failed(err.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// Abandon a lookup without a result, returning to `Idle`.
    /// Returns `false` if `pending` is not the lookup in flight.
    pub fn cancel(&mut self, pending: PendingFetch) -> bool {
        if self.in_flight != Some(pending.ticket) {
            return false;
        }
        tracing::debug!(city = pending.city(), "lookup cancelled");
        self.in_flight = None;
        self.state = RequestState::Idle;
        true
    }

    async fn run(&mut self, pending: PendingFetch) -> SubmitOutcome {
        let mut guard = InFlightGuard {
            state: &mut self.state,
            in_flight: &mut self.in_flight,
            ticket: pending.ticket,
            armed: true,
        };
        let result = self.client.fetch(pending.city()).await;
        guard.armed = false;
        drop(guard);

        self.complete(pending, result)
    }

    fn persist(&mut self, key: &str, value: Value) {
        if let Err(err) = self.store.save(key, &value) {
            tracing::warn!(key, error = ?err, "failed to persist preference");
        }
    }
}
