/// Station registry: explicit per-station scheduler lifecycle.
///
/// Owns every running `RefreshScheduler`, keyed by an opaque entry id
/// supplied at setup time. The registry is passed by reference to
/// whoever owns the refresh loops — there is no ambient global lookup.
/// Stations are independent: each scheduler has its own client session
/// and its own snapshot, so concurrently configured stations refresh
/// with no coordination between them.

use std::collections::HashMap;
use std::time::Duration;

use crate::config::StationSelect;
use crate::ingest::city_api::ApiClient;
use crate::logging::{self, Source};
use crate::model::ApiError;
use crate::scheduler::RefreshScheduler;

#[derive(Default)]
pub struct StationRegistry {
    stations: HashMap<String, RefreshScheduler>,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and starts a scheduler for `entry_id`.
    ///
    /// An entry id can only be registered once; a duplicate id is a
    /// setup bug and is reported as `ApiError::Unexpected` so the setup
    /// wizard surfaces it instead of silently replacing a running loop.
    pub fn create(
        &mut self,
        entry_id: &str,
        base_url: &str,
        select: StationSelect,
        interval: Duration,
    ) -> Result<(), ApiError> {
        if self.stations.contains_key(entry_id) {
            return Err(ApiError::Unexpected(format!(
                "station entry '{}' is already registered",
                entry_id
            )));
        }

        let client = ApiClient::with_base_url(base_url)?;
        let scheduler = RefreshScheduler::start(client, select, interval, entry_id);
        self.stations.insert(entry_id.to_string(), scheduler);
        logging::info(Source::System, Some(entry_id), "station registered");
        Ok(())
    }

    pub fn get(&self, entry_id: &str) -> Option<&RefreshScheduler> {
        self.stations.get(entry_id)
    }

    /// Stops and removes a station's scheduler. Returns false when the
    /// entry id was not registered.
    pub fn destroy(&mut self, entry_id: &str) -> bool {
        match self.stations.remove(entry_id) {
            Some(mut scheduler) => {
                scheduler.stop();
                logging::info(Source::System, Some(entry_id), "station destroyed");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Registered entry ids, for status reporting.
    pub fn entry_ids(&self) -> Vec<&str> {
        self.stations.keys().map(String::as_str).collect()
    }
}

impl Drop for StationRegistry {
    fn drop(&mut self) {
        // Schedulers stop themselves on drop; nothing extra needed, but
        // draining keeps teardown order explicit.
        self.stations.clear();
    }
}
