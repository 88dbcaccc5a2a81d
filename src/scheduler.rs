/// Refresh scheduler: one fetch-classify-publish cycle per tick.
///
/// Each configured station owns one `RefreshScheduler`, which drives a
/// dedicated worker thread through the cycle states
///
///   Idle -> Fetching -> {Published, Failed} -> Idle
///
/// on a fixed wall-clock interval, with one eager fetch at startup. The
/// loop is serialized by construction — a single thread performs the
/// fetch, so a new cycle can never start before the previous one settles.
/// The only suspension points are the HTTP calls, each bounded by the
/// client's 30-second timeout, so a stuck upstream costs at most one
/// missed tick.
///
/// A failed cycle records its reason and leaves the previously published
/// snapshot untouched; consumers keep reading the last good data (marked
/// stale by the host) until a new snapshot supersedes it atomically.
/// After `stop()`, no further fetches are issued and an in-flight fetch's
/// result is discarded rather than published.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::analysis::nearest::find_nearest;
use crate::config::StationSelect;
use crate::ingest::city_api::ApiClient;
use crate::logging::{self, Source};
use crate::model::{ApiError, PostDetail};

// ---------------------------------------------------------------------------
// Cycle state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum CycleState {
    Idle,
    Fetching,
    Published,
    Failed(String),
}

// ---------------------------------------------------------------------------
// One refresh cycle
// ---------------------------------------------------------------------------

/// Performs one cycle's fetch: resolve the post id (fixed, or nearest
/// over a freshly fetched list), then fetch its detail document.
///
/// An empty post list under coordinate selection is an upstream data
/// problem, not a transport problem, and fails the cycle with
/// `ApiError::Unexpected("no monitoring posts found")`.
pub fn run_cycle(client: &ApiClient, select: &StationSelect) -> Result<PostDetail, ApiError> {
    let post_id = match select {
        StationSelect::Fixed(id) => *id,
        StationSelect::Nearest { latitude, longitude } => {
            let posts = client.list_posts()?;
            find_nearest(&posts, *latitude, *longitude)
                .map(|post| post.id)
                .ok_or_else(|| ApiError::Unexpected("no monitoring posts found".to_string()))?
        }
    };

    client.get_post_detail(post_id)
}

// ---------------------------------------------------------------------------
// Shared scheduler state
// ---------------------------------------------------------------------------

struct SchedulerState {
    cycle: CycleState,
    snapshot: Option<Arc<PostDetail>>,
    last_error: Option<String>,
    stopped: bool,
}

/// State shared between the worker thread and accessor callers.
///
/// All transitions go through these methods so the publish/discard rules
/// are testable without spawning a thread.
struct Shared {
    state: Mutex<SchedulerState>,
    tick: Condvar,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: Mutex::new(SchedulerState {
                cycle: CycleState::Idle,
                snapshot: None,
                last_error: None,
                stopped: false,
            }),
            tick: Condvar::new(),
        }
    }

    /// Enters `Fetching`. Returns false if the scheduler has been
    /// stopped, in which case no fetch may be issued.
    fn begin_fetch(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.stopped {
            return false;
        }
        state.cycle = CycleState::Fetching;
        true
    }

    /// Publishes a new snapshot, replacing the previous one atomically.
    /// Returns false when the scheduler was stopped while the fetch was
    /// in flight; the result is discarded and nothing is published.
    fn publish(&self, detail: PostDetail) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.stopped {
            return false;
        }
        state.snapshot = Some(Arc::new(detail));
        state.last_error = None;
        state.cycle = CycleState::Published;
        true
    }

    /// Records a failed cycle. The previous snapshot is retained; a
    /// failure arriving after stop is discarded like any other result.
    fn fail(&self, reason: String) {
        let mut state = self.state.lock().unwrap();
        if state.stopped {
            return;
        }
        state.last_error = Some(reason.clone());
        state.cycle = CycleState::Failed(reason);
    }

    /// Returns to `Idle` and sleeps until the next tick or until stopped.
    /// Returns false when stopped.
    fn wait_interval(&self, interval: Duration) -> bool {
        let mut state = self.state.lock().unwrap();
        state.cycle = CycleState::Idle;
        let deadline = Instant::now() + interval;
        while !state.stopped {
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            let (next, _timeout) = self.tick.wait_timeout(state, deadline - now).unwrap();
            state = next;
        }
        false
    }

    fn request_stop(&self) {
        let mut state = self.state.lock().unwrap();
        state.stopped = true;
        self.tick.notify_all();
    }
}

// ---------------------------------------------------------------------------
// Scheduler handle
// ---------------------------------------------------------------------------

/// Owning handle for one station's refresh loop.
///
/// Accessors are safe to call from any thread; the published snapshot is
/// handed out as an `Arc`, so readers never observe a partially updated
/// document.
pub struct RefreshScheduler {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
    station_label: String,
}

impl RefreshScheduler {
    /// Spawns the refresh loop: one eager fetch immediately, then one
    /// cycle per `interval`. A failed startup fetch is non-fatal — the
    /// periodic loop starts regardless.
    pub fn start(
        client: ApiClient,
        select: StationSelect,
        interval: Duration,
        station_label: &str,
    ) -> Self {
        let shared = Arc::new(Shared::new());
        let worker_shared = Arc::clone(&shared);
        let label = station_label.to_string();
        let worker_label = label.clone();

        let worker = thread::spawn(move || {
            refresh_loop(&worker_shared, &client, &select, interval, &worker_label);
        });

        Self {
            shared,
            worker: Some(worker),
            station_label: label,
        }
    }

    /// The most recently published snapshot, if any cycle has succeeded.
    pub fn snapshot(&self) -> Option<Arc<PostDetail>> {
        self.shared.state.lock().unwrap().snapshot.clone()
    }

    /// The most recent cycle failure, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.shared.state.lock().unwrap().last_error.clone()
    }

    pub fn cycle_state(&self) -> CycleState {
        self.shared.state.lock().unwrap().cycle.clone()
    }

    pub fn station_label(&self) -> &str {
        &self.station_label
    }

    /// Stops the loop: no further fetches are issued, an in-flight
    /// fetch's result is discarded, and the worker thread is joined.
    pub fn stop(&mut self) {
        self.shared.request_stop();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn refresh_loop(
    shared: &Shared,
    client: &ApiClient,
    select: &StationSelect,
    interval: Duration,
    label: &str,
) {
    loop {
        if !shared.begin_fetch() {
            break;
        }

        match run_cycle(client, select) {
            Ok(detail) => {
                let params = detail.params.len();
                let name = detail.name.clone();
                if shared.publish(detail) {
                    logging::info(
                        Source::Scheduler,
                        Some(label),
                        &format!("published snapshot for {} with {} params", name, params),
                    );
                } else {
                    logging::debug(
                        Source::Scheduler,
                        Some(label),
                        "discarding fetch result that arrived after stop",
                    );
                    break;
                }
            }
            Err(err) => {
                logging::log_fetch_failure(label, "refresh cycle", &err);
                shared.fail(err.to_string());
            }
        }

        if !shared.wait_interval(interval) {
            break;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
