//! The fixed-period dynamic replanning loop.
//!
//! # State machine
//!
//! `Idle → Planning → Idle`, one transition per tick.  A tick that arrives
//! while a plan is in flight is dropped — never queued — so at most one
//! plan exists at a time and stale plans can't supersede fresh ones out of
//! order.
//!
//! # Two layers
//!
//! [`ReplanningLoop::tick`] is the synchronous core: advance the fire
//! model, refresh congestion, replan, emit an update only when the route
//! materially changed.  [`DynamicUpdater`] drives it from a timer thread,
//! using a channel `recv_timeout` as a cancellable sleep.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Instant, SystemTime};

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use log::trace;
use parking_lot::Mutex;

use egress_core::{Point, UserProfile};
use egress_hazard::{CongestionReport, FireEvent};
use egress_spatial::{RoutePath, RouteSearch};

use crate::notify::AssistanceNotifier;
use crate::planner::EscapeRoutePlanner;

// ── RouteUpdate ───────────────────────────────────────────────────────────────

/// Event delivered to the update callback when the route changes.
///
/// Emitted only on change, never on every tick.
#[derive(Clone, Debug)]
pub struct RouteUpdate {
    pub path: RoutePath,
    /// Display colour for the guidance overlay.
    pub color: &'static str,
    pub timestamp: SystemTime,
    /// Always `true` — quiescent ticks emit nothing at all.
    pub path_changed: bool,
}

/// Guidance overlay colour used for replanned routes.
const UPDATE_COLOR: &str = "orange";

// ── CongestionSource ──────────────────────────────────────────────────────────

/// Pluggable congestion feed polled once per tick.
///
/// Return `None` to leave the current congestion set untouched, or
/// `Some(zones)` to replace it wholesale.
pub trait CongestionSource {
    fn current_zones(&mut self, location: Point) -> Option<Vec<CongestionReport>>;
}

/// A [`CongestionSource`] with no data — congestion never changes.
pub struct NoopCongestionSource;

impl CongestionSource for NoopCongestionSource {
    fn current_zones(&mut self, _location: Point) -> Option<Vec<CongestionReport>> {
        None
    }
}

// ── ReplanningLoop ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum LoopState {
    Idle,
    Planning,
}

/// Synchronous replanning core.  Drive it manually in tests or through
/// [`DynamicUpdater`] in production.
pub struct ReplanningLoop<S, N, C> {
    planner: EscapeRoutePlanner<S, N>,
    congestion: C,
    /// Current fire model; the radius grows monotonically each tick.
    fire: FireEvent,
    location: Point,
    profile: UserProfile,
    previous: Option<RoutePath>,
    state: LoopState,
}

impl<S: RouteSearch, N: AssistanceNotifier, C: CongestionSource> ReplanningLoop<S, N, C> {
    pub fn new(
        planner: EscapeRoutePlanner<S, N>,
        congestion: C,
        fire: FireEvent,
        location: Point,
        profile: UserProfile,
    ) -> Self {
        Self {
            planner,
            congestion,
            fire,
            location,
            profile,
            previous: None,
            state: LoopState::Idle,
        }
    }

    /// The fire model as of the last tick.
    pub fn fire(&self) -> &FireEvent {
        &self.fire
    }

    /// The most recent plan's path, if any tick has completed.
    pub fn current_path(&self) -> Option<&RoutePath> {
        self.previous.as_ref()
    }

    pub fn planner(&self) -> &EscapeRoutePlanner<S, N> {
        &self.planner
    }

    /// Run one replanning cycle.
    ///
    /// Returns `Some(update)` only when the new route materially differs
    /// from the previous one: a different length, or any of the first three
    /// nodes displaced by more than the configured tolerance.
    pub fn tick(&mut self, now: Instant) -> Option<RouteUpdate> {
        if self.state == LoopState::Planning {
            trace!("replanning tick dropped: previous plan still in flight");
            return None;
        }
        self.state = LoopState::Planning;

        // Advance the hazard model.  Growth is monotonic by configuration
        // (the factor is validated ≥ 1.0) and the field clamps besides.
        let growth = self.planner.config().fire_growth_factor;
        self.fire.spread_radius *= growth;

        if let Some(zones) = self.congestion.current_zones(self.location) {
            self.planner.field_mut().set_congestion_zones(zones, now);
        }

        let plan = self
            .planner
            .plan_escape_route(&self.fire, self.location, self.profile, now);

        let tolerance = self.planner.config().node_match_tolerance_m;
        let changed = path_changed(self.previous.as_ref(), &plan.path, tolerance);
        self.state = LoopState::Idle;

        if !changed {
            return None;
        }
        self.previous = Some(plan.path.clone());
        Some(RouteUpdate {
            path: plan.path,
            color: UPDATE_COLOR,
            timestamp: SystemTime::now(),
            path_changed: true,
        })
    }
}

/// Compare the first 3 nodes (or fewer for shorter paths) within the
/// planar tolerance; any displacement or a length difference counts as a
/// change.  The very first plan always counts as changed.
fn path_changed(previous: Option<&RoutePath>, next: &RoutePath, tolerance: f32) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    if previous.len() != next.len() {
        return true;
    }
    previous
        .points
        .iter()
        .zip(&next.points)
        .take(3)
        .any(|(a, b)| !a.matches(*b, tolerance))
}

// ── DynamicUpdater ────────────────────────────────────────────────────────────

#[derive(Default)]
struct SharedPathState {
    current: Option<RoutePath>,
    history: Vec<RouteUpdate>,
}

struct LoopHandle {
    stop_tx: Sender<()>,
    join: JoinHandle<()>,
}

/// Timer-thread driver for a [`ReplanningLoop`].
///
/// `start` and `stop` are idempotent: starting again restarts with the new
/// loop, stopping twice is a no-op.  Stopping cancels the timer only — an
/// in-flight plan finishes without emitting further events.
#[derive(Default)]
pub struct DynamicUpdater {
    handle: Option<LoopHandle>,
    shared: Arc<Mutex<SharedPathState>>,
}

impl DynamicUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch the timer thread.  The first plan runs immediately; further
    /// ticks fire at the planner's configured interval.  `on_update` is
    /// called for every emitted [`RouteUpdate`].
    pub fn start<S, N, C, F>(&mut self, mut replan: ReplanningLoop<S, N, C>, mut on_update: F)
    where
        S: RouteSearch + Send + 'static,
        N: AssistanceNotifier + Send + 'static,
        C: CongestionSource + Send + 'static,
        F: FnMut(RouteUpdate) + Send + 'static,
    {
        self.stop();
        *self.shared.lock() = SharedPathState::default();

        let interval = replan.planner.config().replan_interval;
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let shared = Arc::clone(&self.shared);

        let join = std::thread::spawn(move || loop {
            if let Some(update) = replan.tick(Instant::now()) {
                {
                    let mut state = shared.lock();
                    state.current = Some(update.path.clone());
                    state.history.push(update.clone());
                }
                on_update(update);
            }
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        self.handle = Some(LoopHandle { stop_tx, join });
    }

    /// Cancel the timer and wait for any in-flight plan to finish.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.stop_tx.try_send(());
            let _ = handle.join.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Most recently emitted path, if any.
    pub fn current_path(&self) -> Option<RoutePath> {
        self.shared.lock().current.clone()
    }

    /// Every update emitted since the last `start`, oldest first.
    pub fn history(&self) -> Vec<RouteUpdate> {
        self.shared.lock().history.clone()
    }
}

impl Drop for DynamicUpdater {
    fn drop(&mut self) {
        self.stop();
    }
}
