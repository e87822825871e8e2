//! Assistance notification hook.
//!
//! Vulnerable occupants (elderly, children, mobility-impaired) get a
//! fire-and-forget signal to building staff alongside their route.  The
//! signal is advisory: it never affects the correctness of the returned
//! plan, and a slow or failing notifier must not stall planning — which is
//! why this is a synchronous trait call the embedder may fan out however
//! it likes, not a transport.

use egress_core::{Point, UserProfile};
use log::info;

/// Callback invoked when a vulnerable occupant requests a route.
///
/// The default implementation does nothing, so implementors only override
/// what they need.
pub trait AssistanceNotifier {
    fn assistance_needed(&mut self, _location: Point, _profile: UserProfile) {}
}

/// An [`AssistanceNotifier`] that does nothing.
pub struct NoopNotifier;

impl AssistanceNotifier for NoopNotifier {}

/// An [`AssistanceNotifier`] that records the signal on the `log` facade.
pub struct LogNotifier;

impl AssistanceNotifier for LogNotifier {
    fn assistance_needed(&mut self, location: Point, profile: UserProfile) {
        info!("assistance needed: {profile:?} occupant at {location}");
    }
}
