//! editgate-pipeline: reactive lifecycle for the inline-edit feature.
//! Combines upstream config/auth/flag state with plan lookups, evaluates
//! eligibility on every change, and owns the host-side resource set.

pub mod coordinator;
pub mod notify;
pub mod upstream;

pub use coordinator::{FeatureGate, GateContext, GateHandle};
pub use editgate_core::eligibility::evaluate;
pub use notify::notify_ineligible;
pub use upstream::{UpstreamFeed, Upstreams, upstream_channel};
