//! editgate-core: eligibility data model and the pure gating evaluator.
//! Decides whether the experimental inline-edit feature may be active for
//! a session. No IO, no async — inputs in, verdict out.

pub mod eligibility;
pub mod flags;
pub mod types;

pub use eligibility::evaluate;
pub use flags::{FLAG_INLINE_EDITS, FlagSet};
pub use types::{
    AuthState, BlockReason, ClientKind, FeatureConfig, GateError, GateSnapshot, PlanTier,
    SessionEnv, Verdict,
};
