use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Flag gating the inline-edit rollout.
pub const FLAG_INLINE_EDITS: &str = "inline_edits";

/// Account-scoped experiment flags keyed by name. Unknown names read as
/// disabled, so a missing rollout entry can never activate a feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet {
    flags: HashMap<String, bool>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flag(mut self, name: &str, enabled: bool) -> Self {
        self.set(name, enabled);
        self
    }

    pub fn set(&mut self, name: &str, enabled: bool) {
        self.flags.insert(name.to_string(), enabled);
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

// ─── Tests ────────────────────────────────────────────────────────
