use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Authentication ───────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    Authenticated,
    /// Credentials present but still being validated.
    #[default]
    PendingValidation,
    Unauthenticated,
}

impl AuthState {
    pub fn is_authenticated(self) -> bool {
        self == Self::Authenticated
    }

    /// False while validation is still in flight.
    pub fn is_resolved(self) -> bool {
        self != Self::PendingValidation
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authenticated => "authenticated",
            Self::PendingValidation => "pending_validation",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthState {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "authenticated" | "signed_in" => Ok(Self::Authenticated),
            "pending_validation" | "pending" => Ok(Self::PendingValidation),
            "unauthenticated" | "signed_out" => Ok(Self::Unauthenticated),
            _ => Err(GateError::UnknownAuthState(s.to_string())),
        }
    }
}

// ─── Subscription Plan ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum PlanTier {
    Free,
    Pro,
    Business,
}

impl PlanTier {
    pub const ALL: [Self; 3] = [Self::Free, Self::Pro, Self::Business];

    pub fn is_paid(self) -> bool {
        !matches!(self, Self::Free)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Business => "business",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "business" => Ok(Self::Business),
            _ => Err(GateError::UnknownPlanTier(s.to_string())),
        }
    }
}

// ─── Session Environment ──────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    /// The primary desktop editor.
    #[default]
    Editor,
    /// An embedding or agent runtime driving the editor surface remotely.
    Embedded,
}

impl ClientKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Editor => "editor",
            Self::Embedded => "embedded",
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientKind {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "editor" => Ok(Self::Editor),
            "embedded" => Ok(Self::Embedded),
            _ => Err(GateError::UnknownClientKind(s.to_string())),
        }
    }
}

/// Where and how this session is running. Test mode is an explicit input;
/// the evaluator never reads ambient process state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionEnv {
    pub client: ClientKind,
    pub test_mode: bool,
}

impl SessionEnv {
    pub fn editor() -> Self {
        Self {
            client: ClientKind::Editor,
            test_mode: false,
        }
    }

    pub fn embedded() -> Self {
        Self {
            client: ClientKind::Embedded,
            test_mode: false,
        }
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }
}

// ─── Configuration ────────────────────────────────────────────────

/// Slice of the editor configuration the gate reads. The master switch
/// suppresses the whole pipeline when off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub inline_edits_enabled: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            inline_edits_enabled: true,
        }
    }
}

impl FeatureConfig {
    pub fn enabled() -> Self {
        Self {
            inline_edits_enabled: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            inline_edits_enabled: false,
        }
    }
}

// ─── Snapshot ─────────────────────────────────────────────────────

/// Combined latest value of every upstream input, captured per tick and
/// discarded once a verdict is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSnapshot {
    pub master_enabled: bool,
    pub auth: AuthState,
    pub plan: Option<PlanTier>,
    pub flag_enabled: bool,
    pub env: SessionEnv,
    pub observed_at: DateTime<Utc>,
}

// ─── Verdict ──────────────────────────────────────────────────────

/// Why the feature is not active. Only some reasons are ever surfaced to
/// the user; the rest stay silent at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum BlockReason {
    AuthPending,
    NotAuthenticated,
    EmbeddedClient,
    PlanUnresolved,
    FreePlan,
    FlagDisabled,
}

impl BlockReason {
    /// Message shown to the user, for the reasons that warrant one.
    /// Auth and unresolved-plan blocks are silent.
    pub fn user_message(self) -> Option<&'static str> {
        match self {
            Self::EmbeddedClient => Some("inline edits are only available in the desktop editor"),
            Self::FreePlan => Some("inline edits require a paid plan"),
            Self::FlagDisabled => Some("inline edits are not yet enabled for this account"),
            Self::AuthPending | Self::NotAuthenticated | Self::PlanUnresolved => None,
        }
    }

    /// True for blocks that the next upstream change may clear on its own.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::AuthPending | Self::PlanUnresolved)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthPending => "auth_pending",
            Self::NotAuthenticated => "not_authenticated",
            Self::EmbeddedClient => "embedded_client",
            Self::PlanUnresolved => "plan_unresolved",
            Self::FreePlan => "free_plan",
            Self::FlagDisabled => "flag_disabled",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Eligible,
    Blocked(BlockReason),
}

impl Verdict {
    pub fn is_eligible(self) -> bool {
        self == Self::Eligible
    }

    pub fn reason(self) -> Option<BlockReason> {
        match self {
            Self::Eligible => None,
            Self::Blocked(reason) => Some(reason),
        }
    }

    pub fn user_message(self) -> Option<&'static str> {
        self.reason().and_then(BlockReason::user_message)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eligible => f.write_str("eligible"),
            Self::Blocked(reason) => write!(f, "blocked: {reason}"),
        }
    }
}

// ─── Error ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    UnknownAuthState(String),
    UnknownPlanTier(String),
    UnknownClientKind(String),
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAuthState(s) => write!(f, "unknown auth state: {s}"),
            Self::UnknownPlanTier(s) => write!(f, "unknown plan tier: {s}"),
            Self::UnknownClientKind(s) => write!(f, "unknown client kind: {s}"),
        }
    }
}

impl std::error::Error for GateError {}

// ─── Tests ────────────────────────────────────────────────────────
