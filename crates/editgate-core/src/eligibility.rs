use crate::types::{AuthState, BlockReason, ClientKind, PlanTier, SessionEnv, Verdict};

/// Decide whether the inline-edit feature may be active for a session.
///
/// This is a **pure function**: no IO, no ambient state, total over its
/// inputs. Precedence is fixed and first match wins:
///
/// 1. Test mode forces eligibility, overriding every other check (auth and
///    plan may be absent or broken in harness runs).
/// 2. Authentication must be established; a pending validation or a signed
///    out session blocks without a user-facing reason.
/// 3. Embedded/agent clients are unsupported regardless of plan or flag.
/// 4. The plan must be resolved and paid; an unresolved plan blocks
///    silently rather than being treated as free.
/// 5. Otherwise the rollout flag decides.
///
/// The master configuration switch is a caller-side precondition, not an
/// input: a gate whose switch is off never invokes the evaluator.
pub fn evaluate(
    flag_enabled: bool,
    auth: AuthState,
    plan: Option<PlanTier>,
    env: SessionEnv,
) -> Verdict {
    // Explicit test mode bypasses every other check.
    if env.test_mode {
        return Verdict::Eligible;
    }

    match auth {
        AuthState::PendingValidation => return Verdict::Blocked(BlockReason::AuthPending),
        AuthState::Unauthenticated => return Verdict::Blocked(BlockReason::NotAuthenticated),
        AuthState::Authenticated => {}
    }

    if env.client == ClientKind::Embedded {
        return Verdict::Blocked(BlockReason::EmbeddedClient);
    }

    match plan {
        None => return Verdict::Blocked(BlockReason::PlanUnresolved),
        Some(tier) if !tier.is_paid() => return Verdict::Blocked(BlockReason::FreePlan),
        Some(_) => {}
    }

    if flag_enabled {
        Verdict::Eligible
    } else {
        Verdict::Blocked(BlockReason::FlagDisabled)
    }
}

// ─── Tests ────────────────────────────────────────────────────────
