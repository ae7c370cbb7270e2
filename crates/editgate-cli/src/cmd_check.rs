//! `editgate check` — one-shot eligibility verdict.

use editgate_core::eligibility::evaluate;
use editgate_core::types::{AuthState, ClientKind, PlanTier, SessionEnv, Verdict};

use crate::cli::CheckOpts;

/// Entry point for `editgate check`.
///
/// Returns an exit code: 0 when eligible, 1 when blocked.
pub fn cmd_check(opts: &CheckOpts) -> anyhow::Result<i32> {
    let verdict = evaluate_opts(opts)?;
    println!("{}", serde_json::to_string_pretty(&verdict_json(verdict))?);
    Ok(if verdict.is_eligible() { 0 } else { 1 })
}

pub(crate) fn evaluate_opts(opts: &CheckOpts) -> anyhow::Result<Verdict> {
    let auth: AuthState = opts.auth.parse()?;
    let plan = opts
        .plan
        .as_deref()
        .map(str::parse::<PlanTier>)
        .transpose()?;
    let env = SessionEnv {
        client: if opts.embedded {
            ClientKind::Embedded
        } else {
            ClientKind::Editor
        },
        test_mode: opts.test_mode,
    };
    Ok(evaluate(opts.flag_enabled, auth, plan, env))
}

pub(crate) fn verdict_json(verdict: Verdict) -> serde_json::Value {
    serde_json::json!({
        "eligible": verdict.is_eligible(),
        "reason": verdict.reason().map(|r| r.as_str()),
        "message": verdict.user_message(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use editgate_core::types::BlockReason;

    fn opts() -> CheckOpts {
        CheckOpts {
            flag_enabled: true,
            auth: "authenticated".to_string(),
            plan: Some("pro".to_string()),
            embedded: false,
            test_mode: false,
        }
    }

    #[test]
    fn eligible_inputs_exit_zero() {
        let verdict = evaluate_opts(&opts()).expect("evaluate");
        assert_eq!(verdict, Verdict::Eligible);
        assert_eq!(cmd_check(&opts()).expect("run"), 0);
    }

    #[test]
    fn blocked_inputs_exit_one() {
        let mut blocked = opts();
        blocked.plan = Some("free".to_string());
        assert_eq!(cmd_check(&blocked).expect("run"), 1);
    }

    #[test]
    fn omitted_plan_reads_as_unresolved() {
        let mut unresolved = opts();
        unresolved.plan = None;
        let verdict = evaluate_opts(&unresolved).expect("evaluate");
        assert_eq!(verdict, Verdict::Blocked(BlockReason::PlanUnresolved));
    }

    #[test]
    fn auth_alias_pending_parses() {
        let mut pending = opts();
        pending.auth = "pending".to_string();
        let verdict = evaluate_opts(&pending).expect("evaluate");
        assert_eq!(verdict, Verdict::Blocked(BlockReason::AuthPending));
    }

    #[test]
    fn unknown_plan_is_an_error() {
        let mut bad = opts();
        bad.plan = Some("platinum".to_string());
        assert!(evaluate_opts(&bad).is_err());
    }

    #[test]
    fn json_shape_for_eligible() {
        let json = verdict_json(Verdict::Eligible);
        assert_eq!(json["eligible"], true);
        assert!(json["reason"].is_null());
        assert!(json["message"].is_null());
    }

    #[test]
    fn json_shape_for_blocked() {
        let json = verdict_json(Verdict::Blocked(BlockReason::FreePlan));
        assert_eq!(json["eligible"], false);
        assert_eq!(json["reason"], "free_plan");
        assert_eq!(json["message"], "inline edits require a paid plan");
    }
}
