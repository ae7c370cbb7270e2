//! `editgate demo` — scripted end-to-end gate session against a logging
//! stub host: sign-in, plan resolution, flag rollout, master-switch
//! toggle, shutdown.

use std::sync::Arc;
use std::time::Duration;

use editgate_core::flags::{FLAG_INLINE_EDITS, FlagSet};
use editgate_core::types::{AuthState, FeatureConfig, PlanTier, SessionEnv};
use editgate_host::{
    CommandHandler, Disposable, EditSuggestion, EditSuggestionSource, EditorHost, FnDisposable,
    HostError, SubscriptionApi, SuggestionContext,
};
use editgate_pipeline::{FeatureGate, GateContext, upstream_channel};

use crate::cli::DemoOpts;

/// Stub editor surface that logs every interaction.
struct LoggingHost {
    accept_fallback: bool,
}

#[async_trait::async_trait]
impl EditorHost for LoggingHost {
    fn register_edit_provider(
        &self,
        _source: Arc<dyn EditSuggestionSource>,
    ) -> Result<Box<dyn Disposable>, HostError> {
        tracing::info!("host: edit provider registered");
        Ok(Box::new(FnDisposable::new(|| {
            tracing::info!("host: edit provider unregistered");
        })))
    }

    fn register_command(
        &self,
        id: &str,
        _handler: CommandHandler,
    ) -> Result<Box<dyn Disposable>, HostError> {
        tracing::info!(command = id, "host: command registered");
        let id = id.to_string();
        Ok(Box::new(FnDisposable::new(move || {
            tracing::info!(command = %id, "host: command unregistered");
        })))
    }

    async fn hide_suggestions(&self) -> Result<(), HostError> {
        tracing::info!("host: suggestions hidden");
        Ok(())
    }

    async fn trigger_suggestions(&self) -> Result<(), HostError> {
        tracing::info!("host: suggestions triggered");
        Ok(())
    }

    async fn show_error_with_action(
        &self,
        message: &str,
        action: &str,
    ) -> Result<Option<String>, HostError> {
        tracing::info!(message, action, "host: notice shown");
        Ok(self.accept_fallback.then(|| action.to_string()))
    }

    async fn update_global_config(&self, key: &str, value: &str) -> Result<(), HostError> {
        tracing::info!(key, value, "host: config updated");
        Ok(())
    }
}

/// Account service that resolves a paid plan after a short delay.
struct DemoPlans {
    delay: Duration,
}

#[async_trait::async_trait]
impl SubscriptionApi for DemoPlans {
    async fn current_plan(&self) -> Result<Option<PlanTier>, HostError> {
        tokio::time::sleep(self.delay).await;
        Ok(Some(PlanTier::Pro))
    }
}

struct DemoSource;

#[async_trait::async_trait]
impl EditSuggestionSource for DemoSource {
    async fn suggestions(
        &self,
        _ctx: &SuggestionContext,
    ) -> Result<Vec<EditSuggestion>, HostError> {
        Ok(Vec::new())
    }

    fn shutdown(&self) {
        tracing::info!("source: shut down");
    }
}

/// Entry point for `editgate demo`.
pub async fn cmd_demo(opts: &DemoOpts) -> anyhow::Result<()> {
    let step = Duration::from_millis(opts.step_ms);

    let (feed, upstreams) = upstream_channel(
        FeatureConfig::enabled(),
        AuthState::PendingValidation,
        FlagSet::new(),
    );
    let ctx = GateContext {
        host: Arc::new(LoggingHost {
            accept_fallback: opts.accept_fallback,
        }),
        subscriptions: Arc::new(DemoPlans { delay: step / 2 }),
        source_factory: Arc::new(|| Arc::new(DemoSource) as Arc<dyn EditSuggestionSource>),
        env: SessionEnv::editor(),
    };
    let handle = FeatureGate::start(ctx, upstreams);

    tokio::time::sleep(step).await;
    tracing::info!("step 1: credentials validated");
    feed.set_auth(AuthState::Authenticated);

    tokio::time::sleep(step).await;
    tracing::info!("step 2: rollout flag enabled for the account");
    feed.set_flags(FlagSet::new().with_flag(FLAG_INLINE_EDITS, true));

    tokio::time::sleep(step).await;
    tracing::info!(active = handle.is_active(), "step 3: master switch off");
    feed.set_config(FeatureConfig::disabled());

    tokio::time::sleep(step).await;
    tracing::info!("step 4: master switch back on");
    feed.set_config(FeatureConfig::enabled());

    tokio::time::sleep(step).await;
    tracing::info!(active = handle.is_active(), "demo finished, shutting down");
    handle.shutdown().await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_session_runs_to_completion() {
        let opts = DemoOpts {
            step_ms: 10,
            accept_fallback: false,
        };
        cmd_demo(&opts).await.expect("demo session");
    }

    #[tokio::test]
    async fn fallback_prompt_answer_is_the_action_label() {
        let host = LoggingHost {
            accept_fallback: true,
        };
        let choice = host
            .show_error_with_action("inline edits require a paid plan", "Switch")
            .await
            .expect("prompt");
        assert_eq!(choice.as_deref(), Some("Switch"));
    }
}
