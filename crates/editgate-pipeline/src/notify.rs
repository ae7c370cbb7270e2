//! One-shot ineligibility notice with a fallback-mode escape hatch.

use std::sync::Arc;

use editgate_host::EditorHost;

/// Message shown when a blocked verdict carries no specific reason.
pub const DEFAULT_INELIGIBLE_MESSAGE: &str = "inline edits are not yet enabled";

/// The single action offered alongside the message.
pub const ACTION_USE_CLASSIC: &str = "Switch to classic completions";

/// Global config key and value written when the user takes the action.
pub const SUGGESTION_MODE_KEY: &str = "editor.suggestionMode";
pub const SUGGESTION_MODE_CLASSIC: &str = "classic";

/// Tell the user why inline edits are unavailable and offer to switch the
/// session to classic completions. Fire-and-forget: presentation and
/// config failures are logged at debug level and swallowed, so a broken
/// notification surface can never affect gate state.
pub async fn notify_ineligible(host: Arc<dyn EditorHost>, reason: Option<&'static str>) {
    let message = reason.unwrap_or(DEFAULT_INELIGIBLE_MESSAGE);
    match host.show_error_with_action(message, ACTION_USE_CLASSIC).await {
        Ok(Some(choice)) if choice == ACTION_USE_CLASSIC => {
            if let Err(e) = host
                .update_global_config(SUGGESTION_MODE_KEY, SUGGESTION_MODE_CLASSIC)
                .await
            {
                tracing::debug!("suggestion mode fallback not applied: {e}");
            }
        }
        Ok(_) => {}
        Err(e) => tracing::debug!("ineligibility notice failed: {e}"),
    }
}

// ─── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use editgate_host::{
        CommandHandler, Disposable, EditSuggestionSource, FnDisposable, HostError,
    };
    use std::sync::Mutex;

    /// Prompt-surface fake: records what was shown and written, answers
    /// each prompt with a scripted choice.
    struct PromptHost {
        choice: Mutex<Option<String>>,
        fail_prompt: bool,
        fail_config: bool,
        shown: Mutex<Vec<(String, String)>>,
        config_writes: Mutex<Vec<(String, String)>>,
    }

    impl PromptHost {
        fn answering(choice: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                choice: Mutex::new(choice.map(String::from)),
                fail_prompt: false,
                fail_config: false,
                shown: Mutex::new(Vec::new()),
                config_writes: Mutex::new(Vec::new()),
            })
        }

        fn failing_prompt() -> Arc<Self> {
            let mut host = Self::template();
            host.fail_prompt = true;
            Arc::new(host)
        }

        fn failing_config() -> Arc<Self> {
            let mut host = Self::template();
            host.choice = Mutex::new(Some(ACTION_USE_CLASSIC.to_string()));
            host.fail_config = true;
            Arc::new(host)
        }

        fn template() -> Self {
            Self {
                choice: Mutex::new(None),
                fail_prompt: false,
                fail_config: false,
                shown: Mutex::new(Vec::new()),
                config_writes: Mutex::new(Vec::new()),
            }
        }

        fn shown(&self) -> Vec<(String, String)> {
            self.shown.lock().expect("shown lock").clone()
        }

        fn config_writes(&self) -> Vec<(String, String)> {
            self.config_writes.lock().expect("writes lock").clone()
        }
    }

    #[async_trait::async_trait]
    impl EditorHost for PromptHost {
        fn register_edit_provider(
            &self,
            _source: Arc<dyn EditSuggestionSource>,
        ) -> Result<Box<dyn Disposable>, HostError> {
            Ok(Box::new(FnDisposable::new(|| {})))
        }

        fn register_command(
            &self,
            _id: &str,
            _handler: CommandHandler,
        ) -> Result<Box<dyn Disposable>, HostError> {
            Ok(Box::new(FnDisposable::new(|| {})))
        }

        async fn hide_suggestions(&self) -> Result<(), HostError> {
            Ok(())
        }

        async fn trigger_suggestions(&self) -> Result<(), HostError> {
            Ok(())
        }

        async fn show_error_with_action(
            &self,
            message: &str,
            action: &str,
        ) -> Result<Option<String>, HostError> {
            if self.fail_prompt {
                return Err(HostError::Notification("prompt surface gone".into()));
            }
            self.shown
                .lock()
                .expect("shown lock")
                .push((message.to_string(), action.to_string()));
            Ok(self.choice.lock().expect("choice lock").clone())
        }

        async fn update_global_config(&self, key: &str, value: &str) -> Result<(), HostError> {
            if self.fail_config {
                return Err(HostError::Config("settings store read-only".into()));
            }
            self.config_writes
                .lock()
                .expect("writes lock")
                .push((key.to_string(), value.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn shows_specific_reason_with_the_action() {
        let host = PromptHost::answering(None);
        notify_ineligible(host.clone(), Some("inline edits require a paid plan")).await;

        let shown = host.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0, "inline edits require a paid plan");
        assert_eq!(shown[0].1, ACTION_USE_CLASSIC);
        assert!(host.config_writes().is_empty(), "dismissal changes nothing");
    }

    #[tokio::test]
    async fn falls_back_to_default_message() {
        let host = PromptHost::answering(None);
        notify_ineligible(host.clone(), None).await;

        assert_eq!(host.shown()[0].0, DEFAULT_INELIGIBLE_MESSAGE);
    }

    #[tokio::test]
    async fn taking_the_action_switches_suggestion_mode() {
        let host = PromptHost::answering(Some(ACTION_USE_CLASSIC));
        notify_ineligible(host.clone(), Some("inline edits require a paid plan")).await;

        assert_eq!(
            host.config_writes(),
            vec![(
                SUGGESTION_MODE_KEY.to_string(),
                SUGGESTION_MODE_CLASSIC.to_string()
            )]
        );
    }

    #[tokio::test]
    async fn unrelated_choice_changes_nothing() {
        let host = PromptHost::answering(Some("Learn more"));
        notify_ineligible(host.clone(), None).await;

        assert!(host.config_writes().is_empty());
    }

    #[tokio::test]
    async fn prompt_failure_is_swallowed() {
        let host = PromptHost::failing_prompt();
        notify_ineligible(host.clone(), None).await;

        assert!(host.shown().is_empty());
        assert!(host.config_writes().is_empty());
    }

    #[tokio::test]
    async fn config_failure_is_swallowed() {
        let host = PromptHost::failing_config();
        notify_ineligible(host.clone(), None).await;

        assert_eq!(host.shown().len(), 1, "prompt still shown");
        assert!(host.config_writes().is_empty());
    }
}
