//! Editor-surface and account-service traits. Async methods go through
//! async_trait so hosts can live behind `Arc<dyn _>`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use editgate_core::types::PlanTier;

use crate::disposable::Disposable;
use crate::error::HostError;

/// Command id for the manual suggestion refresh registered while the
/// feature is active.
pub const CMD_REFRESH_SUGGESTIONS: &str = "editgate.refreshSuggestions";

pub type CommandFuture = Pin<Box<dyn Future<Output = Result<(), HostError>> + Send>>;
pub type CommandHandler = Arc<dyn Fn() -> CommandFuture + Send + Sync>;

/// Document position a suggestion is requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionContext {
    pub path: String,
    pub line: u32,
    pub column: u32,
}

/// A single inline edit offered to the host for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSuggestion {
    pub text: String,
}

/// Source of inline edit suggestions. How suggestions are produced is the
/// embedder's concern; the gate only registers, invokes, and disposes it.
#[async_trait::async_trait]
pub trait EditSuggestionSource: Send + Sync {
    async fn suggestions(&self, ctx: &SuggestionContext) -> Result<Vec<EditSuggestion>, HostError>;

    /// Release anything the source holds. Runs when the feature
    /// deactivates; must tolerate repeated calls.
    fn shutdown(&self) {}
}

/// Creates a fresh suggestion source for each activation.
pub trait EditSourceFactory: Send + Sync {
    fn create(&self) -> Arc<dyn EditSuggestionSource>;
}

impl<F> EditSourceFactory for F
where
    F: Fn() -> Arc<dyn EditSuggestionSource> + Send + Sync,
{
    fn create(&self) -> Arc<dyn EditSuggestionSource> {
        self()
    }
}

/// Editor surface the gate drives. Registrations return a handle that
/// unregisters on dispose.
#[async_trait::async_trait]
pub trait EditorHost: Send + Sync {
    fn register_edit_provider(
        &self,
        source: Arc<dyn EditSuggestionSource>,
    ) -> Result<Box<dyn Disposable>, HostError>;

    fn register_command(
        &self,
        id: &str,
        handler: CommandHandler,
    ) -> Result<Box<dyn Disposable>, HostError>;

    async fn hide_suggestions(&self) -> Result<(), HostError>;

    async fn trigger_suggestions(&self) -> Result<(), HostError>;

    /// Show `message` with a single action button. Resolves to the chosen
    /// action label, or `None` if the user dismissed the prompt.
    async fn show_error_with_action(
        &self,
        message: &str,
        action: &str,
    ) -> Result<Option<String>, HostError>;

    async fn update_global_config(&self, key: &str, value: &str) -> Result<(), HostError>;
}

/// Account service resolving the session's subscription plan. `None`
/// means the account has no resolved plan yet.
#[async_trait::async_trait]
pub trait SubscriptionApi: Send + Sync {
    async fn current_plan(&self) -> Result<Option<PlanTier>, HostError>;
}

// ─── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullSource;

    #[async_trait::async_trait]
    impl EditSuggestionSource for NullSource {
        async fn suggestions(
            &self,
            _ctx: &SuggestionContext,
        ) -> Result<Vec<EditSuggestion>, HostError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn closure_factory_creates_fresh_sources() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        let factory = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(NullSource) as Arc<dyn EditSuggestionSource>
        };

        let a = factory.create();
        let b = factory.create();

        assert_eq!(created.load(Ordering::SeqCst), 2);
        assert!(!Arc::ptr_eq(&a, &b), "each activation gets its own source");
    }

    #[test]
    fn default_shutdown_is_a_noop() {
        let source = NullSource;
        source.shutdown();
        source.shutdown();
    }

    #[test]
    fn factory_is_usable_as_trait_object() {
        let factory: Arc<dyn EditSourceFactory> =
            Arc::new(|| Arc::new(NullSource) as Arc<dyn EditSuggestionSource>);
        let _source = factory.create();
    }
}
