//! editgate-host: collaborator boundary for the inline-edit gate.
//! Editor surface traits, account services, and disposable registration
//! handles. No business logic — pure interface layer.

pub mod disposable;
pub mod error;
pub mod host;

pub use disposable::{Disposable, FnDisposable, ResourceSet};
pub use error::HostError;
pub use host::{
    CMD_REFRESH_SUGGESTIONS, CommandFuture, CommandHandler, EditSourceFactory, EditSuggestion,
    EditSuggestionSource, EditorHost, SubscriptionApi, SuggestionContext,
};
