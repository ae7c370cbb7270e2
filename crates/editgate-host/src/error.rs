//! Error types for the host boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("registration failed: {0}")]
    Registration(String),

    #[error("command dispatch failed: {0}")]
    Command(String),

    #[error("config update failed: {0}")]
    Config(String),

    #[error("subscription lookup failed: {0}")]
    Subscription(String),

    #[error("notification failed: {0}")]
    Notification(String),
}
