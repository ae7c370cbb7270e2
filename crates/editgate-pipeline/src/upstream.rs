//! Upstream state channels: configuration, authentication, and flags.
//! Senders live with the embedder; the gate holds the receivers and only
//! ever reads the latest value.

use tokio::sync::watch;

use editgate_core::flags::FlagSet;
use editgate_core::types::{AuthState, FeatureConfig};

/// Receiver half handed to the gate.
#[derive(Debug, Clone)]
pub struct Upstreams {
    pub config: watch::Receiver<FeatureConfig>,
    pub auth: watch::Receiver<AuthState>,
    pub flags: watch::Receiver<FlagSet>,
}

/// Sender half kept by the embedder. Each setter replaces the current
/// value and wakes every subscribed gate.
#[derive(Debug)]
pub struct UpstreamFeed {
    config: watch::Sender<FeatureConfig>,
    auth: watch::Sender<AuthState>,
    flags: watch::Sender<FlagSet>,
}

impl UpstreamFeed {
    pub fn set_config(&self, config: FeatureConfig) {
        let _ = self.config.send(config);
    }

    pub fn set_auth(&self, auth: AuthState) {
        let _ = self.auth.send(auth);
    }

    pub fn set_flags(&self, flags: FlagSet) {
        let _ = self.flags.send(flags);
    }

    /// Fresh receiver set observing the same upstream values.
    pub fn subscribe(&self) -> Upstreams {
        Upstreams {
            config: self.config.subscribe(),
            auth: self.auth.subscribe(),
            flags: self.flags.subscribe(),
        }
    }
}

/// Build the upstream channels with the given initial values.
pub fn upstream_channel(
    config: FeatureConfig,
    auth: AuthState,
    flags: FlagSet,
) -> (UpstreamFeed, Upstreams) {
    let (config_tx, config_rx) = watch::channel(config);
    let (auth_tx, auth_rx) = watch::channel(auth);
    let (flags_tx, flags_rx) = watch::channel(flags);
    (
        UpstreamFeed {
            config: config_tx,
            auth: auth_tx,
            flags: flags_tx,
        },
        Upstreams {
            config: config_rx,
            auth: auth_rx,
            flags: flags_rx,
        },
    )
}

// ─── Tests ────────────────────────────────────────────────────────
