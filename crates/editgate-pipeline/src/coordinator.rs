//! Lifecycle coordination: one evaluation task per gate, woken by
//! upstream changes and plan fetch results, owning at most one live
//! resource set. The previous set always comes down before a new one
//! goes up; superseded plan fetches are discarded by generation.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use editgate_core::eligibility::evaluate;
use editgate_core::flags::FLAG_INLINE_EDITS;
use editgate_core::types::{BlockReason, GateSnapshot, PlanTier, SessionEnv, Verdict};
use editgate_host::{
    CMD_REFRESH_SUGGESTIONS, CommandHandler, Disposable, EditSourceFactory, EditSuggestionSource,
    EditorHost, HostError, ResourceSet, SubscriptionApi,
};

use crate::notify::notify_ineligible;
use crate::upstream::Upstreams;

// ─── Context & Handle ─────────────────────────────────────────────

/// Collaborators and session facts a gate needs at startup.
pub struct GateContext {
    pub host: Arc<dyn EditorHost>,
    pub subscriptions: Arc<dyn SubscriptionApi>,
    pub source_factory: Arc<dyn EditSourceFactory>,
    pub env: SessionEnv,
}

/// Entry point: spawns the evaluation task for one session.
pub struct FeatureGate;

impl FeatureGate {
    pub fn start(ctx: GateContext, upstreams: Upstreams) -> GateHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (active_tx, active_rx) = watch::channel(false);
        let task = tokio::spawn(run_gate_loop(ctx, upstreams, shutdown_rx, active_tx));
        GateHandle {
            shutdown: shutdown_tx,
            active: active_rx,
            task,
        }
    }
}

/// Owner handle for a running gate. Dropping it signals shutdown;
/// `shutdown()` additionally waits until every resource is released.
pub struct GateHandle {
    shutdown: watch::Sender<bool>,
    active: watch::Receiver<bool>,
    task: JoinHandle<()>,
}

impl GateHandle {
    /// True while a resource set is registered with the host.
    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    /// Activation state as a stream, for embedders that mirror it.
    pub fn subscribe_active(&self) -> watch::Receiver<bool> {
        self.active.clone()
    }

    /// Stop the gate and wait for teardown to complete.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        let _ = (&mut self.task).await;
    }
}

impl Drop for GateHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

// ─── Tick State Machine ───────────────────────────────────────────

/// What a single tick did, beyond its effect on the resource set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    /// Master switch off or auth unresolved: nothing was evaluated.
    Suppressed,
    /// Feature active, fresh resource set live.
    Activated,
    /// Blocked with a user-facing reason the user has not seen yet.
    BlockedNotify(BlockReason),
    /// Blocked with no user action required.
    BlockedSilent(BlockReason),
}

/// The whole pipeline idles while the master switch is off or auth has
/// not finished resolving.
fn suppressed(snapshot: &GateSnapshot) -> bool {
    !snapshot.master_enabled || !snapshot.auth.is_resolved()
}

/// Mutable state owned by the evaluation task. Tick handling is
/// synchronous so it can be driven directly in tests.
struct GateState {
    ctx: GateContext,
    resources: ResourceSet,
    last_verdict: Option<Verdict>,
}

impl GateState {
    fn new(ctx: GateContext) -> Self {
        Self {
            ctx,
            resources: ResourceSet::new(),
            last_verdict: None,
        }
    }

    /// Apply one combined-latest snapshot. Disposes the previous resource
    /// set before building a new one; a registration error propagates
    /// with no partial set left behind.
    fn handle_snapshot(&mut self, snapshot: &GateSnapshot) -> Result<TickOutcome, HostError> {
        if suppressed(snapshot) {
            self.resources.dispose();
            self.last_verdict = None;
            return Ok(TickOutcome::Suppressed);
        }

        let verdict = evaluate(
            snapshot.flag_enabled,
            snapshot.auth,
            snapshot.plan,
            snapshot.env,
        );
        let previous = self.last_verdict.replace(verdict);

        self.resources.dispose();

        match verdict {
            Verdict::Eligible => {
                self.resources = self.build_resources()?;
                Ok(TickOutcome::Activated)
            }
            Verdict::Blocked(reason) => {
                let entered = previous != Some(verdict);
                if entered && reason == BlockReason::NotAuthenticated {
                    tracing::debug!("inline edits unavailable: not signed in");
                }
                if entered && reason.user_message().is_some() {
                    Ok(TickOutcome::BlockedNotify(reason))
                } else {
                    Ok(TickOutcome::BlockedSilent(reason))
                }
            }
        }
    }

    /// Register everything one activation needs, in order: the edit
    /// provider, the manual refresh command, and the source's own
    /// shutdown hook. An early error drops the partial set, which
    /// releases whatever was already registered.
    fn build_resources(&self) -> Result<ResourceSet, HostError> {
        let mut set = ResourceSet::new();
        let source = self.ctx.source_factory.create();

        set.push(
            self.ctx
                .host
                .register_edit_provider(Arc::clone(&source))?,
        );
        set.push(
            self.ctx
                .host
                .register_command(CMD_REFRESH_SUGGESTIONS, refresh_handler(&self.ctx.host))?,
        );
        set.push(Box::new(SourceShutdown(source)));
        Ok(set)
    }

    fn dispose(&mut self) {
        self.resources.dispose();
        self.last_verdict = None;
    }
}

/// Hide any visible suggestions, then request fresh ones. Hiding runs to
/// completion before the trigger fires.
fn refresh_handler(host: &Arc<dyn EditorHost>) -> CommandHandler {
    let host = Arc::clone(host);
    Arc::new(move || {
        let host = Arc::clone(&host);
        Box::pin(async move {
            host.hide_suggestions().await?;
            host.trigger_suggestions().await
        })
    })
}

/// Disposes the suggestion source together with the rest of its set.
struct SourceShutdown(Arc<dyn EditSuggestionSource>);

impl Disposable for SourceShutdown {
    fn dispose(&mut self) {
        self.0.shutdown();
    }
}

// ─── Evaluation Loop ──────────────────────────────────────────────

struct PlanFetch {
    generation: u64,
    result: Result<Option<PlanTier>, HostError>,
}

fn spawn_plan_fetch(
    api: Arc<dyn SubscriptionApi>,
    generation: u64,
    results: mpsc::UnboundedSender<PlanFetch>,
) {
    tokio::spawn(async move {
        let result = api.current_plan().await;
        let _ = results.send(PlanFetch { generation, result });
    });
}

fn run_tick(
    state: &mut GateState,
    upstreams: &Upstreams,
    plan: Option<PlanTier>,
    active: &watch::Sender<bool>,
) {
    let snapshot = GateSnapshot {
        master_enabled: upstreams.config.borrow().inline_edits_enabled,
        auth: *upstreams.auth.borrow(),
        plan,
        flag_enabled: upstreams.flags.borrow().is_enabled(FLAG_INLINE_EDITS),
        env: state.ctx.env,
        observed_at: Utc::now(),
    };

    let outcome = state.handle_snapshot(&snapshot);
    let now_active = matches!(outcome, Ok(TickOutcome::Activated));
    let flipped = active.send_if_modified(|current| {
        if *current == now_active {
            false
        } else {
            *current = now_active;
            true
        }
    });

    match outcome {
        Ok(TickOutcome::Activated) => {
            if flipped {
                tracing::info!("inline edits activated");
            }
        }
        Ok(TickOutcome::BlockedNotify(reason)) => {
            tracing::info!("inline edits inactive: {reason}");
            let host = Arc::clone(&state.ctx.host);
            tokio::spawn(notify_ineligible(host, reason.user_message()));
        }
        Ok(TickOutcome::BlockedSilent(_)) | Ok(TickOutcome::Suppressed) => {}
        Err(e) => {
            tracing::error!("inline edit activation failed: {e}");
        }
    }
}

async fn run_gate_loop(
    ctx: GateContext,
    mut upstreams: Upstreams,
    mut shutdown: watch::Receiver<bool>,
    active: watch::Sender<bool>,
) {
    let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel::<PlanFetch>();
    let mut state = GateState::new(ctx);
    let mut plan: Option<PlanTier> = None;
    let mut fetch_generation: u64 = 0;

    if upstreams.auth.borrow().is_authenticated() {
        fetch_generation += 1;
        spawn_plan_fetch(
            Arc::clone(&state.ctx.subscriptions),
            fetch_generation,
            fetch_tx.clone(),
        );
    }

    run_tick(&mut state, &upstreams, plan, &active);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            changed = upstreams.config.changed() => {
                if changed.is_err() {
                    break;
                }
                run_tick(&mut state, &upstreams, plan, &active);
            }
            changed = upstreams.auth.changed() => {
                if changed.is_err() {
                    break;
                }
                // Any auth movement invalidates the cached plan and every
                // fetch still in flight.
                fetch_generation += 1;
                plan = None;
                if upstreams.auth.borrow().is_authenticated() {
                    spawn_plan_fetch(
                        Arc::clone(&state.ctx.subscriptions),
                        fetch_generation,
                        fetch_tx.clone(),
                    );
                }
                run_tick(&mut state, &upstreams, plan, &active);
            }
            changed = upstreams.flags.changed() => {
                if changed.is_err() {
                    break;
                }
                run_tick(&mut state, &upstreams, plan, &active);
            }
            Some(fetch) = fetch_rx.recv() => {
                if fetch.generation != fetch_generation {
                    tracing::debug!("discarding superseded plan fetch");
                    continue;
                }
                match fetch.result {
                    Ok(resolved) => plan = resolved,
                    Err(e) => {
                        tracing::warn!("plan fetch failed: {e}");
                        plan = None;
                    }
                }
                run_tick(&mut state, &upstreams, plan, &active);
            }
        }
    }

    state.dispose();
    let _ = active.send(false);
    tracing::info!("inline edit gate stopped");
}

// ─── Tests ────────────────────────────────────────────────────────
