use crate::config::checked_interval;
use crate::domain::order::{Amount, OrderRef};
use crate::domain::ports::GatewayHandle;
use crate::domain::status::PaymentStatus;
use crate::error::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// What a session is bound to. Captured once at start and never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub reference: OrderRef,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Checks are running or scheduled.
    Active,
    /// Stopped because the gateway reported a terminal status.
    Terminal(PaymentStatus),
    /// Stopped by the owner, by a newer order, or by teardown.
    Cancelled,
}

/// One status observation, as delivered to the update callback.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub reference: OrderRef,
    pub amount: Amount,
    pub status: PaymentStatus,
}

#[derive(Debug)]
struct Shared {
    state: SessionState,
    checks: u64,
    failed_checks: u64,
}

type SharedHandle = Arc<Mutex<Shared>>;

fn lock(shared: &SharedHandle) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Starts polling sessions against a gateway at a fixed interval.
#[derive(Clone)]
pub struct StatusPoller {
    gateway: GatewayHandle,
    interval: Duration,
}

impl StatusPoller {
    /// Fails with `PosError::Config` on a zero interval.
    pub fn new(gateway: GatewayHandle, interval: Duration) -> Result<Self> {
        let interval = checked_interval(interval)?;
        Ok(Self { gateway, interval })
    }

    /// Starts a session: one check right away, then one per interval until a
    /// terminal status is seen or the session is stopped.
    ///
    /// `on_update` runs on the polling task for every status observed. It must
    /// not call back into the session it is invoked for.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F>(&self, context: SessionContext, on_update: F) -> PollingSession
    where
        F: Fn(StatusUpdate) + Send + Sync + 'static,
    {
        let shared = Arc::new(Mutex::new(Shared {
            state: SessionState::Active,
            checks: 0,
            failed_checks: 0,
        }));
        let context = Arc::new(context);

        info!(
            reference = %context.reference,
            amount = %context.amount,
            interval_ms = self.interval.as_millis() as u64,
            "polling started"
        );

        let task = tokio::spawn(run_session(
            self.gateway.clone(),
            context.clone(),
            shared.clone(),
            self.interval,
            on_update,
        ));

        PollingSession {
            context,
            shared,
            task,
        }
    }
}

/// Body of the polling task. Checks are strictly sequential: the next tick is
/// only awaited once the previous check has returned.
async fn run_session<F>(
    gateway: GatewayHandle,
    context: Arc<SessionContext>,
    shared: SharedHandle,
    period: Duration,
    on_update: F,
) where
    F: Fn(StatusUpdate) + Send + Sync + 'static,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // The first tick completes immediately.
        ticker.tick().await;

        let result = gateway.check_order(&context.reference).await;

        // Delivery happens under the lock so that `stop` cannot return while an
        // update is still on its way out.
        let mut guard = lock(&shared);
        if guard.state != SessionState::Active {
            debug!(reference = %context.reference, "discarding check result of a stopped session");
            return;
        }
        guard.checks += 1;

        match result {
            Ok(status) => {
                debug!(reference = %context.reference, %status, "status observed");
                on_update(StatusUpdate {
                    reference: context.reference.clone(),
                    amount: context.amount,
                    status: status.clone(),
                });
                if status.is_terminal() {
                    info!(reference = %context.reference, %status, "payment resolved, polling stopped");
                    guard.state = SessionState::Terminal(status);
                    return;
                }
            }
            Err(e) => {
                guard.failed_checks += 1;
                warn!(
                    reference = %context.reference,
                    error = %e,
                    failed_checks = guard.failed_checks,
                    "status check failed, retrying on next tick"
                );
            }
        }
    }
}

/// Handle to a running (or finished) polling session.
///
/// Dropping the handle stops the session.
#[derive(Debug)]
pub struct PollingSession {
    context: Arc<SessionContext>,
    shared: SharedHandle,
    task: JoinHandle<()>,
}

impl PollingSession {
    pub fn reference(&self) -> &OrderRef {
        &self.context.reference
    }

    pub fn state(&self) -> SessionState {
        lock(&self.shared).state.clone()
    }

    pub fn is_active(&self) -> bool {
        lock(&self.shared).state == SessionState::Active
    }

    /// Checks that completed while the session was active, failed ones included.
    pub fn checks(&self) -> u64 {
        lock(&self.shared).checks
    }

    pub fn failed_checks(&self) -> u64 {
        lock(&self.shared).failed_checks
    }

    /// Cancels the session. Once this returns no further check is issued and no
    /// further update is delivered; a check already in flight is dropped.
    ///
    /// Returns `true` if the session was active. Stopping a stopped or resolved
    /// session does nothing.
    pub fn stop(&self) -> bool {
        let cancelled = {
            let mut guard = lock(&self.shared);
            if guard.state == SessionState::Active {
                guard.state = SessionState::Cancelled;
                true
            } else {
                false
            }
        };
        self.task.abort();

        if cancelled {
            info!(reference = %self.context.reference, "polling cancelled");
        }
        cancelled
    }
}

impl Drop for PollingSession {
    fn drop(&mut self) {
        self.stop();
    }
}
