use super::initiator::OrderInitiator;
use super::poller::{PollingSession, SessionContext, StatusPoller, StatusUpdate};
use crate::config::GatewayConfig;
use crate::domain::order::{Amount, CreatedOrder, QrInfo};
use crate::domain::ports::GatewayHandle;
use crate::error::Result;

/// The point-of-sale till.
///
/// `Terminal` owns the one polling session slot: it composes the initiator and
/// the poller, cancels the previous session before a new order is created, and
/// cancels whatever is still running when it is dropped. All mutation goes
/// through `&mut self`, so there is a single writer by construction.
pub struct Terminal {
    gateway: GatewayHandle,
    initiator: OrderInitiator,
    poller: StatusPoller,
    session: Option<PollingSession>,
}

impl Terminal {
    /// Creates a new `Terminal`.
    ///
    /// # Arguments
    ///
    /// * `gateway` - The payment gateway orders are created and checked against.
    /// * `config` - Supplies the polling interval.
    pub fn new(gateway: GatewayHandle, config: &GatewayConfig) -> Result<Self> {
        Ok(Self {
            initiator: OrderInitiator::new(gateway.clone()),
            poller: StatusPoller::new(gateway.clone(), config.poll_interval())?,
            gateway,
            session: None,
        })
    }

    /// Fetches the fixed QR shown to customers.
    pub async fn qr_info(&self) -> Result<QrInfo> {
        self.gateway.qr_info().await
    }

    /// Charges `raw_amount`.
    ///
    /// Invalid input is rejected before anything else happens, leaving any running
    /// session untouched. Otherwise the previous session is cancelled, the order is
    /// created and, if the gateway returned a tracking reference, a new session is
    /// started that reports every observed status to `on_update`.
    pub async fn submit<F>(&mut self, raw_amount: &str, on_update: F) -> Result<CreatedOrder>
    where
        F: Fn(StatusUpdate) + Send + Sync + 'static,
    {
        let amount = Amount::parse(raw_amount)?;
        self.stop();

        let order = self.initiator.create_order(amount).await?;
        if let Some(reference) = &order.reference {
            let context = SessionContext {
                reference: reference.clone(),
                amount: order.amount,
            };
            self.session = Some(self.poller.start(context, on_update));
        }
        Ok(order)
    }

    /// Cancels and clears the current session, if any. Safe to call repeatedly.
    ///
    /// Returns `true` if an active session was cancelled.
    pub fn stop(&mut self) -> bool {
        self.session.take().is_some_and(|session| session.stop())
    }

    /// The current session, including a resolved one that has not been cleared yet.
    pub fn session(&self) -> Option<&PollingSession> {
        self.session.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::poller::SessionState;
    use crate::domain::order::OrderRef;
    use crate::domain::status::PaymentStatus;
    use crate::error::PosError;
    use crate::infrastructure::in_memory::{CreateBehavior, InMemoryGateway};
    use std::sync::Arc;
    use std::time::Duration;

    fn terminal(gateway: &InMemoryGateway) -> Terminal {
        let config = GatewayConfig::default()
            .with_poll_interval(Duration::from_millis(3000))
            .unwrap();
        Terminal::new(Arc::new(gateway.clone()), &config).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_amount_never_reaches_gateway() {
        let gateway = InMemoryGateway::new();
        let mut terminal = terminal(&gateway);

        for input in ["", "abc", "-3"] {
            let result = terminal.submit(input, |_| {}).await;
            assert!(matches!(result, Err(PosError::InvalidAmount(_))));
        }
        assert_eq!(gateway.create_calls().await, 0);
        assert!(terminal.session().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_amount_keeps_running_session() {
        let gateway = InMemoryGateway::new();
        let mut terminal = terminal(&gateway);

        terminal.submit("10", |_| {}).await.unwrap();
        assert!(terminal.submit("ten", |_| {}).await.is_err());

        assert!(terminal.session().unwrap().is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_order_clears_previous_session() {
        let gateway = InMemoryGateway::new();
        let mut terminal = terminal(&gateway);

        terminal.submit("10", |_| {}).await.unwrap();
        gateway
            .set_create(CreateBehavior::Reject("No se pudo cargar el monto al QR".to_string()))
            .await;

        let result = terminal.submit("20", |_| {}).await;
        assert!(matches!(result, Err(PosError::Order(_))));
        assert!(terminal.session().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let gateway = InMemoryGateway::new();
        gateway
            .set_create(CreateBehavior::Fixed(OrderRef::new("ORD123")))
            .await;
        let mut terminal = terminal(&gateway);

        terminal.submit("150.50", |_| {}).await.unwrap();
        assert!(terminal.stop());
        assert!(!terminal.stop());
        assert!(terminal.session().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolved_session_stays_inspectable() {
        let gateway = InMemoryGateway::new();
        gateway.push_status("cancelled").await;
        let mut terminal = terminal(&gateway);

        terminal.submit("3", |_| {}).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let session = terminal.session().unwrap();
        assert_eq!(
            session.state(),
            SessionState::Terminal(PaymentStatus::Cancelled)
        );
        assert!(!terminal.stop());
    }
}
