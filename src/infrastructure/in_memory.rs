use crate::domain::order::{Amount, OrderReceipt, OrderRef, QrInfo};
use crate::domain::ports::PaymentGateway;
use crate::domain::status::PaymentStatus;
use crate::error::{CheckError, OrderError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// How the in-memory gateway answers order creation.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateBehavior {
    /// Accept and hand out a fresh UUID reference.
    Assign,
    /// Accept and hand out this reference.
    Fixed(OrderRef),
    /// Accept but leave `external_reference` out of the reply.
    NoReference,
    /// Refuse with this message.
    Reject(String),
    /// Act as if the gateway were unreachable.
    Unreachable,
}

#[derive(Debug)]
struct GatewayState {
    qr: QrInfo,
    create: CreateBehavior,
    /// Scripted check outcomes, consumed one per check. `Err` holds a failure message.
    script: VecDeque<std::result::Result<PaymentStatus, String>>,
    /// Returned once the script runs dry.
    last_status: PaymentStatus,
    check_delay: Option<Duration>,
    created: Vec<Amount>,
    checked: Vec<OrderRef>,
}

/// A scripted, thread-safe stand-in for the payment gateway.
///
/// Uses `Arc<RwLock<..>>` so clones share one script and one call log.
/// Used by the test suite and for running the terminal without a gateway.
#[derive(Debug, Clone)]
pub struct InMemoryGateway {
    state: Arc<RwLock<GatewayState>>,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    /// Creates a gateway that assigns UUID references and reports `pending` forever.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(GatewayState {
                qr: QrInfo {
                    qr_image: "https://example.invalid/qr/POS002.png".to_string(),
                    external_pos_id: "POS002".to_string(),
                },
                create: CreateBehavior::Assign,
                script: VecDeque::new(),
                last_status: PaymentStatus::Pending,
                check_delay: None,
                created: Vec::new(),
                checked: Vec::new(),
            })),
        }
    }

    pub async fn set_create(&self, behavior: CreateBehavior) {
        self.state.write().await.create = behavior;
    }

    /// Queues the status returned by the next unscripted check.
    pub async fn push_status(&self, status: impl Into<PaymentStatus>) {
        self.state.write().await.script.push_back(Ok(status.into()));
    }

    /// Queues a failing check.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.state.write().await.script.push_back(Err(message.into()));
    }

    /// Makes every check take `delay` before answering.
    pub async fn set_check_delay(&self, delay: Duration) {
        self.state.write().await.check_delay = Some(delay);
    }

    pub async fn create_calls(&self) -> usize {
        self.state.read().await.created.len()
    }

    pub async fn created_amounts(&self) -> Vec<Amount> {
        self.state.read().await.created.clone()
    }

    pub async fn check_calls(&self) -> usize {
        self.state.read().await.checked.len()
    }

    /// Number of checks issued for one reference.
    pub async fn checks_for(&self, reference: &OrderRef) -> usize {
        self.state
            .read()
            .await
            .checked
            .iter()
            .filter(|checked| *checked == reference)
            .count()
    }
}

#[async_trait]
impl PaymentGateway for InMemoryGateway {
    async fn qr_info(&self) -> Result<QrInfo> {
        Ok(self.state.read().await.qr.clone())
    }

    async fn create_order(&self, amount: &Amount) -> std::result::Result<OrderReceipt, OrderError> {
        let mut state = self.state.write().await;
        state.created.push(*amount);

        let external_reference = match &state.create {
            CreateBehavior::Assign => Some(OrderRef::new(uuid::Uuid::new_v4().to_string())),
            CreateBehavior::Fixed(reference) => Some(reference.clone()),
            CreateBehavior::NoReference => None,
            CreateBehavior::Reject(message) => return Err(OrderError::Rejected(message.clone())),
            CreateBehavior::Unreachable => {
                return Err(OrderError::ConnectionFailure(Box::new(
                    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "gateway offline"),
                )));
            }
        };

        Ok(OrderReceipt {
            external_reference,
            message: Some("Amount loaded onto the fixed QR".to_string()),
        })
    }

    async fn check_order(
        &self,
        reference: &OrderRef,
    ) -> std::result::Result<PaymentStatus, CheckError> {
        let delay = {
            let mut state = self.state.write().await;
            state.checked.push(reference.clone());
            state.check_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.write().await;
        match state.script.pop_front() {
            Some(Ok(status)) => {
                state.last_status = status.clone();
                Ok(status)
            }
            Some(Err(message)) => Err(CheckError::Transient(
                std::io::Error::other(message).into(),
            )),
            None => Ok(state.last_status.clone()),
        }
    }
}
