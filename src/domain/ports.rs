use super::order::{Amount, OrderReceipt, OrderRef, QrInfo};
use super::status::PaymentStatus;
use crate::error::{CheckError, OrderError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Boundary to the remote payment gateway. The gateway is the only authority on
/// order status; nothing here infers status locally.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn qr_info(&self) -> Result<QrInfo>;
    async fn create_order(&self, amount: &Amount) -> std::result::Result<OrderReceipt, OrderError>;
    async fn check_order(&self, reference: &OrderRef)
    -> std::result::Result<PaymentStatus, CheckError>;
}

/// Shared handle to a gateway, cloned into every polling task.
pub type GatewayHandle = Arc<dyn PaymentGateway>;
