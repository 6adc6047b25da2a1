use crate::domain::order::{Amount, CreatedOrder};
use crate::domain::ports::GatewayHandle;
use crate::error::OrderError;
use tracing::{info, warn};

/// Submits a validated amount to the gateway and extracts the tracking reference.
///
/// Never starts polling itself; the caller decides what to do with the reference.
#[derive(Clone)]
pub struct OrderInitiator {
    gateway: GatewayHandle,
}

impl OrderInitiator {
    pub fn new(gateway: GatewayHandle) -> Self {
        Self { gateway }
    }

    /// Issues exactly one order-creation request for `amount`.
    ///
    /// A reply without `external_reference` still counts as success, but the
    /// returned order carries no reference and cannot be tracked.
    pub async fn create_order(&self, amount: Amount) -> Result<CreatedOrder, OrderError> {
        info!(%amount, "creating order");

        let receipt = match self.gateway.create_order(&amount).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(%amount, error = %e, "order creation failed");
                return Err(e);
            }
        };

        let reference = receipt.reference().cloned();
        match &reference {
            Some(reference) => info!(%amount, %reference, "order created"),
            None => warn!(%amount, "order created without a tracking reference"),
        }

        Ok(CreatedOrder {
            amount,
            reference,
            message: receipt.message,
        })
    }
}
