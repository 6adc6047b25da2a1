use crate::config::GatewayConfig;
use crate::domain::order::{Amount, OrderReceipt, OrderRef, QrInfo};
use crate::domain::ports::PaymentGateway;
use crate::domain::status::{PaymentStatus, StatusReply};
use crate::error::{CheckError, DEFAULT_REJECTION, OrderError, PosError, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    amount: String,
}

/// Body the gateway sends alongside a non-2xx status.
#[derive(Debug, Default, Deserialize)]
struct ErrorReply {
    error: Option<String>,
}

/// `PaymentGateway` backed by the gateway's JSON-over-HTTP API.
///
/// Cloning is cheap: `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &GatewayConfig) -> Self {
        Self {
            client,
            base_url: config.base_url().clone(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| PosError::Config(format!("invalid endpoint '{path}': {e}")))
    }

    /// `check-order/{reference}/`, with the reference encoded as one path segment.
    fn check_order_url(&self, reference: &OrderRef) -> std::result::Result<Url, CheckError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CheckError::Transient(
                    format!("gateway URL '{}' cannot be a base", self.base_url).into(),
                )
            })?
            .pop_if_empty()
            .extend(["check-order", reference.as_str(), ""]);
        Ok(url)
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn qr_info(&self) -> Result<QrInfo> {
        let response = self.client.get(self.endpoint("qr-info/")?).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let reply = response.json::<ErrorReply>().await.unwrap_or_default();
            return Err(PosError::Gateway(
                reply
                    .error
                    .unwrap_or_else(|| format!("QR info request failed with {status}")),
            ));
        }

        Ok(response.json::<QrInfo>().await?)
    }

    async fn create_order(&self, amount: &Amount) -> std::result::Result<OrderReceipt, OrderError> {
        let url = self
            .endpoint("create-order/")
            .map_err(|e| OrderError::ConnectionFailure(Box::new(e)))?;
        let body = CreateOrderRequest {
            amount: amount.to_string(),
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| OrderError::ConnectionFailure(Box::new(e)))?;

        if response.status().is_success() {
            return response
                .json::<OrderReceipt>()
                .await
                .map_err(|e| OrderError::ConnectionFailure(Box::new(e)));
        }

        // A rejection body that cannot be read still counts as a rejection.
        let reply = response.json::<ErrorReply>().await.unwrap_or_default();
        Err(OrderError::Rejected(
            reply.error.unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
        ))
    }

    async fn check_order(
        &self,
        reference: &OrderRef,
    ) -> std::result::Result<PaymentStatus, CheckError> {
        let url = self.check_order_url(reference)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CheckError::Transient(Box::new(e)))?
            .error_for_status()
            .map_err(|e| CheckError::Transient(Box::new(e)))?;

        let reply = response
            .json::<StatusReply>()
            .await
            .map_err(|e| CheckError::Transient(Box::new(e)))?;
        Ok(reply.status)
    }
}
