//! HTTP implementation of the exchange API.
//!
//! Handles request signing, rate pacing, and retry so nothing about HTTP
//! mechanics leaks into the core. Every response is unwrapped from the
//! venue's `{Success, Error, Data}` envelope before it leaves this module.

use crate::api::{Balance, ExchangeApi, OrderId};
use crate::auth::{nonce, Credentials};
use crate::error::{ClientError, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use sweep_core::{Amount, TradeOrder};
use sweep_market::{Currency, MarketQuote, TradePair};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum spacing between outbound requests.
const DEFAULT_PACING: Duration = Duration::from_millis(350);

/// Delay before retrying a 503 or transport failure.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Venue response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "Success")]
    success: bool,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Data")]
    data: Option<T>,
}

#[derive(Debug, Serialize)]
struct BalanceRequest<'a> {
    #[serde(rename = "Currency")]
    currency: &'a str,
}

#[derive(Debug, Serialize)]
struct TradeRequest {
    #[serde(rename = "TradePairId")]
    trade_pair_id: u64,
    #[serde(rename = "Type")]
    trade_type: &'static str,
    #[serde(rename = "Rate")]
    rate: rust_decimal::Decimal,
    #[serde(rename = "Amount")]
    amount: rust_decimal::Decimal,
}

#[derive(Debug, Deserialize)]
struct TradeResponse {
    /// Absent when the order filled immediately.
    #[serde(rename = "OrderId")]
    order_id: Option<u64>,
}

#[derive(Debug, Serialize)]
struct CancelRequest {
    #[serde(rename = "Type")]
    cancel_type: &'static str,
    #[serde(rename = "OrderId")]
    order_id: u64,
}

#[derive(Debug, Serialize)]
struct TransferRequest<'a> {
    #[serde(rename = "Currency")]
    currency: &'a str,
    #[serde(rename = "Username")]
    username: &'a str,
    #[serde(rename = "Amount")]
    amount: rust_decimal::Decimal,
}

#[derive(Debug, Serialize)]
struct WithdrawRequest<'a> {
    #[serde(rename = "Currency")]
    currency: &'a str,
    #[serde(rename = "Address")]
    address: &'a str,
    #[serde(rename = "Amount")]
    amount: rust_decimal::Decimal,
}

/// Signed, paced, retrying venue client.
pub struct HttpExchangeClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    pacing: Duration,
    retries: u32,
    retry_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl HttpExchangeClient {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Http(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            pacing: DEFAULT_PACING,
            retries: 3,
            retry_delay: DEFAULT_RETRY_DELAY,
            last_request: Mutex::new(None),
        })
    }

    /// Override pacing and retry timing, mainly for tests.
    pub fn with_timing(mut self, pacing: Duration, retry_delay: Duration) -> Self {
        self.pacing = pacing;
        self.retry_delay = retry_delay;
        self
    }

    /// Wait out the pacing interval since the previous request.
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.pacing {
                tokio::time::sleep(self.pacing - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<T> {
        if !envelope.success {
            return Err(ClientError::Venue(
                envelope.error.unwrap_or_else(|| "unspecified error".to_string()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| ClientError::Decode("missing Data in successful response".to_string()))
    }

    /// Unauthenticated GET endpoint.
    async fn query_public<T: DeserializeOwned>(&self, method: &str) -> Result<T> {
        self.pace().await;
        let url = format!("{}/{}", self.base_url, method);
        debug!(%url, "Public API request");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http(format!("{method}: HTTP {status}")));
        }
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("{method}: {e}")))?;
        Self::unwrap_envelope(envelope)
    }

    /// Signed POST endpoint with 503/transport retry.
    async fn query_private<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);
        let body_bytes = serde_json::to_vec(body)
            .map_err(|e| ClientError::Decode(format!("{method}: serialize: {e}")))?;

        let mut attempts_left = self.retries;
        loop {
            self.pace().await;
            let request_nonce = nonce();
            let header = self
                .credentials
                .authorization_header(&url, &request_nonce, &body_bytes)?;

            debug!(%url, "Private API request");
            let sent = self
                .http
                .post(&url)
                .header("Authorization", header)
                .header("Content-Type", "application/json; charset=utf-8")
                .body(body_bytes.clone())
                .send()
                .await;

            let response = match sent {
                Ok(r) => r,
                Err(e) if attempts_left > 0 => {
                    attempts_left -= 1;
                    warn!(%url, error = %e, attempts_left, "Transport error, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            match response.status() {
                status if status.is_success() => {
                    let envelope: Envelope<T> = response
                        .json()
                        .await
                        .map_err(|e| ClientError::Decode(format!("{method}: {e}")))?;
                    return Self::unwrap_envelope(envelope);
                }
                StatusCode::SERVICE_UNAVAILABLE if attempts_left > 0 => {
                    attempts_left -= 1;
                    warn!(%url, attempts_left, "Venue unavailable (503), retrying");
                    tokio::time::sleep(self.retry_delay).await;
                }
                StatusCode::TOO_MANY_REQUESTS => return Err(ClientError::RateLimited),
                status => {
                    return Err(ClientError::Http(format!("{method}: HTTP {status}")));
                }
            }
        }
    }
}

impl ExchangeApi for HttpExchangeClient {
    async fn get_currencies(&self) -> Result<Vec<Currency>> {
        self.query_public("GetCurrencies").await
    }

    async fn get_trade_pairs(&self) -> Result<Vec<TradePair>> {
        self.query_public("GetTradePairs").await
    }

    async fn get_markets(&self) -> Result<Vec<MarketQuote>> {
        self.query_public("GetMarkets").await
    }

    async fn get_balances(&self, currency: Option<&str>) -> Result<Vec<Balance>> {
        // An empty filter returns every currency.
        let body = BalanceRequest {
            currency: currency.unwrap_or(""),
        };
        self.query_private("GetBalance", &body).await
    }

    async fn submit_trade(&self, order: &TradeOrder) -> Result<Option<OrderId>> {
        let body = TradeRequest {
            trade_pair_id: order.pair_id,
            trade_type: order.side.as_wire(),
            rate: order.rate.inner(),
            amount: order.amount.inner(),
        };
        let response: TradeResponse = self.query_private("SubmitTrade", &body).await?;
        Ok(response.order_id.map(OrderId))
    }

    async fn cancel_trade(&self, order_id: OrderId) -> Result<()> {
        let body = CancelRequest {
            cancel_type: "Trade",
            order_id: order_id.0,
        };
        // The venue echoes back the canceled order ids; we only need success.
        let _: serde_json::Value = self.query_private("CancelTrade", &body).await?;
        Ok(())
    }

    async fn submit_transfer(&self, currency: &str, user: &str, amount: Amount) -> Result<()> {
        let body = TransferRequest {
            currency,
            username: user,
            amount: amount.inner(),
        };
        let _: serde_json::Value = self.query_private("SubmitTransfer", &body).await?;
        Ok(())
    }

    async fn submit_withdraw(&self, currency: &str, address: &str, amount: Amount) -> Result<()> {
        let body = WithdrawRequest {
            currency,
            address,
            amount: amount.inner(),
        };
        let _: serde_json::Value = self.query_private("SubmitWithdraw", &body).await?;
        Ok(())
    }
}
