//! # HTTP Cart Gateway
//!
//! [`CartGateway`] over the backend's JSON cart endpoints using `reqwest`.
//!
//! ```text
//!   HttpCartGateway
//!     base_url ── join("/cart.js") ──► GET   ──► CartPayload ──► into_snapshot ──► CartSnapshot
//!              ── join("/cart/add.js") ► POST  ──► status check only
//!              ── join("/cart/change.js") POST ──► CartPayload ──► into_snapshot ──► CartSnapshot
//! ```
//!
//! The per-request timeout is a property of the client; the store enforces
//! none of its own.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use beautican_core::{CartSnapshot, LineKey, VariantId};

use crate::config::BackendConfig;
use crate::error::{StorefrontResult, TransportError};
use crate::gateway::{
    AddLineRequest, CartGateway, CartPayload, ChangeLineRequest, ADD_PATH, CART_PATH, CHANGE_PATH,
};

/// Cart gateway talking to a live backend.
#[derive(Debug, Clone)]
pub struct HttpCartGateway {
    client: Client,
    base_url: Url,
}

impl HttpCartGateway {
    /// Builds the gateway and its HTTP client from backend configuration.
    pub fn new(config: &BackendConfig) -> StorefrontResult<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(HttpCartGateway { client, base_url })
    }

    /// Base URL all endpoint paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url.join(path).map_err(|e| TransportError::Network {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, TransportError> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| network_error(path, e))?;
        check_status(path, response)
    }

    async fn read_snapshot(path: &str, response: Response) -> Result<CartSnapshot, TransportError> {
        let payload: CartPayload = response.json().await.map_err(|e| TransportError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })?;
        payload.into_snapshot(path)
    }
}

fn network_error(path: &str, err: reqwest::Error) -> TransportError {
    TransportError::Network {
        endpoint: path.to_string(),
        message: err.to_string(),
    }
}

fn check_status(path: &str, response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TransportError::Status {
            endpoint: path.to_string(),
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl CartGateway for HttpCartGateway {
    async fn fetch_cart(&self) -> Result<CartSnapshot, TransportError> {
        let url = self.endpoint(CART_PATH)?;
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(CART_PATH, e))?;
        let response = check_status(CART_PATH, response)?;
        Self::read_snapshot(CART_PATH, response).await
    }

    async fn add_line(&self, variant_id: VariantId, quantity: u32) -> Result<(), TransportError> {
        let body = AddLineRequest {
            id: variant_id.get(),
            quantity,
        };
        self.post(ADD_PATH, &body).await?;
        Ok(())
    }

    async fn change_line(&self, line_key: &LineKey, quantity: u32) -> Result<CartSnapshot, TransportError> {
        let body = ChangeLineRequest {
            id: line_key.as_str(),
            quantity,
        };
        let response = self.post(CHANGE_PATH, &body).await?;
        Self::read_snapshot(CHANGE_PATH, response).await
    }
}
