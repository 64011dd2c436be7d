use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::MidtransConfig,
    data_objects::{SnapRequest, SnapResponse, TransactionStatusResponse},
    MidtransApiError,
};

/// A cheaply cloneable handle to the Midtrans Snap and Core APIs.
///
/// The client is built once at start-up from a [`MidtransConfig`] and shared between workers.
#[derive(Clone)]
pub struct MidtransApi {
    config: MidtransConfig,
    client: Arc<Client>,
}

impl MidtransApi {
    pub fn new(config: MidtransConfig) -> Result<Self, MidtransApiError> {
        let mut headers = HeaderMap::with_capacity(3);
        let credentials = base64::encode(format!("{}:", config.server_key.reveal()));
        let val = HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|e| MidtransApiError::Initialization(e.to_string()))?;
        headers.insert(AUTHORIZATION, val);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| MidtransApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &MidtransConfig {
        &self.config
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: String,
        body: Option<B>,
    ) -> Result<T, MidtransApiError> {
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| MidtransApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await?;
            Err(MidtransApiError::QueryError { status, message })
        }
    }

    pub fn snap_url(&self) -> String {
        format!("{}/snap/v1/transactions", self.config.environment.snap_base_url())
    }

    pub fn status_url(&self, order_id: &str) -> String {
        format!("{}/v2/{order_id}/status", self.config.environment.api_base_url())
    }

    /// Opens a Snap payment session for the order. The donor completes the payment on the returned `redirect_url`.
    pub async fn create_transaction(&self, request: SnapRequest) -> Result<SnapResponse, MidtransApiError> {
        let order_id = request.transaction_details.order_id.clone();
        debug!("Creating Snap transaction for order {order_id}");
        let result = self.rest_query::<SnapResponse, SnapRequest>(Method::POST, self.snap_url(), Some(request)).await?;
        info!("Snap transaction created for order {order_id}");
        Ok(result)
    }

    /// Fetches the current status of the transaction for `order_id` from the Core API.
    ///
    /// Midtrans answers unknown orders with HTTP 200 and a `status_code` of `"404"` in the body, so that case is
    /// translated into [`MidtransApiError::TransactionNotFound`].
    pub async fn transaction_status(&self, order_id: &str) -> Result<TransactionStatusResponse, MidtransApiError> {
        debug!("Fetching transaction status for order {order_id}");
        let status =
            self.rest_query::<TransactionStatusResponse, ()>(Method::GET, self.status_url(order_id), None).await?;
        match status.status_code.as_str() {
            "404" => Err(MidtransApiError::TransactionNotFound(order_id.to_string())),
            code if code.starts_with('2') || code == "407" => {
                trace!("Order {order_id} has transaction status {:?}", status.transaction_status);
                Ok(status)
            },
            code => {
                let status_code = code.parse::<u16>().unwrap_or(500);
                let message = status.status_message.unwrap_or_default();
                Err(MidtransApiError::QueryError { status: status_code, message })
            },
        }
    }
}
