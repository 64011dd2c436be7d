use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{
    db_types::OrderId,
    traits::{GatewayError, PaymentGateway, PaymentSession, TransactionRequest, TransactionStatusReport},
};

#[derive(Debug, Default)]
struct StubState {
    failure: Option<GatewayError>,
    statuses: HashMap<OrderId, TransactionStatusReport>,
    requests: Vec<TransactionRequest>,
}

/// An in-memory [`PaymentGateway`] for tests. Clones share state.
///
/// Payment sessions succeed unless a failure has been set with [`StubGateway::fail_with`]. Status checks answer with
/// whatever was registered with [`StubGateway::set_status`], or [`GatewayError::TransactionNotFound`].
#[derive(Debug, Clone, Default)]
pub struct StubGateway {
    state: Arc<Mutex<StubState>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, error: GatewayError) {
        self.state.lock().expect("stub gateway lock poisoned").failure = Some(error);
    }

    pub fn recover(&self) {
        self.state.lock().expect("stub gateway lock poisoned").failure = None;
    }

    pub fn set_status(&self, order_id: &OrderId, transaction_status: &str, fraud_status: Option<&str>) {
        let report = TransactionStatusReport {
            transaction_status: Some(transaction_status.to_string()),
            fraud_status: fraud_status.map(String::from),
            payment_type: Some("bank_transfer".to_string()),
        };
        self.state.lock().expect("stub gateway lock poisoned").statuses.insert(order_id.clone(), report);
    }

    /// Every transaction request the stub has received, oldest first.
    pub fn requests(&self) -> Vec<TransactionRequest> {
        self.state.lock().expect("stub gateway lock poisoned").requests.clone()
    }
}

impl PaymentGateway for StubGateway {
    async fn create_transaction(&self, request: TransactionRequest) -> Result<PaymentSession, GatewayError> {
        let mut state = self.state.lock().expect("stub gateway lock poisoned");
        let order_id = request.order_id.clone();
        state.requests.push(request);
        match &state.failure {
            Some(e) => Err(e.clone()),
            None => Ok(PaymentSession {
                redirect_url: format!("https://pay.example.test/snap/v2/vtweb/{order_id}"),
                token: format!("token-{order_id}"),
            }),
        }
    }

    async fn check_transaction_status(&self, order_id: &OrderId) -> Result<TransactionStatusReport, GatewayError> {
        let state = self.state.lock().expect("stub gateway lock poisoned");
        state.statuses.get(order_id).cloned().ok_or_else(|| GatewayError::TransactionNotFound(order_id.clone()))
    }
}
