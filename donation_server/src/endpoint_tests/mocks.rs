use donation_engine::{
    db_types::OrderId,
    traits::{GatewayError, PaymentGateway, PaymentSession, TransactionRequest, TransactionStatusReport},
};
use mockall::mock;

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        async fn create_transaction(&self, request: TransactionRequest) -> Result<PaymentSession, GatewayError>;
        async fn check_transaction_status(&self, order_id: &OrderId) -> Result<TransactionStatusReport, GatewayError>;
    }
}

/// A gateway that hands out a session for every request and is never asked for a status.
pub fn accepting_gateway() -> MockGateway {
    let mut gateway = MockGateway::new();
    gateway.expect_create_transaction().returning(|req| Ok(session_for(&req.order_id)));
    gateway.expect_check_transaction_status().never();
    gateway
}

pub fn session_for(order_id: &OrderId) -> PaymentSession {
    PaymentSession {
        redirect_url: format!("https://app.sandbox.midtrans.com/snap/v2/vtweb/{order_id}"),
        token: format!("snap-{order_id}"),
    }
}
