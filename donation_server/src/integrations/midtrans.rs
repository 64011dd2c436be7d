//! Midtrans as the donation engine's [`PaymentGateway`].
//!
//! Snap opens the hosted payment page for a new donation. The Core API status query backs the manual sync route.
use donation_engine::{
    db_types::OrderId,
    traits::{GatewayError, PaymentGateway, PaymentSession, TransactionRequest, TransactionStatusReport},
};
use log::*;
use midtrans_tools::{
    helpers::truncate_item_name,
    CustomerDetails,
    ItemDetails,
    MidtransApi,
    MidtransApiError,
    MidtransConfig,
    SnapRequest,
    TransactionDetails,
    TransactionStatusResponse,
};

#[derive(Clone)]
pub struct MidtransGateway {
    api: MidtransApi,
}

impl MidtransGateway {
    pub fn new(config: MidtransConfig) -> Result<Self, MidtransApiError> {
        let api = MidtransApi::new(config)?;
        Ok(Self { api })
    }

    pub fn api(&self) -> &MidtransApi {
        &self.api
    }
}

impl PaymentGateway for MidtransGateway {
    async fn create_transaction(&self, request: TransactionRequest) -> Result<PaymentSession, GatewayError> {
        let order_id = request.order_id.clone();
        let snap = snap_request_for(request);
        let response = self.api.create_transaction(snap).await.map_err(|e| {
            warn!("💳️ Snap rejected the transaction for [{order_id}]. {e}");
            gateway_error(&order_id, e)
        })?;
        trace!("💳️ Snap session for [{order_id}] redirects to {}", response.redirect_url);
        Ok(PaymentSession { redirect_url: response.redirect_url, token: response.token })
    }

    async fn check_transaction_status(&self, order_id: &OrderId) -> Result<TransactionStatusReport, GatewayError> {
        let status = self.api.transaction_status(order_id.as_str()).await.map_err(|e| {
            debug!("💳️ Status query for [{order_id}] failed. {e}");
            gateway_error(order_id, e)
        })?;
        Ok(status_report(status))
    }
}

/// The Snap request for a donation: one line item for the full amount, with the name cut to Snap's 50 character limit.
pub fn snap_request_for(request: TransactionRequest) -> SnapRequest {
    let TransactionRequest { order_id, amount, customer_name, customer_email, customer_phone, item_id, item_label } =
        request;
    SnapRequest {
        transaction_details: TransactionDetails { order_id: order_id.to_string(), gross_amount: amount.value() },
        customer_details: Some(CustomerDetails {
            first_name: customer_name,
            email: customer_email,
            phone: customer_phone,
        }),
        item_details: vec![ItemDetails {
            id: item_id,
            price: amount.value(),
            quantity: 1,
            name: truncate_item_name(&item_label),
        }],
    }
}

pub fn status_report(status: TransactionStatusResponse) -> TransactionStatusReport {
    TransactionStatusReport {
        transaction_status: status.transaction_status,
        fraud_status: status.fraud_status,
        payment_type: status.payment_type,
    }
}

fn gateway_error(order_id: &OrderId, e: MidtransApiError) -> GatewayError {
    match e {
        MidtransApiError::Timeout(_) => GatewayError::Timeout,
        MidtransApiError::TransactionNotFound(_) => GatewayError::TransactionNotFound(order_id.clone()),
        MidtransApiError::QueryError { status, message } => GatewayError::Rejected(format!("{status}. {message}")),
        e => GatewayError::Communication(e.to_string()),
    }
}
