//! Notification signature middleware for Actix Web.
//!
//! Midtrans signs every HTTP notification. The `signature_key` field of the JSON body is
//! `SHA512(order_id + status_code + gross_amount + server_key)`, hex encoded.
//!
//! Wrap the notification route with this middleware so that forged notifications are rejected with a 403 before they
//! reach the reconciler. The request body is read, checked and then restored, so the handler can still extract it.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web,
    Error,
};
use donation_engine::notification_objects::PaymentNotification;
use donor_common::Secret;
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use midtrans_tools::helpers::is_valid_notification_signature;

use crate::errors::ServerError;

pub struct SignatureMiddlewareFactory {
    server_key: Secret<String>,
    // If false, then the middleware will not check the signature and always allow the call
    enabled: bool,
}

impl SignatureMiddlewareFactory {
    pub fn new(server_key: Secret<String>, enabled: bool) -> Self {
        SignatureMiddlewareFactory { server_key, enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SignatureMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = SignatureMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SignatureMiddlewareService {
            server_key: self.server_key.clone(),
            enabled: self.enabled,
            service: Rc::new(service),
        }))
    }
}

pub struct SignatureMiddlewareService<S> {
    server_key: Secret<String>,
    enabled: bool,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SignatureMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let server_key = self.server_key.reveal().clone();
        let enabled = self.enabled;
        Box::pin(async move {
            trace!("🔐️ Checking notification signature");
            if !enabled {
                trace!("🔐️ Signature checks are disabled. Allowing request.");
                return service.call(req).await;
            }
            let data = req.extract::<web::Bytes>().await.map_err(|e| {
                warn!("🔐️ Failed to extract request data: {e:?}");
                ServerError::InvalidRequestBody("Failed to extract request data.".into())
            })?;
            let notification = serde_json::from_slice::<PaymentNotification>(data.as_ref()).map_err(|e| {
                warn!("🔐️ Notification body is not valid JSON. {e}");
                ServerError::InvalidRequestBody(e.to_string())
            })?;
            check_signature(&notification, &server_key)?;
            trace!("🔐️ Signature check for [{}] ✅️", notification.order_id.as_deref().unwrap_or_default());
            req.set_payload(bytes_to_payload(data));
            service.call(req).await
        })
    }
}

/// Rejects the notification unless its `signature_key` matches the one computed from its fields and the server key.
pub fn check_signature(notification: &PaymentNotification, server_key: &str) -> Result<(), ServerError> {
    let Some(signature) = notification.signature_key.as_deref() else {
        warn!("🔐️ No signature found in notification. Denying access.");
        return Err(ServerError::InvalidSignature("No signature_key found.".into()));
    };
    let field = |f: &Option<String>| f.clone().unwrap_or_default();
    let order_id = field(&notification.order_id);
    let valid = is_valid_notification_signature(
        signature,
        &order_id,
        &field(&notification.status_code),
        &field(&notification.gross_amount),
        server_key,
    );
    if valid {
        Ok(())
    } else {
        warn!("🔐️ Invalid signature found in notification for [{order_id}]. Denying access.");
        Err(ServerError::InvalidSignature("Signature mismatch.".into()))
    }
}

fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
