//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (e.g. I/O, database operations,
//! calls to the payment gateway) must be expressed as futures or asynchronous functions.
use actix_web::{get, web, HttpResponse, Responder};
use donation_engine::{
    db_types::OrderId,
    donation_objects::DonationRequest,
    notification_objects::PaymentNotification,
    traits::{CampaignManagement, DonationStore, DonorDirectory, PaymentGateway},
    DonationFlowApi,
    DonationQueryApi,
    ReconciliationApi,
};
use log::*;

use crate::errors::ServerError;

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro.
// `impl A, B` bounds the backend type parameter. A trailing `; G` adds a gateway type parameter bound by `G`.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+ ; $gateway:path) => {
        paste::paste! { pub struct [<$name:camel Route>]<B, G>(core::marker::PhantomData<fn() -> (B, G)>);}
        paste::paste! { impl<B, G> [<$name:camel Route>]<B, G> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> (B, G)>)
            }
        }}
        paste::paste! { impl<B, G> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B, G>
        where
            B: $($bounds +)+ 'static,
            G: $gateway + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B, G>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Donations  ----------------------------------------------------
route!(create_donation => Post "/donations" impl DonationStore, CampaignManagement, DonorDirectory; PaymentGateway);
/// Route handler for creating a donation
///
/// The body is a JSON object with `amount` (whole rupiah), `donor_id` and `campaign_id`. On success the donation is
/// stored as `pending` and the response (201) carries the donation along with the `payment_url` and `token` of the
/// payment session the donor must complete.
///
/// If the payment gateway cannot open a session, the donation is kept as `failed` and a 502 is returned.
pub async fn create_donation<B, G>(
    body: web::Json<DonationRequest>,
    api: web::Data<DonationFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: DonationStore + CampaignManagement + DonorDirectory,
    G: PaymentGateway,
{
    let request = body.into_inner();
    debug!("💻️ POST donation of {} to campaign #{} by donor #{}", request.amount, request.campaign_id, request.donor_id);
    let created = api.create_donation(request).await.map_err(|e| {
        info!("💻️ Could not create donation. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Created().json(created))
}

route!(payment_notification => Post "" impl DonationStore; PaymentGateway);
/// Route handler for payment notifications from the gateway
///
/// This route is mounted under `/donations/notifications`, behind the signature middleware. The response describes
/// what reconciliation did with the notification. Duplicate and stale notifications are acknowledged with a 200 and
/// change nothing.
pub async fn payment_notification<B, G>(
    body: web::Json<PaymentNotification>,
    api: web::Data<ReconciliationApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: DonationStore,
    G: PaymentGateway,
{
    let notification = body.into_inner();
    trace!("💻️ Received payment notification for {:?}", notification.order_id);
    let outcome = api.handle_notification(notification).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

route!(sync_donation => Post "/donations/sync/{order_id}" impl DonationStore; PaymentGateway);
/// Route handler for re-checking a donation's status with the payment gateway.
///
/// Use this when a notification has been lost. The status the gateway reports is reconciled exactly as if it had
/// arrived as a notification.
pub async fn sync_donation<B, G>(
    path: web::Path<OrderId>,
    api: web::Data<ReconciliationApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: DonationStore,
    G: PaymentGateway,
{
    let order_id = path.into_inner();
    debug!("💻️ POST sync for [{order_id}]");
    let outcome = api.sync_with_gateway(&order_id).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

route!(donation_summary => Get "/donations/summary" impl DonationStore, CampaignManagement);
/// Count and value of all confirmed donations.
pub async fn donation_summary<B>(api: web::Data<DonationQueryApi<B>>) -> Result<HttpResponse, ServerError>
where B: DonationStore + CampaignManagement {
    debug!("💻️ GET donation summary");
    let summary = api.summary().await?;
    Ok(HttpResponse::Ok().json(summary))
}

route!(donation_by_id => Get "/donations/id/{id}" impl DonationStore, CampaignManagement);
pub async fn donation_by_id<B>(
    path: web::Path<i64>,
    api: web::Data<DonationQueryApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: DonationStore + CampaignManagement,
{
    let id = path.into_inner();
    debug!("💻️ GET donation #{id}");
    let donation =
        api.donation_by_id(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Donation #{id}")))?;
    Ok(HttpResponse::Ok().json(donation))
}

route!(donation_by_order_id => Get "/donations/order/{order_id}" impl DonationStore, CampaignManagement);
pub async fn donation_by_order_id<B>(
    path: web::Path<OrderId>,
    api: web::Data<DonationQueryApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: DonationStore + CampaignManagement,
{
    let order_id = path.into_inner();
    debug!("💻️ GET donation [{order_id}]");
    let donation = api
        .donation_by_order_id(&order_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Donation {order_id}")))?;
    Ok(HttpResponse::Ok().json(donation))
}

route!(donations_for_donor => Get "/donations/donor/{donor_id}" impl DonationStore, CampaignManagement);
/// All of a donor's donations, newest first. A donor with no donations gets an empty list.
pub async fn donations_for_donor<B>(
    path: web::Path<i64>,
    api: web::Data<DonationQueryApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: DonationStore + CampaignManagement,
{
    let donor_id = path.into_inner();
    debug!("💻️ GET donations for donor #{donor_id}");
    let donations = api.donations_for_donor(donor_id).await?;
    Ok(HttpResponse::Ok().json(donations))
}

//----------------------------------------------   Campaigns  ----------------------------------------------------
route!(campaign_by_id => Get "/campaigns/{id}" impl DonationStore, CampaignManagement);
pub async fn campaign_by_id<B>(
    path: web::Path<i64>,
    api: web::Data<DonationQueryApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: DonationStore + CampaignManagement,
{
    let id = path.into_inner();
    debug!("💻️ GET campaign #{id}");
    let campaign = api.campaign_by_id(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Campaign #{id}")))?;
    Ok(HttpResponse::Ok().json(campaign))
}

route!(campaign_donations => Get "/campaigns/{id}/donations" impl DonationStore, CampaignManagement);
/// All donations made to the campaign, in any status, newest first.
pub async fn campaign_donations<B>(
    path: web::Path<i64>,
    api: web::Data<DonationQueryApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: DonationStore + CampaignManagement,
{
    let id = path.into_inner();
    debug!("💻️ GET donations for campaign #{id}");
    let donations = api.donations_for_campaign(id).await?;
    Ok(HttpResponse::Ok().json(donations))
}

route!(campaign_summary => Get "/campaigns/{id}/summary" impl DonationStore, CampaignManagement);
/// Count and value of the campaign's confirmed donations.
pub async fn campaign_summary<B>(
    path: web::Path<i64>,
    api: web::Data<DonationQueryApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: DonationStore + CampaignManagement,
{
    let id = path.into_inner();
    debug!("💻️ GET summary for campaign #{id}");
    let summary =
        api.campaign_summary(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Campaign #{id}")))?;
    Ok(HttpResponse::Ok().json(summary))
}
