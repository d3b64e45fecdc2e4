use std::time::Duration;

use actix_web::{HttpResponse, get, post, web};
use log::info;

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::{
	CountryGatewaysResponse, GatewaysResponse, InitiatePaymentRequest,
	RecommendationsResponse,
};
use crate::domain::context::CallContext;
use crate::domain::geography::Country;
use crate::domain::payment::{RefundRequest, VerificationRequest};
use crate::use_cases::payment_manager::PaymentManager;

/// Upper bound for the provider work done on behalf of one request.
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout(pub Duration);

impl RequestTimeout {
	fn context(&self) -> CallContext {
		CallContext::new().with_timeout(self.0)
	}
}

#[get("/gateways")]
pub async fn gateways(manager: web::Data<PaymentManager>) -> HttpResponse {
	HttpResponse::Ok().json(GatewaysResponse {
		gateways: manager.list_gateways(),
	})
}

#[get("/countries/{country}/gateways")]
pub async fn country_gateways(
	path: web::Path<String>,
	manager: web::Data<PaymentManager>,
) -> HttpResponse {
	let country = Country::new(path.into_inner());

	HttpResponse::Ok().json(CountryGatewaysResponse {
		region:  country.region(),
		methods: manager.available_methods_for(&country),
		country,
	})
}

#[get("/countries/{country}/recommendations")]
pub async fn country_recommendations(
	path: web::Path<String>,
	manager: web::Data<PaymentManager>,
) -> HttpResponse {
	let country = Country::new(path.into_inner());

	HttpResponse::Ok().json(RecommendationsResponse {
		region:          country.region(),
		recommendations: manager.recommendations_for(&country),
		country,
	})
}

#[post("/payments")]
pub async fn initiate_payment(
	payload: web::Json<InitiatePaymentRequest>,
	manager: web::Data<PaymentManager>,
	timeout: web::Data<RequestTimeout>,
) -> Result<HttpResponse, ApiError> {
	let InitiatePaymentRequest {
		country,
		method,
		payment,
	} = payload.into_inner();
	let ctx = timeout.context();

	let response = match method {
		Some(method) => {
			manager
				.initiate_with_method_for_country(
					&ctx,
					&country,
					&method,
					&payment,
				)
				.await?
		}
		None => manager.initiate_for_country(&ctx, &country, &payment).await?,
	};

	info!(
		"Payment initiated for order {} in {country}",
		response.order_id
	);
	Ok(HttpResponse::Ok().json(response))
}

#[post("/payments/{method}/verify")]
pub async fn verify_payment(
	path: web::Path<String>,
	payload: web::Json<VerificationRequest>,
	manager: web::Data<PaymentManager>,
	timeout: web::Data<RequestTimeout>,
) -> Result<HttpResponse, ApiError> {
	let response = manager
		.verify_payment(&timeout.context(), &path, &payload)
		.await?;

	Ok(HttpResponse::Ok().json(response))
}

#[post("/payments/{method}/refund")]
pub async fn refund_payment(
	path: web::Path<String>,
	payload: web::Json<RefundRequest>,
	manager: web::Data<PaymentManager>,
	timeout: web::Data<RequestTimeout>,
) -> Result<HttpResponse, ApiError> {
	let response = manager
		.refund_payment(&timeout.context(), &path, &payload)
		.await?;

	info!("Refund issued through {}", path.as_str());
	Ok(HttpResponse::Ok().json(response))
}

#[get("/payments/{method}/{transaction_id}/status")]
pub async fn payment_status(
	path: web::Path<(String, String)>,
	manager: web::Data<PaymentManager>,
	timeout: web::Data<RequestTimeout>,
) -> Result<HttpResponse, ApiError> {
	let (method, transaction_id) = path.into_inner();
	let response = manager
		.get_status(&timeout.context(), &method, &transaction_id)
		.await?;

	Ok(HttpResponse::Ok().json(response))
}
