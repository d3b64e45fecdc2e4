use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use uuid::Uuid;

use crate::domain::context::CallContext;
use crate::domain::errors::ProviderError;
use crate::domain::gateway::{Gateway, GatewayConfig};
use crate::domain::payment::{
	Money, PaymentRequest, PaymentResponse, PaymentStatus, RefundRequest,
	RefundResponse, StatusResponse, VerificationRequest, VerificationResponse,
};

pub const METHOD: &str = "razorpay";
/// Razorpay uses one host for test and live keys.
pub const BASE_URL: &str = "https://api.razorpay.com";

pub struct RazorpayGateway {
	config: GatewayConfig,
}

pub fn new(config: GatewayConfig, _client: Client) -> Arc<dyn Gateway> {
	Arc::new(RazorpayGateway::new(config))
}

impl RazorpayGateway {
	pub fn new(config: GatewayConfig) -> Self {
		Self {
			config: config.with_defaults(BASE_URL, BASE_URL, "INR"),
		}
	}
}

#[async_trait]
impl Gateway for RazorpayGateway {
	fn name(&self) -> &str {
		"Razorpay"
	}

	fn method(&self) -> &str {
		METHOD
	}

	async fn initiate_payment(
		&self,
		_ctx: &CallContext,
		request: &PaymentRequest,
	) -> Result<PaymentResponse, ProviderError> {
		Ok(PaymentResponse {
			success: true,
			payment_url: Some(format!(
				"{}/checkout/{}",
				self.config.base_url, request.order_id
			)),
			transaction_id: Some(format!("order_{}", Uuid::new_v4().simple())),
			order_id: request.order_id.clone(),
			..Default::default()
		})
	}

	async fn verify_payment(
		&self,
		_ctx: &CallContext,
		request: &VerificationRequest,
	) -> Result<VerificationResponse, ProviderError> {
		Ok(VerificationResponse {
			success:        true,
			status:         PaymentStatus::Completed,
			transaction_id: request.transaction_id.clone(),
			order_id:       request.order_id.clone(),
			amount:         request.amount.clone(),
			paid_amount:    Some(request.amount.clone()),
			fee:            None,
			message:        None,
			metadata:       Default::default(),
		})
	}

	async fn refund_payment(
		&self,
		_ctx: &CallContext,
		_request: &RefundRequest,
	) -> Result<RefundResponse, ProviderError> {
		Ok(RefundResponse {
			success:   true,
			refund_id: Some(format!("rfnd_{}", Uuid::new_v4().simple())),
			message:   None,
		})
	}

	async fn get_status(
		&self,
		_ctx: &CallContext,
		transaction_id: &str,
	) -> Result<StatusResponse, ProviderError> {
		Ok(StatusResponse {
			status:         PaymentStatus::Completed,
			transaction_id: transaction_id.to_string(),
			order_id:       String::new(),
			amount:         Money::zero(self.config.currency.clone()),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_defaults_to_rupees() {
		let gateway = RazorpayGateway::new(GatewayConfig {
			sandbox: true,
			..Default::default()
		});

		let status = gateway
			.get_status(&CallContext::new(), "order_1")
			.await
			.unwrap();
		assert_eq!(status.amount, Money::zero("INR"));

		let response = gateway
			.initiate_payment(&CallContext::new(), &PaymentRequest {
				order_id: "o-1".to_string(),
				..Default::default()
			})
			.await
			.unwrap();
		assert_eq!(
			response.payment_url.as_deref(),
			Some("https://api.razorpay.com/checkout/o-1")
		);
	}
}
