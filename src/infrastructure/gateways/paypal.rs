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

pub const METHOD: &str = "paypal";
pub const SANDBOX_URL: &str = "https://api.sandbox.paypal.com";
pub const PRODUCTION_URL: &str = "https://api.paypal.com";

/// PayPal checkout, redirect only.
pub struct PaypalGateway {
	config: GatewayConfig,
}

pub fn new(config: GatewayConfig, _client: Client) -> Arc<dyn Gateway> {
	Arc::new(PaypalGateway::new(config))
}

impl PaypalGateway {
	pub fn new(config: GatewayConfig) -> Self {
		Self {
			config: config.with_defaults(SANDBOX_URL, PRODUCTION_URL, "USD"),
		}
	}
}

#[async_trait]
impl Gateway for PaypalGateway {
	fn name(&self) -> &str {
		"PayPal"
	}

	fn method(&self) -> &str {
		METHOD
	}

	async fn initiate_payment(
		&self,
		_ctx: &CallContext,
		request: &PaymentRequest,
	) -> Result<PaymentResponse, ProviderError> {
		let token = format!("PAYPAL-{}", Uuid::new_v4().simple());

		Ok(PaymentResponse {
			success: true,
			payment_url: Some(format!(
				"{}/checkoutnow?token={token}",
				self.config.base_url
			)),
			transaction_id: Some(token),
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
			refund_id: Some(format!("REF-{}", Uuid::new_v4().simple())),
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
