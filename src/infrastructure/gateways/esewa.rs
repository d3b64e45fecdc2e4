use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::context::CallContext;
use crate::domain::errors::ProviderError;
use crate::domain::gateway::{Gateway, GatewayConfig, Operation};
use crate::domain::payment::{
	PaymentRequest, PaymentResponse, PaymentStatus, RefundRequest,
	RefundResponse, StatusResponse, VerificationRequest, VerificationResponse,
};
use crate::infrastructure::gateways::{bounded, read_json};

pub const METHOD: &str = "esewa";
pub const SANDBOX_URL: &str = "https://rc-epay.esewa.com.np";
pub const PRODUCTION_URL: &str = "https://epay.esewa.com.np";

/// eSewa wallet. Payments start with a browser redirect to the ePay form
/// and are confirmed with a transaction status lookup.
pub struct EsewaGateway {
	config: GatewayConfig,
	client: Client,
}

#[derive(Debug, Deserialize)]
struct TransactionStatus {
	#[serde(default)]
	status: Option<String>,
}

pub fn new(config: GatewayConfig, client: Client) -> Arc<dyn Gateway> {
	Arc::new(EsewaGateway::new(config, client))
}

impl EsewaGateway {
	pub fn new(config: GatewayConfig, client: Client) -> Self {
		Self {
			config: config.with_defaults(SANDBOX_URL, PRODUCTION_URL, "NPR"),
			client,
		}
	}

	pub fn config(&self) -> &GatewayConfig {
		&self.config
	}
}

#[async_trait]
impl Gateway for EsewaGateway {
	fn name(&self) -> &str {
		"eSewa"
	}

	fn method(&self) -> &str {
		METHOD
	}

	async fn initiate_payment(
		&self,
		_ctx: &CallContext,
		request: &PaymentRequest,
	) -> Result<PaymentResponse, ProviderError> {
		let amount = request.amount.to_major_string();
		let failure_url = request.failure_url.clone().unwrap_or_default();

		let form = self
			.client
			.get(format!("{}/api/epay/main/v2/form", self.config.base_url))
			.query(&[
				("amt", amount.as_str()),
				("psc", "0"),
				("pdc", "0"),
				("txAmt", "0"),
				("tAmt", amount.as_str()),
				("pid", request.order_id.as_str()),
				("scd", self.config.merchant_id.as_str()),
				("su", request.success_url.as_str()),
				("fu", failure_url.as_str()),
			])
			.build()?;

		Ok(PaymentResponse {
			success: true,
			payment_url: Some(form.url().to_string()),
			order_id: request.order_id.clone(),
			..Default::default()
		})
	}

	async fn verify_payment(
		&self,
		ctx: &CallContext,
		request: &VerificationRequest,
	) -> Result<VerificationResponse, ProviderError> {
		let reference_id = request
			.raw_data
			.get("refId")
			.cloned()
			.unwrap_or_default();
		let amount = request.amount.to_major_string();

		let url =
			format!("{}/api/epay/transaction/status/", self.config.base_url);
		let lookup = self
			.client
			.get(url)
			.query(&[
				("amt", amount.as_str()),
				("rid", reference_id.as_str()),
				("pid", request.order_id.as_str()),
				("scd", self.config.merchant_id.as_str()),
			]);
		let response = bounded(lookup, ctx, &self.config).send().await?;
		let result: TransactionStatus = read_json(response).await?;

		let status = match result.status.as_deref() {
			Some("COMPLETE") => PaymentStatus::Completed,
			_ => PaymentStatus::Failed,
		};

		Ok(VerificationResponse {
			success: status == PaymentStatus::Completed,
			status,
			transaction_id: reference_id,
			order_id: request.order_id.clone(),
			amount: request.amount.clone(),
			paid_amount: None,
			fee: None,
			message: result.status,
			metadata: Default::default(),
		})
	}

	async fn refund_payment(
		&self,
		_ctx: &CallContext,
		_request: &RefundRequest,
	) -> Result<RefundResponse, ProviderError> {
		Err(ProviderError::Unsupported {
			operation: Operation::Refund,
		})
	}

	async fn get_status(
		&self,
		_ctx: &CallContext,
		_transaction_id: &str,
	) -> Result<StatusResponse, ProviderError> {
		// eSewa's lookup needs amount and order id, not just a transaction id.
		Err(ProviderError::Unsupported {
			operation: Operation::Status,
		})
	}
}
