use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::context::CallContext;
use crate::domain::errors::ProviderError;
use crate::domain::gateway::{Gateway, GatewayConfig, Operation};
use crate::domain::payment::{
	Money, PaymentRequest, PaymentResponse, PaymentStatus, RefundRequest,
	RefundResponse, StatusResponse, VerificationRequest, VerificationResponse,
};
use crate::infrastructure::gateways::{bounded, read_json};

pub const METHOD: &str = "khalti";
pub const SANDBOX_URL: &str = "https://a.khalti.com/api/v2";
pub const PRODUCTION_URL: &str = "https://khalti.com/api/v2";

/// Khalti ePayment. Amounts travel in paisa, which is what [`Money`]
/// already stores.
pub struct KhaltiGateway {
	config: GatewayConfig,
	client: Client,
}

#[derive(Debug, Serialize)]
struct CustomerInfo<'a> {
	name:  &'a str,
	email: &'a str,
	phone: &'a str,
}

#[derive(Debug, Serialize)]
struct InitiatePayload<'a> {
	return_url:          &'a str,
	website_url:         &'a str,
	amount:              i64,
	purchase_order_id:   &'a str,
	purchase_order_name: &'a str,
	customer_info:       CustomerInfo<'a>,
}

#[derive(Debug, Deserialize)]
struct InitiateReply {
	pidx:        Option<String>,
	payment_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct LookupPayload<'a> {
	pidx: &'a str,
}

#[derive(Debug, Deserialize)]
struct LookupReply {
	#[serde(default)]
	status:            String,
	#[serde(default)]
	total_amount:      i64,
	#[serde(default)]
	fee:               i64,
	#[serde(default)]
	purchase_order_id: Option<String>,
}

fn status_from_lookup(status: &str) -> PaymentStatus {
	match status.to_ascii_lowercase().as_str() {
		"completed" => PaymentStatus::Completed,
		"pending" | "initiated" => PaymentStatus::Pending,
		"refunded" => PaymentStatus::Refunded,
		"user canceled" => PaymentStatus::Canceled,
		_ => PaymentStatus::Failed,
	}
}

pub fn new(config: GatewayConfig, client: Client) -> Arc<dyn Gateway> {
	Arc::new(KhaltiGateway::new(config, client))
}

impl KhaltiGateway {
	pub fn new(config: GatewayConfig, client: Client) -> Self {
		Self {
			config: config.with_defaults(SANDBOX_URL, PRODUCTION_URL, "NPR"),
			client,
		}
	}

	pub fn config(&self) -> &GatewayConfig {
		&self.config
	}

	fn authorization(&self) -> String {
		format!("Key {}", self.config.secret_key)
	}

	async fn lookup(
		&self,
		ctx: &CallContext,
		pidx: &str,
	) -> Result<LookupReply, ProviderError> {
		let request = self
			.client
			.post(format!("{}/epayment/lookup/", self.config.base_url))
			.header("Authorization", self.authorization())
			.json(&LookupPayload { pidx });

		let response = bounded(request, ctx, &self.config).send().await?;
		read_json(response).await
	}
}

#[async_trait]
impl Gateway for KhaltiGateway {
	fn name(&self) -> &str {
		"Khalti"
	}

	fn method(&self) -> &str {
		METHOD
	}

	async fn initiate_payment(
		&self,
		ctx: &CallContext,
		request: &PaymentRequest,
	) -> Result<PaymentResponse, ProviderError> {
		let payload = InitiatePayload {
			return_url:          &request.success_url,
			website_url:         request
				.return_url
				.as_deref()
				.unwrap_or(&request.success_url),
			amount:              request.amount.minor_units,
			purchase_order_id:   &request.order_id,
			purchase_order_name: request
				.description
				.as_deref()
				.unwrap_or(&request.order_id),
			customer_info:       CustomerInfo {
				name:  request.customer_name.as_deref().unwrap_or_default(),
				email: request.customer_email.as_deref().unwrap_or_default(),
				phone: request.customer_phone.as_deref().unwrap_or_default(),
			},
		};

		let call = self
			.client
			.post(format!("{}/epayment/initiate/", self.config.base_url))
			.header("Authorization", self.authorization())
			.json(&payload);

		let response = bounded(call, ctx, &self.config).send().await?;
		let reply: InitiateReply = read_json(response).await?;

		let pidx = reply
			.pidx
			.ok_or(ProviderError::MissingField { field: "pidx" })?;
		let payment_url = reply
			.payment_url
			.ok_or(ProviderError::MissingField {
				field: "payment_url",
			})?;

		Ok(PaymentResponse {
			success: true,
			payment_url: Some(payment_url),
			transaction_id: Some(pidx),
			order_id: request.order_id.clone(),
			..Default::default()
		})
	}

	async fn verify_payment(
		&self,
		ctx: &CallContext,
		request: &VerificationRequest,
	) -> Result<VerificationResponse, ProviderError> {
		let reply = self.lookup(ctx, &request.transaction_id).await?;
		let status = status_from_lookup(&reply.status);
		let currency = &self.config.currency;

		Ok(VerificationResponse {
			success: status == PaymentStatus::Completed,
			status,
			transaction_id: request.transaction_id.clone(),
			order_id: reply
				.purchase_order_id
				.unwrap_or_else(|| request.order_id.clone()),
			amount: request.amount.clone(),
			paid_amount: Some(Money::new(reply.total_amount, currency)),
			fee: Some(Money::new(reply.fee, currency)),
			message: Some(reply.status),
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
		ctx: &CallContext,
		transaction_id: &str,
	) -> Result<StatusResponse, ProviderError> {
		let reply = self.lookup(ctx, transaction_id).await?;

		Ok(StatusResponse {
			status:         status_from_lookup(&reply.status),
			transaction_id: transaction_id.to_string(),
			order_id:       reply.purchase_order_id.unwrap_or_default(),
			amount:         Money::new(
				reply.total_amount,
				self.config.currency.clone(),
			),
		})
	}
}
