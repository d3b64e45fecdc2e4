use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::context::CallContext;
use crate::domain::errors::ProviderError;
use crate::domain::payment::{
	PaymentRequest, PaymentResponse, RefundRequest, RefundResponse,
	StatusResponse, VerificationRequest, VerificationResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
	Initiate,
	Verify,
	Refund,
	Status,
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Operation::Initiate => "initiate",
			Operation::Verify => "verify",
			Operation::Refund => "refund",
			Operation::Status => "status",
		})
	}
}

/// A live integration with one payment provider.
///
/// Providers that cannot refund or look up status return
/// [`ProviderError::Unsupported`]; callers see that error as is.
#[async_trait]
pub trait Gateway: Send + Sync + 'static {
	/// Human readable provider name, e.g. `eSewa`.
	fn name(&self) -> &str;

	/// Method identifier the gateway is registered under, e.g. `esewa`.
	fn method(&self) -> &str;

	async fn initiate_payment(
		&self,
		ctx: &CallContext,
		request: &PaymentRequest,
	) -> Result<PaymentResponse, ProviderError>;

	async fn verify_payment(
		&self,
		ctx: &CallContext,
		request: &VerificationRequest,
	) -> Result<VerificationResponse, ProviderError>;

	async fn refund_payment(
		&self,
		ctx: &CallContext,
		request: &RefundRequest,
	) -> Result<RefundResponse, ProviderError>;

	async fn get_status(
		&self,
		ctx: &CallContext,
		transaction_id: &str,
	) -> Result<StatusResponse, ProviderError>;
}

/// Per-method provider settings. Field semantics belong to the gateway;
/// the manager hands the value over untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GatewayConfig {
	#[serde(default)]
	pub merchant_id:  String,
	#[serde(default)]
	pub secret_key:   String,
	#[serde(default)]
	pub api_key:      String,
	/// Empty means the provider's sandbox or production default.
	#[serde(default)]
	pub base_url:     String,
	#[serde(default)]
	pub sandbox:      bool,
	#[serde(default)]
	pub currency:     String,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
	#[serde(default)]
	pub extra:        HashMap<String, serde_json::Value>,
}

impl GatewayConfig {
	pub fn timeout(&self) -> Option<Duration> {
		self.timeout_secs.map(Duration::from_secs)
	}

	/// Fills `base_url` and `currency` when the caller left them empty.
	pub fn with_defaults(
		mut self,
		sandbox_url: &str,
		production_url: &str,
		currency: &str,
	) -> Self {
		if self.base_url.is_empty() {
			self.base_url = if self.sandbox {
				sandbox_url.to_string()
			} else {
				production_url.to_string()
			};
		}
		if self.currency.is_empty() {
			self.currency = currency.to_string();
		}
		self
	}
}

/// Builds a gateway from its configuration and the shared HTTP client.
pub type GatewayFactory =
	Arc<dyn Fn(GatewayConfig, Client) -> Arc<dyn Gateway> + Send + Sync>;
