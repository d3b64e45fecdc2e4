use derive_more::derive::{Display, Error};

use crate::domain::gateway::Operation;

/// Failure raised by a gateway capability while talking to its provider.
#[derive(Debug, Display, Error)]
pub enum ProviderError {
	#[display("transport failure: {source}")]
	Transport { source: reqwest::Error },
	#[display("could not decode provider response: {source}")]
	Decode { source: serde_json::Error },
	#[display("provider rejected the request with status {status}: {body}")]
	Rejected { status: u16, body: String },
	#[display("provider response is missing '{field}'")]
	MissingField { field: &'static str },
	#[display("{operation} is not supported by this provider")]
	Unsupported { operation: Operation },
}

impl From<reqwest::Error> for ProviderError {
	fn from(source: reqwest::Error) -> Self {
		ProviderError::Transport { source }
	}
}

impl From<serde_json::Error> for ProviderError {
	fn from(source: serde_json::Error) -> Self {
		ProviderError::Decode { source }
	}
}

/// Failure surfaced by the registry and the payment manager.
#[derive(Debug, Display, Error)]
pub enum GatewayError {
	#[display("gateway {method} is not available for country {country}")]
	NotEligible { country: String, method: String },
	#[display("gateway {method} not registered")]
	NotConfigured { method: String },
	#[display("no factory registered for method: {method}")]
	NoFactory { method: String },
	#[display("no payment gateway available for country {country}")]
	NoGatewayAvailable { country: String },
	#[display("{method} {operation} failed: {source}")]
	Upstream {
		method:    String,
		operation: Operation,
		source:    ProviderError,
	},
	#[display("{operation} is not supported by {method}")]
	Unsupported { method: String, operation: Operation },
	#[display("{method} {operation} was cancelled")]
	Cancelled { method: String, operation: Operation },
	#[display("{method} {operation} exceeded its deadline")]
	DeadlineExceeded { method: String, operation: Operation },
}

impl GatewayError {
	/// Attaches method and operation context to a capability failure.
	pub fn from_provider(
		method: &str,
		operation: Operation,
		error: ProviderError,
	) -> Self {
		match error {
			ProviderError::Unsupported { operation } => {
				GatewayError::Unsupported {
					method: method.to_string(),
					operation,
				}
			}
			source => GatewayError::Upstream {
				method: method.to_string(),
				operation,
				source,
			},
		}
	}
}
