use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
	Pending,
	Completed,
	Failed,
	Refunded,
	Canceled,
}

/// An amount in the currency's minor unit (paisa, cents).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Money {
	pub minor_units: i64,
	pub currency:    String,
}

impl Money {
	pub fn new(minor_units: i64, currency: impl Into<String>) -> Self {
		Self {
			minor_units,
			currency: currency.into(),
		}
	}

	pub fn zero(currency: impl Into<String>) -> Self {
		Self::new(0, currency)
	}

	/// Major-unit rendering with two decimals and no symbol or grouping,
	/// e.g. `1000.50`, the shape form-based wallets expect.
	pub fn to_major_string(&self) -> String {
		let sign = if self.minor_units < 0 { "-" } else { "" };
		let abs = self.minor_units.unsigned_abs();
		format!("{sign}{}.{:02}", abs / 100, abs % 100)
	}
}

impl fmt::Display for Money {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.to_major_string(), self.currency)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
	pub amount:         Money,
	pub order_id:       String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub customer_name:  Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub customer_email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub customer_phone: Option<String>,
	pub success_url:    String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub failure_url:    Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub return_url:     Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub webhook_url:    Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description:    Option<String>,
	#[serde(default, skip_serializing_if = "HashMap::is_empty")]
	pub metadata:       HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentResponse {
	pub success:        bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payment_url:    Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transaction_id: Option<String>,
	pub order_id:       String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message:        Option<String>,
	#[serde(default, skip_serializing_if = "HashMap::is_empty")]
	pub metadata:       HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationRequest {
	#[serde(default)]
	pub transaction_id: String,
	#[serde(default)]
	pub order_id:       String,
	#[serde(default)]
	pub amount:         Money,
	/// Provider callback parameters, passed through untouched.
	#[serde(default)]
	pub raw_data:       HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResponse {
	pub success:        bool,
	pub status:         PaymentStatus,
	pub transaction_id: String,
	pub order_id:       String,
	pub amount:         Money,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub paid_amount:    Option<Money>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee:            Option<Money>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message:        Option<String>,
	#[serde(default, skip_serializing_if = "HashMap::is_empty")]
	pub metadata:       HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundRequest {
	pub transaction_id: String,
	pub amount:         Money,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reason:         Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundResponse {
	pub success:   bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refund_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message:   Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
	pub status:         PaymentStatus,
	pub transaction_id: String,
	#[serde(default)]
	pub order_id:       String,
	pub amount:         Money,
}
