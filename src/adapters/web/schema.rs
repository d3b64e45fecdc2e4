use serde::{Deserialize, Serialize};

use crate::domain::geography::{Country, Region};
use crate::domain::payment::PaymentRequest;
use crate::domain::registry::Recommendation;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InitiatePaymentRequest {
	pub country: Country,
	/// Omitted means the highest ranked method available in `country`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub method:  Option<String>,
	pub payment: PaymentRequest,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CountryGatewaysResponse {
	pub country: Country,
	pub region:  Region,
	pub methods: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RecommendationsResponse {
	pub country:         Country,
	pub region:          Region,
	pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GatewaysResponse {
	pub gateways: Vec<String>,
}
