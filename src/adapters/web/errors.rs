use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use derive_more::derive::{Display, Error};
use serde::Serialize;

use crate::domain::errors::GatewayError;

#[derive(Serialize)]
struct ErrorResponse {
	#[serde(rename = "statusCode")]
	status_code: u16,
	error:       String,
	message:     String,
	kind:        &'static str,
}

#[derive(Debug, Display, Error)]
pub enum ApiError {
	#[display("{_0}")]
	Gateway(GatewayError),
}

impl ApiError {
	pub fn name(&self) -> String {
		self.status_code()
			.canonical_reason()
			.unwrap_or("Unknown")
			.to_string()
	}

	/// Stable machine-readable tag so callers can branch without parsing
	/// the message.
	pub fn kind(&self) -> &'static str {
		match self {
			ApiError::Gateway(error) => match error {
				GatewayError::NotEligible { .. } => "not_eligible",
				GatewayError::NotConfigured { .. } => "not_configured",
				GatewayError::NoFactory { .. } => "no_factory",
				GatewayError::NoGatewayAvailable { .. } => {
					"no_gateway_available"
				}
				GatewayError::Upstream { .. } => "upstream",
				GatewayError::Unsupported { .. } => "unsupported",
				GatewayError::Cancelled { .. } => "cancelled",
				GatewayError::DeadlineExceeded { .. } => "deadline_exceeded",
			},
		}
	}
}

impl ResponseError for ApiError {
	fn error_response(&self) -> HttpResponse {
		HttpResponse::build(self.status_code())
			.content_type(ContentType::json())
			.json(ErrorResponse {
				status_code: self.status_code().as_u16(),
				error:       self.to_string(),
				message:     self.name(),
				kind:        self.kind(),
			})
	}

	fn status_code(&self) -> StatusCode {
		match self {
			ApiError::Gateway(error) => match error {
				GatewayError::NotEligible { .. } => StatusCode::FORBIDDEN,
				GatewayError::NotConfigured { .. }
				| GatewayError::NoGatewayAvailable { .. } => {
					StatusCode::SERVICE_UNAVAILABLE
				}
				GatewayError::NoFactory { .. } => {
					StatusCode::INTERNAL_SERVER_ERROR
				}
				GatewayError::Upstream { .. } => StatusCode::BAD_GATEWAY,
				GatewayError::Unsupported { .. } => StatusCode::NOT_IMPLEMENTED,
				GatewayError::Cancelled { .. } => StatusCode::REQUEST_TIMEOUT,
				GatewayError::DeadlineExceeded { .. } => {
					StatusCode::GATEWAY_TIMEOUT
				}
			},
		}
	}
}

impl From<GatewayError> for ApiError {
	fn from(error: GatewayError) -> Self {
		ApiError::Gateway(error)
	}
}

#[cfg(test)]
mod tests {
	use actix_web::body::to_bytes;

	use super::*;
	use crate::domain::gateway::Operation;

	#[test]
	fn test_not_eligible_error() {
		let error = ApiError::from(GatewayError::NotEligible {
			country: "US".to_string(),
			method:  "esewa".to_string(),
		});
		assert_eq!(error.name(), "Forbidden");
		assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
		assert_eq!(error.kind(), "not_eligible");
	}

	#[test]
	fn test_not_configured_error() {
		let error = ApiError::from(GatewayError::NotConfigured {
			method: "khalti".to_string(),
		});
		assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);
		assert_eq!(error.name(), "Service Unavailable");
	}

	#[test]
	fn test_unsupported_and_deadline_errors() {
		let unsupported = ApiError::from(GatewayError::Unsupported {
			method:    "esewa".to_string(),
			operation: Operation::Refund,
		});
		assert_eq!(unsupported.status_code(), StatusCode::NOT_IMPLEMENTED);

		let deadline = ApiError::from(GatewayError::DeadlineExceeded {
			method:    "khalti".to_string(),
			operation: Operation::Verify,
		});
		assert_eq!(deadline.status_code(), StatusCode::GATEWAY_TIMEOUT);
	}

	#[actix_web::test]
	async fn test_error_body() {
		let error = ApiError::from(GatewayError::NoGatewayAvailable {
			country: "BR".to_string(),
		});

		let resp = error.error_response();
		assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

		let body = to_bytes(resp.into_body()).await.unwrap();
		let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
		assert_eq!(json["statusCode"], 503);
		assert_eq!(json["kind"], "no_gateway_available");
		assert_eq!(
			json["error"],
			"no payment gateway available for country BR"
		);
	}
}
