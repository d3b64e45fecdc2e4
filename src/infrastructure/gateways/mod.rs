//! Built-in provider integrations.
//!
//! Each submodule exposes a `new` factory with the [`GatewayFactory`]
//! signature so it can be registered with the payment manager.
//!
//! [`GatewayFactory`]: crate::domain::gateway::GatewayFactory

pub mod esewa;
pub mod khalti;
pub mod paypal;
pub mod razorpay;
pub mod stripe;

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::domain::context::CallContext;
use crate::domain::errors::ProviderError;
use crate::domain::gateway::GatewayConfig;

/// Tightest of the caller's remaining time and the gateway's own timeout.
fn effective_timeout(
	ctx: &CallContext,
	config: &GatewayConfig,
) -> Option<Duration> {
	match (ctx.remaining(), config.timeout()) {
		(Some(remaining), Some(timeout)) => Some(remaining.min(timeout)),
		(remaining, timeout) => remaining.or(timeout),
	}
}

pub(crate) fn bounded(
	builder: RequestBuilder,
	ctx: &CallContext,
	config: &GatewayConfig,
) -> RequestBuilder {
	match effective_timeout(ctx, config) {
		Some(timeout) => builder.timeout(timeout),
		None => builder,
	}
}

/// Decodes a JSON body, turning non-2xx answers into
/// [`ProviderError::Rejected`].
pub(crate) async fn read_json<T: DeserializeOwned>(
	response: Response,
) -> Result<T, ProviderError> {
	let status = response.status();
	let body = response.text().await?;

	if !status.is_success() {
		return Err(ProviderError::Rejected {
			status: status.as_u16(),
			body,
		});
	}

	Ok(serde_json::from_str(&body)?)
}
