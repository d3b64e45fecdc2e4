use std::collections::HashMap;
use std::time::Duration;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::gateway::GatewayConfig;

/// Optional settings file looked up in the working directory, any format
/// the `config` crate recognises (`payment-gateways.toml`, `.yaml`, ...).
pub const CONFIG_FILE: &str = "payment-gateways";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub server_host:                   String,
	pub server_port:                   u16,
	pub http_timeout_secs:             u64,
	pub regional_recommendation_limit: usize,
	/// Gateway settings keyed by method, e.g. `APP_GATEWAYS__ESEWA__SANDBOX`.
	#[serde(default)]
	pub gateways:                      HashMap<String, GatewayConfig>,
}

impl Config {
	pub fn load() -> Result<Self, ConfigError> {
		Self::from_builder(
			config::Config::builder()
				.add_source(File::with_name(CONFIG_FILE).required(false)),
		)
	}

	fn from_builder(
		builder: ConfigBuilder<DefaultState>,
	) -> Result<Self, ConfigError> {
		let config_builder = builder
			.set_default("server_host", "0.0.0.0")?
			.set_default("server_port", 9999_i64)?
			.set_default("http_timeout_secs", 30_i64)?
			.set_default("regional_recommendation_limit", 5_i64)?
			.add_source(
				Environment::with_prefix("APP")
					.prefix_separator("_")
					.separator("__"),
			)
			.build()?;

		config_builder.try_deserialize()
	}

	pub fn http_timeout(&self) -> Duration {
		Duration::from_secs(self.http_timeout_secs)
	}
}
