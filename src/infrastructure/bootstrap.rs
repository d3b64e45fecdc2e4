use std::collections::HashMap;
use std::sync::Arc;

use log::{error, info};
use reqwest::Client;

use crate::domain::gateway::GatewayConfig;
use crate::domain::geography::{Country, Region};
use crate::domain::registry::GatewayRegistry;
use crate::infrastructure::gateways::{esewa, khalti, paypal, razorpay, stripe};
use crate::use_cases::payment_manager::PaymentManager;

/// Makes every built-in provider constructible by method name.
pub fn register_builtin_factories(manager: &PaymentManager) {
	manager.register_factory(esewa::METHOD, esewa::new);
	manager.register_factory(khalti::METHOD, khalti::new);
	manager.register_factory(stripe::METHOD, stripe::new);
	manager.register_factory(paypal::METHOD, paypal::new);
	manager.register_factory(razorpay::METHOD, razorpay::new);
}

/// Eligibility policy shipped with the service: local wallets where they
/// operate, card and PayPal checkout across North America, Europe and
/// Oceania.
pub fn default_registry() -> GatewayRegistry {
	let registry = GatewayRegistry::new();

	registry.register_for_country(Country::NEPAL, esewa::METHOD, 1);
	registry.register_for_country(Country::NEPAL, khalti::METHOD, 2);
	registry.register_for_country(Country::NEPAL, "imepay", 3);
	registry.register_for_country(Country::NEPAL, "connectips", 4);

	registry.register_for_country(Country::INDIA, razorpay::METHOD, 1);
	registry.register_for_country(Country::INDIA, "paytm", 2);

	for country in [Country::USA, Country::CANADA, Country::UK] {
		registry.register_for_country(country.clone(), stripe::METHOD, 1);
		registry.register_for_country(country, paypal::METHOD, 2);
	}

	for region in [Region::NorthAmerica, Region::Europe, Region::Oceania] {
		registry.register_for_region(region, stripe::METHOD, 1);
		registry.register_for_region(region, paypal::METHOD, 2);
	}

	registry
}

/// Builds a manager with the built-in factories and one gateway per entry
/// in `configs`. A method that cannot be built is logged and skipped.
pub fn build_payment_manager(
	configs: &HashMap<String, GatewayConfig>,
	registry: Arc<GatewayRegistry>,
	http_client: Client,
) -> PaymentManager {
	let manager = PaymentManager::new(registry, http_client);
	register_builtin_factories(&manager);

	for (method, config) in configs {
		let registered =
			manager.register_gateway_with_config(method, config.clone());
		if let Err(e) = registered {
			error!("Failed to register gateway {method}: {e}");
		}
	}

	info!("Payment gateways ready: {:?}", manager.list_gateways());
	manager
}
