use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info, warn};
use reqwest::Client;

use crate::domain::context::CallContext;
use crate::domain::errors::{GatewayError, ProviderError};
use crate::domain::gateway::{Gateway, GatewayConfig, GatewayFactory, Operation};
use crate::domain::geography::Country;
use crate::domain::payment::{
	PaymentRequest, PaymentResponse, RefundRequest, RefundResponse,
	StatusResponse, VerificationRequest, VerificationResponse,
};
use crate::domain::registry::{GatewayRegistry, Recommendation};
use crate::use_cases::dto::{GatewayCommand, GatewayOutcome};

/// Routes payment operations to live gateways, constrained by a
/// [`GatewayRegistry`].
///
/// Registry eligibility says where a method may be used; the gateway map
/// says what this deployment can actually call. Country-aware operations
/// require both. Locks guard map access only and are released before any
/// gateway call is awaited.
pub struct PaymentManager {
	gateways:    RwLock<HashMap<String, Arc<dyn Gateway>>>,
	factories:   RwLock<HashMap<String, GatewayFactory>>,
	registry:    RwLock<Arc<GatewayRegistry>>,
	http_client: Client,
}

impl PaymentManager {
	pub fn new(registry: Arc<GatewayRegistry>, http_client: Client) -> Self {
		Self {
			gateways: RwLock::new(HashMap::new()),
			factories: RwLock::new(HashMap::new()),
			registry: RwLock::new(registry),
			http_client,
		}
	}

	pub fn register_factory<F>(&self, method: impl Into<String>, factory: F)
	where
		F: Fn(GatewayConfig, Client) -> Arc<dyn Gateway>
			+ Send
			+ Sync
			+ 'static,
	{
		self.factories
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(method.into(), Arc::new(factory));
	}

	/// Installs a ready-made gateway, replacing any previous one.
	pub fn register_gateway(
		&self,
		method: impl Into<String>,
		gateway: Arc<dyn Gateway>,
	) {
		let method = method.into();
		info!("Registered gateway {} for method {method}", gateway.name());
		self.gateways
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(method, gateway);
	}

	/// Builds a gateway through the method's factory and installs it.
	pub fn register_gateway_with_config(
		&self,
		method: &str,
		config: GatewayConfig,
	) -> Result<(), GatewayError> {
		let factory = self
			.factories
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(method)
			.cloned()
			.ok_or_else(|| GatewayError::NoFactory {
				method: method.to_string(),
			})?;

		let gateway = factory(config, self.http_client.clone());
		self.register_gateway(method, gateway);
		Ok(())
	}

	pub fn set_registry(&self, registry: Arc<GatewayRegistry>) {
		*self.registry.write().unwrap_or_else(PoisonError::into_inner) =
			registry;
	}

	pub fn registry(&self) -> Arc<GatewayRegistry> {
		self.registry
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	pub fn gateway(
		&self,
		method: &str,
	) -> Result<Arc<dyn Gateway>, GatewayError> {
		self.gateways
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.get(method)
			.cloned()
			.ok_or_else(|| GatewayError::NotConfigured {
				method: method.to_string(),
			})
	}

	pub fn has_gateway(&self, method: &str) -> bool {
		self.gateways
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.contains_key(method)
	}

	pub fn list_gateways(&self) -> Vec<String> {
		let mut methods: Vec<String> = self
			.gateways
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.keys()
			.cloned()
			.collect();
		methods.sort();
		methods
	}

	pub async fn dispatch(
		&self,
		ctx: &CallContext,
		method: &str,
		command: GatewayCommand,
	) -> Result<GatewayOutcome, GatewayError> {
		debug!("Dispatching {} to {method}", command.operation());

		match command {
			GatewayCommand::Initiate(request) => self
				.initiate_payment(ctx, method, &request)
				.await
				.map(GatewayOutcome::Initiate),
			GatewayCommand::Verify(request) => self
				.verify_payment(ctx, method, &request)
				.await
				.map(GatewayOutcome::Verify),
			GatewayCommand::Refund(request) => self
				.refund_payment(ctx, method, &request)
				.await
				.map(GatewayOutcome::Refund),
			GatewayCommand::Status(transaction_id) => self
				.get_status(ctx, method, &transaction_id)
				.await
				.map(GatewayOutcome::Status),
		}
	}

	pub async fn initiate_payment(
		&self,
		ctx: &CallContext,
		method: &str,
		request: &PaymentRequest,
	) -> Result<PaymentResponse, GatewayError> {
		let gateway = self.gateway(method)?;
		guarded(
			ctx,
			method,
			Operation::Initiate,
			gateway.initiate_payment(ctx, request),
		)
		.await
	}

	pub async fn verify_payment(
		&self,
		ctx: &CallContext,
		method: &str,
		request: &VerificationRequest,
	) -> Result<VerificationResponse, GatewayError> {
		let gateway = self.gateway(method)?;
		guarded(
			ctx,
			method,
			Operation::Verify,
			gateway.verify_payment(ctx, request),
		)
		.await
	}

	pub async fn refund_payment(
		&self,
		ctx: &CallContext,
		method: &str,
		request: &RefundRequest,
	) -> Result<RefundResponse, GatewayError> {
		let gateway = self.gateway(method)?;
		guarded(
			ctx,
			method,
			Operation::Refund,
			gateway.refund_payment(ctx, request),
		)
		.await
	}

	pub async fn get_status(
		&self,
		ctx: &CallContext,
		method: &str,
		transaction_id: &str,
	) -> Result<StatusResponse, GatewayError> {
		let gateway = self.gateway(method)?;
		guarded(
			ctx,
			method,
			Operation::Status,
			gateway.get_status(ctx, transaction_id),
		)
		.await
	}

	/// Registry eligibility only; says nothing about deployment.
	pub fn is_gateway_available(
		&self,
		country: &Country,
		method: &str,
	) -> bool {
		self.registry().is_eligible(country, method)
	}

	/// Eligible methods that also have a live gateway, in registry order.
	pub fn available_methods_for(&self, country: &Country) -> Vec<String> {
		let eligible = self.registry().eligible_methods(country);
		let gateways =
			self.gateways.read().unwrap_or_else(PoisonError::into_inner);

		eligible
			.into_iter()
			.filter(|method| gateways.contains_key(method))
			.collect()
	}

	pub fn recommended_method_for(
		&self,
		country: &Country,
	) -> Result<String, GatewayError> {
		self.available_methods_for(country)
			.into_iter()
			.next()
			.ok_or_else(|| GatewayError::NoGatewayAvailable {
				country: country.to_string(),
			})
	}

	/// Initiates with the highest ranked method usable in `country`.
	pub async fn initiate_for_country(
		&self,
		ctx: &CallContext,
		country: &Country,
		request: &PaymentRequest,
	) -> Result<PaymentResponse, GatewayError> {
		let method = self.recommended_method_for(country)?;
		debug!("Recommended {method} for country {country}");
		self.initiate_payment(ctx, &method, request).await
	}

	/// Initiates with a caller-chosen method after checking, in order, that
	/// the registry allows it in `country` and that a gateway is installed.
	pub async fn initiate_with_method_for_country(
		&self,
		ctx: &CallContext,
		country: &Country,
		method: &str,
		request: &PaymentRequest,
	) -> Result<PaymentResponse, GatewayError> {
		let eligibility = self.registry().validate_eligibility(country, method);
		if let Err(error) = eligibility {
			warn!("Rejected {method} for country {country}: not eligible");
			return Err(error);
		}

		let gateway = self.gateway(method)?;
		guarded(
			ctx,
			method,
			Operation::Initiate,
			gateway.initiate_payment(ctx, request),
		)
		.await
	}

	/// Registry recommendations with `available` reflecting live gateways.
	pub fn recommendations_for(
		&self,
		country: &Country,
	) -> Vec<Recommendation> {
		let mut recommendations = self.registry().recommendations(country);
		let gateways =
			self.gateways.read().unwrap_or_else(PoisonError::into_inner);

		for recommendation in &mut recommendations {
			recommendation.available =
				gateways.contains_key(&recommendation.method);
		}
		recommendations
	}
}

/// Runs a gateway call unless the context is cancelled or expires first.
/// Losing the race drops the call, aborting any request in flight.
async fn guarded<T>(
	ctx: &CallContext,
	method: &str,
	operation: Operation,
	call: impl Future<Output = Result<T, ProviderError>>,
) -> Result<T, GatewayError> {
	if ctx.is_cancelled() {
		return Err(GatewayError::Cancelled {
			method: method.to_string(),
			operation,
		});
	}

	tokio::select! {
		biased;
		_ = ctx.cancelled() => Err(GatewayError::Cancelled {
			method: method.to_string(),
			operation,
		}),
		_ = ctx.expired() => Err(GatewayError::DeadlineExceeded {
			method: method.to_string(),
			operation,
		}),
		result = call => result.map_err(|error| {
			warn!("{method} {operation} failed: {error}");
			GatewayError::from_provider(method, operation, error)
		}),
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::time::Duration;

	use async_trait::async_trait;

	use super::*;
	use crate::domain::payment::{Money, PaymentStatus};

	struct FakeGateway {
		method: String,
		calls:  AtomicUsize,
		delay:  Option<Duration>,
	}

	impl FakeGateway {
		fn new(method: &str) -> Arc<Self> {
			Arc::new(Self {
				method: method.to_string(),
				calls:  AtomicUsize::new(0),
				delay:  None,
			})
		}

		fn slow(method: &str, delay: Duration) -> Arc<Self> {
			Arc::new(Self {
				method: method.to_string(),
				calls:  AtomicUsize::new(0),
				delay:  Some(delay),
			})
		}
	}

	#[async_trait]
	impl Gateway for FakeGateway {
		fn name(&self) -> &str {
			"Fake"
		}

		fn method(&self) -> &str {
			&self.method
		}

		async fn initiate_payment(
			&self,
			_ctx: &CallContext,
			request: &PaymentRequest,
		) -> Result<PaymentResponse, ProviderError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			if let Some(delay) = self.delay {
				tokio::time::sleep(delay).await;
			}
			Ok(PaymentResponse {
				success: true,
				transaction_id: Some(format!("{}-txn", self.method)),
				order_id: request.order_id.clone(),
				..Default::default()
			})
		}

		async fn verify_payment(
			&self,
			_ctx: &CallContext,
			request: &VerificationRequest,
		) -> Result<VerificationResponse, ProviderError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(VerificationResponse {
				success:        true,
				status:         PaymentStatus::Completed,
				transaction_id: request.transaction_id.clone(),
				order_id:       request.order_id.clone(),
				amount:         request.amount.clone(),
				paid_amount:    None,
				fee:            None,
				message:        None,
				metadata:       Default::default(),
			})
		}

		async fn refund_payment(
			&self,
			_ctx: &CallContext,
			_request: &RefundRequest,
		) -> Result<RefundResponse, ProviderError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Err(ProviderError::Unsupported {
				operation: Operation::Refund,
			})
		}

		async fn get_status(
			&self,
			_ctx: &CallContext,
			transaction_id: &str,
		) -> Result<StatusResponse, ProviderError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(StatusResponse {
				status:         PaymentStatus::Pending,
				transaction_id: transaction_id.to_string(),
				order_id:       String::new(),
				amount:         Money::zero("NPR"),
			})
		}
	}

	fn manager_with(registry: GatewayRegistry) -> PaymentManager {
		PaymentManager::new(Arc::new(registry), Client::new())
	}

	fn request() -> PaymentRequest {
		PaymentRequest {
			amount: Money::new(10_000, "NPR"),
			order_id: "order-1".to_string(),
			success_url: "https://shop.test/ok".to_string(),
			..Default::default()
		}
	}

	#[tokio::test]
	async fn test_dispatch_to_unregistered_method() {
		let manager = manager_with(GatewayRegistry::new());

		let result = manager
			.dispatch(
				&CallContext::new(),
				"esewa",
				GatewayCommand::Status("txn".to_string()),
			)
			.await;

		assert!(matches!(
			result,
			Err(GatewayError::NotConfigured { ref method }) if method == "esewa"
		));
	}

	#[tokio::test]
	async fn test_dispatch_forwards_to_gateway() {
		let manager = manager_with(GatewayRegistry::new());
		let gateway = FakeGateway::new("esewa");
		manager.register_gateway("esewa", gateway.clone());

		let outcome = manager
			.dispatch(
				&CallContext::new(),
				"esewa",
				GatewayCommand::Initiate(request()),
			)
			.await
			.unwrap();

		let GatewayOutcome::Initiate(response) = outcome else {
			panic!("expected an initiate outcome");
		};
		assert_eq!(response.transaction_id.as_deref(), Some("esewa-txn"));
		assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_unsupported_refund_passes_through() {
		let manager = manager_with(GatewayRegistry::new());
		manager.register_gateway("esewa", FakeGateway::new("esewa"));

		let refund = RefundRequest {
			transaction_id: "txn".to_string(),
			amount:         Money::new(100, "NPR"),
			reason:         None,
		};
		let result = manager
			.refund_payment(&CallContext::new(), "esewa", &refund)
			.await;

		assert!(matches!(
			result,
			Err(GatewayError::Unsupported { operation: Operation::Refund, .. })
		));
	}

	#[tokio::test]
	async fn test_register_gateway_with_config_requires_factory() {
		let manager = manager_with(GatewayRegistry::new());

		let result = manager
			.register_gateway_with_config("esewa", GatewayConfig::default());

		assert!(matches!(result, Err(GatewayError::NoFactory { .. })));
		assert!(manager.list_gateways().is_empty());
	}

	#[tokio::test]
	async fn test_factory_receives_config_and_replaces_instance() {
		let manager = manager_with(GatewayRegistry::new());
		let built = Arc::new(AtomicUsize::new(0));
		let counter = built.clone();
		manager.register_factory(
			"esewa",
			move |config: GatewayConfig, _client| {
				assert_eq!(config.merchant_id, "EPAYTEST");
				counter.fetch_add(1, Ordering::SeqCst);
				FakeGateway::new("esewa") as Arc<dyn Gateway>
			},
		);

		let config = GatewayConfig {
			merchant_id: "EPAYTEST".to_string(),
			..Default::default()
		};
		manager
			.register_gateway_with_config("esewa", config.clone())
			.unwrap();
		manager.register_gateway_with_config("esewa", config).unwrap();

		assert_eq!(built.load(Ordering::SeqCst), 2);
		assert_eq!(manager.list_gateways(), vec!["esewa"]);
	}

	#[tokio::test]
	async fn test_available_methods_require_live_gateway() {
		let registry = GatewayRegistry::new();
		registry.register_for_country(Country::NEPAL, "esewa", 1);
		registry.register_for_country(Country::NEPAL, "khalti", 2);
		let manager = manager_with(registry);
		manager.register_gateway("khalti", FakeGateway::new("khalti"));
		manager.register_gateway("stripe", FakeGateway::new("stripe"));

		assert_eq!(manager.available_methods_for(&Country::NEPAL), vec![
			"khalti"
		]);
		assert_eq!(
			manager.recommended_method_for(&Country::NEPAL).unwrap(),
			"khalti"
		);
	}

	#[tokio::test]
	async fn test_set_registry_swaps_policy() {
		let manager = manager_with(GatewayRegistry::new());
		manager.register_gateway("stripe", FakeGateway::new("stripe"));
		assert!(manager.recommended_method_for(&Country::USA).is_err());

		let registry = GatewayRegistry::new();
		registry.register_global("stripe", 10);
		manager.set_registry(Arc::new(registry));

		assert_eq!(
			manager.recommended_method_for(&Country::USA).unwrap(),
			"stripe"
		);
		assert!(manager.is_gateway_available(&Country::USA, "stripe"));
	}

	#[tokio::test]
	async fn test_cancelled_context_never_reaches_gateway() {
		let manager = manager_with(GatewayRegistry::new());
		let gateway = FakeGateway::new("esewa");
		manager.register_gateway("esewa", gateway.clone());

		let (ctx, handle) = CallContext::cancellable();
		handle.cancel();

		let result = manager.initiate_payment(&ctx, "esewa", &request()).await;

		assert!(matches!(result, Err(GatewayError::Cancelled { .. })));
		assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn test_cancel_aborts_in_flight_call() {
		let manager = Arc::new(manager_with(GatewayRegistry::new()));
		manager.register_gateway(
			"esewa",
			FakeGateway::slow("esewa", Duration::from_secs(60)),
		);

		let (ctx, handle) = CallContext::cancellable();
		let call = {
			let manager = manager.clone();
			tokio::spawn(async move {
				manager.initiate_payment(&ctx, "esewa", &request()).await
			})
		};
		tokio::time::sleep(Duration::from_secs(1)).await;
		handle.cancel();

		let result = call.await.unwrap();
		assert!(matches!(result, Err(GatewayError::Cancelled { .. })));
	}

	#[tokio::test(start_paused = true)]
	async fn test_deadline_aborts_slow_gateway() {
		let manager = manager_with(GatewayRegistry::new());
		manager.register_gateway(
			"esewa",
			FakeGateway::slow("esewa", Duration::from_secs(60)),
		);

		let ctx = CallContext::new().with_timeout(Duration::from_secs(5));
		let result = manager.initiate_payment(&ctx, "esewa", &request()).await;

		assert!(matches!(
			result,
			Err(GatewayError::DeadlineExceeded {
				operation: Operation::Initiate,
				..
			})
		));
	}
}
