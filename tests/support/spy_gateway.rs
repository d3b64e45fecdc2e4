use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use payment_gateways::domain::context::CallContext;
use payment_gateways::domain::errors::ProviderError;
use payment_gateways::domain::gateway::{Gateway, Operation};
use payment_gateways::domain::payment::{
	Money, PaymentRequest, PaymentResponse, PaymentStatus, RefundRequest,
	RefundResponse, StatusResponse, VerificationRequest, VerificationResponse,
};

/// Gateway that records every operation it receives and answers with
/// canned successes. Refunds are declined when `refunds` is false.
pub struct SpyGateway {
	method:  String,
	refunds: bool,
	calls:   Mutex<Vec<Operation>>,
}

impl SpyGateway {
	pub fn new(method: &str) -> Arc<Self> {
		Arc::new(Self {
			method:  method.to_string(),
			refunds: true,
			calls:   Mutex::new(Vec::new()),
		})
	}

	pub fn without_refunds(method: &str) -> Arc<Self> {
		Arc::new(Self {
			method:  method.to_string(),
			refunds: false,
			calls:   Mutex::new(Vec::new()),
		})
	}

	pub fn calls(&self) -> Vec<Operation> {
		self.calls.lock().unwrap().clone()
	}

	pub fn was_invoked(&self) -> bool {
		!self.calls.lock().unwrap().is_empty()
	}

	fn record(&self, operation: Operation) {
		self.calls.lock().unwrap().push(operation);
	}
}

#[async_trait]
impl Gateway for SpyGateway {
	fn name(&self) -> &str {
		"Spy"
	}

	fn method(&self) -> &str {
		&self.method
	}

	async fn initiate_payment(
		&self,
		_ctx: &CallContext,
		request: &PaymentRequest,
	) -> Result<PaymentResponse, ProviderError> {
		self.record(Operation::Initiate);
		Ok(PaymentResponse {
			success: true,
			payment_url: Some(format!("https://{}.test/pay", self.method)),
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
		self.record(Operation::Verify);
		Ok(VerificationResponse {
			success:        true,
			status:         PaymentStatus::Completed,
			transaction_id: request.transaction_id.clone(),
			order_id:       request.order_id.clone(),
			amount:         request.amount.clone(),
			paid_amount:    Some(request.amount.clone()),
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
		self.record(Operation::Refund);
		if !self.refunds {
			return Err(ProviderError::Unsupported {
				operation: Operation::Refund,
			});
		}
		Ok(RefundResponse {
			success:   true,
			refund_id: Some(format!("{}-refund", self.method)),
			message:   None,
		})
	}

	async fn get_status(
		&self,
		_ctx: &CallContext,
		transaction_id: &str,
	) -> Result<StatusResponse, ProviderError> {
		self.record(Operation::Status);
		Ok(StatusResponse {
			status:         PaymentStatus::Pending,
			transaction_id: transaction_id.to_string(),
			order_id:       String::new(),
			amount:         Money::zero("NPR"),
		})
	}
}
