use crate::domain::gateway::Operation;
use crate::domain::payment::{
	PaymentRequest, PaymentResponse, RefundRequest, RefundResponse,
	StatusResponse, VerificationRequest, VerificationResponse,
};

/// One of the four gateway operations together with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCommand {
	Initiate(PaymentRequest),
	Verify(VerificationRequest),
	Refund(RefundRequest),
	Status(String),
}

impl GatewayCommand {
	pub fn operation(&self) -> Operation {
		match self {
			GatewayCommand::Initiate(_) => Operation::Initiate,
			GatewayCommand::Verify(_) => Operation::Verify,
			GatewayCommand::Refund(_) => Operation::Refund,
			GatewayCommand::Status(_) => Operation::Status,
		}
	}
}

/// The gateway's answer to a [`GatewayCommand`], same variant.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayOutcome {
	Initiate(PaymentResponse),
	Verify(VerificationResponse),
	Refund(RefundResponse),
	Status(StatusResponse),
}
