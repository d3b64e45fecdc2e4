pub mod bootstrap;
pub mod gateways;
