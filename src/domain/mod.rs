pub mod context;
pub mod errors;
pub mod gateway;
pub mod geography;
pub mod payment;
pub mod registry;
