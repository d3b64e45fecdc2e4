pub mod dto;
pub mod payment_manager;
