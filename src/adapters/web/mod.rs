pub mod errors;
pub mod handlers;
pub mod schema;

use actix_web::web;

pub fn routes(cfg: &mut web::ServiceConfig) {
	cfg.service(handlers::gateways)
		.service(handlers::country_gateways)
		.service(handlers::country_recommendations)
		.service(handlers::initiate_payment)
		.service(handlers::verify_payment)
		.service(handlers::refund_payment)
		.service(handlers::payment_status);
}
