pub mod adapters;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod use_cases;

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use log::info;
use reqwest::Client;

use crate::adapters::web::handlers::RequestTimeout;
use crate::adapters::web::routes;
use crate::config::Config;
use crate::infrastructure::bootstrap::{build_payment_manager, default_registry};

pub async fn run(config: Arc<Config>) -> std::io::Result<()> {
	env_logger::init();

	let http_client = Client::builder()
		.timeout(config.http_timeout())
		.build()
		.map_err(std::io::Error::other)?;

	let limit = config.regional_recommendation_limit;
	let registry =
		Arc::new(default_registry().with_regional_recommendation_limit(limit));
	let payment_manager = web::Data::new(build_payment_manager(
		&config.gateways,
		registry,
		http_client,
	));
	let request_timeout = web::Data::new(RequestTimeout(config.http_timeout()));

	info!(
		"Starting Actix-Web server on {}:{}...",
		config.server_host, config.server_port
	);

	HttpServer::new(move || {
		App::new()
			.app_data(payment_manager.clone())
			.app_data(request_timeout.clone())
			.configure(routes)
	})
	.bind((config.server_host.as_str(), config.server_port))?
	.run()
	.await
}
