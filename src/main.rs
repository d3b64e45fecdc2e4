use std::sync::Arc;

use payment_gateways::run;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
	let config = Arc::new(
		payment_gateways::config::Config::load()
			.expect("Failed to load configuration"),
	);
	run(config).await
}
