use std::sync::Arc;

use rerank_service::RerankService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<RerankService>,
}
impl AppState {
	pub fn new(config: rerank_config::Config) -> color_eyre::Result<Self> {
		let service = RerankService::new(config)?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: RerankService) -> Self {
		Self { service: Arc::new(service) }
	}
}
