mod error;

pub mod request;
pub mod rerank;

pub use error::{Error, Result};
pub use request::{ModelCard, ModelList, RerankRequest, RerankResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use rerank_config::Config;
use rerank_domain::LocalScore;
use rerank_providers::TeiClient;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Scores one slice of sanitized documents. Indices in the result are local to `texts`.
pub trait UpstreamScorer
where
	Self: Send + Sync,
{
	fn score<'a>(
		&'a self,
		query: &'a str,
		texts: &'a [String],
	) -> BoxFuture<'a, rerank_providers::Result<Vec<LocalScore>>>;
}

impl UpstreamScorer for TeiClient {
	fn score<'a>(
		&'a self,
		query: &'a str,
		texts: &'a [String],
	) -> BoxFuture<'a, rerank_providers::Result<Vec<LocalScore>>> {
		Box::pin(TeiClient::score(self, query, texts))
	}
}

pub struct RerankService {
	pub cfg: Config,
	pub scorer: Arc<dyn UpstreamScorer>,
}
impl RerankService {
	pub fn new(cfg: Config) -> Result<Self> {
		let client = TeiClient::new(&cfg.upstream)
			.map_err(|err| Error::Upstream { message: err.to_string() })?;

		Ok(Self::with_scorer(cfg, Arc::new(client)))
	}

	pub fn with_scorer(cfg: Config, scorer: Arc<dyn UpstreamScorer>) -> Self {
		Self { cfg, scorer }
	}

	pub fn models(&self) -> ModelList {
		ModelList {
			object: "list".to_string(),
			data: vec![ModelCard { id: self.cfg.rerank.model.clone(), object: "model".to_string() }],
		}
	}
}
