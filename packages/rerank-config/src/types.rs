use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub upstream: Upstream,
	pub rerank: Rerank,
}
impl Config {
	/// Largest slice width the planner may propose.
	///
	/// Both the relay's own per-call limit and the upstream client's batch limit apply, so the
	/// smaller one wins.
	pub fn max_docs_per_slice(&self) -> usize {
		self.upstream.client_batch_max.min(self.rerank.max_docs_per_call)
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Largest inbound request body accepted by the HTTP server.
	pub max_body_bytes: usize,
}
impl Default for Service {
	fn default() -> Self {
		Self {
			http_bind: "0.0.0.0:8080".to_string(),
			log_level: "info".to_string(),
			max_body_bytes: 64 * 1024 * 1024,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Upstream {
	pub api_base: String,
	pub path: String,
	pub timeout_ms: u64,
	pub connect_timeout_ms: u64,
	/// Maximum number of texts the upstream accepts in one call.
	pub client_batch_max: usize,
	/// Slice calls allowed in flight for a single request. `1` keeps dispatch sequential.
	pub max_concurrency: usize,
}
impl Default for Upstream {
	fn default() -> Self {
		Self {
			api_base: "http://tei:80".to_string(),
			path: "/rerank".to_string(),
			timeout_ms: 60_000,
			connect_timeout_ms: 10_000,
			client_batch_max: 64,
			max_concurrency: 1,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Rerank {
	pub model: String,
	pub max_docs_per_call: usize,
	/// Byte ceiling for one serialized upstream request. `0` disables the check.
	pub payload_soft_limit: usize,
	/// Per-document character clip applied after sanitizing. `0` disables clipping.
	pub doc_clip_chars: usize,
}
impl Default for Rerank {
	fn default() -> Self {
		Self {
			model: "onnx-community/bge-reranker-v2-m3-ONNX".to_string(),
			max_docs_per_call: 256,
			payload_soft_limit: 10_000_000,
			doc_clip_chars: 50_000,
		}
	}
}
