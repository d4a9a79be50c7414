// std
use std::{io, time::Duration as StdDuration};

// crates.io
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};
use rerank_domain::LocalScore;

const MAX_ERROR_BODY_CHARS: usize = 512;

/// Body of one `/rerank` call against a Text Embeddings Inference server.
#[derive(Debug, Serialize)]
pub struct TeiRerankRequest<'a> {
	pub query: &'a str,
	pub texts: &'a [String],
	pub top_n: usize,
	pub raw_scores: bool,
}
impl<'a> TeiRerankRequest<'a> {
	/// Every text of the slice is scored; the caller applies the overall top-n after merging.
	pub fn new(query: &'a str, texts: &'a [String]) -> Self {
		Self { query, texts, top_n: texts.len(), raw_scores: false }
	}
}

#[derive(Debug, Clone)]
pub struct TeiClient {
	http: Client,
	url: String,
}
impl TeiClient {
	pub fn new(cfg: &rerank_config::Upstream) -> Result<Self> {
		let http = Client::builder()
			.connect_timeout(StdDuration::from_millis(cfg.connect_timeout_ms))
			.timeout(StdDuration::from_millis(cfg.timeout_ms))
			.build()?;
		let url = format!("{}{}", cfg.api_base, cfg.path);

		Ok(Self { http, url })
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	/// Scores one slice. Returned indices are local to `texts`.
	pub async fn score(&self, query: &str, texts: &[String]) -> Result<Vec<LocalScore>> {
		let body = TeiRerankRequest::new(query, texts);

		tracing::debug!(url = %self.url, texts = texts.len(), "Sending rerank slice upstream.");

		let res = self.http.post(&self.url).json(&body).send().await.map_err(classify)?;
		let status = res.status();

		if !status.is_success() {
			let text = res.text().await.unwrap_or_default();

			return Err(Error::Status {
				status: status.as_u16(),
				body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
			});
		}

		let json: Value = res.json().await.map_err(classify)?;

		parse_rerank_response(json, texts.len())
	}
}

/// Exact byte length of the JSON body [`TeiClient::score`] sends for `texts`.
pub fn payload_len(query: &str, texts: &[String]) -> usize {
	let mut counter = ByteCounter(0);

	match serde_json::to_writer(&mut counter, &TeiRerankRequest::new(query, texts)) {
		Ok(()) => counter.0,
		Err(_) => usize::MAX,
	}
}

fn classify(err: reqwest::Error) -> Error {
	if err.is_timeout() { Error::Timeout { message: err.to_string() } } else { Error::Reqwest(err) }
}

fn parse_rerank_response(json: Value, doc_count: usize) -> Result<Vec<LocalScore>> {
	let results = json
		.as_array()
		.or_else(|| json.get("results").and_then(|v| v.as_array()))
		.or_else(|| json.get("data").and_then(|v| v.as_array()))
		.ok_or_else(|| Error::InvalidResponse {
			message: "Rerank response is not an array of scores.".to_string(),
		})?;
	let mut scores = Vec::with_capacity(results.len());

	for item in results {
		let index = item.get("index").and_then(|v| v.as_u64()).ok_or_else(|| {
			Error::InvalidResponse { message: "Rerank result missing index.".to_string() }
		})? as usize;
		let score = item
			.get("score")
			.or_else(|| item.get("relevance_score"))
			.and_then(|v| v.as_f64())
			.ok_or_else(|| Error::InvalidResponse {
				message: "Rerank result missing score.".to_string(),
			})?;

		if index >= doc_count {
			return Err(Error::InvalidResponse {
				message: format!(
					"Rerank result index {index} is out of range for {doc_count} documents."
				),
			});
		}

		scores.push(LocalScore { index, score });
	}

	Ok(scores)
}

struct ByteCounter(usize);
impl io::Write for ByteCounter {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0 += buf.len();

		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}
