use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};
use rerank_domain::ScoredItem;

/// A validated rerank request. Documents are still raw; sanitizing happens in the service.
#[derive(Debug, Clone, PartialEq)]
pub struct RerankRequest {
	pub model: Option<String>,
	pub query: String,
	pub documents: Vec<String>,
	pub top_n: Option<usize>,
}
impl RerankRequest {
	pub fn from_slice(body: &[u8]) -> Result<Self> {
		let payload: Value = serde_json::from_slice(body)
			.map_err(|_| Error::InvalidRequest { message: "invalid JSON".to_string(), field: None })?;

		Self::from_value(&payload)
	}

	/// Accepts both the Cohere/Jina field names (`query`, `documents`) and the TEI ones
	/// (`input`, `texts`). Null or empty values fall through to the alternative name.
	pub fn from_value(payload: &Value) -> Result<Self> {
		let Some(object) = payload.as_object() else {
			return Err(Error::invalid("Request body must be a JSON object.", "$"));
		};
		let model = match object.get("model") {
			None | Some(Value::Null) => None,
			Some(Value::String(model)) if model.trim().is_empty() => None,
			Some(Value::String(model)) => Some(model.clone()),
			Some(_) => return Err(Error::invalid("model must be a string.", "$.model")),
		};
		let query = match first_present(payload, &["query", "input"]) {
			Some(Value::String(query)) if !query.trim().is_empty() => query.clone(),
			Some(Value::String(_)) | None =>
				return Err(Error::invalid("query/documents required", "$.query")),
			Some(_) => return Err(Error::invalid("query must be a string.", "$.query")),
		};
		let documents = match first_present(payload, &["documents", "texts"]) {
			Some(Value::Array(items)) => items.iter().map(document_text).collect::<Vec<_>>(),
			None => return Err(Error::invalid("query/documents required", "$.documents")),
			Some(_) => return Err(Error::invalid("documents must be an array.", "$.documents")),
		};
		let top_n = match object.get("top_n") {
			None | Some(Value::Null) => None,
			Some(value) => match top_n_value(value) {
				Some(0) => None,
				Some(top_n) => Some(top_n),
				None =>
					return Err(Error::invalid("top_n must be a positive integer.", "$.top_n")),
			},
		};

		Ok(Self { model, query, documents, top_n })
	}

	/// Number of results to return: the requested top-n capped at the document count.
	pub fn effective_top_n(&self) -> usize {
		self.top_n.unwrap_or(self.documents.len()).min(self.documents.len())
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResponse {
	pub object: String,
	pub model: String,
	pub data: Vec<ScoredItem>,
	/// Same entries as `data`, for clients that read the Cohere field name.
	pub results: Vec<ScoredItem>,
}
impl RerankResponse {
	pub fn new(model: String, data: Vec<ScoredItem>) -> Self {
		Self { object: "rerank".to_string(), model, results: data.clone(), data }
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelList {
	pub object: String,
	pub data: Vec<ModelCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCard {
	pub id: String,
	pub object: String,
}

fn first_present<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a Value> {
	keys.iter().filter_map(|key| payload.get(*key)).find(|value| match value {
		Value::Null => false,
		Value::String(text) => !text.trim().is_empty(),
		Value::Array(items) => !items.is_empty(),
		_ => true,
	})
}

/// Integral numbers only; `2.0` is accepted like `2`.
fn top_n_value(value: &Value) -> Option<usize> {
	if let Some(top_n) = value.as_u64() {
		return Some(usize::try_from(top_n).unwrap_or(usize::MAX));
	}

	let top_n = value.as_f64()?;

	(top_n.is_finite() && top_n >= 0.0 && top_n.fract() == 0.0).then(|| top_n as usize)
}

fn document_text(item: &Value) -> String {
	match item {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}
