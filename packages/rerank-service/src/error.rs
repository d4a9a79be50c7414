use rerank_domain::{OversizedDocument, Slice};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String, field: Option<String> },
	#[error(
		"Single document exceeds payload limit: document {index} needs {size} bytes, limit is {limit} bytes."
	)]
	PayloadTooLarge { index: usize, size: usize, limit: usize },
	#[error("Upstream error: {message}")]
	Upstream { message: String },
	#[error("Upstream timeout: {message}")]
	UpstreamTimeout { message: String },
}
impl Error {
	pub(crate) fn invalid(message: impl Into<String>, field: &str) -> Self {
		Self::InvalidRequest { message: message.into(), field: Some(field.to_string()) }
	}

	pub(crate) fn from_slice_call(slice: Slice, err: rerank_providers::Error) -> Self {
		let message = format!("Slice {}..{} failed: {err}", slice.start, slice.end);

		if err.is_timeout() { Self::UpstreamTimeout { message } } else { Self::Upstream { message } }
	}
}

impl From<OversizedDocument> for Error {
	fn from(err: OversizedDocument) -> Self {
		Self::PayloadTooLarge { index: err.index, size: err.size, limit: err.limit }
	}
}

impl From<rerank_domain::AggregateError> for Error {
	fn from(err: rerank_domain::AggregateError) -> Self {
		Self::Upstream { message: err.to_string() }
	}
}
