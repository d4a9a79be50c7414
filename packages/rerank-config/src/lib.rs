mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Rerank, Service, Upstream};

use std::{env, fs, path::Path, str::FromStr};

/// Loads the relay configuration.
///
/// The optional TOML file provides the base values, the process environment overrides them,
/// and the merged result is normalized and validated before it is returned.
pub fn load(path: Option<&Path>) -> Result<Config> {
	let mut cfg = match path {
		Some(path) => {
			let raw = fs::read_to_string(path)
				.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

			toml::from_str(&raw)
				.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?
		},
		None => Config::default(),
	};

	apply_env_overrides(&mut cfg, |key| env::var(key).ok())?;
	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

/// Applies the environment variables understood by the relay on top of `cfg`.
///
/// `lookup` resolves a variable name to its value, which keeps the process environment out of
/// tests.
pub fn apply_env_overrides<F>(cfg: &mut Config, lookup: F) -> Result<()>
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(value) = lookup("TEI_BASE_URL") {
		cfg.upstream.api_base = value;
	}
	if let Some(value) = lookup("MODEL_NAME") {
		cfg.rerank.model = value;
	}
	if let Some(value) = lookup("RERANK_HTTP_BIND") {
		cfg.service.http_bind = value;
	}
	if let Some(value) = lookup("RERANK_LOG_LEVEL") {
		cfg.service.log_level = value;
	}

	let batch_max = lookup("TEI_CLIENT_BATCH_MAX")
		.map(|value| ("TEI_CLIENT_BATCH_MAX", value))
		.or_else(|| lookup("MAX_CLIENT_BATCH_SIZE").map(|value| ("MAX_CLIENT_BATCH_SIZE", value)));

	if let Some((key, value)) = batch_max {
		cfg.upstream.client_batch_max = parse_env(key, &value)?;
	}
	if let Some(value) = lookup("RERANK_MAX_DOCS_PER_CALL") {
		cfg.rerank.max_docs_per_call = parse_env("RERANK_MAX_DOCS_PER_CALL", &value)?;
	}
	if let Some(value) = lookup("TEI_PAYLOAD_SOFT_LIMIT") {
		cfg.rerank.payload_soft_limit = parse_env("TEI_PAYLOAD_SOFT_LIMIT", &value)?;
	}
	if let Some(value) = lookup("DOC_CLIP_CHARS") {
		cfg.rerank.doc_clip_chars = parse_env("DOC_CLIP_CHARS", &value)?;
	}

	Ok(())
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.max_body_bytes == 0 {
		return Err(Error::Validation {
			message: "service.max_body_bytes must be greater than zero.".to_string(),
		});
	}

	let api_base = cfg.upstream.api_base.as_str();

	if api_base.is_empty() {
		return Err(Error::Validation {
			message: "upstream.api_base must be non-empty.".to_string(),
		});
	}
	if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
		return Err(Error::Validation {
			message: "upstream.api_base must start with http:// or https://.".to_string(),
		});
	}
	if !cfg.upstream.path.starts_with('/') {
		return Err(Error::Validation {
			message: "upstream.path must start with '/'.".to_string(),
		});
	}
	if cfg.upstream.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "upstream.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.upstream.connect_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "upstream.connect_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.upstream.client_batch_max == 0 {
		return Err(Error::Validation {
			message: "upstream.client_batch_max must be greater than zero.".to_string(),
		});
	}
	if cfg.upstream.max_concurrency == 0 {
		return Err(Error::Validation {
			message: "upstream.max_concurrency must be greater than zero.".to_string(),
		});
	}
	if cfg.rerank.max_docs_per_call == 0 {
		return Err(Error::Validation {
			message: "rerank.max_docs_per_call must be greater than zero.".to_string(),
		});
	}
	if cfg.rerank.model.trim().is_empty() {
		return Err(Error::Validation { message: "rerank.model must be non-empty.".to_string() });
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let trimmed = cfg.upstream.api_base.trim().trim_end_matches('/');

	if trimmed.len() != cfg.upstream.api_base.len() {
		cfg.upstream.api_base = trimmed.to_string();
	}
	if cfg.upstream.path.trim().is_empty() {
		cfg.upstream.path = "/rerank".to_string();
	}
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
	T: FromStr,
{
	value
		.trim()
		.parse()
		.map_err(|_| Error::Env { key: key.to_string(), value: value.to_string() })
}
