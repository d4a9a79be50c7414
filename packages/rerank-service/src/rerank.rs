use futures::{StreamExt, TryStreamExt, stream};

use crate::{Error, RerankRequest, RerankResponse, RerankService, Result};
use rerank_domain::{LocalScore, Slice, SlicePlanner};
use rerank_providers::tei;

impl RerankService {
	/// Sanitizes the documents, scores them slice by slice, and merges the scores.
	///
	/// Slices are pulled from the planner lazily and at most `upstream.max_concurrency` calls
	/// are in flight. Results are collected in completion order, so the first failing slice
	/// aborts the request at once and drops any call still running. A response is either
	/// complete or an error.
	pub async fn rerank(&self, req: RerankRequest) -> Result<RerankResponse> {
		if req.query.trim().is_empty() {
			return Err(Error::invalid("query/documents required", "$.query"));
		}
		if req.documents.is_empty() {
			return Err(Error::invalid("query/documents required", "$.documents"));
		}

		let top_n = req.effective_top_n();
		let model = req.model.unwrap_or_else(|| self.cfg.rerank.model.clone());
		let query = req.query.as_str();
		let clip_chars = self.cfg.rerank.doc_clip_chars;
		let documents: Vec<String> =
			req.documents.iter().map(|doc| rerank_domain::sanitize(doc, clip_chars)).collect();
		let planner = SlicePlanner::new(
			&documents,
			self.cfg.max_docs_per_slice(),
			self.cfg.rerank.payload_soft_limit,
			|texts: &[String]| tei::payload_len(query, texts),
		);
		let scorer = self.scorer.as_ref();
		let texts = documents.as_slice();
		let slice_results: Vec<(Slice, Vec<LocalScore>)> = stream::iter(planner)
			.map(|planned| async move {
				let slice = planned.inspect_err(|err| {
					tracing::warn!(
						index = err.index,
						size = err.size,
						limit = err.limit,
						"Document exceeds payload limit."
					);
				})?;

				tracing::debug!(start = slice.start, end = slice.end, "Scoring slice.");

				let scores = scorer.score(query, &texts[slice.range()]).await.map_err(|err| {
					tracing::warn!(
						start = slice.start,
						end = slice.end,
						error = %err,
						"Slice scoring failed."
					);

					Error::from_slice_call(slice, err)
				})?;

				Ok::<_, Error>((slice, scores))
			})
			.buffer_unordered(self.cfg.upstream.max_concurrency.max(1))
			.try_collect()
			.await?;
		let slices = slice_results.len();
		let data = rerank_domain::aggregate(slice_results, top_n)?;

		tracing::info!(
			documents = documents.len(),
			slices,
			returned = data.len(),
			"Rerank request completed."
		);

		Ok(RerankResponse::new(model, data))
	}
}
