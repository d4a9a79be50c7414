use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::slice::Slice;

/// One score as the upstream reports it, indexed within its slice.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LocalScore {
	pub index: usize,
	pub score: f64,
}

/// One score indexed by the document's position in the original request.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ScoredItem {
	pub index: usize,
	pub relevance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
	#[error("Upstream returned index {index} for a slice of {len} documents.")]
	IndexOutOfSlice { index: usize, len: usize },
	#[error("Upstream returned document {index} more than once.")]
	DuplicateIndex { index: usize },
}

/// Merges per-slice scores into the final ranking.
///
/// Local indices are shifted by each slice's start. The merged list is sorted by descending
/// score, with equal scores ordered by ascending global index, and truncated to `top_n`.
pub fn aggregate<I>(slice_results: I, top_n: usize) -> Result<Vec<ScoredItem>, AggregateError>
where
	I: IntoIterator<Item = (Slice, Vec<LocalScore>)>,
{
	let mut seen = HashSet::new();
	let mut items = Vec::new();

	for (slice, scores) in slice_results {
		for local in scores {
			if local.index >= slice.len() {
				return Err(AggregateError::IndexOutOfSlice { index: local.index, len: slice.len() });
			}

			let index = slice.start + local.index;

			if !seen.insert(index) {
				return Err(AggregateError::DuplicateIndex { index });
			}

			items.push(ScoredItem { index, relevance_score: local.score });
		}
	}

	items.sort_by(|a, b| {
		b.relevance_score.total_cmp(&a.relevance_score).then_with(|| a.index.cmp(&b.index))
	});
	items.truncate(top_n);

	Ok(items)
}
