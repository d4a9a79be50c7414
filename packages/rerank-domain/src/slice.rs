use std::{iter::FusedIterator, ops::Range};

/// Half-open range `[start, end)` over the request's documents, scored in one upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
	pub start: usize,
	pub end: usize,
}
impl Slice {
	pub fn len(&self) -> usize {
		self.end - self.start
	}

	pub fn is_empty(&self) -> bool {
		self.end <= self.start
	}

	pub fn range(&self) -> Range<usize> {
		self.start..self.end
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
	"Document {index} alone serializes to {size} bytes, which exceeds the payload limit of {limit} bytes."
)]
pub struct OversizedDocument {
	pub index: usize,
	pub size: usize,
	pub limit: usize,
}

/// Lazily splits documents into slices that respect a count cap and a payload byte budget.
///
/// Each slice starts as wide as the cap allows and is halved until the estimated payload fits.
/// A one-document slice that still does not fit yields [`OversizedDocument`] and ends the
/// sequence. The cursor only moves forward.
pub struct SlicePlanner<'a, F> {
	documents: &'a [String],
	max_docs: usize,
	payload_limit: usize,
	estimate: F,
	start: usize,
	failed: bool,
}
impl<'a, F> SlicePlanner<'a, F>
where
	F: FnMut(&[String]) -> usize,
{
	/// `estimate` returns the serialized byte size of the sub-request for the given documents.
	/// A `payload_limit` of `0` disables the byte check and the estimator is never called.
	pub fn new(documents: &'a [String], max_docs: usize, payload_limit: usize, estimate: F) -> Self {
		Self { documents, max_docs: max_docs.max(1), payload_limit, estimate, start: 0, failed: false }
	}
}
impl<F> Iterator for SlicePlanner<'_, F>
where
	F: FnMut(&[String]) -> usize,
{
	type Item = Result<Slice, OversizedDocument>;

	fn next(&mut self) -> Option<Self::Item> {
		let total = self.documents.len();

		if self.failed || self.start >= total {
			return None;
		}

		let start = self.start;
		let mut end = start.saturating_add(self.max_docs).min(total);

		loop {
			if self.payload_limit == 0 {
				break;
			}

			let size = (self.estimate)(&self.documents[start..end]);

			if size <= self.payload_limit {
				break;
			}
			if end - start == 1 {
				self.failed = true;

				return Some(Err(OversizedDocument {
					index: start,
					size,
					limit: self.payload_limit,
				}));
			}

			end = start + ((end - start) / 2).max(1);
		}

		self.start = end;

		Some(Ok(Slice { start, end }))
	}
}
impl<F> FusedIterator for SlicePlanner<'_, F> where F: FnMut(&[String]) -> usize {}
