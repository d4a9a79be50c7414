use rerank_domain::{LocalScore, OversizedDocument, Slice, SlicePlanner, aggregate, sanitize};

fn documents(count: usize) -> Vec<String> {
	(0..count).map(|idx| format!("document number {idx} {}", "word ".repeat(idx % 7))).collect()
}

fn json_size(texts: &[String]) -> usize {
	serde_json::to_vec(&serde_json::json!({ "query": "q", "texts": texts }))
		.expect("Failed to serialize payload.")
		.len()
}

fn plan(docs: &[String], max_docs: usize, payload_limit: usize) -> Vec<Slice> {
	SlicePlanner::new(docs, max_docs, payload_limit, json_size)
		.collect::<Result<Vec<_>, _>>()
		.expect("Planning failed.")
}

fn assert_exact_cover(slices: &[Slice], total: usize) {
	let mut cursor = 0;

	for slice in slices {
		assert_eq!(slice.start, cursor, "Slices must be contiguous: {slices:?}");
		assert!(slice.start < slice.end, "Slices must be non-empty: {slices:?}");

		cursor = slice.end;
	}

	assert_eq!(cursor, total, "Slices must cover every document: {slices:?}");
}

#[test]
fn five_hundred_documents_split_by_count_cap() {
	let docs = documents(500);
	let slices = plan(&docs, 64, 0);
	let widths: Vec<usize> = slices.iter().map(Slice::len).collect();

	assert_eq!(widths, [vec![64; 7], vec![52]].concat());
	assert_exact_cover(&slices, 500);
}

#[test]
fn slices_cover_documents_under_any_fitting_budget() {
	let docs = documents(137);
	let largest_single = docs
		.iter()
		.map(|doc| json_size(std::slice::from_ref(doc)))
		.max()
		.expect("Documents must be non-empty.");

	for max_docs in [1, 3, 16, 64, 500] {
		for payload_limit in [0, largest_single, largest_single * 3, 4_096, 100_000] {
			let slices = plan(&docs, max_docs, payload_limit);

			assert_exact_cover(&slices, docs.len());

			for slice in &slices {
				assert!(slice.len() <= max_docs);

				if payload_limit > 0 {
					assert!(json_size(&docs[slice.range()]) <= payload_limit);
				}
			}
		}
	}
}

#[test]
fn prefers_the_widest_fitting_slice() {
	let docs = vec!["a".repeat(10); 8];
	let slices = SlicePlanner::new(&docs, 8, 40, |texts: &[String]| texts.len() * 10)
		.collect::<Result<Vec<_>, _>>()
		.expect("Planning failed.");

	assert_eq!(slices, vec![Slice { start: 0, end: 4 }, Slice { start: 4, end: 8 }]);
}

#[test]
fn single_oversized_document_fails_instead_of_looping() {
	let docs = vec!["short".to_string(), "x".repeat(5_000), "short".to_string()];
	let mut estimates = 0;
	let result = SlicePlanner::new(&docs, 64, 1_000, |texts: &[String]| {
		estimates += 1;

		json_size(texts)
	})
	.collect::<Result<Vec<_>, _>>();
	let err = result.expect_err("Expected oversized document error.");

	assert_eq!(err.index, 1);
	assert_eq!(err.limit, 1_000);
	assert!(err.size > 1_000);
	assert!(estimates < 10, "Shrinking must terminate quickly, used {estimates} estimates.");
}

#[test]
fn oversized_first_document_is_reported() {
	let docs = vec!["y".repeat(64)];
	let mut planner = SlicePlanner::new(&docs, 4, 8, |texts: &[String]| texts[0].len());

	assert_eq!(planner.next(), Some(Err(OversizedDocument { index: 0, size: 64, limit: 8 })));
	assert_eq!(planner.next(), None);
}

#[test]
fn aggregated_top_n_is_sorted_unique_and_sized() {
	let total = 23;
	let slices =
		[Slice { start: 0, end: 10 }, Slice { start: 10, end: 20 }, Slice { start: 20, end: 23 }];

	for top_n in 0..=total {
		let results = slices.iter().map(|slice| {
			let scores: Vec<LocalScore> = (0..slice.len())
				.rev()
				.map(|local| LocalScore {
					index: local,
					score: (((slice.start + local) * 37) % 11) as f64 / 10.0,
				})
				.collect();

			(*slice, scores)
		});
		let items = aggregate(results, top_n).expect("Aggregation failed.");

		assert_eq!(items.len(), top_n);

		let mut seen = std::collections::HashSet::new();

		for item in &items {
			assert!(item.index < total);
			assert!(seen.insert(item.index), "Duplicate index {}.", item.index);
		}
		for pair in items.windows(2) {
			assert!(pair[0].relevance_score >= pair[1].relevance_score);
		}
	}
}

#[test]
fn top_n_larger_than_results_returns_everything() {
	let scores = vec![LocalScore { index: 0, score: 0.4 }, LocalScore { index: 1, score: 0.6 }];
	let results = vec![(Slice { start: 0, end: 2 }, scores)];
	let items = aggregate(results, 10).expect("Aggregation failed.");

	assert_eq!(items.len(), 2);
	assert_eq!(items[0].index, 1);
}

#[test]
fn sanitize_is_idempotent_on_clean_text() {
	for clean in ["already clean text", "a & b", "caf\u{e9} au lait", "single", ""] {
		assert_eq!(sanitize(clean, 1_000), clean);
		assert_eq!(sanitize(&sanitize(clean, 1_000), 1_000), clean);
	}

	let once = sanitize("  <div>Some&nbsp;<i>marked</i>   up\ttext</div> ", 12);

	assert_eq!(sanitize(&once, 12), once);
}
