use std::sync::LazyLock;

use regex::{Captures, Regex};

static TAG_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Tag pattern must compile."));
// Legacy named references that browsers still decode without the trailing semicolon.
static BARE_ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"&(amp|AMP|lt|LT|gt|GT|quot|QUOT|nbsp|copy|COPY|reg|REG)([^;#A-Za-z0-9]|$)")
		.expect("Entity pattern must compile.")
});

/// Turns one raw document into text that is safe to send to the scorer.
///
/// Entities are decoded first, so encoded markup such as `&lt;b&gt;` is stripped as well. Every
/// tag becomes a single space, whitespace runs collapse, and the result is clipped to
/// `clip_chars` characters (`0` keeps the full text). Never fails.
pub fn sanitize(raw: &str, clip_chars: usize) -> String {
	let bare = BARE_ENTITY_RE.replace_all(raw, |caps: &Captures| {
		let decoded = match &caps[1] {
			"amp" | "AMP" => '&',
			"lt" | "LT" => '<',
			"gt" | "GT" => '>',
			"quot" | "QUOT" => '"',
			"nbsp" => '\u{a0}',
			"copy" | "COPY" => '\u{a9}',
			_ => '\u{ae}',
		};

		format!("{decoded}{}", &caps[2])
	});
	let decoded = html_escape::decode_html_entities(&bare);
	let stripped = TAG_RE.replace_all(&decoded, " ");
	let mut out = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

	let cut = match clip_chars {
		0 => None,
		clip => out.char_indices().nth(clip).map(|(idx, _)| idx),
	};

	if let Some(cut) = cut {
		out.truncate(cut);
		out.truncate(out.trim_end().len());
	}

	out
}
