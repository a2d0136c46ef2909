//! Internal link extraction from page content.
//!
//! Pages link to each other with Markdown links whose target is the pages
//! route, e.g. `[Arrays](/pages/arrays)`. The extracted slugs become the
//! page's outgoing edges; whenever content is saved the stored edge set for
//! that page is replaced wholesale by [`relink_page`].

use std::collections::HashSet;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::error::GraphError;

/// Route prefix internal page links point at.
pub const DEFAULT_BASE_ROUTE: &str = "/pages/";

static DEFAULT_EXTRACTOR: LazyLock<LinkExtractor> = LazyLock::new(|| {
	LinkExtractor::new(DEFAULT_BASE_ROUTE).expect("default link pattern compiles")
});

/// Finds internal page links in raw Markdown/MDX content.
#[derive(Clone, Debug)]
pub struct LinkExtractor {
	pattern: Regex,
}

impl LinkExtractor {
	/// Build an extractor for links under `base_route` (e.g. `/pages/`).
	pub fn new(base_route: &str) -> Result<Self, GraphError> {
		let pattern = Regex::new(&format!(
			r"\[[^\]]+\]\({}([a-z0-9-]+)\)",
			regex::escape(base_route)
		))?;
		Ok(Self { pattern })
	}

	/// Distinct slugs referenced by internal links, in first-seen order.
	///
	/// Absolute URLs, other routes and paths with characters outside
	/// `[a-z0-9-]` are not links to pages and are skipped.
	pub fn extract(&self, content: &str) -> Vec<String> {
		let mut seen = HashSet::new();
		self.pattern
			.captures_iter(content)
			.filter_map(|caps| caps.get(1))
			.map(|m| m.as_str())
			.filter(|slug| seen.insert(*slug))
			.map(str::to_owned)
			.collect()
	}
}

/// Extract slugs with the default `/pages/` route.
pub fn extract_link_slugs(content: &str) -> Vec<String> {
	DEFAULT_EXTRACTOR.extract(content)
}

/// Persistence collaborator for page links.
pub trait LinkStore {
	type Error;

	/// Page ids for the given slugs. Unknown slugs are omitted.
	fn resolve_slugs(&self, slugs: &[String]) -> Result<Vec<String>, Self::Error>;

	/// Delete every stored link whose source is `source`, then insert
	/// `source -> target` for each of `targets`.
	fn replace_outgoing(&mut self, source: &str, targets: &[String]) -> Result<(), Self::Error>;
}

/// Recompute and persist the outgoing links of a page from its new content.
///
/// Returns the resolved target page ids that were stored.
pub fn relink_page<S: LinkStore>(
	store: &mut S,
	page_id: &str,
	content: &str,
) -> Result<Vec<String>, S::Error> {
	relink_page_with(&DEFAULT_EXTRACTOR, store, page_id, content)
}

/// [`relink_page`] with a caller-supplied extractor.
pub fn relink_page_with<S: LinkStore>(
	extractor: &LinkExtractor,
	store: &mut S,
	page_id: &str,
	content: &str,
) -> Result<Vec<String>, S::Error> {
	let slugs = extractor.extract(content);
	let mut seen = HashSet::new();
	let targets: Vec<String> = if slugs.is_empty() {
		Vec::new()
	} else {
		store
			.resolve_slugs(&slugs)?
			.into_iter()
			.filter(|id| seen.insert(id.clone()))
			.collect()
	};
	store.replace_outgoing(page_id, &targets)?;
	debug!(
		"relinked page {}: {} slugs, {} targets",
		page_id,
		slugs.len(),
		targets.len()
	);
	Ok(targets)
}
