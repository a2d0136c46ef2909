//! In-memory page store.
//!
//! Stands in for the CMS persistence layer: it owns pages with their content,
//! categories and links, serves them as [`Relations`], and accepts link
//! replacement through [`LinkStore`].

use std::collections::HashSet;

use crate::data::{CategoryRow, LinkRow, PageRow, RelationSource, Relations};
use crate::error::{GraphError, StoreError};
use crate::links::{self, LinkStore};

/// A page together with its raw content.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredPage {
	pub row: PageRow,
	pub content: String,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	pages: Vec<StoredPage>,
	categories: Vec<CategoryRow>,
	links: Vec<LinkRow>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_category(&mut self, category: CategoryRow) {
		self.categories.push(category);
	}

	/// Insert a page and derive its outgoing links from `content`.
	pub fn create_page(&mut self, row: PageRow, content: &str) -> Result<Vec<String>, StoreError> {
		let id = row.id.clone();
		self.pages.push(StoredPage {
			row,
			content: content.to_owned(),
		});
		links::relink_page(self, &id, content)
	}

	/// Replace a page's content and relink it.
	pub fn update_content(&mut self, page_id: &str, content: &str) -> Result<Vec<String>, StoreError> {
		let page = self
			.pages
			.iter_mut()
			.find(|p| p.row.id == page_id)
			.ok_or_else(|| StoreError::UnknownPage(page_id.to_owned()))?;
		page.content = content.to_owned();
		links::relink_page(self, page_id, content)
	}

	pub fn links(&self) -> &[LinkRow] {
		&self.links
	}

	pub fn page(&self, page_id: &str) -> Option<&StoredPage> {
		self.pages.iter().find(|p| p.row.id == page_id)
	}
}

impl LinkStore for MemoryStore {
	type Error = StoreError;

	fn resolve_slugs(&self, slugs: &[String]) -> Result<Vec<String>, StoreError> {
		Ok(slugs
			.iter()
			.filter_map(|slug| self.pages.iter().find(|p| &p.row.slug == slug))
			.map(|p| p.row.id.clone())
			.collect())
	}

	fn replace_outgoing(&mut self, source: &str, targets: &[String]) -> Result<(), StoreError> {
		if self.page(source).is_none() {
			return Err(StoreError::UnknownPage(source.to_owned()));
		}
		self.links.retain(|l| l.source_page_id != source);
		let mut seen = HashSet::new();
		self.links.extend(
			targets
				.iter()
				.filter(|t| seen.insert(t.as_str()))
				.map(|t| LinkRow::new(source, t.as_str())),
		);
		Ok(())
	}
}

impl RelationSource for MemoryStore {
	fn relations(&self) -> Result<Relations, GraphError> {
		Ok(Relations {
			pages: self.pages.iter().map(|p| p.row.clone()).collect(),
			categories: self.categories.clone(),
			links: self.links.clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn row(id: &str, slug: &str) -> PageRow {
		PageRow {
			id: id.into(),
			title: slug.into(),
			slug: slug.into(),
			category_id: None,
		}
	}

	#[test]
	fn create_resolves_known_slugs_only() {
		let mut store = MemoryStore::new();
		store.create_page(row("1", "arrays"), "").unwrap();
		let targets = store
			.create_page(row("2", "lists"), "[a](/pages/arrays) [x](/pages/unknown) [a](/pages/arrays)")
			.unwrap();
		assert_eq!(targets, vec!["1"]);
		assert_eq!(store.links(), &[LinkRow::new("2", "1")]);
	}

	#[test]
	fn edit_replaces_instead_of_merging() {
		let mut store = MemoryStore::new();
		store.create_page(row("1", "arrays"), "").unwrap();
		store.create_page(row("2", "heaps"), "").unwrap();
		store.create_page(row("3", "sorting"), "[a](/pages/arrays) [h](/pages/heaps)").unwrap();
		assert_eq!(store.links().len(), 2);

		store.update_content("3", "only [h](/pages/heaps) now").unwrap();
		assert_eq!(store.links(), &[LinkRow::new("3", "2")]);
		assert_eq!(store.page("3").unwrap().content, "only [h](/pages/heaps) now");

		store.update_content("3", "no links").unwrap();
		assert!(store.links().is_empty());
	}

	#[test]
	fn relinking_leaves_other_pages_alone() {
		let mut store = MemoryStore::new();
		store.create_page(row("1", "arrays"), "").unwrap();
		store.create_page(row("2", "heaps"), "[a](/pages/arrays)").unwrap();
		store.create_page(row("3", "sorting"), "[a](/pages/arrays)").unwrap();
		store.update_content("3", "").unwrap();
		assert_eq!(store.links(), &[LinkRow::new("2", "1")]);
	}

	#[test]
	fn unknown_page_is_an_error() {
		let mut store = MemoryStore::new();
		assert_eq!(
			store.update_content("404", "x"),
			Err(StoreError::UnknownPage("404".into()))
		);
		assert_eq!(
			store.replace_outgoing("404", &[]),
			Err(StoreError::UnknownPage("404".into()))
		);
	}
}
