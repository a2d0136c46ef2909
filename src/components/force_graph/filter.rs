//! Category filter over the node set.

use std::collections::HashSet;

use super::types::{GraphData, GraphNode};

/// Name given to nodes without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Swatch color for categories without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#9ca3af";

/// One entry of the filter list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryOption {
	pub name: String,
	pub color: String,
	pub active: bool,
}

/// Category a node is filtered under.
pub fn category_of(node: &GraphNode) -> &str {
	node.category.as_deref().unwrap_or(UNCATEGORIZED)
}

/// The set of categories currently shown.
#[derive(Clone, Debug, Default)]
pub struct CategoryFilter {
	/// Distinct categories with their swatch color, in first-seen order.
	categories: Vec<(String, String)>,
	active: HashSet<String>,
}

impl CategoryFilter {
	/// Derive the categories of `data`, all active.
	pub fn new(data: &GraphData) -> Self {
		let mut seen = HashSet::new();
		let categories: Vec<(String, String)> = data
			.nodes
			.iter()
			.filter(|n| seen.insert(category_of(n)))
			.map(|n| {
				let color = n.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR);
				(category_of(n).to_owned(), color.to_owned())
			})
			.collect();
		let active = categories.iter().map(|(name, _)| name.clone()).collect();
		Self { categories, active }
	}

	pub fn options(&self) -> Vec<CategoryOption> {
		self.categories
			.iter()
			.map(|(name, color)| CategoryOption {
				name: name.clone(),
				color: color.clone(),
				active: self.active.contains(name),
			})
			.collect()
	}

	pub fn is_active(&self, category: &str) -> bool {
		self.active.contains(category)
	}

	/// Flip a category. Returns the new state, or `None` for an unknown name.
	pub fn toggle(&mut self, category: &str) -> Option<bool> {
		if !self.categories.iter().any(|(name, _)| name == category) {
			return None;
		}
		if self.active.remove(category) {
			Some(false)
		} else {
			self.active.insert(category.to_owned());
			Some(true)
		}
	}

	pub fn set_all(&mut self, active: bool) {
		self.active = if active {
			self.categories.iter().map(|(name, _)| name.clone()).collect()
		} else {
			HashSet::new()
		};
	}

	/// Nodes in an active category, and the edges between two such nodes.
	pub fn apply(&self, data: &GraphData) -> GraphData {
		let nodes: Vec<GraphNode> = data
			.nodes
			.iter()
			.filter(|n| self.is_active(category_of(n)))
			.cloned()
			.collect();
		let visible: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		let edges = data
			.edges
			.iter()
			.filter(|e| visible.contains(e.source.as_str()) && visible.contains(e.target.as_str()))
			.cloned()
			.collect();
		GraphData { nodes, edges }
	}
}
