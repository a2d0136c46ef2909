//! Label search over the visible nodes.

use std::cmp::Ordering;

use super::types::{GraphNode, NodeId};

/// A node whose label matched a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
	pub id: NodeId,
	pub label: String,
	/// The label starts with the query.
	pub prefix: bool,
}

/// Case-insensitive substring match of `query` against node labels.
///
/// Prefix matches come first, then labels in case-folded order, then ids, so
/// the result is deterministic for any node order. A blank query matches
/// everything.
pub fn search_nodes(nodes: &[GraphNode], query: &str) -> Vec<SearchHit> {
	let needle = query.trim().to_lowercase();
	let mut hits: Vec<(String, SearchHit)> = nodes
		.iter()
		.filter_map(|node| {
			let folded = node.label.to_lowercase();
			let at = folded.find(&needle)?;
			let hit = SearchHit {
				id: node.id.clone(),
				label: node.label.clone(),
				prefix: at == 0,
			};
			Some((folded, hit))
		})
		.collect();
	hits.sort_by(|(fa, a), (fb, b)| match (a.prefix, b.prefix) {
		(true, false) => Ordering::Less,
		(false, true) => Ordering::Greater,
		_ => fa.cmp(fb).then_with(|| a.id.cmp(&b.id)),
	});
	hits.into_iter().map(|(_, hit)| hit).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn nodes(labels: &[&str]) -> Vec<GraphNode> {
		labels
			.iter()
			.enumerate()
			.map(|(i, label)| GraphNode {
				id: format!("id{i}"),
				label: (*label).into(),
				slug: label.to_lowercase().replace(' ', "-"),
				color: None,
				category: None,
				incoming_link_count: 0,
			})
			.collect()
	}

	fn labels(hits: &[SearchHit]) -> Vec<&str> {
		hits.iter().map(|h| h.label.as_str()).collect()
	}

	#[test]
	fn matches_case_insensitive_substrings() {
		let n = nodes(&["Binary Tree", "Tree Traversal", "Hash Map", "B-Tree"]);
		let hits = search_nodes(&n, "TREE");
		assert_eq!(labels(&hits), vec!["Tree Traversal", "B-Tree", "Binary Tree"]);
		assert!(hits[0].prefix);
		assert!(!hits[1].prefix);
	}

	#[test]
	fn no_match_is_empty_not_error() {
		let n = nodes(&["Stack", "Queue"]);
		assert!(search_nodes(&n, "graph").is_empty());
		assert!(search_nodes(&[], "graph").is_empty());
	}

	#[test]
	fn blank_query_lists_everything_sorted() {
		let n = nodes(&["queue", "Array", "heap"]);
		assert_eq!(labels(&search_nodes(&n, "  ")), vec!["Array", "heap", "queue"]);
	}

	#[test]
	fn order_does_not_depend_on_input_order() {
		let mut n = nodes(&["Sort", "Sort", "Merge Sort", "sorting"]);
		let a = search_nodes(&n, "sort");
		n.reverse();
		let b = search_nodes(&n, "sort");
		assert_eq!(a, b);
		assert_eq!(a[0].id, "id0");
	}
}
