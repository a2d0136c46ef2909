//! Assembles graph nodes and edges from page, category and link relations.
//!
//! The relations are whatever the persistence layer handed over, already
//! resolved in memory. Assembly never fails: dangling references are dropped,
//! and a source that cannot produce relations yields an empty graph.

use std::collections::{HashMap, HashSet};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::components::force_graph::{GraphData, GraphEdge, GraphNode};
use crate::error::GraphError;

/// Extra incoming-link weight given to the center of a neighborhood view.
pub const CENTER_BONUS: u32 = 5;
/// Incoming-link count every neighbor is drawn with in a neighborhood view.
pub const NEIGHBOR_BASELINE: u32 = 1;

/// A row of the `pages` relation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageRow {
	pub id: String,
	pub title: String,
	pub slug: String,
	#[serde(default)]
	pub category_id: Option<String>,
}

/// A row of the `categories` relation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub color_hex: Option<String>,
}

/// A row of the `links` relation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkRow {
	pub source_page_id: String,
	pub target_page_id: String,
}

impl LinkRow {
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source_page_id: source.into(),
			target_page_id: target.into(),
		}
	}
}

/// Everything the assembler reads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Relations {
	#[serde(default)]
	pub pages: Vec<PageRow>,
	#[serde(default)]
	pub categories: Vec<CategoryRow>,
	#[serde(default)]
	pub links: Vec<LinkRow>,
}

/// Something that can produce the current relations.
pub trait RelationSource {
	fn relations(&self) -> Result<Relations, GraphError>;
}

impl RelationSource for Relations {
	fn relations(&self) -> Result<Relations, GraphError> {
		Ok(self.clone())
	}
}

/// Relations serialized as JSON, e.g. embedded in the host page.
pub struct JsonSource<'a>(pub &'a str);

impl RelationSource for JsonSource<'_> {
	fn relations(&self) -> Result<Relations, GraphError> {
		Ok(serde_json::from_str(self.0)?)
	}
}

/// Lookup tables shared by both assembly operations.
struct Index<'a> {
	pages: HashMap<&'a str, &'a PageRow>,
	categories: HashMap<&'a str, &'a CategoryRow>,
}

impl<'a> Index<'a> {
	fn new(rel: &'a Relations) -> Self {
		Self {
			pages: rel.pages.iter().map(|p| (p.id.as_str(), p)).collect(),
			categories: rel.categories.iter().map(|c| (c.id.as_str(), c)).collect(),
		}
	}

	fn node(&self, page: &PageRow, incoming_link_count: u32) -> GraphNode {
		let category = page
			.category_id
			.as_deref()
			.and_then(|id| self.categories.get(id));
		GraphNode {
			id: page.id.clone(),
			label: page.title.clone(),
			slug: page.slug.clone(),
			color: category.and_then(|c| c.color_hex.clone()),
			category: category.map(|c| c.name.clone()),
			incoming_link_count,
		}
	}

	/// Links whose endpoints both exist, one per directed pair.
	fn valid_links(&self, links: &'a [LinkRow]) -> Vec<&'a LinkRow> {
		let mut seen = HashSet::new();
		let mut dangling = 0usize;
		let kept = links
			.iter()
			.filter(|l| {
				let ok = self.pages.contains_key(l.source_page_id.as_str())
					&& self.pages.contains_key(l.target_page_id.as_str());
				if !ok {
					dangling += 1;
				}
				ok
			})
			.filter(|l| seen.insert((l.source_page_id.as_str(), l.target_page_id.as_str())))
			.collect();
		if dangling > 0 {
			warn!("skipped {} links with unknown endpoints", dangling);
		}
		kept
	}
}

/// Every page as a node and every (deduplicated) link as an edge.
pub fn full_graph(rel: &Relations) -> GraphData {
	let index = Index::new(rel);
	let links = index.valid_links(&rel.links);

	let mut incoming: HashMap<&str, u32> = HashMap::new();
	for link in &links {
		*incoming.entry(link.target_page_id.as_str()).or_insert(0) += 1;
	}

	let mut emitted = HashSet::new();
	let nodes = rel
		.pages
		.iter()
		.filter(|p| emitted.insert(p.id.as_str()))
		.map(|p| index.node(p, incoming.get(p.id.as_str()).copied().unwrap_or(0)))
		.collect();
	let edges = links
		.iter()
		.map(|l| GraphEdge::new(&l.source_page_id, &l.target_page_id))
		.collect();

	GraphData { nodes, edges }
}

/// The page `page_id` plus every page one link away in either direction.
///
/// Fails with [`GraphError::UnknownPage`] if the center page does not exist.
pub fn neighborhood(rel: &Relations, page_id: &str) -> Result<GraphData, GraphError> {
	let index = Index::new(rel);
	let center = index
		.pages
		.get(page_id)
		.copied()
		.ok_or_else(|| GraphError::UnknownPage(page_id.to_owned()))?;

	let mut neighbors: Vec<&PageRow> = Vec::new();
	let mut neighbor_ids = HashSet::new();
	let mut edges = Vec::new();
	for link in index.valid_links(&rel.links) {
		let (src, tgt) = (link.source_page_id.as_str(), link.target_page_id.as_str());
		let other = match (src == center.id, tgt == center.id) {
			(true, false) => tgt,
			(false, true) => src,
			_ => continue,
		};
		edges.push(GraphEdge::new(src, tgt));
		if neighbor_ids.insert(other) {
			neighbors.push(index.pages[other]);
		}
	}

	let mut nodes = Vec::with_capacity(neighbors.len() + 1);
	nodes.push(index.node(center, edges.len() as u32 + CENTER_BONUS));
	nodes.extend(neighbors.into_iter().map(|p| index.node(p, NEIGHBOR_BASELINE)));

	Ok(GraphData { nodes, edges })
}

/// [`neighborhood`] keyed by the center page's slug.
pub fn neighborhood_by_slug(rel: &Relations, slug: &str) -> Result<GraphData, GraphError> {
	let page = rel
		.pages
		.iter()
		.find(|p| p.slug == slug)
		.ok_or_else(|| GraphError::UnknownPage(slug.to_owned()))?;
	neighborhood(rel, &page.id)
}

/// Load the full graph, or an empty graph if the source fails.
pub fn load_full_graph(source: &dyn RelationSource) -> GraphData {
	match source.relations() {
		Ok(rel) => {
			let data = full_graph(&rel);
			info!(
				"assembled graph: {} nodes, {} edges",
				data.nodes.len(),
				data.edges.len()
			);
			data
		}
		Err(e) => {
			warn!("failed to load graph data: {}", e);
			GraphData::default()
		}
	}
}

/// Load a page neighborhood, or an empty graph if the source or lookup fails.
pub fn load_neighborhood(source: &dyn RelationSource, page_id: &str) -> GraphData {
	source
		.relations()
		.and_then(|rel| neighborhood(&rel, page_id))
		.unwrap_or_else(|e| {
			warn!("failed to load neighborhood of {}: {}", page_id, e);
			GraphData::default()
		})
}

/// [`load_neighborhood`] keyed by slug.
pub fn load_neighborhood_by_slug(source: &dyn RelationSource, slug: &str) -> GraphData {
	source
		.relations()
		.and_then(|rel| neighborhood_by_slug(&rel, slug))
		.unwrap_or_else(|e| {
			warn!("failed to load neighborhood of {}: {}", slug, e);
			GraphData::default()
		})
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn page(id: &str, category: Option<&str>) -> PageRow {
		PageRow {
			id: id.into(),
			title: id.to_uppercase(),
			slug: format!("{id}-slug"),
			category_id: category.map(Into::into),
		}
	}

	fn sample() -> Relations {
		Relations {
			pages: vec![page("a", Some("ds")), page("b", Some("algo")), page("c", None), page("d", Some("gone"))],
			categories: vec![
				CategoryRow { id: "ds".into(), name: "Data Structures".into(), color_hex: Some("#ff0000".into()) },
				CategoryRow { id: "algo".into(), name: "Algorithms".into(), color_hex: None },
			],
			links: vec![
				LinkRow::new("a", "b"),
				LinkRow::new("c", "b"),
				LinkRow::new("b", "a"),
				LinkRow::new("a", "b"),
				LinkRow::new("a", "missing"),
			],
		}
	}

	#[test]
	fn full_graph_counts_incoming_links() {
		let g = full_graph(&sample());
		let counts: HashMap<_, _> = g.nodes.iter().map(|n| (n.id.as_str(), n.incoming_link_count)).collect();
		assert_eq!(counts["a"], 1);
		assert_eq!(counts["b"], 2);
		assert_eq!(counts["c"], 0);
		assert_eq!(counts["d"], 0);
	}

	#[test]
	fn full_graph_dedups_and_drops_dangling_edges() {
		let g = full_graph(&sample());
		let ids: Vec<_> = g.edges.iter().map(|e| e.id.as_str()).collect();
		assert_eq!(ids, vec!["a-b", "c-b", "b-a"]);
	}

	#[test]
	fn full_graph_joins_categories() {
		let g = full_graph(&sample());
		let a = g.node("a").unwrap();
		assert_eq!(a.category.as_deref(), Some("Data Structures"));
		assert_eq!(a.color.as_deref(), Some("#ff0000"));
		let b = g.node("b").unwrap();
		assert_eq!(b.category.as_deref(), Some("Algorithms"));
		assert_eq!(b.color, None);
		assert_eq!(g.node("c").unwrap().category, None);
		assert_eq!(g.node("d").unwrap().category, None);
	}

	#[test]
	fn neighborhood_lists_two_way_neighbor_once() {
		let g = neighborhood(&sample(), "a").unwrap();
		let ids: Vec<_> = g.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["a", "b"]);
		let edges: Vec<_> = g.edges.iter().map(|e| e.id.as_str()).collect();
		assert_eq!(edges, vec!["a-b", "b-a"]);
	}

	#[test]
	fn neighborhood_boosts_center_and_flattens_neighbors() {
		let g = neighborhood(&sample(), "b").unwrap();
		assert_eq!(g.nodes[0].id, "b");
		assert_eq!(g.nodes[0].incoming_link_count, 3 + CENTER_BONUS);
		assert!(g.nodes[1..].iter().all(|n| n.incoming_link_count == NEIGHBOR_BASELINE));
		assert_eq!(g.nodes.len(), 3);
	}

	#[test]
	fn neighborhood_edges_keep_direction() {
		let g = neighborhood(&sample(), "c").unwrap();
		assert_eq!(g.edges, vec![GraphEdge::new("c", "b")]);
	}

	#[test]
	fn neighborhood_ignores_self_links() {
		let mut rel = sample();
		rel.links.push(LinkRow::new("d", "d"));
		let g = neighborhood(&rel, "d").unwrap();
		assert_eq!(g.nodes.len(), 1);
		assert!(g.edges.is_empty());
	}

	#[test]
	fn unknown_center_loads_empty() {
		assert!(matches!(neighborhood(&sample(), "zzz"), Err(GraphError::UnknownPage(_))));
		assert_eq!(load_neighborhood(&sample(), "zzz"), GraphData::default());
		assert_eq!(load_neighborhood_by_slug(&sample(), "nope"), GraphData::default());
		assert_eq!(load_neighborhood_by_slug(&sample(), "a-slug").nodes.len(), 2);
	}

	#[test]
	fn bad_json_loads_empty() {
		assert_eq!(load_full_graph(&JsonSource("{ not json")), GraphData::default());
	}

	#[test]
	fn json_source_round_trips_relations() {
		let json = r##"{
			"pages": [{"id": "p1", "title": "Stacks", "slug": "stacks", "category_id": "c1"}],
			"categories": [{"id": "c1", "name": "DS", "color_hex": "#00ff00"}],
			"links": []
		}"##;
		let g = load_full_graph(&JsonSource(json));
		assert_eq!(g.nodes.len(), 1);
		assert_eq!(g.nodes[0].color.as_deref(), Some("#00ff00"));
	}

	fn arb_relations() -> impl Strategy<Value = Relations> {
		(1usize..12).prop_flat_map(|n| {
			prop::collection::vec((0..n + 2, 0..n + 2), 0..40).prop_map(move |pairs| Relations {
				pages: (0..n).map(|i| page(&format!("p{i}"), None)).collect(),
				categories: Vec::new(),
				links: pairs
					.into_iter()
					.map(|(s, t)| LinkRow::new(format!("p{s}"), format!("p{t}")))
					.collect(),
			})
		})
	}

	proptest! {
		#[test]
		fn incoming_count_matches_edge_targets(rel in arb_relations()) {
			let g = full_graph(&rel);
			for node in &g.nodes {
				let targeted = g.edges.iter().filter(|e| e.target == node.id).count() as u32;
				prop_assert_eq!(node.incoming_link_count, targeted);
			}
			let ids: HashSet<_> = g.edges.iter().map(|e| &e.id).collect();
			prop_assert_eq!(ids.len(), g.edges.len());
		}

		#[test]
		fn neighborhood_nodes_are_unique(rel in arb_relations(), center in 0usize..12) {
			let id = format!("p{center}");
			if let Ok(g) = neighborhood(&rel, &id) {
				let ids: HashSet<_> = g.nodes.iter().map(|n| &n.id).collect();
				prop_assert_eq!(ids.len(), g.nodes.len());
				for e in &g.edges {
					prop_assert!(ids.contains(&e.source) && ids.contains(&e.target));
				}
			}
		}
	}
}
