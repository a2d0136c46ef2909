//! Graph data structures handed to the force graph component.

use serde::{Deserialize, Serialize};

/// Identifier of a node; always the id of the page it represents.
pub type NodeId = String;

/// A page in the graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	/// Page id. Edges reference nodes by this value.
	pub id: NodeId,
	/// Page title, drawn above the node and matched by search.
	pub label: String,
	/// Page slug, reported when the node is activated.
	pub slug: String,
	/// Category color (`#rrggbb`), if the page has a colored category.
	pub color: Option<String>,
	/// Category name, if the page has one.
	pub category: Option<String>,
	/// Number of edges targeting this node. Drives the drawn size.
	#[serde(default)]
	pub incoming_link_count: u32,
}

/// A directed link between two pages.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
	/// `"{source}-{target}"`, unique per directed pair.
	pub id: String,
	/// Linking page.
	pub source: NodeId,
	/// Linked page.
	pub target: NodeId,
}

impl GraphEdge {
	/// Build an edge with its id derived from the endpoints.
	pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
		let (source, target) = (source.into(), target.into());
		Self {
			id: format!("{source}-{target}"),
			source,
			target,
		}
	}

	/// Whether `id` is one of this edge's endpoints.
	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}
}

/// Complete graph data: nodes and edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}
