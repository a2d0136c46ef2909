//! Hover highlighting as view-only state.
//!
//! Hovering a node keeps its closed neighborhood (the node plus everything one
//! edge away) at full strength and dims every other node and edge. The dimmed
//! sets live here, keyed by id, and are joined with the graph data only at
//! render time; the graph data itself is never touched.
//!
//! The sets switch instantly. For drawing, each id also carries a smoothed dim
//! level that eases towards its target, so highlights fade rather than blink.

use std::collections::{HashMap, HashSet};

use super::types::{GraphData, NodeId};

/// Rate at which dimming sets in (per second, exponential smoothing).
const DIM_IN_SPEED: f64 = 6.0;
/// Rate at which dimming clears.
const DIM_OUT_SPEED: f64 = 4.0;
/// Dim levels below this are dropped.
const DIM_EPSILON: f64 = 0.005;

#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	hovered: Option<NodeId>,
	dimmed_nodes: HashSet<NodeId>,
	dimmed_edges: HashSet<String>,
	node_level: HashMap<NodeId, f64>,
	edge_level: HashMap<String, f64>,
}

impl HighlightState {
	pub fn hovered(&self) -> Option<&str> {
		self.hovered.as_deref()
	}

	/// Focus the closed neighborhood of `node`, or clear focus with `None`.
	///
	/// An id not present in `data` clears focus. One pass over the edges.
	pub fn set_hover(&mut self, node: Option<&str>, data: &GraphData) {
		let node = node.filter(|id| data.node(id).is_some());
		if self.hovered.as_deref() == node {
			return;
		}
		self.dimmed_nodes.clear();
		self.dimmed_edges.clear();
		self.hovered = node.map(str::to_owned);

		let Some(focus) = node else {
			return;
		};
		let mut members: HashSet<&str> = HashSet::from([focus]);
		for edge in &data.edges {
			if edge.touches(focus) {
				members.insert(&edge.source);
				members.insert(&edge.target);
			} else {
				self.dimmed_edges.insert(edge.id.clone());
			}
		}
		self.dimmed_nodes.extend(
			data.nodes
				.iter()
				.filter(|n| !members.contains(n.id.as_str()))
				.map(|n| n.id.clone()),
		);
	}

	pub fn clear(&mut self) {
		self.hovered = None;
		self.dimmed_nodes.clear();
		self.dimmed_edges.clear();
	}

	/// Drop all state, including in-flight fades.
	pub fn reset(&mut self) {
		self.clear();
		self.node_level.clear();
		self.edge_level.clear();
	}

	pub fn is_node_dimmed(&self, id: &str) -> bool {
		self.dimmed_nodes.contains(id)
	}

	pub fn is_edge_dimmed(&self, edge_id: &str) -> bool {
		self.dimmed_edges.contains(edge_id)
	}

	pub fn dimmed_nodes(&self) -> &HashSet<NodeId> {
		&self.dimmed_nodes
	}

	pub fn dimmed_edges(&self) -> &HashSet<String> {
		&self.dimmed_edges
	}

	/// Ease every dim level towards 1 (dimmed) or 0 (focused).
	///
	/// `level += (target - level) * (1 - e^(-speed * dt))`
	pub fn tick(&mut self, dt: f64) {
		let dim_in = 1.0 - (-DIM_IN_SPEED * dt).exp();
		let dim_out = (-DIM_OUT_SPEED * dt).exp();
		ease(&mut self.node_level, &self.dimmed_nodes, dim_in, dim_out);
		ease(&mut self.edge_level, &self.dimmed_edges, dim_in, dim_out);
	}

	/// Smoothed dim level of a node, 0.0 (full strength) to 1.0 (dimmed).
	pub fn node_dim_level(&self, id: &str) -> f64 {
		self.node_level.get(id).copied().unwrap_or(0.0)
	}

	pub fn edge_dim_level(&self, edge_id: &str) -> f64 {
		self.edge_level.get(edge_id).copied().unwrap_or(0.0)
	}
}

fn ease(levels: &mut HashMap<String, f64>, targets: &HashSet<String>, dim_in: f64, dim_out: f64) {
	for id in targets {
		let level = levels.entry(id.clone()).or_insert(0.0);
		*level += (1.0 - *level) * dim_in;
	}
	levels.retain(|id, level| {
		if targets.contains(id) {
			return true;
		}
		*level *= dim_out;
		*level > DIM_EPSILON
	});
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphEdge, GraphNode};

	fn data(ids: &[&str], edges: &[(&str, &str)]) -> GraphData {
		GraphData {
			nodes: ids
				.iter()
				.map(|id| GraphNode {
					id: (*id).into(),
					label: (*id).into(),
					slug: (*id).into(),
					color: None,
					category: None,
					incoming_link_count: 0,
				})
				.collect(),
			edges: edges.iter().map(|(s, t)| GraphEdge::new(*s, *t)).collect(),
		}
	}

	#[test]
	fn hovering_middle_of_chain_dims_nothing() {
		let g = data(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
		let mut h = HighlightState::default();
		h.set_hover(Some("B"), &g);
		assert!(h.dimmed_nodes().is_empty());
		assert!(h.dimmed_edges().is_empty());
		assert_eq!(h.hovered(), Some("B"));
	}

	#[test]
	fn hovering_end_dims_the_rest() {
		let g = data(&["A", "B", "C", "D"], &[("A", "B"), ("B", "C"), ("D", "A")]);
		let mut h = HighlightState::default();
		h.set_hover(Some("C"), &g);
		assert!(h.is_node_dimmed("A"));
		assert!(h.is_node_dimmed("D"));
		assert!(!h.is_node_dimmed("B"));
		assert!(!h.is_node_dimmed("C"));
		assert!(h.is_edge_dimmed("A-B"));
		assert!(h.is_edge_dimmed("D-A"));
		assert!(!h.is_edge_dimmed("B-C"));
	}

	#[test]
	fn leaving_clears_dimming() {
		let g = data(&["A", "B", "C"], &[("A", "B")]);
		let mut h = HighlightState::default();
		h.set_hover(Some("A"), &g);
		assert!(h.is_node_dimmed("C"));
		h.set_hover(None, &g);
		assert!(h.dimmed_nodes().is_empty());
		assert!(h.dimmed_edges().is_empty());
		assert_eq!(h.hovered(), None);
	}

	#[test]
	fn unknown_node_clears_focus() {
		let g = data(&["A", "B"], &[]);
		let mut h = HighlightState::default();
		h.set_hover(Some("A"), &g);
		h.set_hover(Some("ghost"), &g);
		assert_eq!(h.hovered(), None);
		assert!(h.dimmed_nodes().is_empty());
	}

	#[test]
	fn dim_levels_ease_in_and_out() {
		let g = data(&["A", "B", "C"], &[("A", "B")]);
		let mut h = HighlightState::default();
		h.set_hover(Some("A"), &g);
		h.tick(0.016);
		let first = h.node_dim_level("C");
		assert!(first > 0.0 && first < 1.0);
		for _ in 0..120 {
			h.tick(0.016);
		}
		assert!(h.node_dim_level("C") > 0.99);
		assert_eq!(h.node_dim_level("A"), 0.0);

		h.clear();
		h.tick(0.016);
		assert!(h.node_dim_level("C") > 0.0);
		for _ in 0..240 {
			h.tick(0.016);
		}
		assert_eq!(h.node_dim_level("C"), 0.0);
	}
}
