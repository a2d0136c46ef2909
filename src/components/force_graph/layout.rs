//! Force-directed layout engine.
//!
//! An iterative velocity simulation with four composed forces: link springs,
//! many-body charge, centering and collision. Each [`Simulation::step`] cools
//! the system by decaying `alpha` towards `alpha_target`; forces scale with
//! `alpha`, so once it drops below `alpha_min` the layout is at rest.
//!
//! Lifecycle: `Idle -> Warming -> Settled -> [Dragging -> Settled]* -> Disposed`.
//! [`Simulation::settle`] runs the warm-up batch synchronously. While a node is
//! pinned the simulation stays warm; releasing the pin reheats it so the rest
//! of the graph re-settles around the moved node.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use super::types::{GraphData, GraphNode, NodeId};

/// Tunable force constants and cooling schedule.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Rest length of a link spring.
	pub link_distance: f64,
	/// Multiplier on the degree-normalized link strength.
	pub link_strength: f64,
	/// Many-body strength; negative values repel.
	pub charge_strength: f64,
	/// Distances below this are treated as this, so coincident nodes never divide by zero.
	pub charge_distance_min: f64,
	/// Pairs farther apart than this do not interact.
	pub charge_distance_max: f64,
	/// Fraction of the centroid offset removed each tick (0 disables centering).
	pub center_strength: f64,
	/// Added to each node's drawn radius for collision.
	pub collide_padding: f64,
	/// How much of an overlap is resolved per tick (0..=1).
	pub collide_strength: f64,
	/// Ticks run synchronously by [`Simulation::settle`].
	pub warmup_ticks: usize,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is pinned.
	pub drag_alpha_target: f64,
	/// Alpha the system is raised to when a pin is released.
	pub release_alpha: f64,
	/// Per-tick displacement cap.
	pub max_speed: f64,
	/// Spacing of the phyllotaxis spiral new nodes are placed on.
	pub initial_radius: f64,
	/// Seed for the tie-breaking jitter applied to coincident nodes.
	pub seed: u64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			link_distance: 150.0,
			link_strength: 1.0,
			charge_strength: -100.0,
			charge_distance_min: 1.0,
			charge_distance_max: 2000.0,
			center_strength: 1.0,
			collide_padding: 6.0,
			collide_strength: 1.0,
			warmup_ticks: 300,
			alpha_min: 0.001,
			alpha_decay: 1.0 - 0.001f64.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			release_alpha: 0.3,
			max_speed: 100.0,
			initial_radius: 10.0,
			seed: 0x5eed,
		}
	}
}

/// A 2D position in graph (world) space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

/// Axis-aligned bounds of a set of positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min: Point,
	pub max: Point,
}

impl Bounds {
	/// Bounds of `points` grown by `margin`, or `None` if there are none.
	pub fn around<'a>(points: impl IntoIterator<Item = &'a Point>, margin: f64) -> Option<Self> {
		let mut iter = points.into_iter();
		let first = *iter.next()?;
		let (mut min, mut max) = (first, first);
		for p in iter {
			min.x = min.x.min(p.x);
			min.y = min.y.min(p.y);
			max.x = max.x.max(p.x);
			max.y = max.y.max(p.y);
		}
		Some(Self {
			min: Point::new(min.x - margin, min.y - margin),
			max: Point::new(max.x + margin, max.y + margin),
		})
	}

	pub fn width(&self) -> f64 {
		self.max.x - self.min.x
	}

	pub fn height(&self) -> f64 {
		self.max.y - self.min.y
	}

	pub fn center(&self) -> Point {
		Point::new(
			(self.min.x + self.max.x) / 2.0,
			(self.min.y + self.max.y) / 2.0,
		)
	}
}

/// Where a simulation is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Idle,
	Warming,
	Settled,
	Dragging,
	Disposed,
}

/// Engine-private node record.
#[derive(Clone, Debug)]
struct SimNode {
	id: NodeId,
	x: f64,
	y: f64,
	vx: f64,
	vy: f64,
	/// Pinned position; `Some` while the user holds the node.
	fixed: Option<Point>,
	radius: f64,
}

#[derive(Clone, Debug)]
struct SimLink {
	source: usize,
	target: usize,
	strength: f64,
	/// Share of the correction applied to the target (by relative degree).
	bias: f64,
}

/// Owned force simulation over one node/edge set.
pub struct Simulation {
	config: LayoutConfig,
	nodes: Vec<SimNode>,
	index: HashMap<NodeId, usize>,
	links: Vec<SimLink>,
	alpha: f64,
	alpha_target: f64,
	phase: Phase,
	rng: StdRng,
}

impl Simulation {
	pub fn new(config: LayoutConfig) -> Self {
		let rng = StdRng::seed_from_u64(config.seed);
		Self {
			config,
			nodes: Vec::new(),
			index: HashMap::new(),
			links: Vec::new(),
			alpha: 1.0,
			alpha_target: 0.0,
			phase: Phase::Idle,
			rng,
		}
	}

	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Replace the node and edge set.
	///
	/// Nodes already known by id keep their position and velocity; new nodes
	/// are placed on a spiral around the origin. Edges with an unknown
	/// endpoint, self-links and repeated pairs are skipped. `radius` gives each
	/// node's drawn radius for the collision force.
	pub fn load(&mut self, data: &GraphData, radius: impl Fn(&GraphNode) -> f64) {
		if self.phase == Phase::Disposed {
			warn!("layout: load on a disposed simulation ignored");
			return;
		}

		let previous: HashMap<NodeId, SimNode> = self
			.nodes
			.drain(..)
			.map(|n| (n.id.clone(), n))
			.collect();
		self.index.clear();

		let mut spiral = 0usize;
		for node in &data.nodes {
			if self.index.contains_key(&node.id) {
				continue;
			}
			let r = radius(node) + self.config.collide_padding;
			let sim = match previous.get(&node.id) {
				Some(prev) => SimNode {
					radius: r,
					..prev.clone()
				},
				None => {
					let (x, y) = self.spiral_position(spiral);
					spiral += 1;
					SimNode {
						id: node.id.clone(),
						x,
						y,
						vx: 0.0,
						vy: 0.0,
						fixed: None,
						radius: r,
					}
				}
			};
			self.index.insert(node.id.clone(), self.nodes.len());
			self.nodes.push(sim);
		}

		self.links.clear();
		let mut pairs = HashSet::new();
		let mut skipped = 0usize;
		for edge in &data.edges {
			match (self.index.get(&edge.source), self.index.get(&edge.target)) {
				(Some(&s), Some(&t)) if s != t => {
					if pairs.insert((s, t)) {
						self.links.push(SimLink {
							source: s,
							target: t,
							strength: 0.0,
							bias: 0.0,
						});
					}
				}
				(Some(_), Some(_)) => {}
				_ => skipped += 1,
			}
		}
		if skipped > 0 {
			warn!("layout: skipped {} edges with unknown endpoints", skipped);
		}

		let mut degree = vec![0usize; self.nodes.len()];
		for link in &self.links {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		for link in &mut self.links {
			let (ds, dt) = (degree[link.source] as f64, degree[link.target] as f64);
			link.strength = self.config.link_strength / ds.min(dt);
			link.bias = ds / (ds + dt);
		}

		self.alpha = 1.0;
		self.alpha_target = 0.0;
		self.phase = Phase::Idle;
		debug!(
			"layout: loaded {} nodes, {} links",
			self.nodes.len(),
			self.links.len()
		);
	}

	fn spiral_position(&self, i: usize) -> (f64, f64) {
		let angle = i as f64 * PI * (3.0 - 5f64.sqrt());
		let r = self.config.initial_radius * (0.5 + i as f64).sqrt();
		(r * angle.cos(), r * angle.sin())
	}

	/// Run the warm-up batch and come to rest.
	///
	/// Zero nodes is a no-op; a single node is placed at the origin without
	/// running any physics.
	pub fn settle(&mut self) {
		match self.phase {
			Phase::Disposed => return,
			_ if self.nodes.is_empty() => {
				self.phase = Phase::Settled;
				return;
			}
			_ => {}
		}
		if let [only] = self.nodes.as_mut_slice() {
			let p = only.fixed.unwrap_or(Point::ORIGIN);
			(only.x, only.y, only.vx, only.vy) = (p.x, p.y, 0.0, 0.0);
			self.phase = Phase::Settled;
			return;
		}

		self.phase = Phase::Warming;
		for _ in 0..self.config.warmup_ticks {
			self.tick();
		}
		// The batch leaves the layout at rest; only a drag wakes it again.
		if self.has_pins() {
			self.phase = Phase::Dragging;
		} else {
			self.alpha = 0.0;
			self.phase = Phase::Settled;
		}
		debug!(
			"layout: settled {} nodes after {} ticks",
			self.nodes.len(),
			self.config.warmup_ticks
		);
	}

	/// Whether per-frame stepping would still move anything.
	pub fn is_active(&self) -> bool {
		self.phase != Phase::Disposed
			&& self.nodes.len() > 1
			&& (self.alpha >= self.config.alpha_min || self.alpha_target > 0.0)
	}

	/// Advance one tick if the simulation is still warm. Returns whether it moved.
	pub fn step(&mut self) -> bool {
		if !self.is_active() {
			return false;
		}
		self.tick();
		true
	}

	fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		let alpha = self.alpha;

		self.apply_links(alpha);
		self.apply_charge(alpha);
		self.apply_collision();

		let keep = 1.0 - self.config.velocity_decay;
		let max_speed = self.config.max_speed;
		for node in &mut self.nodes {
			match node.fixed {
				Some(p) => {
					(node.x, node.y, node.vx, node.vy) = (p.x, p.y, 0.0, 0.0);
				}
				None => {
					node.vx *= keep;
					node.vy *= keep;
					let speed = node.vx.hypot(node.vy);
					if speed > max_speed {
						let s = max_speed / speed;
						node.vx *= s;
						node.vy *= s;
					}
					node.x += node.vx;
					node.y += node.vy;
				}
			}
		}

		self.apply_centering();
		self.repair_non_finite();
	}

	fn jiggle(rng: &mut StdRng) -> f64 {
		(rng.r#gen::<f64>() - 0.5) * 1e-6
	}

	fn apply_links(&mut self, alpha: f64) {
		let distance = self.config.link_distance;
		for link in &self.links {
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 {
				dx = Self::jiggle(&mut self.rng);
			}
			if dy == 0.0 {
				dy = Self::jiggle(&mut self.rng);
			}
			let len = dx.hypot(dy);
			let k = (len - distance) / len * alpha * link.strength;
			let (fx, fy) = (dx * k, dy * k);

			let t = &mut self.nodes[link.target];
			t.vx -= fx * link.bias;
			t.vy -= fy * link.bias;
			let s = &mut self.nodes[link.source];
			s.vx += fx * (1.0 - link.bias);
			s.vy += fy * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self, alpha: f64) {
		let strength = self.config.charge_strength;
		if strength == 0.0 {
			return;
		}
		let min2 = self.config.charge_distance_min.powi(2);
		let max2 = self.config.charge_distance_max.powi(2);
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let mut dx = self.nodes[j].x - self.nodes[i].x;
				let mut dy = self.nodes[j].y - self.nodes[i].y;
				if dx == 0.0 {
					dx = Self::jiggle(&mut self.rng);
				}
				if dy == 0.0 {
					dy = Self::jiggle(&mut self.rng);
				}
				let mut l2 = dx * dx + dy * dy;
				if l2 >= max2 {
					continue;
				}
				if l2 < min2 {
					l2 = (min2 * l2).sqrt();
				}
				let k = strength * alpha / l2.max(f64::EPSILON);
				let (fx, fy) = (dx * k, dy * k);
				self.nodes[i].vx += fx;
				self.nodes[i].vy += fy;
				self.nodes[j].vx -= fx;
				self.nodes[j].vy -= fy;
			}
		}
	}

	fn apply_collision(&mut self) {
		let strength = self.config.collide_strength;
		if strength == 0.0 {
			return;
		}
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (&self.nodes[i], &self.nodes[j]);
				let r = a.radius + b.radius;
				let mut dx = a.x + a.vx - b.x - b.vx;
				let mut dy = a.y + a.vy - b.y - b.vy;
				let mut l2 = dx * dx + dy * dy;
				if l2 >= r * r {
					continue;
				}
				if dx == 0.0 {
					dx = Self::jiggle(&mut self.rng);
					l2 += dx * dx;
				}
				if dy == 0.0 {
					dy = Self::jiggle(&mut self.rng);
					l2 += dy * dy;
				}
				let l = l2.sqrt();
				let k = (r - l) / l * strength;
				let (ra2, rb2) = (a.radius * a.radius, b.radius * b.radius);
				let share = rb2 / (ra2 + rb2);
				let (fx, fy) = (dx * k, dy * k);
				self.nodes[i].vx += fx * share;
				self.nodes[i].vy += fy * share;
				self.nodes[j].vx -= fx * (1.0 - share);
				self.nodes[j].vy -= fy * (1.0 - share);
			}
		}
	}

	/// Translate free nodes so the centroid moves towards the origin.
	///
	/// A rigid shift of the whole cloud: relative positions, and therefore
	/// disconnected components, are untouched. Paused while a node is pinned
	/// so the graph does not slide under the pointer.
	fn apply_centering(&mut self) {
		let strength = self.config.center_strength;
		if strength == 0.0 || self.nodes.is_empty() || self.has_pins() {
			return;
		}
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (dx, dy) = (sx / n * strength, sy / n * strength);
		for node in self.nodes.iter_mut().filter(|n| n.fixed.is_none()) {
			node.x -= dx;
			node.y -= dy;
		}
	}

	fn repair_non_finite(&mut self) {
		for node in &mut self.nodes {
			if node.x.is_finite() && node.y.is_finite() && node.vx.is_finite() && node.vy.is_finite() {
				continue;
			}
			warn!("layout: node {} went non-finite; resetting", node.id);
			let p = node.fixed.unwrap_or(Point::ORIGIN);
			(node.x, node.y, node.vx, node.vy) = (
				p.x + Self::jiggle(&mut self.rng),
				p.y + Self::jiggle(&mut self.rng),
				0.0,
				0.0,
			);
		}
	}

	fn has_pins(&self) -> bool {
		self.nodes.iter().any(|n| n.fixed.is_some())
	}

	/// Fix a node at `(x, y)`. Forces no longer move it, but it still acts on
	/// its neighbors; the simulation stays warm until it is released.
	pub fn pin(&mut self, id: &str, x: f64, y: f64) -> bool {
		if self.phase == Phase::Disposed || !(x.is_finite() && y.is_finite()) {
			return false;
		}
		let Some(&i) = self.index.get(id) else {
			return false;
		};
		let node = &mut self.nodes[i];
		node.fixed = Some(Point::new(x, y));
		(node.x, node.y, node.vx, node.vy) = (x, y, 0.0, 0.0);
		self.alpha_target = self.config.drag_alpha_target;
		if self.phase != Phase::Dragging {
			debug!("layout: pinned {}", id);
		}
		self.phase = Phase::Dragging;
		true
	}

	/// Release a pinned node and reheat so the graph re-settles around it.
	pub fn unpin(&mut self, id: &str) -> bool {
		if self.phase == Phase::Disposed {
			return false;
		}
		let Some(&i) = self.index.get(id) else {
			return false;
		};
		if self.nodes[i].fixed.take().is_none() {
			return false;
		}
		if !self.has_pins() {
			self.alpha_target = 0.0;
			self.alpha = self.alpha.max(self.config.release_alpha);
			self.phase = Phase::Settled;
		}
		debug!("layout: released {}", id);
		true
	}

	pub fn is_pinned(&self, id: &str) -> bool {
		self.index
			.get(id)
			.is_some_and(|&i| self.nodes[i].fixed.is_some())
	}

	pub fn position(&self, id: &str) -> Option<Point> {
		self.index
			.get(id)
			.map(|&i| Point::new(self.nodes[i].x, self.nodes[i].y))
	}

	/// Snapshot of every node position after the last complete tick.
	pub fn positions(&self) -> HashMap<NodeId, Point> {
		self.nodes
			.iter()
			.map(|n| (n.id.clone(), Point::new(n.x, n.y)))
			.collect()
	}

	/// Stop for good and drop all node state.
	pub fn dispose(&mut self) {
		if self.phase == Phase::Disposed {
			return;
		}
		self.nodes.clear();
		self.index.clear();
		self.links.clear();
		self.alpha = 0.0;
		self.alpha_target = 0.0;
		self.phase = Phase::Disposed;
		debug!("layout: disposed");
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::force_graph::types::GraphEdge;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.into(),
			slug: id.into(),
			color: None,
			category: None,
			incoming_link_count: 0,
		}
	}

	fn graph(n: usize, edges: &[(usize, usize)]) -> GraphData {
		GraphData {
			nodes: (0..n).map(|i| node(&format!("n{i}"))).collect(),
			edges: edges
				.iter()
				.map(|&(s, t)| GraphEdge::new(format!("n{s}"), format!("n{t}")))
				.collect(),
		}
	}

	fn settled(data: &GraphData, config: LayoutConfig) -> Simulation {
		let mut sim = Simulation::new(config);
		sim.load(data, |_| 10.0);
		sim.settle();
		sim
	}

	fn all_finite(sim: &Simulation) -> bool {
		sim.positions().values().all(|p| p.x.is_finite() && p.y.is_finite())
	}

	#[test]
	fn empty_graph_is_a_no_op() {
		let sim = settled(&GraphData::default(), LayoutConfig::default());
		assert_eq!(sim.phase(), Phase::Settled);
		assert!(sim.positions().is_empty());
		assert!(!sim.is_active());
	}

	#[test]
	fn single_node_sits_at_origin() {
		let mut sim = settled(&graph(1, &[]), LayoutConfig::default());
		assert_eq!(sim.position("n0"), Some(Point::ORIGIN));
		assert!(!sim.step());
	}

	#[test]
	fn linked_pair_settles_near_link_distance() {
		let config = LayoutConfig {
			charge_strength: 0.0,
			..LayoutConfig::default()
		};
		let sim = settled(&graph(2, &[(0, 1)]), config);
		let d = sim.position("n0").unwrap().distance(sim.position("n1").unwrap());
		assert!((d - 150.0).abs() < 5.0, "distance {d}");
	}

	#[test]
	fn warmup_leaves_layout_at_rest() {
		let mut sim = settled(&graph(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]), LayoutConfig::default());
		assert_eq!(sim.phase(), Phase::Settled);
		assert!(!sim.is_active());
		let before = sim.positions();
		assert!(!sim.step());
		assert_eq!(sim.positions(), before);
		assert!(all_finite(&sim));
	}

	#[test]
	fn default_decay_cools_in_warmup_ticks() {
		let c = LayoutConfig::default();
		let alpha = (1.0 - c.alpha_decay).powi(c.warmup_ticks as i32);
		assert!((alpha - c.alpha_min).abs() < 1e-9);
	}

	#[test]
	fn cold_start_is_deterministic() {
		let data = graph(8, &[(0, 1), (1, 2), (2, 0), (3, 4), (5, 6), (6, 7)]);
		let a = settled(&data, LayoutConfig::default()).positions();
		let b = settled(&data, LayoutConfig::default()).positions();
		assert_eq!(a, b);
	}

	#[test]
	fn reordering_nodes_does_not_move_them() {
		let data = graph(5, &[(0, 1), (1, 2), (3, 4)]);
		let mut sim = settled(&data, LayoutConfig::default());
		let before = sim.positions();

		let mut reordered = data.clone();
		reordered.nodes.reverse();
		sim.load(&reordered, |_| 10.0);
		assert_eq!(sim.positions(), before);
	}

	#[test]
	fn incremental_load_keeps_known_nodes() {
		let mut sim = settled(&graph(3, &[(0, 1)]), LayoutConfig::default());
		let before = sim.position("n1").unwrap();
		sim.load(&graph(4, &[(0, 1), (2, 3)]), |_| 10.0);
		assert_eq!(sim.position("n1"), Some(before));
		assert!(sim.position("n3").is_some());
	}

	#[test]
	fn invalid_edges_are_skipped() {
		let mut data = graph(3, &[(0, 1), (0, 1), (2, 2)]);
		data.edges.push(GraphEdge::new("n0", "ghost"));
		let mut sim = Simulation::new(LayoutConfig::default());
		sim.load(&data, |_| 10.0);
		assert_eq!(sim.links.len(), 1);
		sim.settle();
		assert!(all_finite(&sim));
	}

	#[test]
	fn coincident_nodes_separate() {
		let config = LayoutConfig {
			initial_radius: 0.0,
			..LayoutConfig::default()
		};
		let sim = settled(&graph(4, &[]), config);
		assert!(all_finite(&sim));
		let p = sim.positions();
		assert!(p["n0"].distance(p["n1"]) > 1.0);
	}

	#[test]
	fn pinned_node_holds_its_position() {
		let mut sim = settled(&graph(4, &[(0, 1), (1, 2), (2, 3)]), LayoutConfig::default());
		assert!(sim.pin("n1", 400.0, -250.0));
		assert_eq!(sim.phase(), Phase::Dragging);
		for _ in 0..30 {
			assert!(sim.step());
		}
		assert_eq!(sim.position("n1"), Some(Point::new(400.0, -250.0)));
		assert!(sim.is_pinned("n1"));
	}

	#[test]
	fn pinned_node_pulls_neighbors() {
		let mut sim = settled(&graph(2, &[(0, 1)]), LayoutConfig::default());
		let start = sim.position("n1").unwrap();
		let target = Point::new(start.x + 1000.0, start.y);
		sim.pin("n0", target.x, target.y);
		for _ in 0..60 {
			sim.step();
		}
		assert!(sim.position("n1").unwrap().distance(target) < start.distance(target));
	}

	#[test]
	fn release_reheats_then_cools() {
		let mut sim = settled(&graph(3, &[(0, 1), (1, 2)]), LayoutConfig::default());
		assert!(!sim.is_active());
		sim.pin("n0", 300.0, 300.0);
		sim.step();
		assert!(sim.unpin("n0"));
		assert_eq!(sim.phase(), Phase::Settled);
		assert!(sim.alpha() >= 0.3 - 1e-9);
		assert!(!sim.is_pinned("n0"));

		let mut ticks = 0;
		while sim.step() {
			ticks += 1;
			assert!(ticks < 10_000, "never cooled");
		}
		assert!(sim.alpha() < sim.config().alpha_min);
		assert!(all_finite(&sim));
	}

	#[test]
	fn unknown_or_unpinned_ids_are_rejected() {
		let mut sim = settled(&graph(2, &[(0, 1)]), LayoutConfig::default());
		assert!(!sim.pin("nope", 0.0, 0.0));
		assert!(!sim.pin("n0", f64::NAN, 0.0));
		assert!(!sim.unpin("n0"));
	}

	#[test]
	fn disposed_simulation_stops() {
		let mut sim = settled(&graph(3, &[(0, 1)]), LayoutConfig::default());
		sim.pin("n0", 10.0, 10.0);
		sim.dispose();
		assert_eq!(sim.phase(), Phase::Disposed);
		assert!(!sim.step());
		assert!(!sim.pin("n1", 0.0, 0.0));
		assert!(sim.positions().is_empty());
		sim.load(&graph(3, &[]), |_| 10.0);
		assert!(sim.is_empty());
	}

	#[test]
	fn centering_keeps_components_apart() {
		let sim = settled(&graph(6, &[(0, 1), (1, 2), (3, 4), (4, 5)]), LayoutConfig::default());
		let p = sim.positions();
		let (cx, cy) = p.values().fold((0.0, 0.0), |(x, y), q| (x + q.x, y + q.y));
		assert!((cx / 6.0).abs() < 1.0 && (cy / 6.0).abs() < 1.0);
		assert!(p["n0"].distance(p["n3"]) > 20.0);
	}

	#[test]
	fn large_graph_cools_after_drag_and_release() {
		let n = 500;
		let edges: Vec<_> = (0..2000).map(|i| ((i * 7) % n, (i * 13 + 1) % n)).collect();
		let mut sim = settled(&graph(n, &edges), LayoutConfig::default());
		assert!(all_finite(&sim));
		assert!(sim.pin("n17", 5000.0, -5000.0));
		for _ in 0..20 {
			sim.step();
		}
		sim.unpin("n17");
		let mut ticks = 0;
		while sim.step() {
			ticks += 1;
			assert!(ticks < 2000, "layout never cooled");
		}
		assert!(!sim.is_active());
		assert!(all_finite(&sim));
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(24))]

		#[test]
		fn positions_stay_finite(
			n in 2usize..30,
			raw in prop::collection::vec((0usize..30, 0usize..30), 0..60),
			pin in (0usize..30, -1e4f64..1e4, -1e4f64..1e4),
		) {
			let edges: Vec<_> = raw.into_iter().map(|(s, t)| (s % n, t % n)).collect();
			let config = LayoutConfig { warmup_ticks: 60, ..LayoutConfig::default() };
			let mut sim = settled(&graph(n, &edges), config);
			let id = format!("n{}", pin.0 % n);
			sim.pin(&id, pin.1, pin.2);
			for _ in 0..20 {
				sim.step();
			}
			sim.unpin(&id);
			for _ in 0..100 {
				sim.step();
			}
			prop_assert!(all_finite(&sim));
		}
	}
}
