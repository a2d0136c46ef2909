//! Graph view state and interaction tracking.
//!
//! [`ForceGraphState`] owns everything one mounted graph view needs: the full
//! data set, the category filter and the visible subset it yields, the layout
//! [`Simulation`], the published position snapshot, hover highlighting and the
//! pan/zoom transform. Input handlers and the frame loop call into it; the
//! renderer only reads it.
//!
//! Positions are published as a whole map after each complete simulation tick,
//! so a frame never sees a half-updated layout.

use std::collections::HashMap;

use log::{debug, info};

use super::filter::{CategoryFilter, CategoryOption};
use super::highlight::HighlightState;
use super::layout::{Bounds, LayoutConfig, Phase, Point, Simulation};
use super::scale::{ScaleConfig, ScaledValues};
use super::search::{SearchHit, search_nodes};
use super::types::{GraphData, GraphNode, NodeId};
use super::viewport::{ViewTransform, ViewTransition, ViewportConfig};

/// Factor applied per wheel notch.
const WHEEL_ZOOM_STEP: f64 = 1.1;
/// Factor applied per zoom button press.
const BUTTON_ZOOM_STEP: f64 = 1.2;

/// A press on a node that may become a drag.
#[derive(Clone, Debug)]
pub struct DragState {
	pub node: NodeId,
	pub start_x: f64,
	pub start_y: f64,
	/// Graph position of the node when it was pressed.
	pub node_start: Point,
	/// Pointer left the click slop; the node is pinned and follows it.
	pub moved: bool,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug)]
pub struct PanState {
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// State of one mounted graph view.
pub struct ForceGraphState {
	data: GraphData,
	filter: CategoryFilter,
	visible: GraphData,
	simulation: Simulation,
	radii: HashMap<NodeId, f64>,
	positions: HashMap<NodeId, Point>,
	pub highlight: HighlightState,
	pub transform: ViewTransform,
	transition: Option<ViewTransition>,
	pub drag: Option<DragState>,
	pub pan: Option<PanState>,
	/// Node picked from the search results.
	focused: Option<NodeId>,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	pub scale: ScaleConfig,
	pub viewport: ViewportConfig,
}

impl ForceGraphState {
	pub fn new(data: GraphData, width: f64, height: f64, layout: LayoutConfig) -> Self {
		Self::new_with_config(
			data,
			width,
			height,
			layout,
			ViewportConfig::default(),
			ScaleConfig::default(),
		)
	}

	pub fn new_with_config(
		data: GraphData,
		width: f64,
		height: f64,
		layout: LayoutConfig,
		viewport: ViewportConfig,
		scale: ScaleConfig,
	) -> Self {
		let filter = CategoryFilter::new(&data);
		let mut state = Self {
			visible: GraphData::default(),
			filter,
			data,
			simulation: Simulation::new(layout),
			radii: HashMap::new(),
			positions: HashMap::new(),
			highlight: HighlightState::default(),
			transform: ViewTransform::centered(width, height),
			transition: None,
			drag: None,
			pan: None,
			focused: None,
			width,
			height,
			flow_time: 0.0,
			scale,
			viewport,
		};
		state.relayout();
		info!(
			"graph: loaded {} nodes, {} edges",
			state.data.nodes.len(),
			state.data.edges.len()
		);
		state
	}

	/// The unfiltered data set.
	pub fn data(&self) -> &GraphData {
		&self.data
	}

	/// Nodes in an active category and the edges between them.
	pub fn visible(&self) -> &GraphData {
		&self.visible
	}

	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	pub fn positions(&self) -> &HashMap<NodeId, Point> {
		&self.positions
	}

	pub fn position(&self, id: &str) -> Option<Point> {
		self.positions.get(id).copied()
	}

	/// Layout radius of a visible node.
	pub fn radius(&self, id: &str) -> f64 {
		self.radii
			.get(id)
			.copied()
			.unwrap_or(self.scale.node.sizing.base)
	}

	pub fn focused(&self) -> Option<&str> {
		self.focused.as_deref()
	}

	/// Swap in a new data set.
	///
	/// The old simulation is disposed before the new one exists, so only one
	/// ever runs per view. Categories the user had switched off stay off.
	pub fn replace_data(&mut self, data: GraphData) {
		self.simulation.dispose();
		let hidden: Vec<String> = self
			.filter
			.options()
			.into_iter()
			.filter(|o| !o.active)
			.map(|o| o.name)
			.collect();
		self.filter = CategoryFilter::new(&data);
		for name in &hidden {
			if self.filter.is_active(name) {
				self.filter.toggle(name);
			}
		}
		self.data = data;
		self.simulation = Simulation::new(self.simulation.config().clone());
		self.positions.clear();
		self.focused = None;
		self.relayout();
		info!(
			"graph: replaced data, {} nodes, {} edges",
			self.data.nodes.len(),
			self.data.edges.len()
		);
	}

	pub fn category_options(&self) -> Vec<CategoryOption> {
		self.filter.options()
	}

	/// Flip a category and re-settle the layout. `None` for an unknown category.
	pub fn toggle_category(&mut self, name: &str) -> Option<bool> {
		let active = self.filter.toggle(name)?;
		debug!("graph: category {:?} active={}", name, active);
		self.relayout();
		Some(active)
	}

	pub fn set_all_categories(&mut self, active: bool) {
		self.filter.set_all(active);
		debug!("graph: all categories active={}", active);
		self.relayout();
	}

	/// Recompute the visible subset and run a fresh settle on it.
	fn relayout(&mut self) {
		self.visible = self.filter.apply(&self.data);
		self.highlight.reset();
		if let Some(drag) = self.drag.take() {
			self.simulation.unpin(&drag.node);
		}
		if self
			.focused
			.as_deref()
			.is_some_and(|id| self.visible.node(id).is_none())
		{
			self.focused = None;
		}

		let sizing = &self.scale.node.sizing;
		self.radii = self
			.visible
			.nodes
			.iter()
			.map(|n| (n.id.clone(), sizing.radius(n.incoming_link_count)))
			.collect();
		let radii = &self.radii;
		self.simulation.load(&self.visible, |n: &GraphNode| {
			radii.get(&n.id).copied().unwrap_or(sizing.base)
		});
		self.simulation.settle();
		self.positions = self.simulation.positions();
		self.fit_view();
	}

	/// Frame every visible node, or reset to the origin when there are none.
	pub fn fit_view(&mut self) {
		self.transition = None;
		let margin = self.radii.values().copied().fold(0.0, f64::max);
		self.transform = match Bounds::around(self.positions.values(), margin) {
			Some(bounds) => ViewTransform::fit(bounds, self.width, self.height, &self.viewport),
			None => ViewTransform::centered(self.width, self.height),
		};
	}

	/// Dim everything outside the neighborhood of `node`; `None` clears.
	pub fn set_hover(&mut self, node: Option<&str>) {
		self.highlight.set_hover(node, &self.visible);
	}

	/// Visible nodes whose label matches `query`. Empty means no results.
	pub fn search(&self, query: &str) -> Vec<SearchHit> {
		search_nodes(&self.visible.nodes, query)
	}

	/// Pan/zoom to a node's current position. The layout is not touched.
	pub fn select_search_result(&mut self, id: &str) -> bool {
		let Some(center) = self.position(id) else {
			return false;
		};
		let to = ViewTransform::looking_at(center, self.viewport.focus_zoom, self.width, self.height);
		self.transition = Some(ViewTransition::new(
			self.transform,
			to,
			self.viewport.focus_duration,
		));
		self.focused = Some(id.to_owned());
		debug!("graph: focusing {}", id);
		true
	}

	pub fn is_transitioning(&self) -> bool {
		self.transition.is_some()
	}

	/// Top-most visible node under a screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let p = self.transform.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(&self.scale, self.transform.k);
		self.visible
			.nodes
			.iter()
			.rev()
			.find(|n| {
				self.position(&n.id).is_some_and(|pos| {
					pos.distance(p) <= scale.node_radius(self.radius(&n.id)) + scale.hit_margin
				})
			})
			.map(|n| n.id.clone())
	}

	/// Press: start a node drag if over a node, else a pan.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.transition = None;
		let pressed = self
			.node_at_position(sx, sy)
			.and_then(|node| self.position(&node).map(|p| (node, p)));
		match pressed {
			Some((node, node_start)) => {
				self.drag = Some(DragState {
					node,
					start_x: sx,
					start_y: sy,
					node_start,
					moved: false,
				});
			}
			None => {
				self.pan = Some(PanState {
					start_x: sx,
					start_y: sy,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
				});
			}
		}
	}

	/// Move: drag, pan, or update the hover highlight.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if let Some(drag) = self.drag.as_mut() {
			let travel = (sx - drag.start_x).hypot(sy - drag.start_y);
			if drag.moved || travel > self.viewport.click_slop {
				drag.moved = true;
				let k = self.transform.k;
				let x = drag.node_start.x + (sx - drag.start_x) / k;
				let y = drag.node_start.y + (sy - drag.start_y) / k;
				self.simulation.pin(&drag.node, x, y);
				if let Some(pos) = self.simulation.position(&drag.node) {
					self.positions.insert(drag.node.clone(), pos);
				}
			}
			return;
		}
		if let Some(pan) = &self.pan {
			self.transform.x = pan.transform_start_x + (sx - pan.start_x);
			self.transform.y = pan.transform_start_y + (sy - pan.start_y);
			return;
		}
		let hovered = self.node_at_position(sx, sy);
		self.set_hover(hovered.as_deref());
	}

	/// Release. Returns the slug of the node when the gesture was a click.
	pub fn pointer_up(&mut self) -> Option<String> {
		self.pan = None;
		let drag = self.drag.take()?;
		if drag.moved {
			self.simulation.unpin(&drag.node);
			return None;
		}
		self.visible.node(&drag.node).map(|n| n.slug.clone())
	}

	/// Pointer left the canvas: end any gesture and clear the highlight.
	pub fn pointer_leave(&mut self) {
		if let Some(drag) = self.drag.take() {
			self.simulation.unpin(&drag.node);
		}
		self.pan = None;
		self.set_hover(None);
	}

	/// Zoom one wheel step about the pointer.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		self.transition = None;
		let factor = if delta_y < 0.0 {
			WHEEL_ZOOM_STEP
		} else {
			1.0 / WHEEL_ZOOM_STEP
		};
		self.transform.zoom_about(sx, sy, factor, &self.viewport);
	}

	/// Zoom one button step about the canvas centre.
	pub fn zoom_in(&mut self) {
		self.zoom_centered(BUTTON_ZOOM_STEP);
	}

	pub fn zoom_out(&mut self) {
		self.zoom_centered(1.0 / BUTTON_ZOOM_STEP);
	}

	fn zoom_centered(&mut self, factor: f64) {
		self.transition = None;
		self.transform
			.zoom_about(self.width / 2.0, self.height / 2.0, factor, &self.viewport);
	}

	/// Advance one frame of `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		if let Some(transition) = self.transition.as_mut() {
			let (transform, done) = transition.advance(dt);
			self.transform = transform;
			if done {
				self.transition = None;
			}
		}
		if self.simulation.step() {
			self.positions = self.simulation.positions();
		}
		self.flow_time += dt;
		self.highlight.tick(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Stop the simulation for good. The view draws nothing afterwards.
	pub fn dispose(&mut self) {
		self.simulation.dispose();
		self.positions.clear();
		self.transition = None;
		self.drag = None;
		self.pan = None;
	}

	pub fn is_disposed(&self) -> bool {
		self.simulation.phase() == Phase::Disposed
	}
}
