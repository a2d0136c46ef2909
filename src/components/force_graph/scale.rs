//! Node sizing and zoom-dependent scaling for graph visuals.
//!
//! Sizes are either world-space (graph units, grow when zooming in) or
//! screen-space (pixels, divided by the zoom before drawing). Node radii are
//! world-space and grow with a page's incoming link count; line widths and
//! label fonts are screen-space so the graph stays legible at any zoom.

/// A world-space size kept between `min_px` and `max_px` on screen.
#[derive(Clone, Debug)]
pub struct ScreenClamp {
	pub min_px: f64,
	pub max_px: f64,
}

impl ScreenClamp {
	/// World-space value for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		base.clamp(self.min_px / k, self.max_px / k)
	}
}

/// Opacity that ramps from 0 at zoom `hidden_k` to 1 at zoom `visible_k`.
#[derive(Clone, Debug)]
pub struct ZoomFade {
	pub hidden_k: f64,
	pub visible_k: f64,
}

impl ZoomFade {
	pub fn apply(&self, k: f64) -> f64 {
		let span = self.visible_k - self.hidden_k;
		if span.abs() < f64::EPSILON {
			return 1.0;
		}
		((k - self.hidden_k) / span).clamp(0.0, 1.0)
	}
}

/// Maps a page's incoming link count to its world-space radius.
///
/// `radius = base + per_link * sqrt(count)`, capped at `max`.
#[derive(Clone, Debug)]
pub struct NodeSizing {
	pub base: f64,
	pub per_link: f64,
	pub max: f64,
}

impl Default for NodeSizing {
	fn default() -> Self {
		Self {
			base: 14.0,
			per_link: 4.0,
			max: 40.0,
		}
	}
}

impl NodeSizing {
	pub fn radius(&self, incoming_link_count: u32) -> f64 {
		(self.base + self.per_link * f64::from(incoming_link_count).sqrt()).min(self.max)
	}
}

/// Configuration for node visuals.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	pub sizing: NodeSizing,
	/// Drawn radii never shrink below a few pixels.
	pub radius_clamp: ScreenClamp,
	/// Extra hit-test margin in screen pixels.
	pub hit_margin: f64,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Below this zoom the label font stops shrinking.
	pub label_min_k: f64,
	/// Labels are hidden below this zoom unless the node is highlighted.
	pub label_hide_k: f64,
}

/// Configuration for edge visuals.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Line width in screen pixels.
	pub line_width: f64,
	/// Dash pattern (dash, gap) in world units.
	pub dash_pattern: (f64, f64),
	/// Flow animation speed (world units per second).
	pub flow_speed: f64,
	/// Dashes fade to solid lines when zoomed out.
	pub dash_fade: ZoomFade,
	/// Arrow head length in world units.
	pub arrow_size: f64,
	pub arrow_clamp: ScreenClamp,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	/// Ring drawn around the focused search result, screen pixels.
	pub focus_ring_width: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				sizing: NodeSizing::default(),
				radius_clamp: ScreenClamp {
					min_px: 3.0,
					max_px: f64::INFINITY,
				},
				hit_margin: 4.0,
				label_size: 12.0,
				label_min_k: 0.5,
				label_hide_k: 0.35,
			},
			edge: EdgeScaleConfig {
				line_width: 1.5,
				dash_pattern: (5.0, 5.0),
				flow_speed: 12.0,
				dash_fade: ZoomFade {
					hidden_k: 0.4,
					visible_k: 0.9,
				},
				arrow_size: 8.0,
				arrow_clamp: ScreenClamp {
					min_px: 4.0,
					max_px: 16.0,
				},
			},
			focus_ring_width: 2.0,
		}
	}
}

/// Pre-computed scale values for one zoom level.
///
/// Create once per frame; all sizes are world-space (ready to use after the
/// canvas transform).
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub hit_margin: f64,
	pub label_font: String,
	pub show_labels: bool,
	pub edge_line_width: f64,
	pub dash_pattern: (f64, f64),
	/// 0 = solid lines, 1 = full dash pattern.
	pub dash_alpha: f64,
	pub arrow_size: f64,
	pub focus_ring_width: f64,
	radius_clamp: ScreenClamp,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_font_size = config.node.label_size / k.max(config.node.label_min_k);
		Self {
			k,
			hit_margin: config.node.hit_margin / k,
			label_font: format!("600 {}px sans-serif", label_font_size),
			show_labels: k >= config.node.label_hide_k,
			edge_line_width: config.edge.line_width / k,
			dash_pattern: config.edge.dash_pattern,
			dash_alpha: config.edge.dash_fade.apply(k),
			arrow_size: config.edge.arrow_clamp.apply(config.edge.arrow_size, k),
			focus_ring_width: config.focus_ring_width / k,
			radius_clamp: config.node.radius_clamp.clone(),
		}
	}

	/// Drawn radius for a node with the given layout radius.
	pub fn node_radius(&self, base_radius: f64) -> f64 {
		self.radius_clamp.apply(base_radius, self.k)
	}

	/// Dash offset for the flow animation; dashes travel source to target.
	pub fn dash_offset(&self, flow_time: f64, flow_speed: f64) -> f64 {
		-(flow_time * flow_speed)
	}
}
