//! Canvas rendering for the force graph.
//!
//! Draws from the published position snapshot and the highlight view-state;
//! nothing here mutates the graph. Passes, back to front:
//! 1. Background and dot grid
//! 2. Edges (dashed flow lines with arrow heads), dimmed ones first
//! 3. Nodes, dimmed ones first, then labels and the search focus ring

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::layout::Point;
use super::scale::ScaledValues;
use super::state::ForceGraphState;
use super::theme::{Color, Theme};
use super::types::{GraphEdge, GraphNode};

/// Grid dots closer than this many screen pixels are not drawn.
const MIN_DOT_GAP_PX: f64 = 8.0;

/// Renders the complete graph to the canvas.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let scale = ScaledValues::new(&state.scale, state.transform.k);

	ctx.set_fill_style_str(&theme.background.color.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_dot_grid(state, ctx, theme);
	draw_edges(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();
}

fn draw_dot_grid(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let bg = &theme.background;
	if bg.dot_color.a <= 0.0 || bg.dot_spacing * state.transform.k < MIN_DOT_GAP_PX {
		return;
	}
	let top_left = state.transform.screen_to_graph(0.0, 0.0);
	let bottom_right = state.transform.screen_to_graph(state.width, state.height);
	let size = 1.0 / state.transform.k;

	ctx.set_fill_style_str(&bg.dot_color.to_css());
	let mut x = (top_left.x / bg.dot_spacing).floor() * bg.dot_spacing;
	while x <= bottom_right.x {
		let mut y = (top_left.y / bg.dot_spacing).floor() * bg.dot_spacing;
		while y <= bottom_right.y {
			ctx.fill_rect(x - size / 2.0, y - size / 2.0, size, size);
			y += bg.dot_spacing;
		}
		x += bg.dot_spacing;
	}
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let dash_offset = scale.dash_offset(state.flow_time, state.scale.edge.flow_speed);
	let edges = &state.visible().edges;

	// Dimmed edges underneath so focused ones stay readable where they cross.
	let (dimmed, lit): (Vec<&GraphEdge>, Vec<&GraphEdge>) = edges
		.iter()
		.partition(|e| state.highlight.edge_dim_level(&e.id) > 0.5);
	for edge in dimmed.into_iter().chain(lit) {
		draw_edge(state, ctx, scale, theme, edge, dash_offset);
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edge(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	edge: &GraphEdge,
	dash_offset: f64,
) {
	let (Some(from), Some(to)) = (state.position(&edge.source), state.position(&edge.target))
	else {
		return;
	};
	let (dx, dy) = (to.x - from.x, to.y - from.y);
	let dist = (dx * dx + dy * dy).sqrt();
	let r_from = scale.node_radius(state.radius(&edge.source));
	let r_to = scale.node_radius(state.radius(&edge.target));
	if dist <= r_from + r_to {
		return;
	}

	let dim = state.highlight.edge_dim_level(&edge.id);
	let color = theme
		.edge
		.color
		.lerp(theme.edge.dimmed_color.with_alpha(theme.edge.dimmed_alpha), dim);

	ctx.set_stroke_style_str(&color.to_css());
	// Compensate for dash pattern fading to solid
	ctx.set_line_width(scale.edge_line_width * (1.0 + 0.3 * (1.0 - scale.dash_alpha)));

	let effective_gap = scale.dash_pattern.1 * scale.dash_alpha;
	if effective_gap > 0.1 {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(scale.dash_pattern.0),
			&JsValue::from_f64(effective_gap),
		));
		ctx.set_line_dash_offset(dash_offset);
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	let (ux, uy) = (dx / dist, dy / dist);
	ctx.begin_path();
	ctx.move_to(from.x + ux * r_from, from.y + uy * r_from);
	ctx.line_to(
		to.x - ux * (r_to + scale.arrow_size),
		to.y - uy * (r_to + scale.arrow_size),
	);
	ctx.stroke();

	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.set_fill_style_str(&color.to_css());
	let (tip_x, tip_y) = (to.x - ux * r_to, to.y - uy * r_to);
	let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
	let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);

	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let nodes = &state.visible().nodes;
	let (dimmed, lit): (Vec<&GraphNode>, Vec<&GraphNode>) = nodes
		.iter()
		.partition(|n| state.highlight.node_dim_level(&n.id) > 0.5);

	for node in dimmed.iter().chain(&lit) {
		if let Some(p) = state.position(&node.id) {
			draw_node(state, ctx, scale, theme, node, p);
		}
	}

	let hovered = state.highlight.hovered();
	for node in dimmed.iter().chain(&lit) {
		let highlighted = hovered.is_some() && !state.highlight.is_node_dimmed(&node.id);
		if !scale.show_labels && !highlighted {
			continue;
		}
		if let Some(p) = state.position(&node.id) {
			draw_label(state, ctx, scale, theme, node, p);
		}
	}

	if let Some(id) = state.focused() {
		if let Some(p) = state.position(id) {
			let radius = scale.node_radius(state.radius(id)) + scale.focus_ring_width * 2.0;
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&theme.node.focus_ring_color.to_css());
			ctx.set_line_width(scale.focus_ring_width);
			ctx.stroke();
		}
	}
}

fn node_alpha(state: &ForceGraphState, theme: &Theme, id: &str) -> f64 {
	let dim = state.highlight.node_dim_level(id);
	1.0 - (1.0 - theme.node.dimmed_alpha) * dim
}

fn draw_node(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	node: &GraphNode,
	p: Point,
) {
	let radius = scale.node_radius(state.radius(&node.id));
	let color = theme.node_color(node.color.as_deref());

	ctx.set_global_alpha(node_alpha(state, theme, &node.id));

	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&color.to_css());
	ctx.fill();

	if theme.node.border_width > 0.0 {
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width / scale.k);
		ctx.stroke();
	}

	ctx.set_global_alpha(1.0);
}

/// Label centered above the node, on a faint backdrop of the node color.
fn draw_label(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	node: &GraphNode,
	p: Point,
) {
	let radius = scale.node_radius(state.radius(&node.id));
	let color = theme.node_color(node.color.as_deref());
	let pad = 3.0 / scale.k;

	ctx.set_font(&scale.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("bottom");
	let width = ctx
		.measure_text(&node.label)
		.map(|m| m.width())
		.unwrap_or_default();
	let (x, y) = (p.x, p.y - radius - pad * 2.0);
	let height = 14.0 / scale.k.max(0.5);

	ctx.set_global_alpha(node_alpha(state, theme, &node.id));
	ctx.set_fill_style_str(&color.with_alpha(theme.node.label_backdrop_alpha).to_css());
	ctx.fill_rect(x - width / 2.0 - pad, y - height - pad, width + pad * 2.0, height + pad * 2.0);
	ctx.set_fill_style_str(&darken_for_text(color).to_css());
	let _ = ctx.fill_text(&node.label, x, y);
	ctx.set_global_alpha(1.0);
}

/// Pulls light category colors towards black so labels stay legible.
fn darken_for_text(color: Color) -> Color {
	color.lerp(Color::rgb(0, 0, 0), 0.35)
}
