//! Pan/zoom transform between graph space and canvas pixels.

use super::layout::{Bounds, Point};

/// Viewport behavior knobs.
#[derive(Clone, Debug)]
pub struct ViewportConfig {
	/// Fraction of the canvas left empty around fitted content.
	pub fit_padding: f64,
	pub min_zoom: f64,
	pub max_zoom: f64,
	/// Zoom level a search selection animates to.
	pub focus_zoom: f64,
	/// Seconds a search selection takes to pan/zoom.
	pub focus_duration: f64,
	/// Pointer travel (pixels) below which a press-release counts as a click.
	pub click_slop: f64,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			fit_padding: 0.1,
			min_zoom: 0.1,
			max_zoom: 10.0,
			focus_zoom: 2.0,
			focus_duration: 1.0,
			click_slop: 4.0,
		}
	}
}

/// Pan and zoom transform applied to the entire graph view.
///
/// `screen = graph * k + (x, y)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Origin centered in a `width` x `height` canvas at 100%.
	pub fn centered(width: f64, height: f64) -> Self {
		Self {
			x: width / 2.0,
			y: height / 2.0,
			k: 1.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, p: Point) -> (f64, f64) {
		(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Transform placing `center` in the middle of the canvas at zoom `k`.
	pub fn looking_at(center: Point, k: f64, width: f64, height: f64) -> Self {
		Self {
			x: width / 2.0 - center.x * k,
			y: height / 2.0 - center.y * k,
			k,
		}
	}

	/// Transform showing all of `bounds` with padding.
	pub fn fit(bounds: Bounds, width: f64, height: f64, config: &ViewportConfig) -> Self {
		let usable = 1.0 - config.fit_padding.clamp(0.0, 0.9);
		let (bw, bh) = (bounds.width().max(1.0), bounds.height().max(1.0));
		let k = ((width * usable) / bw)
			.min((height * usable) / bh)
			.clamp(config.min_zoom, config.max_zoom);
		Self::looking_at(bounds.center(), k, width, height)
	}

	/// Zoom by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_about(&mut self, sx: f64, sy: f64, factor: f64, config: &ViewportConfig) {
		let new_k = (self.k * factor).clamp(config.min_zoom, config.max_zoom);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	fn lerp(self, to: Self, t: f64) -> Self {
		Self {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// An in-progress animated move between two transforms.
#[derive(Clone, Debug)]
pub struct ViewTransition {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
	duration: f64,
}

impl ViewTransition {
	pub fn new(from: ViewTransform, to: ViewTransform, duration: f64) -> Self {
		Self {
			from,
			to,
			elapsed: 0.0,
			duration: duration.max(0.0),
		}
	}

	pub fn target(&self) -> ViewTransform {
		self.to
	}

	/// Advance by `dt` seconds; returns the eased transform and whether the move is finished.
	pub fn advance(&mut self, dt: f64) -> (ViewTransform, bool) {
		self.elapsed += dt;
		if self.duration <= 0.0 || self.elapsed >= self.duration {
			return (self.to, true);
		}
		let t = smooth_step(self.elapsed / self.duration);
		(self.from.lerp(self.to, t), false)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_graph_round_trip() {
		let t = ViewTransform { x: 120.0, y: -40.0, k: 2.5 };
		let p = t.screen_to_graph(300.0, 200.0);
		let (sx, sy) = t.graph_to_screen(p);
		assert!((sx - 300.0).abs() < 1e-9 && (sy - 200.0).abs() < 1e-9);
	}

	#[test]
	fn fit_centers_and_pads_bounds() {
		let bounds = Bounds { min: Point::new(-100.0, -50.0), max: Point::new(300.0, 150.0) };
		let t = ViewTransform::fit(bounds, 800.0, 600.0, &ViewportConfig::default());
		assert!((t.k - 1.8).abs() < 1e-9);
		let (cx, cy) = t.graph_to_screen(bounds.center());
		assert!((cx - 400.0).abs() < 1e-9 && (cy - 300.0).abs() < 1e-9);
	}

	#[test]
	fn fit_of_a_point_is_clamped() {
		let bounds = Bounds { min: Point::ORIGIN, max: Point::ORIGIN };
		let t = ViewTransform::fit(bounds, 800.0, 600.0, &ViewportConfig::default());
		assert_eq!(t.k, 10.0);
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let config = ViewportConfig::default();
		let mut t = ViewTransform::centered(800.0, 600.0);
		let before = t.screen_to_graph(100.0, 50.0);
		t.zoom_about(100.0, 50.0, 1.1, &config);
		let after = t.screen_to_graph(100.0, 50.0);
		assert!(before.distance(after) < 1e-9);
		for _ in 0..200 {
			t.zoom_about(0.0, 0.0, 0.9, &config);
		}
		assert_eq!(t.k, config.min_zoom);
	}

	#[test]
	fn transition_eases_to_target() {
		let from = ViewTransform::centered(800.0, 600.0);
		let to = ViewTransform::looking_at(Point::new(50.0, 50.0), 2.0, 800.0, 600.0);
		let mut tr = ViewTransition::new(from, to, 1.0);
		let (mid, done) = tr.advance(0.5);
		assert!(!done);
		assert!((mid.k - 1.5).abs() < 1e-9);
		let (end, done) = tr.advance(0.6);
		assert!(done);
		assert_eq!(end, to);
	}
}
