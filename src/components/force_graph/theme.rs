//! Colors for the force graph.

use super::filter::DEFAULT_CATEGORY_COLOR;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Parse `#rrggbb` or `#rgb`. Anything else is `None`.
	pub fn from_hex(hex: &str) -> Option<Self> {
		let digits = hex.strip_prefix('#')?;
		let channel = |s: &str| u8::from_str_radix(s, 16).ok();
		match digits.len() {
			6 => Some(Self::rgb(
				channel(digits.get(0..2)?)?,
				channel(digits.get(2..4)?)?,
				channel(digits.get(4..6)?)?,
			)),
			3 => {
				let short = |i: usize| channel(digits.get(i..i + 1)?).map(|v| v * 17);
				Some(Self::rgb(short(0)?, short(1)?, short(2)?))
			}
			_ => None,
		}
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Linear interpolation between two colors.
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
		Self {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Background style.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Dot grid color; alpha 0 disables the grid.
	pub dot_color: Color,
	/// Grid spacing in world units.
	pub dot_spacing: f64,
}

/// Edge style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	/// Color of edges outside the hovered neighborhood.
	pub dimmed_color: Color,
	/// Opacity of edges outside the hovered neighborhood.
	pub dimmed_alpha: f64,
}

/// Node style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Fill for nodes without a category color.
	pub default_color: Color,
	pub border_color: Color,
	/// Border width in screen pixels.
	pub border_width: f64,
	/// Opacity of nodes outside the hovered neighborhood.
	pub dimmed_alpha: f64,
	/// Label background is the node color at this alpha.
	pub label_backdrop_alpha: f64,
	pub focus_ring_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
}

impl Theme {
	/// Light theme matching the knowledge-base pages.
	pub fn light() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(255, 255, 255),
				dot_color: Color::rgba(145, 145, 154, 0.6),
				dot_spacing: 20.0,
			},
			edge: EdgeStyle {
				color: Color::rgb(136, 136, 136),
				dimmed_color: Color::rgb(229, 231, 235),
				dimmed_alpha: 0.1,
			},
			node: NodeStyle {
				default_color: Color::from_hex(DEFAULT_CATEGORY_COLOR).unwrap_or(Color::rgb(156, 163, 175)),
				border_color: Color::rgb(156, 163, 175),
				border_width: 1.0,
				dimmed_alpha: 0.25,
				label_backdrop_alpha: 0.125,
				focus_ring_color: Color::rgb(71, 85, 105),
			},
		}
	}

	/// Fill color of a node: its category color if it parses, else the default.
	pub fn node_color(&self, color: Option<&str>) -> Color {
		color
			.and_then(Color::from_hex)
			.unwrap_or(self.node.default_color)
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_hex_colors() {
		assert_eq!(Color::from_hex("#ff8000"), Some(Color::rgb(255, 128, 0)));
		assert_eq!(Color::from_hex("#fff"), Some(Color::rgb(255, 255, 255)));
		assert_eq!(Color::from_hex("ff8000"), None);
		assert_eq!(Color::from_hex("#zzzzzz"), None);
		assert_eq!(Color::from_hex("#ff80"), None);
	}

	#[test]
	fn unknown_colors_fall_back_to_gray() {
		let theme = Theme::default();
		assert_eq!(theme.node_color(None).to_css(), DEFAULT_CATEGORY_COLOR);
		assert_eq!(theme.node_color(Some("tomato")).to_css(), DEFAULT_CATEGORY_COLOR);
		assert_eq!(theme.node_color(Some("#123456")).to_css(), "#123456");
	}

	#[test]
	fn lerp_blends_channels_and_alpha() {
		let c = Color::rgb(0, 0, 0).lerp(Color::rgba(200, 100, 50, 0.0), 0.5);
		assert_eq!((c.r, c.g, c.b), (100, 50, 25));
		assert!((c.a - 0.5).abs() < 1e-9);
	}
}
