//! Visual theming for the graph.
//!
//! Provides colors, the node palette and a palette-driven [`ThemeOracle`]
//! that implements the default styling policy.

use super::config::ColorMode;
use super::style::{LinkStyleContext, StyleContext, StyleOracle, matches_search};
use super::types::{GraphLink, GraphNode};

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

	pub fn with_alpha(self, a: f64) -> Self {
		Self {
			a: a.clamp(0.0, 1.0),
			..self
		}
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
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

/// A curated color palette for nodes.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Muted, harmonious palette - slate blues and teals (default)
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(129, 161, 193), // Light steel
				Color::rgb(100, 148, 160), // Teal gray
				Color::rgb(136, 160, 175), // Cadet blue
				Color::rgb(108, 142, 173), // Air force blue
				Color::rgb(119, 158, 165), // Desaturated cyan
				Color::rgb(143, 163, 180), // Cool gray
				Color::rgb(122, 153, 168), // Dusty blue
			],
		}
	}

	/// Deeper tones that stay readable on a light background
	pub fn ink() -> Self {
		Self {
			colors: vec![
				Color::rgb(44, 82, 130),  // Navy
				Color::rgb(38, 110, 120), // Deep teal
				Color::rgb(92, 70, 140),  // Indigo
				Color::rgb(60, 100, 70),  // Forest
				Color::rgb(120, 80, 50),  // Walnut
				Color::rgb(70, 90, 110),  // Slate
				Color::rgb(110, 60, 100), // Plum
				Color::rgb(50, 95, 100),  // Pine
			],
		}
	}

	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub palette: NodePalette,
	/// Base link stroke.
	pub link: Color,
	/// Node label text.
	pub label: Color,
	/// Nodes the host is tracking.
	pub accent: Color,
	/// Classified nodes and links (high coupling, anti-patterns).
	pub alert: Color,
}

impl Theme {
	/// Theme for dark backgrounds (default)
	pub fn dark() -> Self {
		Self {
			name: "dark",
			palette: NodePalette::slate(),
			link: Color::rgba(140, 160, 180, 0.5),
			label: Color::rgb(230, 234, 240),
			accent: Color::rgb(236, 178, 46),
			alert: Color::rgb(214, 69, 65),
		}
	}

	/// Theme for light backgrounds
	pub fn light() -> Self {
		Self {
			name: "light",
			palette: NodePalette::ink(),
			link: Color::rgba(70, 80, 95, 0.5),
			label: Color::rgb(30, 34, 40),
			accent: Color::rgb(196, 130, 10),
			alert: Color::rgb(190, 40, 40),
		}
	}

	pub fn for_dark_mode(dark: bool) -> Self {
		if dark { Self::dark() } else { Self::light() }
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::dark()
	}
}

fn classified(labels: &[String], selected: Option<&str>) -> bool {
	match selected {
		Some(wanted) => labels.iter().any(|l| l == wanted),
		None => !labels.is_empty(),
	}
}

/// Palette-driven styling policy.
///
/// - tracked nodes take the accent color
/// - in coupling mode, nodes at or above the threshold take the alert color
/// - in anti-pattern mode, labeled nodes take the alert color
/// - everything else keeps its stable palette color
/// - while something is hovered, the hovered node brightens and nodes outside
///   the highlight dim
#[derive(Clone, Debug, Default)]
pub struct ThemeOracle {
	pub theme: Theme,
}

impl ThemeOracle {
	pub fn new(theme: Theme) -> Self {
		Self { theme }
	}

	fn base_color(&self, node: &GraphNode, ctx: &StyleContext<'_>) -> Color {
		let filters = ctx.filters;
		if filters.tracked_nodes.contains(&node.node_name) {
			return self.theme.accent;
		}
		match filters.color_mode {
			ColorMode::Coupling
				if filters.high_coupling && node.coupling.is_some_and(|c| c >= filters.threshold) =>
			{
				self.theme.alert
			}
			ColorMode::AntiPattern
				if filters.anti_pattern
					&& classified(&node.anti_patterns, filters.selected_anti_pattern.as_deref()) =>
			{
				self.theme.alert
			}
			_ => ctx.default_color,
		}
	}
}

impl StyleOracle for ThemeOracle {
	fn assign_default_color(&self, _node: &GraphNode, ordinal: usize) -> Color {
		self.theme.palette.get(ordinal)
	}

	fn node_color(&self, node: &GraphNode, ctx: &StyleContext<'_>) -> Color {
		let base = self.base_color(node, ctx);
		if ctx.highlight.hovered_node() == Some(node.node_name.as_str()) {
			base.lighten(0.35)
		} else if !ctx.highlight.is_empty() && !ctx.highlight.is_node_highlighted(&node.node_name) {
			base.darken(0.55)
		} else {
			base
		}
	}

	fn sprite_color(&self, node: &GraphNode, ctx: &StyleContext<'_>) -> Color {
		if !matches_search(&node.node_name, &ctx.filters.search) {
			self.theme.label.with_alpha(0.2)
		} else if !ctx.highlight.is_empty() && !ctx.highlight.is_node_highlighted(&node.node_name) {
			self.theme.label.with_alpha(0.35)
		} else {
			self.theme.label
		}
	}

	fn node_opacity(&self, node: &GraphNode, search: &str) -> f64 {
		if matches_search(&node.node_name, search) { 0.95 } else { 0.15 }
	}

	fn link_color(&self, link: &GraphLink, ctx: &LinkStyleContext<'_>) -> Color {
		let flagged =
			ctx.anti_pattern && classified(&link.anti_patterns, ctx.selected_anti_pattern);
		let mut color = if flagged {
			self.theme.alert.with_alpha(self.theme.link.a)
		} else {
			self.theme.link
		};

		if let Some(hovered) = ctx.hovered_node {
			color = if link.touches(hovered) {
				color.lighten(0.3).with_alpha(1.0)
			} else {
				color.with_alpha(color.a * 0.3)
			};
		}

		if !ctx.search.is_empty()
			&& !matches_search(&link.source, ctx.search)
			&& !matches_search(&link.target, ctx.search)
		{
			color = color.with_alpha(0.08);
		}

		if ctx.directional {
			color.with_alpha(color.a * 1.5)
		} else {
			color
		}
	}

	fn link_width(&self, link: &GraphLink, search: &str) -> f64 {
		let touches_match =
			matches_search(&link.source, search) || matches_search(&link.target, search);
		if !search.is_empty() && touches_match {
			2.0
		} else {
			1.0
		}
	}
}
