//! Bridge between interaction state and the styling policy.
//!
//! The policy itself ([`StyleOracle`]) decides colors, opacities and widths
//! from semantic properties. The [`StyleResolver`] gathers the context it
//! needs on every render and owns the one piece of state the policy would
//! otherwise have to mutate: the per-node default color assignment.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::config::StyleFilters;
use super::state::HighlightState;
use super::theme::Color;
use super::types::{GraphData, GraphLink, GraphNode};

/// Case-insensitive substring match. An empty search matches everything.
pub fn matches_search(name: &str, search: &str) -> bool {
	search.is_empty() || name.to_lowercase().contains(&search.to_lowercase())
}

/// Inputs for node styling.
pub struct StyleContext<'a> {
	pub graph: &'a GraphData,
	pub filters: &'a StyleFilters,
	pub highlight: &'a HighlightState,
	/// The node's stable palette color.
	pub default_color: Color,
}

/// Inputs for link styling.
pub struct LinkStyleContext<'a> {
	pub search: &'a str,
	pub hovered_node: Option<&'a str>,
	pub anti_pattern: bool,
	/// True when styling the arrow head rather than the stroke.
	pub directional: bool,
	pub selected_anti_pattern: Option<&'a str>,
}

/// Styling policy. Implementations must be pure given identical inputs.
pub trait StyleOracle {
	/// Pick a default color for a node seen for the first time. `ordinal`
	/// counts the nodes assigned before it.
	fn assign_default_color(&self, node: &GraphNode, ordinal: usize) -> Color;

	fn node_color(&self, node: &GraphNode, ctx: &StyleContext<'_>) -> Color;

	/// Color of the node's text label.
	fn sprite_color(&self, node: &GraphNode, ctx: &StyleContext<'_>) -> Color;

	/// Sphere opacity, driven by the search match alone.
	fn node_opacity(&self, node: &GraphNode, search: &str) -> f64;

	fn link_color(&self, link: &GraphLink, ctx: &LinkStyleContext<'_>) -> Color;

	/// Stroke width, also used for directional particles.
	fn link_width(&self, link: &GraphLink, search: &str) -> f64;
}

/// Default color assigned to each node, fixed on first use.
#[derive(Debug, Default)]
pub struct DefaultColorCache {
	colors: RefCell<HashMap<String, Color>>,
}

impl DefaultColorCache {
	pub fn get(&self, node: &str) -> Option<Color> {
		self.colors.borrow().get(node).copied()
	}

	/// Return the cached color, or store the one `assign` produces.
	pub fn get_or_assign(&self, node: &str, assign: impl FnOnce(usize) -> Color) -> Color {
		if let Some(color) = self.get(node) {
			return color;
		}
		let mut colors = self.colors.borrow_mut();
		let color = assign(colors.len());
		colors.insert(node.to_string(), color);
		color
	}

	pub fn len(&self) -> usize {
		self.colors.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Resolves per-element visual attributes for the current render.
pub struct StyleResolver {
	oracle: Rc<dyn StyleOracle>,
	default_colors: DefaultColorCache,
}

impl StyleResolver {
	pub fn new(oracle: Rc<dyn StyleOracle>) -> Self {
		Self {
			oracle,
			default_colors: DefaultColorCache::default(),
		}
	}

	pub fn default_color(&self, node: &GraphNode) -> Color {
		self.default_colors.get_or_assign(&node.node_name, |ordinal| {
			self.oracle.assign_default_color(node, ordinal)
		})
	}

	fn context<'a>(
		&self,
		node: &GraphNode,
		graph: &'a GraphData,
		filters: &'a StyleFilters,
		highlight: &'a HighlightState,
	) -> StyleContext<'a> {
		StyleContext {
			graph,
			filters,
			highlight,
			default_color: self.default_color(node),
		}
	}

	pub fn node_color(
		&self,
		node: &GraphNode,
		graph: &GraphData,
		filters: &StyleFilters,
		highlight: &HighlightState,
	) -> Color {
		let ctx = self.context(node, graph, filters, highlight);
		self.oracle.node_color(node, &ctx)
	}

	pub fn sprite_color(
		&self,
		node: &GraphNode,
		graph: &GraphData,
		filters: &StyleFilters,
		highlight: &HighlightState,
	) -> Color {
		let ctx = self.context(node, graph, filters, highlight);
		self.oracle.sprite_color(node, &ctx)
	}

	pub fn node_opacity(&self, node: &GraphNode, search: &str) -> f64 {
		self.oracle.node_opacity(node, search)
	}

	pub fn link_color(
		&self,
		link: &GraphLink,
		filters: &StyleFilters,
		highlight: &HighlightState,
		directional: bool,
	) -> Color {
		self.oracle.link_color(
			link,
			&LinkStyleContext {
				search: &filters.search,
				hovered_node: highlight.hovered_node(),
				anti_pattern: filters.anti_pattern,
				directional,
				selected_anti_pattern: filters.selected_anti_pattern.as_deref(),
			},
		)
	}

	pub fn link_width(&self, link: &GraphLink, search: &str) -> f64 {
		self.oracle.link_width(link, search)
	}

	/// Particles flowing along `link`. Decided locally, not by the oracle.
	pub fn particle_count(&self, link: &str, highlight: &HighlightState, particles: u32) -> u32 {
		if highlight.is_link_highlighted(link) { particles } else { 0 }
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::super::theme::{Theme, ThemeOracle};
	use super::*;

	/// Oracle that hands out a fresh color on every assignment request.
	struct CountingOracle {
		assigned: Cell<u8>,
	}

	impl StyleOracle for CountingOracle {
		fn assign_default_color(&self, _node: &GraphNode, _ordinal: usize) -> Color {
			let n = self.assigned.get();
			self.assigned.set(n + 1);
			Color::rgb(n, n, n)
		}

		fn node_color(&self, _node: &GraphNode, ctx: &StyleContext<'_>) -> Color {
			ctx.default_color
		}

		fn sprite_color(&self, _node: &GraphNode, ctx: &StyleContext<'_>) -> Color {
			ctx.default_color
		}

		fn node_opacity(&self, _node: &GraphNode, _search: &str) -> f64 {
			1.0
		}

		fn link_color(&self, _link: &GraphLink, ctx: &LinkStyleContext<'_>) -> Color {
			if ctx.directional { Color::rgb(255, 0, 0) } else { Color::rgb(0, 0, 255) }
		}

		fn link_width(&self, _link: &GraphLink, _search: &str) -> f64 {
			1.0
		}
	}

	fn counting() -> (Rc<CountingOracle>, StyleResolver) {
		let oracle = Rc::new(CountingOracle { assigned: Cell::new(0) });
		(oracle.clone(), StyleResolver::new(oracle))
	}

	#[test]
	fn test_default_color_is_assigned_once() {
		let (oracle, resolver) = counting();
		let graph = GraphData::default();
		let filters = StyleFilters::default();
		let highlight = HighlightState::default();
		let node = GraphNode::new("a");

		let first = resolver.node_color(&node, &graph, &filters, &highlight);
		let second = resolver.node_color(&node, &graph, &filters, &highlight);
		let label = resolver.sprite_color(&node, &graph, &filters, &highlight);
		assert_eq!(first, second);
		assert_eq!(first, label);
		assert_eq!(oracle.assigned.get(), 1);
	}

	#[test]
	fn test_each_node_gets_its_own_assignment() {
		let (_, resolver) = counting();
		let a = resolver.default_color(&GraphNode::new("a"));
		let b = resolver.default_color(&GraphNode::new("b"));
		assert_ne!(a, b);
		assert_eq!(resolver.default_color(&GraphNode::new("a")), a);
	}

	#[test]
	fn test_cache_passes_ordinal() {
		let cache = DefaultColorCache::default();
		let c0 = cache.get_or_assign("x", |n| Color::rgb(n as u8, 0, 0));
		let c1 = cache.get_or_assign("y", |n| Color::rgb(n as u8, 0, 0));
		assert_eq!((c0.r, c1.r), (0, 1));
		assert_eq!(cache.len(), 2);
	}

	#[test]
	fn test_directional_flag_reaches_oracle() {
		let (_, resolver) = counting();
		let link = GraphLink::new("ab", "a", "b");
		let filters = StyleFilters::default();
		let highlight = HighlightState::default();
		assert_eq!(resolver.link_color(&link, &filters, &highlight, true), Color::rgb(255, 0, 0));
		assert_eq!(resolver.link_color(&link, &filters, &highlight, false), Color::rgb(0, 0, 255));
	}

	#[test]
	fn test_particles_follow_highlighted_links() {
		let (_, resolver) = counting();
		let link = GraphLink::new("ab", "a", "b");
		let hovered = HighlightState::hover_link(Some(&link));
		assert_eq!(resolver.particle_count("ab", &hovered, 2), 2);
		assert_eq!(resolver.particle_count("cd", &hovered, 2), 0);
		assert_eq!(resolver.particle_count("ab", &HighlightState::default(), 2), 0);
	}

	#[test]
	fn test_search_matching() {
		assert!(matches_search("OrderService", ""));
		assert!(matches_search("OrderService", "order"));
		assert!(!matches_search("OrderService", "billing"));
	}

	#[test]
	fn test_theme_oracle_dims_outside_highlight() {
		let resolver = StyleResolver::new(Rc::new(ThemeOracle::new(Theme::dark())));
		let graph = GraphData {
			nodes: vec![GraphNode::new("a"), GraphNode::new("b"), GraphNode::new("c")],
			links: vec![GraphLink::new("ab", "a", "b")],
		};
		let filters = StyleFilters::default();
		let idle = HighlightState::default();
		let hovered = HighlightState::hover_node(Some("a"), &graph.links);

		let c = &graph.nodes[2];
		let idle_c = resolver.node_color(c, &graph, &filters, &idle);
		let dimmed_c = resolver.node_color(c, &graph, &filters, &hovered);
		assert!(dimmed_c.r < idle_c.r);

		let b = &graph.nodes[1];
		assert_eq!(
			resolver.node_color(b, &graph, &filters, &hovered),
			resolver.node_color(b, &graph, &filters, &idle)
		);
	}

	#[test]
	fn test_theme_oracle_marks_tracked_and_coupled_nodes() {
		let theme = Theme::dark();
		let resolver = StyleResolver::new(Rc::new(ThemeOracle::new(theme.clone())));
		let graph = GraphData::default();
		let highlight = HighlightState::default();

		let mut coupled = GraphNode::new("hub");
		coupled.coupling = Some(0.9);
		let filters = StyleFilters {
			threshold: 0.5,
			high_coupling: true,
			color_mode: super::super::config::ColorMode::Coupling,
			tracked_nodes: ["watched".to_string()].into(),
			..StyleFilters::default()
		};

		assert_eq!(resolver.node_color(&coupled, &graph, &filters, &highlight), theme.alert);
		assert_eq!(
			resolver.node_color(&GraphNode::new("watched"), &graph, &filters, &highlight),
			theme.accent
		);
	}
}
