//! Per-element callbacks and input handlers handed to the render engine.
//!
//! [`GraphBinding`] is the single object the engine talks to. Style callbacks
//! only read state (apart from the default-color cache); input handlers
//! replace highlight state, pin dragged nodes, move the camera and notify the
//! host. Any engine failure inside a handler is logged and swallowed so the
//! renderer never sees an error.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, info, warn};

use super::camera::{self, InitialCamera};
use super::config::{GraphConfig, StyleFilters};
use super::curvature::ReciprocalIndex;
use super::engine::RenderEngine;
use super::events::{ContextMenuRequest, EventBridge, GraphDataSetter};
use super::state::{HighlightState, HighlightStore};
use super::style::{StyleOracle, StyleResolver};
use super::types::{GraphData, GraphNode, Vec3};
use super::visibility::VisibilityFilter;

/// Property the engine uses to identify nodes.
pub const NODE_ID_KEY: &str = "nodeName";

/// Interaction state plus the callbacks that expose it to the engine.
pub struct GraphBinding {
	config: GraphConfig,
	data: RefCell<GraphData>,
	reciprocal: RefCell<ReciprocalIndex>,
	filters: RefCell<StyleFilters>,
	highlight: HighlightStore,
	visibility: VisibilityFilter,
	styles: RefCell<StyleResolver>,
	events: EventBridge,
	set_graph_data: GraphDataSetter,
}

impl GraphBinding {
	pub fn new(
		config: GraphConfig,
		oracle: Rc<dyn StyleOracle>,
		events: EventBridge,
		set_graph_data: GraphDataSetter,
	) -> Self {
		Self {
			config,
			data: RefCell::new(GraphData::default()),
			reciprocal: RefCell::new(ReciprocalIndex::default()),
			filters: RefCell::new(StyleFilters::default()),
			highlight: HighlightStore::new(),
			visibility: VisibilityFilter::new(),
			styles: RefCell::new(StyleResolver::new(oracle)),
			events,
			set_graph_data,
		}
	}

	/// Share an existing hidden-node set instead of starting empty.
	pub fn with_visibility(mut self, visibility: VisibilityFilter) -> Self {
		self.visibility = visibility;
		self
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	/// Snapshot of the graph data as last seen by the binding.
	pub fn graph_data(&self) -> GraphData {
		self.data.borrow().clone()
	}

	/// Take new graph data from the host, carrying over the positions the
	/// engine already simulated for nodes that are still present.
	///
	/// Returns the merged data to hand back to the engine.
	pub fn update_graph_data(
		&self,
		engine: Option<&dyn RenderEngine>,
		mut data: GraphData,
	) -> GraphData {
		if let Some(engine) = engine {
			match engine.node_layout() {
				Ok(layout) => data.adopt_layout(&layout),
				Err(e) => warn!("could not read node layout: {}", e),
			}
		}
		self.set_graph_data(data.clone());
		data
	}

	/// Replace the graph data and rebuild derived indexes.
	///
	/// Highlight state refers to elements by name, so it is reset.
	pub fn set_graph_data(&self, data: GraphData) {
		debug!(
			"binding graph data: {} nodes, {} links",
			data.nodes.len(),
			data.links.len()
		);
		*self.reciprocal.borrow_mut() = ReciprocalIndex::build(&data.links);
		*self.data.borrow_mut() = data;
		self.highlight.clear();
	}

	pub fn set_filters(&self, filters: StyleFilters) {
		*self.filters.borrow_mut() = filters;
	}

	/// Switch styling policy. Default colors are reassigned by the new policy.
	pub fn set_oracle(&self, oracle: Rc<dyn StyleOracle>) {
		*self.styles.borrow_mut() = StyleResolver::new(oracle);
	}

	pub fn highlight(&self) -> Rc<HighlightState> {
		self.highlight.get()
	}

	/// Handle to the hidden-node set.
	pub fn visibility(&self) -> VisibilityFilter {
		self.visibility.clone()
	}

	/// Report the initial camera pose, tune the layout forces and start
	/// refreshing the engine on every state change.
	///
	/// Returns `None` and does nothing when the engine is not mounted yet.
	pub fn mount(&self, engine: Option<Rc<dyn RenderEngine>>) -> Option<InitialCamera> {
		let Some(engine) = engine else {
			debug!("render engine not ready, deferring mount");
			return None;
		};

		let initial = match camera::capture_initial(&*engine) {
			Ok(initial) => {
				self.events.camera_initialized(&initial);
				Some(initial)
			}
			Err(e) => {
				warn!("could not read initial camera: {}", e);
				None
			}
		};

		if let Err(e) = engine.set_charge_strength(self.config.charge_strength) {
			warn!("could not set charge strength: {}", e);
		}
		if let Err(e) = engine.set_link_distance(self.config.link_distance) {
			warn!("could not set link distance: {}", e);
		}

		let weak: Weak<dyn RenderEngine> = Rc::downgrade(&engine);
		let refresh = move || {
			if let Some(engine) = weak.upgrade() {
				engine.refresh();
			}
		};
		self.highlight.subscribe(refresh.clone());
		self.visibility.subscribe(refresh);

		info!("graph interaction layer mounted");
		initial
	}

	// Per-element callbacks.

	pub fn node_visible(&self, node: &str) -> bool {
		self.visibility.is_visible(node)
	}

	/// Sphere color as CSS, with the search-driven opacity folded into alpha.
	pub fn node_color(&self, node: &str) -> Option<String> {
		let data = self.data.borrow();
		let filters = self.filters.borrow();
		let graph_node = data.node(node)?;
		let color = self
			.styles
			.borrow()
			.node_color(graph_node, &data, &filters, &self.highlight.get());
		let opacity = self.styles.borrow().node_opacity(graph_node, &filters.search);
		Some(color.with_alpha(color.a * opacity).to_css())
	}

	pub fn node_label_color(&self, node: &str) -> Option<String> {
		let data = self.data.borrow();
		let filters = self.filters.borrow();
		let graph_node = data.node(node)?;
		let color = self
			.styles
			.borrow()
			.sprite_color(graph_node, &data, &filters, &self.highlight.get());
		Some(color.to_css())
	}

	/// Tooltip markup for a node: its name, in the label color.
	pub fn node_label(&self, node: &str) -> Option<String> {
		let color = self.node_label_color(node)?;
		Some(format!(
			"<span style=\"color: {}\">{}</span>",
			color,
			escape_html(node)
		))
	}

	pub fn link_curvature(&self, link: &str) -> f64 {
		self.reciprocal
			.borrow()
			.curvature(link, self.config.reciprocal_curvature)
	}

	fn link_css(&self, link: &str, directional: bool) -> Option<String> {
		let data = self.data.borrow();
		let graph_link = data.link(link)?;
		let color = self.styles.borrow().link_color(
			graph_link,
			&self.filters.borrow(),
			&self.highlight.get(),
			directional,
		);
		Some(color.to_css())
	}

	pub fn link_color(&self, link: &str) -> Option<String> {
		self.link_css(link, false)
	}

	pub fn link_arrow_color(&self, link: &str) -> Option<String> {
		self.link_css(link, true)
	}

	pub fn link_width(&self, link: &str) -> Option<f64> {
		let data = self.data.borrow();
		let graph_link = data.link(link)?;
		Some(self.styles.borrow().link_width(graph_link, &self.filters.borrow().search))
	}

	pub fn link_particle_width(&self, link: &str) -> Option<f64> {
		self.link_width(link)
	}

	pub fn link_particles(&self, link: &str) -> u32 {
		self.styles
			.borrow()
			.particle_count(link, &self.highlight.get(), self.config.highlight_particles)
	}

	pub fn arrow_length(&self) -> f64 {
		self.config.arrow_length
	}

	pub fn arrow_rel_pos(&self) -> f64 {
		self.config.arrow_rel_pos
	}

	// Input handlers.

	pub fn on_node_hover(&self, node: Option<&str>) {
		let next = HighlightState::hover_node(node, &self.data.borrow().links);
		self.highlight.replace(next);
	}

	pub fn on_link_hover(&self, link: Option<&str>) {
		let next = {
			let data = self.data.borrow();
			let found = link.and_then(|id| data.link(id));
			if link.is_some() && found.is_none() {
				debug!("hovered link {:?} is not in the graph data", link);
			}
			HighlightState::hover_link(found)
		};
		self.highlight.replace(next);
	}

	/// Record the engine's latest coordinates for `node` and return the node.
	fn sync_node(&self, node: &str, position: Option<Vec3>) -> Option<GraphNode> {
		let mut data = self.data.borrow_mut();
		let graph_node = data.node_mut(node)?;
		if let Some(position) = position {
			graph_node.set_position(position);
		}
		Some(graph_node.clone())
	}

	/// Copy the engine's live coordinates for every node into the stored data.
	fn adopt_engine_layout(&self, engine: &dyn RenderEngine) {
		match engine.node_layout() {
			Ok(layout) => self.data.borrow_mut().adopt_layout(&layout),
			Err(e) => warn!("could not read node layout: {}", e),
		}
	}

	/// Fly to the clicked node and announce the selection.
	pub fn on_node_click(
		&self,
		engine: &dyn RenderEngine,
		node: Option<&str>,
		position: Option<Vec3>,
	) {
		let Some(name) = node else {
			return;
		};
		let Some(graph_node) = self.sync_node(name, position) else {
			warn!("clicked node {} is not in the graph data", name);
			return;
		};

		match graph_node.position() {
			Some(at) => {
				if let Err(e) = camera::navigate(engine, at, &self.config) {
					warn!("camera navigation failed: {}", e);
				}
			}
			None => debug!("node {} has no position yet, not moving the camera", name),
		}
		self.events.node_selected(&graph_node);
	}

	/// Ask the host to open a context menu for the right-clicked node.
	pub fn on_node_right_click(
		&self,
		engine: &dyn RenderEngine,
		node: Option<&str>,
		position: Option<Vec3>,
	) {
		let Some(name) = node else {
			return;
		};
		self.adopt_engine_layout(engine);
		let Some(graph_node) = self.sync_node(name, position) else {
			warn!("right-clicked node {} is not in the graph data", name);
			return;
		};
		let Some(at) = graph_node.position() else {
			debug!("node {} has no position yet, no context menu", name);
			return;
		};
		let coords = match engine.graph_to_screen(at) {
			Ok(coords) => coords,
			Err(e) => {
				warn!("could not project node {}: {}", name, e);
				return;
			}
		};

		self.events.context_menu_requested(&ContextMenuRequest {
			node: graph_node,
			coords,
			graph_data: self.graph_data(),
			visibility: self.visibility.clone(),
			set_graph_data: self.set_graph_data.clone(),
		});
	}

	/// Pin a dropped node where it was released.
	///
	/// Returns the pinned position so the caller can write it onto the
	/// engine's node as well.
	pub fn on_node_drag_end(&self, node: &str, position: Option<Vec3>) -> Option<Vec3> {
		let at = position?;
		let mut data = self.data.borrow_mut();
		if let Some(graph_node) = data.node_mut(node) {
			graph_node.set_position(at);
			graph_node.pin(at);
		}
		Some(at)
	}
}

fn escape_html(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			c => out.push(c),
		}
	}
	out
}
