//! coupling-graph-3d: Interactive 3D view of service coupling.
//!
//! This crate provides a WASM-based component that drives a `3d-force-graph`
//! scene: hover highlighting, hidden nodes, fly-to navigation on selection and
//! host notifications for selection and context menus.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::graph3d::{
	ForceGraph3dView, GraphConfig, GraphData, GraphEventListener, GraphLink, GraphNode,
	StyleFilters,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("coupling-graph-3d: logging initialized");
}

/// Page-level settings read from a script element with id="graph-config".
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageConfig {
	pub graph: GraphConfig,
	pub filters: StyleFilters,
	pub dark_mode: Option<bool>,
}

/// Parse the JSON text of the `<script>` element with the given id.
fn load_script_json<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("coupling-graph-3d: failed to parse #{}: {}", id, e);
			None
		}
	}
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Option<GraphData> {
	let data = load_script_json::<GraphData>("graph-data")?;
	info!(
		"coupling-graph-3d: loaded {} nodes, {} links",
		data.nodes.len(),
		data.links.len()
	);
	Some(data)
}

/// Main application component.
/// Loads graph data and settings from the DOM and renders the 3D view with a
/// search box driving the style filters.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let page = load_script_json::<PageConfig>("graph-config").unwrap_or_default();
	let (data, set_data) = signal(load_graph_data().unwrap_or_default());
	let (search, set_search) = signal(page.filters.search.clone());
	let base_filters = page.filters;
	let filters = Signal::derive(move || StyleFilters {
		search: search.get(),
		..base_filters.clone()
	});
	let dark_mode = page.dark_mode.unwrap_or(true);
	let theme_name = if dark_mode { "dark" } else { "light" };

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=theme_name />
		<Title text="Service Coupling Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ForceGraph3dView
				data=data
				set_data=set_data
				filters=filters
				dark_mode=dark_mode
				config=page.graph
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Service Coupling"</h1>
				<p class="subtitle">
					"Hover to trace dependencies. Click a service to fly to it. "
					"Right-click for options."
				</p>
				<input
					class="graph-search"
					type="search"
					placeholder="Search services"
					prop:value=search
					on:input=move |ev| set_search.set(event_target_value(&ev))
				/>
			</div>
		</div>
	}
}
