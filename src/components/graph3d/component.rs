//! Leptos component hosting the 3D force graph.
//!
//! The component creates a container element, mounts a `3d-force-graph`
//! instance into it once the element exists, and wires the engine's callbacks
//! to a shared [`GraphBinding`]. Reactive inputs (graph data, style filters,
//! dark mode) are pushed into the binding by effects; the engine is refreshed
//! by the binding's own subscriptions whenever highlight or visibility change.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, Window};

use super::binding::GraphBinding;
use super::config::{GraphConfig, StyleFilters};
use super::engine::RenderEngine;
use super::events::{DocumentEventListener, EventBridge, GraphDataSetter, GraphEventListener};
use super::js::{self, JsEngine};
use super::theme::{Theme, ThemeOracle};
use super::types::GraphData;
use super::visibility::VisibilityFilter;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Renders an interactive 3D force-directed graph.
///
/// Pass graph data via the reactive `data` signal. Supplying `set_data` lets a
/// context menu remove or restore nodes; `listener` receives selection and
/// context-menu events in addition to the `nodeClick` / `nodecontextmenu`
/// document events emitted when `dom_events` is set. The component sizes
/// itself to its parent container unless `fullscreen` or an explicit
/// `width`/`height` is given.
#[component]
pub fn ForceGraph3dView(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into, default = StyleFilters::default().into())] filters: Signal<StyleFilters>,
	#[prop(into, default = true.into())] dark_mode: Signal<bool>,
	#[prop(default = GraphConfig::default())] config: GraphConfig,
	#[prop(optional)] set_data: Option<WriteSignal<GraphData>>,
	#[prop(optional)] listener: Option<Rc<dyn GraphEventListener>>,
	#[prop(optional)] visibility: Option<VisibilityFilter>,
	#[prop(default = true)] dom_events: bool,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();

	let set_graph_data: GraphDataSetter = match set_data {
		Some(setter) => Rc::new(move |next| setter.set(next)),
		None => Rc::new(|_| warn!("no graph data setter provided, ignoring update")),
	};
	let mut events = EventBridge::new();
	if dom_events {
		events.subscribe(Rc::new(DocumentEventListener));
	}
	if let Some(listener) = listener {
		events.subscribe(listener);
	}

	let oracle = Rc::new(ThemeOracle::new(Theme::for_dark_mode(dark_mode.get_untracked())));
	let binding = Rc::new(
		GraphBinding::new(config, oracle, events, set_graph_data)
			.with_visibility(visibility.unwrap_or_default()),
	);
	let engine: Rc<RefCell<Option<Rc<JsEngine>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let (binding_init, engine_init) = (binding.clone(), engine.clone());
	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		if engine_init.borrow().is_some() {
			return;
		}
		let container: HtmlElement = container.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					container
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					container
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};

		let mounted = match JsEngine::mount(&container, w, h) {
			Ok(mounted) => Rc::new(mounted),
			Err(e) => {
				warn!("could not create 3d-force-graph: {}", e);
				return;
			}
		};
		js::attach(&mounted, &binding_init);
		if let Err(e) = mounted.load(&binding_init.graph_data()) {
			warn!("could not load graph data: {}", e);
		}
		binding_init.mount(Some(mounted.clone() as Rc<dyn RenderEngine>));

		if fullscreen {
			let engine_resize = Rc::downgrade(&mounted);
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				if let Some(engine) = engine_resize.upgrade() {
					engine.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ = window
					.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		*engine_init.borrow_mut() = Some(mounted);
	});

	let (binding_data, engine_data) = (binding.clone(), engine.clone());
	Effect::new(move |_| {
		let next = data.get();
		let engine = engine_data.borrow().clone();
		let live = engine.as_deref().map(|e| e as &dyn RenderEngine);
		let merged = binding_data.update_graph_data(live, next);
		if let Some(engine) = engine {
			if let Err(e) = engine.load(&merged) {
				warn!("could not load graph data: {}", e);
			}
		}
	});

	let (binding_filters, engine_filters) = (binding.clone(), engine.clone());
	Effect::new(move |_| {
		binding_filters.set_filters(filters.get());
		if let Some(engine) = engine_filters.borrow().as_ref() {
			engine.refresh();
		}
	});

	let (binding_theme, engine_theme) = (binding.clone(), engine.clone());
	Effect::new(move |prev: Option<bool>| {
		let dark = dark_mode.get();
		if prev.is_some_and(|was| was != dark) {
			binding_theme.set_oracle(Rc::new(ThemeOracle::new(Theme::for_dark_mode(dark))));
			if let Some(engine) = engine_theme.borrow().as_ref() {
				engine.refresh();
			}
		}
		dark
	});

	view! {
		<div
			node_ref=container_ref
			class="force-graph-3d"
			on:contextmenu=|ev| ev.prevent_default()
		/>
	}
}
