//! Host notifications.
//!
//! The graph never calls into the surrounding application directly. Outcomes
//! that the host may care about (a node was selected, a context menu was
//! requested, the camera pose is known) go through an [`EventBridge`] to
//! whatever [`GraphEventListener`]s were injected. Delivery is fire-and-forget:
//! listeners return nothing and the bridge never waits on them.

use std::rc::Rc;

use log::warn;
use serde::Serialize;
use wasm_bindgen::JsValue;
use web_sys::{CustomEvent, CustomEventInit};

use super::camera::InitialCamera;
use super::types::{GraphData, GraphNode, ScreenCoords};
use super::visibility::VisibilityFilter;

/// Replaces the graph data shown by the component.
pub type GraphDataSetter = Rc<dyn Fn(GraphData)>;

/// Everything a context menu needs to act on a right-clicked node.
#[derive(Clone)]
pub struct ContextMenuRequest {
	pub node: GraphNode,
	/// Where the node currently appears on screen.
	pub coords: ScreenCoords,
	pub graph_data: GraphData,
	/// Handle to hide or restore nodes.
	pub visibility: VisibilityFilter,
	/// Handle to remove or restore nodes from the data itself.
	pub set_graph_data: GraphDataSetter,
}

impl std::fmt::Debug for ContextMenuRequest {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ContextMenuRequest")
			.field("node", &self.node.node_name)
			.field("coords", &self.coords)
			.finish_non_exhaustive()
	}
}

/// Receives graph interaction outcomes.
pub trait GraphEventListener {
	/// A node was clicked.
	fn node_selected(&self, _node: &GraphNode) {}

	/// A node was right-clicked.
	fn context_menu_requested(&self, _request: &ContextMenuRequest) {}

	/// The engine reported its starting camera pose.
	fn camera_initialized(&self, _camera: &InitialCamera) {}
}

/// Fans interaction outcomes out to injected listeners.
#[derive(Clone, Default)]
pub struct EventBridge {
	listeners: Vec<Rc<dyn GraphEventListener>>,
}

impl EventBridge {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_listener(mut self, listener: Rc<dyn GraphEventListener>) -> Self {
		self.listeners.push(listener);
		self
	}

	pub fn subscribe(&mut self, listener: Rc<dyn GraphEventListener>) {
		self.listeners.push(listener);
	}

	pub fn node_selected(&self, node: &GraphNode) {
		for listener in &self.listeners {
			listener.node_selected(node);
		}
	}

	pub fn context_menu_requested(&self, request: &ContextMenuRequest) {
		for listener in &self.listeners {
			listener.context_menu_requested(request);
		}
	}

	pub fn camera_initialized(&self, camera: &InitialCamera) {
		for listener in &self.listeners {
			listener.camera_initialized(camera);
		}
	}
}

#[derive(Serialize)]
struct NodeClickDetail<'a> {
	node: &'a GraphNode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContextMenuDetail<'a> {
	node: &'a GraphNode,
	coords: ScreenCoords,
	graph_data: &'a GraphData,
}

/// Re-broadcasts outcomes as `CustomEvent`s on `document`.
///
/// Node clicks become `nodeClick` and right-clicks become `nodecontextmenu`,
/// with the payload as JSON in `event.detail`. The mutation handles of a
/// context menu request stay on the Rust side.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentEventListener;

impl DocumentEventListener {
	fn dispatch(name: &str, detail: &impl Serialize) {
		if let Err(e) = Self::try_dispatch(name, detail) {
			warn!("failed to dispatch `{}` event: {:?}", name, e);
		}
	}

	fn try_dispatch(name: &str, detail: &impl Serialize) -> Result<(), JsValue> {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| JsValue::from_str("no document"))?;
		let json = serde_json::to_string(detail).map_err(|e| JsValue::from_str(&e.to_string()))?;

		let init = CustomEventInit::new();
		init.set_detail(&js_sys::JSON::parse(&json)?);
		let event = CustomEvent::new_with_event_init_dict(name, &init)?;
		document.dispatch_event(&event)?;
		Ok(())
	}
}

impl GraphEventListener for DocumentEventListener {
	fn node_selected(&self, node: &GraphNode) {
		Self::dispatch("nodeClick", &NodeClickDetail { node });
	}

	fn context_menu_requested(&self, request: &ContextMenuRequest) {
		Self::dispatch(
			"nodecontextmenu",
			&ContextMenuDetail {
				node: &request.node,
				coords: request.coords,
				graph_data: &request.graph_data,
			},
		);
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use std::cell::RefCell;

	use super::*;

	/// Listener double that keeps every notification.
	#[derive(Default)]
	pub struct RecordingListener {
		pub selected: RefCell<Vec<String>>,
		pub menus: RefCell<Vec<ContextMenuRequest>>,
		pub cameras: RefCell<Vec<InitialCamera>>,
	}

	impl GraphEventListener for RecordingListener {
		fn node_selected(&self, node: &GraphNode) {
			self.selected.borrow_mut().push(node.node_name.clone());
		}

		fn context_menu_requested(&self, request: &ContextMenuRequest) {
			self.menus.borrow_mut().push(request.clone());
		}

		fn camera_initialized(&self, camera: &InitialCamera) {
			self.cameras.borrow_mut().push(*camera);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::testing::RecordingListener;
	use super::*;

	struct SelectionOnly;
	impl GraphEventListener for SelectionOnly {}

	#[test]
	fn test_bridge_fans_out_to_every_listener() {
		let first = Rc::new(RecordingListener::default());
		let second = Rc::new(RecordingListener::default());
		let bridge = EventBridge::new()
			.with_listener(first.clone())
			.with_listener(second.clone())
			.with_listener(Rc::new(SelectionOnly));

		bridge.node_selected(&GraphNode::new("orders"));
		assert_eq!(*first.selected.borrow(), vec!["orders".to_string()]);
		assert_eq!(*second.selected.borrow(), vec!["orders".to_string()]);
	}

	#[test]
	fn test_context_menu_handles_mutate_shared_state() {
		let listener = Rc::new(RecordingListener::default());
		let bridge = EventBridge::new().with_listener(listener.clone());
		let visibility = VisibilityFilter::new();
		let replaced = Rc::new(RefCell::new(None));
		let sink = replaced.clone();

		bridge.context_menu_requested(&ContextMenuRequest {
			node: GraphNode::new("orders"),
			coords: ScreenCoords { x: 10.0, y: 20.0 },
			graph_data: GraphData::default(),
			visibility: visibility.clone(),
			set_graph_data: Rc::new(move |data: GraphData| *sink.borrow_mut() = Some(data)),
		});

		let menus = listener.menus.borrow();
		let request = &menus[0];
		request.visibility.hide(request.node.node_name.clone());
		(request.set_graph_data)(GraphData::default());

		assert!(!visibility.is_visible("orders"));
		assert_eq!(*replaced.borrow(), Some(GraphData::default()));
	}

	#[test]
	fn test_context_menu_detail_serializes_camel_case() {
		let node = GraphNode::new("a");
		let data = GraphData::default();
		let json = serde_json::to_value(ContextMenuDetail {
			node: &node,
			coords: ScreenCoords { x: 1.0, y: 2.0 },
			graph_data: &data,
		})
		.unwrap();
		assert_eq!(json["node"]["nodeName"], "a");
		assert_eq!(json["coords"]["y"], 2.0);
		assert!(json["graphData"]["nodes"].is_array());
	}
}
