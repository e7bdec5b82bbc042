//! Browser binding to the `3d-force-graph` library.
//!
//! The host page is expected to load the UMD build, which exposes the global
//! `ForceGraph3D` constructor. [`JsEngine`] implements [`RenderEngine`] on top
//! of it, and [`attach`] registers every [`GraphBinding`] callback.

use std::rc::{Rc, Weak};

use js_sys::{Array, Function, Object, Reflect};
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use super::binding::{GraphBinding, NODE_ID_KEY};
use super::engine::{EngineError, RenderEngine};
use super::types::{GraphData, Layout, NodeLayout, Quaternion, ScreenCoords, Vec3};

#[wasm_bindgen]
extern "C" {
	/// A `3d-force-graph` instance.
	#[wasm_bindgen(js_name = ForceGraph3D)]
	pub type ForceGraph3d;

	#[wasm_bindgen(constructor, catch, js_class = "ForceGraph3D")]
	fn new(element: &HtmlElement) -> Result<ForceGraph3d, JsValue>;

	#[wasm_bindgen(method, js_name = graphData)]
	fn graph_data(this: &ForceGraph3d, data: &JsValue) -> JsValue;

	#[wasm_bindgen(method, js_name = graphData)]
	fn current_graph_data(this: &ForceGraph3d) -> JsValue;

	#[wasm_bindgen(method, js_name = nodeId)]
	fn node_id(this: &ForceGraph3d, key: &str) -> JsValue;

	#[wasm_bindgen(method)]
	fn width(this: &ForceGraph3d, px: f64) -> JsValue;

	#[wasm_bindgen(method)]
	fn height(this: &ForceGraph3d, px: f64) -> JsValue;

	#[wasm_bindgen(method, js_name = backgroundColor)]
	fn background_color(this: &ForceGraph3d, color: &str) -> JsValue;

	#[wasm_bindgen(method, js_name = nodeVisibility)]
	fn node_visibility(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, js_name = nodeColor)]
	fn node_color(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, js_name = nodeLabel)]
	fn node_label(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, js_name = linkCurvature)]
	fn link_curvature(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, js_name = linkColor)]
	fn link_color(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, js_name = linkWidth)]
	fn link_width(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, js_name = linkDirectionalArrowLength)]
	fn link_directional_arrow_length(this: &ForceGraph3d, length: f64) -> JsValue;

	#[wasm_bindgen(method, js_name = linkDirectionalArrowRelPos)]
	fn link_directional_arrow_rel_pos(this: &ForceGraph3d, pos: f64) -> JsValue;

	#[wasm_bindgen(method, js_name = linkDirectionalArrowColor)]
	fn link_directional_arrow_color(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, js_name = linkDirectionalParticles)]
	fn link_directional_particles(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, js_name = linkDirectionalParticleWidth)]
	fn link_directional_particle_width(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, js_name = onNodeHover)]
	fn on_node_hover(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, js_name = onLinkHover)]
	fn on_link_hover(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, js_name = onNodeClick)]
	fn on_node_click(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, js_name = onNodeRightClick)]
	fn on_node_right_click(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, js_name = onNodeDragEnd)]
	fn on_node_drag_end(this: &ForceGraph3d, callback: &Function) -> JsValue;

	#[wasm_bindgen(method, catch, js_name = cameraPosition)]
	fn current_camera_position(this: &ForceGraph3d) -> Result<JsValue, JsValue>;

	#[wasm_bindgen(method, catch, js_name = cameraPosition)]
	fn transition_camera(
		this: &ForceGraph3d,
		position: &JsValue,
		look_at: &JsValue,
		duration_ms: u32,
	) -> Result<JsValue, JsValue>;

	#[wasm_bindgen(method, catch)]
	fn camera(this: &ForceGraph3d) -> Result<JsValue, JsValue>;

	#[wasm_bindgen(method, catch, js_name = d3Force)]
	fn d3_force(this: &ForceGraph3d, name: &str) -> Result<JsValue, JsValue>;

	#[wasm_bindgen(method, catch, js_name = graph2ScreenCoords)]
	fn graph2_screen_coords(
		this: &ForceGraph3d,
		x: f64,
		y: f64,
		z: f64,
	) -> Result<JsValue, JsValue>;

	#[wasm_bindgen(method)]
	fn refresh(this: &ForceGraph3d) -> JsValue;
}

fn js_error(value: JsValue) -> EngineError {
	EngineError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

fn number(obj: &JsValue, key: &str) -> Option<f64> {
	Reflect::get(obj, &JsValue::from_str(key)).ok()?.as_f64()
}

fn string(obj: &JsValue, key: &str) -> Option<String> {
	Reflect::get(obj, &JsValue::from_str(key)).ok()?.as_string()
}

/// Read `x`, `y` and `z` from a JS object.
fn vec3_from_js(obj: &JsValue) -> Option<Vec3> {
	Some(Vec3::new(number(obj, "x")?, number(obj, "y")?, number(obj, "z")?))
}

fn pin_from_js(obj: &JsValue) -> Option<Vec3> {
	Some(Vec3::new(number(obj, "fx")?, number(obj, "fy")?, number(obj, "fz")?))
}

fn vec3_to_js(v: Vec3) -> JsValue {
	let obj = Object::new();
	let _ = Reflect::set(&obj, &"x".into(), &v.x.into());
	let _ = Reflect::set(&obj, &"y".into(), &v.y.into());
	let _ = Reflect::set(&obj, &"z".into(), &v.z.into());
	obj.into()
}

/// Name of an engine node object, or `None` for `null`.
fn node_name(node: &JsValue) -> Option<String> {
	if node.is_null() || node.is_undefined() {
		return None;
	}
	string(node, NODE_ID_KEY)
}

fn link_id(link: &JsValue) -> Option<String> {
	if link.is_null() || link.is_undefined() {
		return None;
	}
	string(link, "id")
}

fn to_function(closure: JsValue) -> Function {
	closure.unchecked_into()
}

/// Browser implementation of [`RenderEngine`].
pub struct JsEngine {
	graph: ForceGraph3d,
}

impl JsEngine {
	/// Create the engine inside `element`.
	pub fn mount(element: &HtmlElement, width: f64, height: f64) -> Result<Self, EngineError> {
		let graph = ForceGraph3d::new(element).map_err(js_error)?;
		graph.width(width);
		graph.height(height);
		graph.background_color("rgba(0,0,0,0)");
		Ok(Self { graph })
	}

	pub fn resize(&self, width: f64, height: f64) {
		self.graph.width(width);
		self.graph.height(height);
	}

	/// Node objects the simulation currently holds.
	fn live_nodes(&self) -> Array {
		let current = self.graph.current_graph_data();
		Reflect::get(&current, &"nodes".into())
			.ok()
			.and_then(|nodes| nodes.dyn_into::<Array>().ok())
			.unwrap_or_else(Array::new)
	}

	/// Hand the graph data to the simulation.
	///
	/// Nodes the simulation already holds keep their object, updated in place
	/// with the new fields, so their velocity and layout carry over.
	pub fn load(&self, data: &GraphData) -> Result<(), EngineError> {
		let json = serde_json::to_string(data).map_err(|e| EngineError::Js(e.to_string()))?;
		let value = js_sys::JSON::parse(&json).map_err(js_error)?;
		let fresh: Array = Reflect::get(&value, &"nodes".into())
			.map_err(js_error)?
			.dyn_into()
			.map_err(|_| EngineError::Js("graph data has no node list".into()))?;

		let live = self.live_nodes();
		for i in 0..fresh.length() {
			let node = fresh.get(i);
			let Some(name) = node_name(&node) else {
				continue;
			};
			let existing = live.iter().find(|n| node_name(n).as_deref() == Some(name.as_str()));
			if let Some(existing) = existing {
				let existing: Object = existing.unchecked_into();
				let node: Object = node.unchecked_into();
				fresh.set(i, Object::assign(&existing, &node).into());
			}
		}

		self.graph.graph_data(&value);
		Ok(())
	}

	fn force(&self, name: &str) -> Result<JsValue, EngineError> {
		let force = self.graph.d3_force(name).map_err(js_error)?;
		if force.is_undefined() || force.is_null() {
			return Err(EngineError::MissingForce(name.to_string()));
		}
		Ok(force)
	}

	fn call_force(&self, name: &str, method: &str, value: f64) -> Result<(), EngineError> {
		let force = self.force(name)?;
		let setter: Function = Reflect::get(&force, &JsValue::from_str(method))
			.map_err(js_error)?
			.dyn_into()
			.map_err(|_| EngineError::Js(format!("{}.{} is not a function", name, method)))?;
		setter.call1(&force, &JsValue::from_f64(value)).map_err(js_error)?;
		Ok(())
	}
}

impl RenderEngine for JsEngine {
	fn camera_position(&self) -> Result<Vec3, EngineError> {
		let position = self.graph.current_camera_position().map_err(js_error)?;
		vec3_from_js(&position)
			.ok_or_else(|| EngineError::Js("camera position is not a vector".into()))
	}

	fn camera_orientation(&self) -> Result<Quaternion, EngineError> {
		let camera = self.graph.camera().map_err(js_error)?;
		let q = Reflect::get(&camera, &"quaternion".into()).map_err(js_error)?;
		Ok(Quaternion {
			x: number(&q, "x").unwrap_or(0.0),
			y: number(&q, "y").unwrap_or(0.0),
			z: number(&q, "z").unwrap_or(0.0),
			w: number(&q, "w").unwrap_or(1.0),
		})
	}

	fn fly_camera(
		&self,
		position: Vec3,
		look_at: Vec3,
		duration_ms: u32,
	) -> Result<(), EngineError> {
		self.graph
			.transition_camera(&vec3_to_js(position), &vec3_to_js(look_at), duration_ms)
			.map_err(js_error)?;
		Ok(())
	}

	fn set_charge_strength(&self, strength: f64) -> Result<(), EngineError> {
		self.call_force("charge", "strength", strength)
	}

	fn set_link_distance(&self, distance: f64) -> Result<(), EngineError> {
		self.call_force("link", "distance", distance)
	}

	fn graph_to_screen(&self, point: Vec3) -> Result<ScreenCoords, EngineError> {
		let coords = self
			.graph
			.graph2_screen_coords(point.x, point.y, point.z)
			.map_err(js_error)?;
		match (number(&coords, "x"), number(&coords, "y")) {
			(Some(x), Some(y)) => Ok(ScreenCoords { x, y }),
			_ => Err(EngineError::Js("screen coordinates are not a point".into())),
		}
	}

	fn node_layout(&self) -> Result<Layout, EngineError> {
		Ok(self
			.live_nodes()
			.iter()
			.filter_map(|node| {
				let layout = NodeLayout {
					position: vec3_from_js(&node),
					pinned: pin_from_js(&node),
				};
				Some((node_name(&node)?, layout))
			})
			.collect())
	}

	fn refresh(&self) {
		self.graph.refresh();
	}
}

/// Register every binding callback on the engine.
///
/// Callbacks are handed over to the JS garbage collector; they hold the engine
/// weakly so dropping the component releases it.
pub fn attach(engine: &Rc<JsEngine>, binding: &Rc<GraphBinding>) {
	let graph = &engine.graph;
	graph.node_id(NODE_ID_KEY);
	graph.link_directional_arrow_length(binding.arrow_length());
	graph.link_directional_arrow_rel_pos(binding.arrow_rel_pos());

	let b = binding.clone();
	graph.node_visibility(&to_function(
		Closure::<dyn Fn(JsValue) -> bool>::new(move |node: JsValue| {
			node_name(&node).is_none_or(|name| b.node_visible(&name))
		})
		.into_js_value(),
	));

	let b = binding.clone();
	graph.node_color(&to_function(
		Closure::<dyn Fn(JsValue) -> Option<String>>::new(move |node: JsValue| {
			node_name(&node).and_then(|name| b.node_color(&name))
		})
		.into_js_value(),
	));

	let b = binding.clone();
	graph.node_label(&to_function(
		Closure::<dyn Fn(JsValue) -> Option<String>>::new(move |node: JsValue| {
			node_name(&node).and_then(|name| b.node_label(&name))
		})
		.into_js_value(),
	));

	let b = binding.clone();
	graph.link_curvature(&to_function(
		Closure::<dyn Fn(JsValue) -> f64>::new(move |link: JsValue| {
			link_id(&link).map_or(0.0, |id| b.link_curvature(&id))
		})
		.into_js_value(),
	));

	let b = binding.clone();
	graph.link_color(&to_function(
		Closure::<dyn Fn(JsValue) -> Option<String>>::new(move |link: JsValue| {
			link_id(&link).and_then(|id| b.link_color(&id))
		})
		.into_js_value(),
	));

	let b = binding.clone();
	graph.link_directional_arrow_color(&to_function(
		Closure::<dyn Fn(JsValue) -> Option<String>>::new(move |link: JsValue| {
			link_id(&link).and_then(|id| b.link_arrow_color(&id))
		})
		.into_js_value(),
	));

	let b = binding.clone();
	graph.link_width(&to_function(
		Closure::<dyn Fn(JsValue) -> f64>::new(move |link: JsValue| {
			link_id(&link).and_then(|id| b.link_width(&id)).unwrap_or(1.0)
		})
		.into_js_value(),
	));

	let b = binding.clone();
	graph.link_directional_particle_width(&to_function(
		Closure::<dyn Fn(JsValue) -> f64>::new(move |link: JsValue| {
			link_id(&link).and_then(|id| b.link_particle_width(&id)).unwrap_or(1.0)
		})
		.into_js_value(),
	));

	let b = binding.clone();
	graph.link_directional_particles(&to_function(
		Closure::<dyn Fn(JsValue) -> u32>::new(move |link: JsValue| {
			link_id(&link).map_or(0, |id| b.link_particles(&id))
		})
		.into_js_value(),
	));

	let b = binding.clone();
	graph.on_node_hover(&to_function(
		Closure::<dyn Fn(JsValue)>::new(move |node: JsValue| {
			b.on_node_hover(node_name(&node).as_deref());
		})
		.into_js_value(),
	));

	let b = binding.clone();
	graph.on_link_hover(&to_function(
		Closure::<dyn Fn(JsValue)>::new(move |link: JsValue| {
			b.on_link_hover(link_id(&link).as_deref());
		})
		.into_js_value(),
	));

	let (b, weak) = (binding.clone(), Rc::downgrade(engine));
	graph.on_node_click(&to_function(
		Closure::<dyn Fn(JsValue)>::new(move |node: JsValue| {
			with_engine(&weak, |engine| {
				b.on_node_click(engine, node_name(&node).as_deref(), vec3_from_js(&node));
			});
		})
		.into_js_value(),
	));

	let (b, weak) = (binding.clone(), Rc::downgrade(engine));
	graph.on_node_right_click(&to_function(
		Closure::<dyn Fn(JsValue)>::new(move |node: JsValue| {
			with_engine(&weak, |engine| {
				b.on_node_right_click(engine, node_name(&node).as_deref(), vec3_from_js(&node));
			});
		})
		.into_js_value(),
	));

	let b = binding.clone();
	graph.on_node_drag_end(&to_function(
		Closure::<dyn Fn(JsValue)>::new(move |node: JsValue| {
			let Some(name) = node_name(&node) else {
				return;
			};
			if let Some(pin) = b.on_node_drag_end(&name, vec3_from_js(&node)) {
				let _ = Reflect::set(&node, &"fx".into(), &pin.x.into());
				let _ = Reflect::set(&node, &"fy".into(), &pin.y.into());
				let _ = Reflect::set(&node, &"fz".into(), &pin.z.into());
			}
		})
		.into_js_value(),
	));
}

fn with_engine(weak: &Weak<JsEngine>, f: impl FnOnce(&dyn RenderEngine)) {
	match weak.upgrade() {
		Some(engine) => f(&*engine),
		None => warn!("input event after the engine was dropped"),
	}
}
