//! Interaction layer for a 3D force-directed graph.
//!
//! The physics, projection and scene graph belong to `3d-force-graph`; this
//! module decides what the user sees on top of it:
//! - hover highlighting of a node and its neighbors, or a link and its ends
//! - hidden nodes, toggled by the host's context menu
//! - per-element color, opacity, width, curvature and particle flow
//! - fly-to camera navigation when a node is clicked
//! - selection and context-menu notifications to the host
//!
//! # Example
//!
//! ```ignore
//! use coupling_graph_3d::{ForceGraph3dView, GraphData, GraphLink, GraphNode};
//!
//! let data = GraphData {
//!     nodes: vec![GraphNode::new("orders"), GraphNode::new("billing")],
//!     links: vec![
//!         GraphLink::new("o-b", "orders", "billing"),
//!         GraphLink::new("b-o", "billing", "orders"),
//!     ],
//! };
//! let (data, set_data) = signal(data);
//!
//! view! { <ForceGraph3dView data=data set_data=set_data fullscreen=true /> }
//! ```

mod binding;
pub mod camera;
mod component;
pub mod config;
pub mod curvature;
pub mod engine;
pub mod events;
mod js;
pub mod state;
pub mod style;
pub mod theme;
mod types;
pub mod visibility;

pub use binding::{GraphBinding, NODE_ID_KEY};
pub use component::ForceGraph3dView;
pub use config::{ColorMode, GraphConfig, StyleFilters};
pub use engine::{EngineError, RenderEngine};
pub use events::{ContextMenuRequest, DocumentEventListener, EventBridge, GraphEventListener};
pub use js::JsEngine;
pub use theme::{Theme, ThemeOracle};
pub use types::{
	GraphData, GraphLink, GraphNode, Layout, Neighbors, NodeLayout, Quaternion, ScreenCoords, Vec3,
	neighbors,
};
