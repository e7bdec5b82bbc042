//! Graph data structures shared with the 3D force engine.
//!
//! Field names follow the JSON wire format consumed by `3d-force-graph`, so the
//! same structures can be parsed from the host page and handed to the engine.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// A point or direction in simulation space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Vec3 {
	pub const fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}

	/// Euclidean distance from the origin.
	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
	}

	pub fn scale(self, factor: f64) -> Self {
		Self::new(self.x * factor, self.y * factor, self.z * factor)
	}
}

/// Camera orientation as a unit quaternion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
	pub x: f64,
	pub y: f64,
	pub z: f64,
	pub w: f64,
}

impl Default for Quaternion {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			z: 0.0,
			w: 1.0,
		}
	}
}

/// A position on the rendering surface, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenCoords {
	pub x: f64,
	pub y: f64,
}

/// A node in the graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Links reference nodes by this name.
	#[serde(rename = "nodeName")]
	pub node_name: String,
	/// Simulation coordinates, assigned by the engine once the layout starts.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub x: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub y: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub z: Option<f64>,
	/// Fixed-position overrides, written when a drag completes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fx: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fy: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fz: Option<f64>,
	/// Coupling score supplied by the host's analysis.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub coupling: Option<f64>,
	/// Anti-pattern labels supplied by the host's analysis.
	#[serde(default, rename = "antiPatterns", skip_serializing_if = "Vec::is_empty")]
	pub anti_patterns: Vec<String>,
}

impl GraphNode {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			node_name: name.into(),
			..Self::default()
		}
	}

	pub fn at(mut self, position: Vec3) -> Self {
		self.set_position(position);
		self
	}

	/// Current simulation position, if the engine has assigned all three axes.
	pub fn position(&self) -> Option<Vec3> {
		Some(Vec3::new(self.x?, self.y?, self.z?))
	}

	pub fn set_position(&mut self, position: Vec3) {
		self.x = Some(position.x);
		self.y = Some(position.y);
		self.z = Some(position.z);
	}

	/// Fixed-position override, if the node has been pinned.
	pub fn pinned(&self) -> Option<Vec3> {
		Some(Vec3::new(self.fx?, self.fy?, self.fz?))
	}

	pub fn pin(&mut self, position: Vec3) {
		self.fx = Some(position.x);
		self.fy = Some(position.y);
		self.fz = Some(position.z);
	}
}

/// Where the simulation currently holds a node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeLayout {
	pub position: Option<Vec3>,
	pub pinned: Option<Vec3>,
}

/// Live layout of every node the engine knows, keyed by node name.
pub type Layout = HashMap<String, NodeLayout>;

/// A directed edge between two nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
	pub id: String,
	/// Source node name.
	pub source: String,
	/// Target node name.
	pub target: String,
	/// Anti-pattern labels supplied by the host's analysis.
	#[serde(default, rename = "antiPatterns", skip_serializing_if = "Vec::is_empty")]
	pub anti_patterns: Vec<String>,
}

impl GraphLink {
	pub fn new(
		id: impl Into<String>,
		source: impl Into<String>,
		target: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			anti_patterns: Vec::new(),
		}
	}

	pub fn touches(&self, node: &str) -> bool {
		self.source == node || self.target == node
	}
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	pub fn node(&self, name: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.node_name == name)
	}

	pub fn node_mut(&mut self, name: &str) -> Option<&mut GraphNode> {
		self.nodes.iter_mut().find(|n| n.node_name == name)
	}

	pub fn link(&self, id: &str) -> Option<&GraphLink> {
		self.links.iter().find(|l| l.id == id)
	}

	/// Copy live coordinates onto matching nodes.
	///
	/// The engine's layout wins over any stored coordinates; nodes the engine
	/// has not placed yet keep whatever they carry.
	pub fn adopt_layout(&mut self, layout: &Layout) {
		for node in &mut self.nodes {
			let Some(live) = layout.get(&node.node_name) else {
				continue;
			};
			if let Some(position) = live.position {
				node.set_position(position);
			}
			if let Some(pinned) = live.pinned {
				node.pin(pinned);
			}
		}
	}
}

/// Nodes adjacent to a node, and the links connecting them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
	pub nodes: HashSet<String>,
	pub links: HashSet<String>,
}

/// Collect the neighbors of `node` across `links`, in either direction.
///
/// The node itself is only included when it has a self-loop.
pub fn neighbors(node: &str, links: &[GraphLink]) -> Neighbors {
	let mut found = Neighbors::default();
	for link in links {
		if link.source == node {
			found.nodes.insert(link.target.clone());
			found.links.insert(link.id.clone());
		} else if link.target == node {
			found.nodes.insert(link.source.clone());
			found.links.insert(link.id.clone());
		}
	}
	found
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_neighbors_follow_both_directions() {
		let links = vec![
			GraphLink::new("l1", "a", "b"),
			GraphLink::new("l2", "c", "a"),
			GraphLink::new("l3", "b", "c"),
		];
		let found = neighbors("a", &links);
		assert_eq!(found.nodes, HashSet::from(["b".to_string(), "c".to_string()]));
		assert_eq!(found.links, HashSet::from(["l1".to_string(), "l2".to_string()]));
	}

	#[test]
	fn test_neighbors_of_isolated_node_are_empty() {
		let links = vec![GraphLink::new("l1", "a", "b")];
		assert_eq!(neighbors("z", &links), Neighbors::default());
	}

	#[test]
	fn test_node_parses_wire_format() {
		let node: GraphNode = serde_json::from_str(
			r#"{"nodeName":"orders","x":1.0,"y":2.0,"z":3.0,"coupling":0.7,"antiPatterns":["cycle"]}"#,
		)
		.unwrap();
		assert_eq!(node.node_name, "orders");
		assert_eq!(node.position(), Some(Vec3::new(1.0, 2.0, 3.0)));
		assert_eq!(node.pinned(), None);
		assert_eq!(node.anti_patterns, vec!["cycle".to_string()]);
	}

	#[test]
	fn test_position_requires_all_axes() {
		let mut node = GraphNode::new("a");
		node.x = Some(1.0);
		node.y = Some(1.0);
		assert_eq!(node.position(), None);
	}

	#[test]
	fn test_adopt_layout_keeps_untouched_positions() {
		let mut data = GraphData {
			nodes: vec![GraphNode::new("a"), GraphNode::new("b"), GraphNode::new("new")],
			links: vec![],
		};
		data.nodes[0].set_position(Vec3::new(9.0, 9.0, 9.0));
		let layout = Layout::from([
			(
				"a".to_string(),
				NodeLayout {
					position: Some(Vec3::new(1.0, 2.0, 3.0)),
					pinned: None,
				},
			),
			(
				"b".to_string(),
				NodeLayout {
					position: Some(Vec3::new(4.0, 5.0, 6.0)),
					pinned: Some(Vec3::new(4.0, 5.0, 6.0)),
				},
			),
		]);

		data.adopt_layout(&layout);

		assert_eq!(data.nodes[0].position(), Some(Vec3::new(1.0, 2.0, 3.0)));
		assert_eq!(data.nodes[1].position(), Some(Vec3::new(4.0, 5.0, 6.0)));
		assert_eq!(data.nodes[1].pinned(), Some(Vec3::new(4.0, 5.0, 6.0)));
		assert_eq!(data.nodes[2].position(), None);
	}

	#[test]
	fn test_vec3_length() {
		assert_eq!(Vec3::new(3.0, 4.0, 0.0).length(), 5.0);
		assert_eq!(Vec3::new(1.0, -2.0, 3.0).scale(2.0), Vec3::new(2.0, -4.0, 6.0));
	}
}
