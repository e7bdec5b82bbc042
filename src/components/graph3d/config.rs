//! Fixed interaction parameters and host-controlled style inputs.
//!
//! [`GraphConfig`] centralizes the constants the interaction layer uses when it
//! talks to the engine: camera standoff, transition timing, curvature of
//! reciprocal links, particle flow and the force-layout tuning applied at
//! mount. [`StyleFilters`] carries the inputs the host changes at runtime
//! (search text, thresholds, classification toggles) and that are forwarded to
//! the styling oracle on every render.
//!
//! Both deserialize from JSON with every field optional, so a host page only
//! needs to spell out the values it wants to override.

use std::collections::HashSet;

use serde::Deserialize;

/// Interaction and layout parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Distance the camera keeps beyond a selected node, in world units.
	pub camera_standoff: f64,
	/// Duration of the fly-to transition in milliseconds.
	pub camera_transition_ms: u32,
	/// Nodes closer than this to the origin have no usable fly-to direction.
	pub camera_min_distance: f64,
	/// Curvature applied to both links of a reciprocal pair.
	pub reciprocal_curvature: f64,
	/// Particles flowing along a highlighted link.
	pub highlight_particles: u32,
	/// Constant charge strength for every node (negative repels).
	pub charge_strength: f64,
	/// Constant target distance for every link.
	pub link_distance: f64,
	/// Length of the directional arrow head.
	pub arrow_length: f64,
	/// Arrow position along the link (0 = source, 1 = target).
	pub arrow_rel_pos: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			camera_standoff: 100.0,
			camera_transition_ms: 1500,
			camera_min_distance: 1e-6,
			reciprocal_curvature: 0.4,
			highlight_particles: 2,
			charge_strength: -220.0,
			link_distance: 60.0,
			arrow_length: 10.0,
			arrow_rel_pos: 1.0,
		}
	}
}

/// How node colors are chosen by the styling oracle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorMode {
	/// Stable per-node palette colors.
	#[default]
	Default,
	/// Highlight nodes whose coupling exceeds the threshold.
	Coupling,
	/// Highlight nodes carrying anti-pattern labels.
	AntiPattern,
}

/// Runtime inputs supplied by the host and forwarded to the styling oracle.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleFilters {
	/// Active search text. Empty matches everything.
	pub search: String,
	/// Coupling threshold used by the oracle.
	pub threshold: f64,
	/// Whether high-coupling classification is shown.
	pub high_coupling: bool,
	/// Whether anti-pattern classification is shown.
	pub anti_pattern: bool,
	pub color_mode: ColorMode,
	/// Restrict anti-pattern styling to one label.
	pub selected_anti_pattern: Option<String>,
	/// Nodes the host is tracking.
	pub tracked_nodes: HashSet<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_partial_config_keeps_defaults() {
		let json = r#"{"camera_standoff": 250.0, "highlight_particles": 4}"#;
		let config: GraphConfig = serde_json::from_str(json).unwrap();
		assert_eq!(config.camera_standoff, 250.0);
		assert_eq!(config.highlight_particles, 4);
		assert_eq!(config.camera_transition_ms, 1500);
		assert_eq!(config.reciprocal_curvature, 0.4);
	}

	#[test]
	fn test_filters_parse_camel_case() {
		let filters: StyleFilters = serde_json::from_str(
			r#"{"search":"pay","colorMode":"antiPattern","selectedAntiPattern":"cycle","trackedNodes":["a"]}"#,
		)
		.unwrap();
		assert_eq!(filters.search, "pay");
		assert_eq!(filters.color_mode, ColorMode::AntiPattern);
		assert_eq!(filters.selected_anti_pattern.as_deref(), Some("cycle"));
		assert!(filters.tracked_nodes.contains("a"));
		assert!(!filters.high_coupling);
	}
}
