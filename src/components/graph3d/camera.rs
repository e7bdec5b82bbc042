//! Fly-to camera navigation.
//!
//! Selecting a node moves the camera onto the ray from the origin through the
//! node, `camera_standoff` units beyond it, looking back at the node.

use log::{debug, warn};

use super::config::GraphConfig;
use super::engine::{EngineError, RenderEngine};
use super::types::{Quaternion, Vec3};

/// A camera transition request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlyTo {
	pub position: Vec3,
	pub look_at: Vec3,
	pub duration_ms: u32,
}

/// Camera pose captured at mount, for the host to restore later.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InitialCamera {
	pub position: Vec3,
	pub orientation: Quaternion,
}

/// Compute the fly-to target for a node at `node`.
///
/// A node closer to the origin than `camera_min_distance` gives no direction
/// to back away along, so the camera is placed `camera_standoff` units along
/// +z from the node instead.
pub fn fly_to(node: Vec3, config: &GraphConfig) -> FlyTo {
	let distance = node.length();
	let position = if distance < config.camera_min_distance {
		warn!("node sits at the origin, falling back to a +z camera standoff");
		Vec3::new(node.x, node.y, node.z + config.camera_standoff)
	} else {
		node.scale(1.0 + config.camera_standoff / distance)
	};

	FlyTo {
		position,
		look_at: node,
		duration_ms: config.camera_transition_ms,
	}
}

/// Fly the engine's camera to `node`.
pub fn navigate(
	engine: &dyn RenderEngine,
	node: Vec3,
	config: &GraphConfig,
) -> Result<FlyTo, EngineError> {
	let target = fly_to(node, config);
	debug!(
		"flying camera to ({:.1}, {:.1}, {:.1})",
		target.position.x, target.position.y, target.position.z
	);
	engine.fly_camera(target.position, target.look_at, target.duration_ms)?;
	Ok(target)
}

/// Read the camera pose the engine started with.
pub fn capture_initial(engine: &dyn RenderEngine) -> Result<InitialCamera, EngineError> {
	Ok(InitialCamera {
		position: engine.camera_position()?,
		orientation: engine.camera_orientation()?,
	})
}
