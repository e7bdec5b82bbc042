//! The rendering engine seam.
//!
//! The 3D engine owns physics, projection and the scene graph. The interaction
//! layer only needs the handful of imperative calls captured by
//! [`RenderEngine`]; the browser implementation lives in [`super::js`].

use super::types::{Layout, Quaternion, ScreenCoords, Vec3};

/// Failures talking to the rendering engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
	/// The simulation has no force registered under this name.
	#[error("force `{0}` is not registered on the simulation")]
	MissingForce(String),
	/// A call into the engine threw or returned an unexpected shape.
	#[error("engine call failed: {0}")]
	Js(String),
}

/// Imperative surface of the 3D force engine.
pub trait RenderEngine {
	/// Current camera position.
	fn camera_position(&self) -> Result<Vec3, EngineError>;

	/// Current camera orientation.
	fn camera_orientation(&self) -> Result<Quaternion, EngineError>;

	/// Animate the camera to `position`, looking at `look_at`.
	///
	/// A call made while a transition is in flight replaces it.
	fn fly_camera(
		&self,
		position: Vec3,
		look_at: Vec3,
		duration_ms: u32,
	) -> Result<(), EngineError>;

	/// Set a constant charge strength on every node.
	fn set_charge_strength(&self, strength: f64) -> Result<(), EngineError>;

	/// Set a constant target distance on every link.
	fn set_link_distance(&self, distance: f64) -> Result<(), EngineError>;

	/// Project a simulation point onto the rendering surface.
	fn graph_to_screen(&self, point: Vec3) -> Result<ScreenCoords, EngineError>;

	/// Positions the simulation currently holds for its nodes.
	fn node_layout(&self) -> Result<Layout, EngineError>;

	/// Re-evaluate every per-element callback.
	fn refresh(&self);
}

#[cfg(test)]
pub(crate) mod testing {
	use std::cell::{Cell, RefCell};

	use super::*;

	/// Engine double that records every call.
	#[derive(Default)]
	pub struct RecordingEngine {
		pub camera: Vec3,
		pub orientation: Quaternion,
		pub flights: RefCell<Vec<(Vec3, Vec3, u32)>>,
		pub charge: Cell<Option<f64>>,
		pub distance: Cell<Option<f64>>,
		pub refreshes: Cell<usize>,
		pub layout: Layout,
		/// Fail every fallible call.
		pub detached: bool,
	}

	impl RecordingEngine {
		pub fn detached() -> Self {
			Self {
				detached: true,
				..Self::default()
			}
		}

		fn check(&self) -> Result<(), EngineError> {
			if self.detached {
				Err(EngineError::Js("engine detached".into()))
			} else {
				Ok(())
			}
		}
	}

	impl RenderEngine for RecordingEngine {
		fn camera_position(&self) -> Result<Vec3, EngineError> {
			self.check()?;
			Ok(self.camera)
		}

		fn camera_orientation(&self) -> Result<Quaternion, EngineError> {
			self.check()?;
			Ok(self.orientation)
		}

		fn fly_camera(
			&self,
			position: Vec3,
			look_at: Vec3,
			duration_ms: u32,
		) -> Result<(), EngineError> {
			self.check()?;
			self.flights.borrow_mut().push((position, look_at, duration_ms));
			Ok(())
		}

		fn set_charge_strength(&self, strength: f64) -> Result<(), EngineError> {
			self.check()?;
			self.charge.set(Some(strength));
			Ok(())
		}

		fn set_link_distance(&self, distance: f64) -> Result<(), EngineError> {
			self.check()?;
			self.distance.set(Some(distance));
			Ok(())
		}

		fn graph_to_screen(&self, point: Vec3) -> Result<ScreenCoords, EngineError> {
			self.check()?;
			// Simple orthographic projection centered on an 800x600 surface.
			Ok(ScreenCoords {
				x: 400.0 + point.x,
				y: 300.0 - point.y,
			})
		}

		fn node_layout(&self) -> Result<Layout, EngineError> {
			self.check()?;
			Ok(self.layout.clone())
		}

		fn refresh(&self) {
			self.refreshes.set(self.refreshes.get() + 1);
		}
	}
}
