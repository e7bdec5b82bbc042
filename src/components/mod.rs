//! UI components.

pub mod graph3d;
