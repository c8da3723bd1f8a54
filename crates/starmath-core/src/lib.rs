//! Star detection, star shape metrics and a composable image pipeline for
//! astronomical frames.

pub mod bad_pixels;
pub mod consts;
pub mod detection;
pub mod error;
pub mod filters;
pub mod frame;
pub mod geometry;
pub mod io;
pub mod ops;
pub mod pipeline;
pub mod stats;

pub use error::{Component, Result, StarmathError};
pub use frame::Image;
pub use geometry::{Point, Rect, Size};
