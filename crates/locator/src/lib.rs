//! Nearest-Sensor Locator
//!
//! Finds the registered sensor closest to a query point. Distances are
//! plain Cartesian distances on raw latitude/longitude values, not
//! great-circle distances.

mod nearest;
mod point;

pub use nearest::{distance, nearest};
pub use point::Point;
