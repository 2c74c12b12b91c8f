//! Query point

use serde::{Deserialize, Serialize};
use storage::Sensor;

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<&Sensor> for Point {
    fn from(sensor: &Sensor) -> Self {
        Self::new(sensor.latitude, sensor.longitude)
    }
}
