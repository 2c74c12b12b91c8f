//! Sensor record

use crate::StorageError;
use serde::{Deserialize, Serialize};

/// A registered physical sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    /// Unique name, used as the lookup key
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Free-form tags; order is kept, duplicates allowed
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Sensor {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Check required fields before a write
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.name.is_empty() {
            return Err(StorageError::ConstraintViolation(
                "sensor name must not be empty".to_string(),
            ));
        }
        if !self.latitude.is_finite() {
            return Err(StorageError::ConstraintViolation(format!(
                "latitude of {:?} is not a finite number",
                self.name
            )));
        }
        if !self.longitude.is_finite() {
            return Err(StorageError::ConstraintViolation(format!(
                "longitude of {:?} is not a finite number",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_plain_sensor() {
        let sensor = Sensor::new("roof-1", 40.7, -74.0).with_tags(["outdoor", "temp"]);
        assert!(sensor.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let err = Sensor::new("", 0.0, 0.0).validate().unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }

    #[test]
    fn test_validate_rejects_non_finite_coordinates() {
        assert!(Sensor::new("a", f64::NAN, 0.0).validate().is_err());
        assert!(Sensor::new("a", 0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_json_field_names() {
        let sensor = Sensor::new("a", 1.5, -2.0).with_tags(["x"]);
        let json = serde_json::to_value(&sensor).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "a", "latitude": 1.5, "longitude": -2.0, "tags": ["x"]})
        );
    }

    #[test]
    fn test_missing_tags_default_to_empty() {
        let sensor: Sensor =
            serde_json::from_str(r#"{"name": "a", "latitude": 1.0, "longitude": 2.0}"#).unwrap();
        assert!(sensor.tags.is_empty());
    }
}
