//! Linear-scan nearest sensor

use crate::Point;
use storage::Sensor;

/// Planar distance between two points, treating latitude and longitude as
/// Cartesian coordinates.
pub fn distance(a: &Point, b: &Point) -> f64 {
    let d_lat = b.latitude - a.latitude;
    let d_lon = b.longitude - a.longitude;
    (d_lat * d_lat + d_lon * d_lon).sqrt()
}

/// Sensor closest to `point`, or `None` when `sensors` is empty.
///
/// On a tie the sensor that appears first in `sensors` wins.
pub fn nearest<'a>(point: &Point, sensors: &'a [Sensor]) -> Option<&'a Sensor> {
    let mut candidates = sensors.iter();
    let mut best = candidates.next()?;
    let mut best_distance = distance(point, &Point::from(best));

    for sensor in candidates {
        let d = distance(point, &Point::from(sensor));
        // strictly less: equal distances keep the earlier sensor
        if d < best_distance {
            best = sensor;
            best_distance = d;
        }
    }

    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sensor(name: &str, latitude: f64, longitude: f64) -> Sensor {
        Sensor::new(name, latitude, longitude)
    }

    #[test]
    fn test_distance_is_euclidean() {
        let d = distance(&Point::new(0.0, 0.0), &Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
        assert_eq!(distance(&Point::new(1.5, -2.0), &Point::new(1.5, -2.0)), 0.0);
    }

    #[test]
    fn test_distance_ignores_earth_curvature() {
        // one degree of longitude counts the same at the pole as at the equator
        let equator = distance(&Point::new(0.0, 0.0), &Point::new(0.0, 1.0));
        let pole = distance(&Point::new(89.0, 0.0), &Point::new(89.0, 1.0));
        assert_eq!(equator, pole);
    }

    #[test]
    fn test_empty_list_has_no_nearest() {
        assert!(nearest(&Point::new(0.0, 0.0), &[]).is_none());
    }

    #[test]
    fn test_single_sensor_is_nearest() {
        let sensors = vec![sensor("only", 50.0, 50.0)];
        assert_eq!(nearest(&Point::new(0.0, 0.0), &sensors).unwrap().name, "only");
    }

    #[test]
    fn test_closer_sensor_wins() {
        let sensors = vec![sensor("a", 1.0, 0.0), sensor("b", 0.0, 2.0)];
        assert_eq!(nearest(&Point::new(0.0, 0.0), &sensors).unwrap().name, "a");

        let reversed = vec![sensor("b", 0.0, 2.0), sensor("a", 1.0, 0.0)];
        assert_eq!(nearest(&Point::new(0.0, 0.0), &reversed).unwrap().name, "a");
    }

    #[test]
    fn test_tie_goes_to_first() {
        let sensors = vec![sensor("a", 1.0, 0.0), sensor("b", 0.0, 1.0)];
        assert_eq!(nearest(&Point::new(0.0, 0.0), &sensors).unwrap().name, "a");

        let swapped = vec![sensor("b", 0.0, 1.0), sensor("a", 1.0, 0.0)];
        assert_eq!(nearest(&Point::new(0.0, 0.0), &swapped).unwrap().name, "b");
    }

    #[test]
    fn test_later_closer_sensor_replaces_earlier() {
        let sensors = vec![
            sensor("far", 10.0, 10.0),
            sensor("mid", 5.0, 5.0),
            sensor("near", 1.0, 1.0),
            sensor("near-dup", 1.0, 1.0),
        ];
        assert_eq!(nearest(&Point::new(0.0, 0.0), &sensors).unwrap().name, "near");
    }

    #[test]
    fn test_point_json_field_names() {
        let point: Point =
            serde_json::from_str(r#"{"latitude": 12.5, "longitude": -7.25}"#).unwrap();
        assert_eq!(point, Point::new(12.5, -7.25));
    }

    fn sensors_strategy() -> impl Strategy<Value = Vec<Sensor>> {
        prop::collection::vec((-90.0f64..90.0, -180.0f64..180.0), 0..32).prop_map(|coords| {
            coords
                .into_iter()
                .enumerate()
                .map(|(i, (lat, lon))| sensor(&format!("s{}", i), lat, lon))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_nearest_is_first_minimum(
            lat in -90.0f64..90.0,
            lon in -180.0f64..180.0,
            sensors in sensors_strategy(),
        ) {
            let point = Point::new(lat, lon);
            match nearest(&point, &sensors) {
                None => prop_assert!(sensors.is_empty()),
                Some(found) => {
                    let idx = sensors.iter().position(|s| s.name == found.name).unwrap();
                    let best = distance(&point, &Point::from(found));
                    for (i, s) in sensors.iter().enumerate() {
                        let d = distance(&point, &Point::from(s));
                        prop_assert!(best <= d);
                        if i < idx {
                            prop_assert!(d > best);
                        }
                    }
                }
            }
        }

        #[test]
        fn prop_nearest_does_not_depend_on_later_duplicates(
            lat in -90.0f64..90.0,
            lon in -180.0f64..180.0,
            sensors in sensors_strategy(),
        ) {
            let point = Point::new(lat, lon);
            let first = nearest(&point, &sensors).map(|s| s.name.clone());

            let mut doubled = sensors.clone();
            doubled.extend(sensors.iter().map(|s| sensor("copy", s.latitude, s.longitude)));
            let second = nearest(&point, &doubled).map(|s| s.name.clone());

            prop_assert_eq!(first, second);
        }
    }
}
