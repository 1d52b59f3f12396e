// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

/// Mean radius of Earth, in meters.
/// Source: https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius
const EARTH_RADIUS: f64 = 6_371_008.8;

/// Mean diameter of Earth, in meters.
const EARTH_DIAMETER: f64 = EARTH_RADIUS + EARTH_RADIUS;

/// Calculates the great-circle distance between two lat-lon positions
/// on Earth using the `haversine formula <https://en.wikipedia.org/wiki/Haversine_formula>`_.
/// Returns the result in meters.
pub fn earth_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lon1 = lon1.to_radians();
    let lat2 = lat2.to_radians();
    let lon2 = lon2.to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    // Rounding may push h slightly above 1 for antipodal points
    EARTH_DIAMETER * h.sqrt().min(1.0).asin()
}

/// Calculates the shortest great-circle distance between a lat-lon position and
/// the meridian at `meridian_lon`, in meters.
pub(crate) fn meridian_distance(lat: f64, lon: f64, meridian_lon: f64) -> f64 {
    let dlon = (lon - meridian_lon).to_radians();
    if dlon.cos() < 0.0 {
        // More than 90° away, the closest point of the meridian is a pole
        return EARTH_RADIUS * (90.0 - lat.abs()).to_radians();
    }
    EARTH_RADIUS * (lat.to_radians().cos() * dlon.sin().abs()).min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_latitude() {
        let d = earth_distance(43.0, -80.0, 44.0, -80.0);
        assert!((d - 111_195.0).abs() < 10.0, "{}", d);
    }

    #[test]
    fn meridian_distance_is_a_lower_bound() {
        let d = meridian_distance(0.0, 1.0, 0.0);
        assert!((d - 111_195.0).abs() < 10.0, "{}", d);

        for (lat, lon) in [(60.0, 1.0), (43.5, -80.2), (-33.9, 151.2), (89.0, 10.0)] {
            for meridian in [-79.0, 0.0, 151.0, lon] {
                let along_parallel = earth_distance(lat, lon, lat, meridian);
                assert!(meridian_distance(lat, lon, meridian) <= along_parallel + 1e-6);
            }
        }
        assert_eq!(meridian_distance(43.5, -80.2, -80.2), 0.0);
    }

    #[test]
    fn same_point() {
        assert_eq!(earth_distance(43.5, -80.2, 43.5, -80.2), 0.0);
    }
}
