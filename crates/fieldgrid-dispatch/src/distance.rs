//! Great-circle distance.

use fieldgrid_state::Coordinate;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometres.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn same_point_is_zero() {
        let p = Coordinate::new(17.435, 78.444);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_longitude_on_equator() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        // 6371 * pi / 180
        assert!(close(d, 111.194_93, 1e-3), "got {d}");
    }

    #[test]
    fn antipodes_are_half_the_circumference() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert!(close(d, std::f64::consts::PI * EARTH_RADIUS_KM, 1e-6), "got {d}");
    }

    #[test]
    fn symmetric_and_sign_aware() {
        let a = Coordinate::new(-33.8688, 151.2093);
        let b = Coordinate::new(51.5074, -0.1278);
        let ab = distance_km(a, b);
        let ba = distance_km(b, a);
        assert!(close(ab, ba, 1e-9));
        // Sydney to London is roughly 17,000 km.
        assert!(ab > 16_900.0 && ab < 17_100.0, "got {ab}");
    }

    #[test]
    fn short_city_hop() {
        let d = distance_km(Coordinate::new(17.436, 78.445), Coordinate::new(17.435, 78.444));
        assert!(d > 0.14 && d < 0.17, "got {d}");
    }
}
