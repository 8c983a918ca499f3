use speedtrack_core::geo::{haversine_km, EARTH_RADIUS_KM};

#[test]
fn identical_points_have_zero_distance() {
    for (lat, lon) in [(0.0, 0.0), (59.91, 10.75), (-33.86, 151.21), (89.9, -179.9)] {
        assert_eq!(haversine_km(lat, lon, lat, lon), 0.0, "punkt ({lat}, {lon})");
    }
}

#[test]
fn distance_is_symmetric() {
    let pairs = [
        ((59.91, 10.75), (60.39, 5.32)),
        ((0.0, 0.0), (0.0, 0.0009)),
        ((-45.0, 170.0), (45.0, -170.0)),
    ];
    for ((a_lat, a_lon), (b_lat, b_lon)) in pairs {
        let ab = haversine_km(a_lat, a_lon, b_lat, b_lon);
        let ba = haversine_km(b_lat, b_lon, a_lat, a_lon);
        assert!((ab - ba).abs() < 1e-12, "ab={ab}, ba={ba}");
        assert!(ab >= 0.0);
    }
}

#[test]
fn short_step_on_equator_is_about_100_m() {
    let d_m = haversine_km(0.0, 0.0, 0.0, 0.0009) * 1000.0;
    let expected = EARTH_RADIUS_KM * 1000.0 * 0.0009_f64.to_radians();
    assert!((d_m - expected).abs() < 1e-6);
    assert!((d_m - 100.0).abs() < 0.5, "fikk {d_m} m");
}

#[test]
fn oslo_to_bergen_is_about_305_km() {
    let d = haversine_km(59.9139, 10.7522, 60.3913, 5.3221);
    assert!((d - 305.0).abs() < 5.0, "fikk {d} km");
}
