use crate::models::Fix;

pub const EARTH_RADIUS_KM: f64 = 6371.0; // middelradius (km)
pub const MS_TO_KMH: f64 = 3.6;
pub const KM_TO_MILES: f64 = 0.621371; // gjelder også km/h → mph

/// Storsirkelavstand (km) mellom to koordinater, haversine med R = 6371 km.
/// Ren funksjon: symmetrisk, aldri negativ, 0 for identiske punkter.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // a kan krype et hakk over 1.0 pga. avrunding nær antipoder
    let a = a.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

#[inline]
pub fn fix_distance_km(from: &Fix, to: &Fix) -> f64 {
    haversine_km(from.latitude, from.longitude, to.latitude, to.longitude)
}
