use geo::Point;

/// Mean earth radius used for every distance in the crate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two latitude/longitude pairs.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Points follow the geo convention: x is longitude, y is latitude.
pub trait HaversineDistance {
    fn haversine_km(&self, other: &Self) -> f64;
}

impl HaversineDistance for Point<f64> {
    fn haversine_km(&self, other: &Self) -> f64 {
        haversine_km(self.y(), self.x(), other.y(), other.x())
    }
}

pub fn lat_lng(lat: f64, lng: f64) -> Point<f64> {
    Point::new(lng, lat)
}
