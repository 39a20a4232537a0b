use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value, feature::Id};
use serde_json::json;

use crate::types::Place;

/// Map-ready view of a result list: one Point feature per place, in the
/// same nearest-first order.
pub fn places_to_feature_collection(places: &[Place]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: places.iter().map(place_to_feature).collect(),
        foreign_members: None,
    }
}

pub fn place_to_feature(place: &Place) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("name".into(), json!(place.name));
    properties.insert("category".into(), json!(place.category));
    properties.insert("distanceKm".into(), json!(place.distance_km));

    let optional = [
        ("address", &place.address),
        ("phone", &place.phone),
        ("website", &place.website),
        ("openingHours", &place.opening_hours),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            properties.insert(key.into(), json!(value));
        }
    }

    Feature {
        bbox: None,
        // GeoJSON positions are [longitude, latitude].
        geometry: Some(Geometry::new(Value::Point(vec![place.longitude, place.latitude]))),
        id: Some(Id::Number(place.id.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}
