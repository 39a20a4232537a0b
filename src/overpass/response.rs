use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{HaversineDistance, Place, lat_lng};

/// Longest list of places returned for one lookup.
pub const MAX_RESULTS: usize = 20;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverpassResponse {
    pub version: Option<f64>,
    pub generator: Option<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub type_field: String,
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

impl Element {
    /// Nodes carry their own position, ways carry a center.
    pub fn coordinate(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => self.center.map(|c| (c.lat, c.lon)),
        }
    }

    fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    fn first_tag(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.tag(key)).map(str::to_string)
    }

    /// "12 Hill Road, Mumbai" style address, only when a street is known.
    fn address(&self) -> Option<String> {
        let street = self.tag("addr:street")?;
        let mut address = match self.tag("addr:housenumber") {
            Some(number) => format!("{number} {street}"),
            None => street.to_string(),
        };
        if let Some(city) = self.tag("addr:city") {
            address.push_str(", ");
            address.push_str(city);
        }
        Some(address)
    }

    fn to_place(&self, origin_lat: f64, origin_lng: f64, category: &str) -> Option<Place> {
        let name = self.tag("name")?;
        let (latitude, longitude) = self.coordinate()?;
        let origin = lat_lng(origin_lat, origin_lng);
        let distance_km = origin.haversine_km(&lat_lng(latitude, longitude));

        Some(Place {
            id: self.id,
            name: name.to_string(),
            latitude,
            longitude,
            category: category.to_string(),
            distance_km,
            address: self.address(),
            phone: self.first_tag(&["phone", "contact:phone"]),
            website: self.first_tag(&["website", "contact:website"]),
            opening_hours: self.first_tag(&["opening_hours"]),
        })
    }
}

/// Turns raw elements into the nearest [`MAX_RESULTS`] named places,
/// closest first. Unnamed or unlocated elements are dropped.
pub fn normalize(
    response: &OverpassResponse,
    origin_lat: f64,
    origin_lng: f64,
    category: &str,
) -> Vec<Place> {
    let mut places: Vec<Place> = response
        .elements
        .iter()
        .filter_map(|element| element.to_place(origin_lat, origin_lng, category))
        .collect();

    places.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    places.truncate(MAX_RESULTS);
    places
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> OverpassResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn ways_use_their_center_and_unlocated_elements_are_dropped() {
        let response = parse(json!({
            "elements": [
                {
                    "type": "way", "id": 1,
                    "center": { "lat": 19.08, "lon": 72.88 },
                    "tags": { "name": "Green Park" }
                },
                { "type": "relation", "id": 2, "tags": { "name": "Nowhere" } },
            ]
        }));
        let places = normalize(&response, 19.076, 72.8777, "park");
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Green Park");
        assert_eq!((places[0].latitude, places[0].longitude), (19.08, 72.88));
        assert_eq!(places[0].category, "park");
    }

    #[test]
    fn optional_fields_fall_back_to_contact_tags() {
        let response = parse(json!({
            "elements": [{
                "type": "node", "id": 5, "lat": 19.07, "lon": 72.87,
                "tags": {
                    "name": "Cafe Mondegar",
                    "addr:housenumber": "5",
                    "addr:street": "Colaba Causeway",
                    "addr:city": "Mumbai",
                    "contact:phone": "+91 22 2202 0591",
                    "contact:website": "https://example.org",
                    "opening_hours": "Mo-Su 08:00-23:30"
                }
            }]
        }));
        let place = &normalize(&response, 19.07, 72.87, "cafe")[0];
        assert_eq!(place.address.as_deref(), Some("5 Colaba Causeway, Mumbai"));
        assert_eq!(place.phone.as_deref(), Some("+91 22 2202 0591"));
        assert_eq!(place.website.as_deref(), Some("https://example.org"));
        assert_eq!(place.opening_hours.as_deref(), Some("Mo-Su 08:00-23:30"));
        assert_eq!(place.distance_km, 0.0);
    }

    #[test]
    fn address_needs_a_street() {
        let response = parse(json!({
            "elements": [
                {
                    "type": "node", "id": 1, "lat": 0.0, "lon": 0.0,
                    "tags": { "name": "A", "addr:city": "Pune" }
                },
                {
                    "type": "node", "id": 2, "lat": 0.0, "lon": 0.0,
                    "tags": { "name": "B", "addr:street": "FC Road" }
                },
            ]
        }));
        let places = normalize(&response, 0.0, 0.0, "cafe");
        assert_eq!(places[0].address, None);
        assert_eq!(places[1].address.as_deref(), Some("FC Road"));
    }

    #[test]
    fn zero_coordinates_are_still_a_position() {
        let response = parse(json!({
            "elements": [{
                "type": "node", "id": 1, "lat": 0.0, "lon": 0.0,
                "tags": { "name": "Null Island" }
            }]
        }));
        assert_eq!(normalize(&response, 0.0, 0.0, "park").len(), 1);
    }

    #[test]
    fn distance_is_great_circle_from_the_origin() {
        let response = parse(json!({
            "elements": [{
                "type": "node", "id": 9, "lat": 18.5204, "lon": 73.8567,
                "tags": { "name": "Shaniwar Wada" }
            }]
        }));
        let place = &normalize(&response, 19.0760, 72.8777, "park")[0];
        let expected = crate::types::haversine_km(19.0760, 72.8777, 18.5204, 73.8567);
        assert!((place.distance_km - expected).abs() < 1e-9);
        assert!((place.distance_km - 120.0).abs() < 2.0);
    }

    #[test]
    fn missing_elements_array_is_empty() {
        let response: OverpassResponse = serde_json::from_str(r#"{"version":0.6}"#).unwrap();
        assert!(normalize(&response, 0.0, 0.0, "park").is_empty());
    }

    fn arb_element() -> impl Strategy<Value = Element> {
        (
            any::<i64>(),
            prop::option::of("[a-zA-Z ]{0,12}"),
            -0.1f64..0.1,
            -0.1f64..0.1,
            any::<bool>(),
        )
            .prop_map(|(id, name, dlat, dlon, is_node)| {
                let mut tags = BTreeMap::new();
                if let Some(name) = name {
                    tags.insert("name".to_string(), name);
                }
                let (lat, lon) = (19.0 + dlat, 72.8 + dlon);
                Element {
                    type_field: if is_node { "node" } else { "way" }.to_string(),
                    id,
                    lat: is_node.then_some(lat),
                    lon: is_node.then_some(lon),
                    center: (!is_node).then_some(Center { lat, lon }),
                    tags,
                }
            })
    }

    proptest! {
        #[test]
        fn results_are_sorted_capped_and_named(
            elements in prop::collection::vec(arb_element(), 0..60),
        ) {
            let response = OverpassResponse { elements, ..Default::default() };
            let places = normalize(&response, 19.0, 72.8, "park");

            prop_assert!(places.len() <= MAX_RESULTS);
            for pair in places.windows(2) {
                prop_assert!(pair[0].distance_km <= pair[1].distance_km);
            }
            for place in &places {
                prop_assert!(!place.name.trim().is_empty());
                prop_assert!(place.distance_km >= 0.0);
            }
        }
    }
}
