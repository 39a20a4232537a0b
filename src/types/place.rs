use serde::{Deserialize, Serialize};

/// A named place near a listing, ready for a map marker or list row.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// OSM element id. Nodes and ways share the number space, so this is
    /// not unique across element types or categories.
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub distance_km: f64,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
}

/// The result handed to UI code. Failures are data, not errors.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResponse {
    pub success: bool,
    pub data: Vec<Place>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
}

impl NearbyResponse {
    pub fn found(data: Vec<Place>, from_cache: bool) -> Self {
        NearbyResponse {
            success: true,
            data,
            error: None,
            from_cache: Some(from_cache),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        NearbyResponse {
            success: false,
            data: Vec::new(),
            error: Some(message.into()),
            from_cache: None,
        }
    }
}
