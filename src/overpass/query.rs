use crate::error::NearbyError;
use crate::types::category;

/// Seconds the Overpass server may spend on one query.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u32 = 25;

/// Builds the Overpass QL for every place of `category_key` within
/// `radius_m` metres of the point, using the default server-side timeout.
pub fn build_query(
    category_key: &str,
    lat: f64,
    lng: f64,
    radius_m: u32,
) -> Result<String, NearbyError> {
    build_query_with_timeout(category_key, lat, lng, radius_m, DEFAULT_QUERY_TIMEOUT_SECS)
}

/// Every tag of the category becomes a node clause and a way clause, all
/// unioned together. Ways come back with a center point and their tags.
pub fn build_query_with_timeout(
    category_key: &str,
    lat: f64,
    lng: f64,
    radius_m: u32,
    timeout_secs: u32,
) -> Result<String, NearbyError> {
    let category = category(category_key)
        .ok_or_else(|| NearbyError::InvalidCategory(category_key.to_string()))?;

    let around = format!("(around:{radius_m},{lat},{lng})");
    let mut clauses = String::default();
    for (key, value) in category.filters() {
        clauses.push_str(&format!(
            r#"node["{key}"="{value}"]{around};
way["{key}"="{value}"]{around};
"#
        ));
    }

    Ok(format!(
        "[out:json][timeout:{timeout_secs}];\n(\n{clauses});\nout center tags;\n"
    ))
}
