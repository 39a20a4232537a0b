use std::collections::BTreeMap;

use serde::Serialize;

/// A place category shown as a filter chip next to a listing's map.
///
/// `tags` are `key=value` OSM filters. A place matching any one of them
/// belongs to the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub tags: &'static [&'static str],
}

impl Category {
    /// Splits every tag into its `(key, value)` pair.
    pub fn filters(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.tags.iter().filter_map(|tag| tag.split_once('='))
    }
}

pub static CATEGORIES: [Category; 11] = [
    Category {
        key: "cinema",
        label: "Movie Theatre",
        icon: "bi-film",
        color: "#E91E63",
        tags: &["amenity=cinema"],
    },
    Category {
        key: "hospital",
        label: "Hospital",
        icon: "bi-hospital",
        color: "#F44336",
        tags: &["amenity=hospital", "amenity=clinic"],
    },
    Category {
        key: "school",
        label: "School",
        icon: "bi-book",
        color: "#2196F3",
        tags: &["amenity=school"],
    },
    Category {
        key: "college",
        label: "College",
        icon: "bi-mortarboard",
        color: "#9C27B0",
        tags: &["amenity=college", "amenity=university"],
    },
    Category {
        key: "restaurant",
        label: "Restaurant",
        icon: "bi-shop",
        color: "#FF9800",
        tags: &["amenity=restaurant"],
    },
    Category {
        key: "cafe",
        label: "Cafe",
        icon: "bi-cup-hot",
        color: "#795548",
        tags: &["amenity=cafe"],
    },
    Category {
        key: "mall",
        label: "Mall",
        icon: "bi-bag",
        color: "#4CAF50",
        tags: &["shop=mall", "shop=supermarket"],
    },
    Category {
        key: "bus_stop",
        label: "Bus Stop",
        icon: "bi-bus-front",
        color: "#3F51B5",
        tags: &["highway=bus_stop", "amenity=bus_station"],
    },
    Category {
        key: "metro",
        label: "Metro/Railway",
        icon: "bi-train-front",
        color: "#673AB7",
        tags: &["railway=station", "station=subway"],
    },
    Category {
        key: "park",
        label: "Park",
        icon: "bi-tree",
        color: "#8BC34A",
        tags: &["leisure=park", "leisure=garden"],
    },
    Category {
        key: "gym",
        label: "Gym",
        icon: "bi-bicycle",
        color: "#FF5722",
        tags: &["leisure=fitness_centre", "amenity=gym"],
    },
];

/// Looks a category up by key.
pub fn category(key: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.key == key)
}

/// Every category keyed by its identifier.
pub fn categories() -> BTreeMap<&'static str, &'static Category> {
    CATEGORIES.iter().map(|c| (c.key, c)).collect()
}
