//! Nearby places and home-finance helpers for property listings.
//!
//! [`NearbyService`] answers "what cinemas, hospitals, parks... are within a
//! few kilometres of this flat" from OpenStreetMap via the public Overpass
//! mirrors, with failover between mirrors and a short-lived in-memory cache.
//! [`finance`] holds the loan and rental calculators shown beside a listing.

pub mod cache;
pub mod error;
pub mod finance;
pub mod geojson;
pub mod logging;
pub mod nearby;
pub mod overpass;
pub mod settings;
pub mod types;

pub use cache::{Clock, ManualClock, PlaceCache, SystemClock};
pub use error::{NearbyError, TransportError};
pub use nearby::{NearbyPlaces, NearbyService, NearbyWorker, PendingNearby};
pub use overpass::{CancelFlag, OverpassClient};
pub use settings::{Settings, SettingsError};
pub use types::{CATEGORIES, Category, NearbyResponse, Place, categories, category, haversine_km};
