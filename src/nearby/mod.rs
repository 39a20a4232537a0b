//! # Nearby places
//!
//! The entry point UI code calls when someone opens the "what's around"
//! panel of a listing.
//!
//! A lookup checks the cache, builds the Overpass query for the category,
//! walks the mirror list, normalizes the answer and stores it. Every failure
//! comes back as a [`NearbyResponse`] with `success: false`, so callers never
//! deal with errors.
//!
//! Identical concurrent lookups are not coalesced; both go to the network
//! and the later store wins.

mod worker;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

pub use worker::*;

use crate::cache::{Clock, PlaceCache, SystemClock};
use crate::error::NearbyError;
use crate::overpass::{CancelFlag, OverpassClient, build_query_with_timeout, normalize};
use crate::settings::Settings;
use crate::types::{Category, NearbyResponse, Place, categories};

/// Places found for one lookup, and whether they came from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPlaces {
    pub places: Vec<Place>,
    pub from_cache: bool,
}

pub struct NearbyService {
    client: OverpassClient,
    cache: PlaceCache,
    query_timeout_secs: u32,
    default_radius_m: u32,
}

impl Default for NearbyService {
    fn default() -> Self {
        NearbyService::new(&Settings::default())
    }
}

impl NearbyService {
    pub fn new(settings: &Settings) -> Self {
        NearbyService::with_parts(
            OverpassClient::from_settings(settings),
            PlaceCache::new(settings.cache_ttl(), Arc::new(SystemClock)),
            settings,
        )
    }

    /// Builds a service around an injected client and cache, which is how
    /// tests swap in scripted transports and manual clocks.
    pub fn with_parts(client: OverpassClient, cache: PlaceCache, settings: &Settings) -> Self {
        NearbyService {
            client,
            cache,
            query_timeout_secs: settings.query_timeout_secs,
            default_radius_m: settings.default_radius_m,
        }
    }

    pub fn with_clock(settings: &Settings, client: OverpassClient, clock: Arc<dyn Clock>) -> Self {
        NearbyService::with_parts(client, PlaceCache::new(settings.cache_ttl(), clock), settings)
    }

    pub fn default_radius_m(&self) -> u32 {
        self.default_radius_m
    }

    pub fn categories(&self) -> BTreeMap<&'static str, &'static Category> {
        categories()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("nearby places cache cleared");
    }

    pub fn cache(&self) -> &PlaceCache {
        &self.cache
    }

    /// Nearby places of `category` around the point. `radius_m` defaults to
    /// the configured radius (3 km).
    pub fn fetch_nearby_places(
        &self,
        category: &str,
        lat: f64,
        lng: f64,
        radius_m: Option<u32>,
    ) -> NearbyResponse {
        self.fetch_with_cancel(category, lat, lng, radius_m, None)
    }

    pub fn fetch_with_cancel(
        &self,
        category: &str,
        lat: f64,
        lng: f64,
        radius_m: Option<u32>,
        cancel: Option<&CancelFlag>,
    ) -> NearbyResponse {
        match self.try_fetch_nearby_places(category, lat, lng, radius_m, cancel) {
            Ok(found) => NearbyResponse::found(found.places, found.from_cache),
            Err(err) => {
                warn!(category, error = %err, "nearby lookup failed");
                NearbyResponse::failed(err.user_message())
            }
        }
    }

    /// Same lookup with the error kept, for callers that want to branch on it.
    pub fn try_fetch_nearby_places(
        &self,
        category: &str,
        lat: f64,
        lng: f64,
        radius_m: Option<u32>,
        cancel: Option<&CancelFlag>,
    ) -> Result<NearbyPlaces, NearbyError> {
        let radius_m = radius_m.unwrap_or(self.default_radius_m);
        let key = PlaceCache::key(category, lat, lng, radius_m);

        if let Some(places) = self.cache.get(&key) {
            debug!(key = %key, count = places.len(), "nearby cache hit");
            return Ok(NearbyPlaces {
                places,
                from_cache: true,
            });
        }
        debug!(key = %key, "nearby cache miss");

        let query =
            build_query_with_timeout(category, lat, lng, radius_m, self.query_timeout_secs)?;
        debug!(query = %query, "built overpass query");

        let response = self.client.query(&query, cancel)?;
        let places = normalize(&response, lat, lng, category);

        if cancel.is_some_and(CancelFlag::is_cancelled) {
            return Err(NearbyError::Cancelled);
        }

        info!(category, count = places.len(), "nearby places found");
        self.cache.put(key, places.clone());
        Ok(NearbyPlaces {
            places,
            from_cache: false,
        })
    }
}
