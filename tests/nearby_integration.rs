use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};
use estate_nearby::error::{CANCELLED_MESSAGE, INVALID_CATEGORY_MESSAGE, UNAVAILABLE_MESSAGE};
use estate_nearby::overpass::{HttpReply, Transport};
use estate_nearby::{
    CancelFlag, ManualClock, NearbyService, NearbyWorker, OverpassClient, Settings, TransportError,
    haversine_km,
};

const HOSPITALS: &str = r#"{
    "version": 0.6,
    "generator": "Overpass API",
    "elements": [
        {"type": "node", "id": 1, "lat": 19.080, "lon": 72.880,
         "tags": {"amenity": "hospital", "name": "City Hospital", "phone": "+91 22 1234 5678"}},
        {"type": "node", "id": 2, "lat": 19.070, "lon": 72.875,
         "tags": {"amenity": "clinic", "name": "Apollo Clinic",
                  "addr:housenumber": "12", "addr:street": "Hill Road", "addr:city": "Mumbai"}},
        {"type": "node", "id": 3, "lat": 19.075, "lon": 72.876,
         "tags": {"amenity": "hospital"}}
    ]
}"#;

#[derive(Default)]
struct Scripted {
    replies: Mutex<VecDeque<Result<HttpReply, TransportError>>>,
    calls: Mutex<Vec<String>>,
}

impl Scripted {
    fn replying(replies: Vec<Result<HttpReply, TransportError>>) -> Arc<Self> {
        Arc::new(Scripted {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for Scripted {
    fn post_form(
        &self,
        endpoint: &str,
        _query: &str,
        _timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        self.calls.lock().unwrap().push(endpoint.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TransportError::Connection("no scripted reply".into())))
    }
}

fn status(code: u16) -> Result<HttpReply, TransportError> {
    Ok(HttpReply {
        status: code,
        body: String::new(),
    })
}

fn body(json: &str) -> Result<HttpReply, TransportError> {
    Ok(HttpReply {
        status: 200,
        body: json.to_string(),
    })
}

/// Answers with [`HOSPITALS`], but flips the caller's cancel flag while the
/// request is in flight.
struct CancelsMidFlight {
    cancel: CancelFlag,
}

impl Transport for CancelsMidFlight {
    fn post_form(
        &self,
        _endpoint: &str,
        _query: &str,
        _timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        self.cancel.cancel();
        body(HOSPITALS)
    }
}

/// Holds every request until the test sends on the paired channel.
struct Gated {
    release: Receiver<()>,
}

impl Gated {
    fn new() -> (Arc<Self>, Sender<()>) {
        let (open, release) = bounded(8);
        (Arc::new(Gated { release }), open)
    }
}

impl Transport for Gated {
    fn post_form(
        &self,
        _endpoint: &str,
        _query: &str,
        _timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        self.release
            .recv()
            .map_err(|_| TransportError::Connection("gate dropped".into()))?;
        body(HOSPITALS)
    }
}

fn service(transport: Arc<dyn Transport>, clock: ManualClock) -> NearbyService {
    let settings = Settings {
        endpoints: vec!["https://one".into(), "https://two".into(), "https://three".into()],
        ..Settings::default()
    };
    let endpoints = settings.endpoints.clone();
    let client = OverpassClient::with_transport(endpoints, settings.attempt_timeout(), transport);
    NearbyService::with_clock(&settings, client, Arc::new(clock))
}

#[test]
fn hospitals_near_mumbai_are_sorted_and_unnamed_ones_dropped() {
    let transport = Scripted::replying(vec![body(HOSPITALS)]);
    let service = service(transport.clone(), ManualClock::default());

    let response = service.fetch_nearby_places("hospital", 19.0760, 72.8777, Some(3000));

    assert!(response.success);
    assert_eq!(response.from_cache, Some(false));
    let names: Vec<_> = response.data.iter().map(|p| p.name.as_str()).collect();
    // City Hospital is about 0.51 km away, Apollo Clinic about 0.72 km.
    assert_eq!(names, ["City Hospital", "Apollo Clinic"]);
    assert!(response.data[0].distance_km < response.data[1].distance_km);

    let apollo = &response.data[1];
    assert_eq!(apollo.category, "hospital");
    assert_eq!(apollo.address.as_deref(), Some("12 Hill Road, Mumbai"));
    let expected = haversine_km(19.0760, 72.8777, 19.070, 72.875);
    assert!((apollo.distance_km - expected).abs() < 1e-9);
    assert_eq!(response.data[0].phone.as_deref(), Some("+91 22 1234 5678"));
}

#[test]
fn second_lookup_is_served_from_cache() {
    let transport = Scripted::replying(vec![body(HOSPITALS)]);
    let service = service(transport.clone(), ManualClock::default());

    let first = service.fetch_nearby_places("hospital", 19.0760, 72.8777, None);
    let second = service.fetch_nearby_places("hospital", 19.0760, 72.8777, None);

    assert_eq!(first.from_cache, Some(false));
    assert_eq!(second.from_cache, Some(true));
    assert_eq!(first.data, second.data);
    assert_eq!(transport.calls().len(), 1);
}

#[test]
fn overloaded_mirrors_fail_over_to_the_third() {
    let transport = Scripted::replying(vec![status(503), status(503), body(HOSPITALS)]);
    let service = service(transport.clone(), ManualClock::default());

    let response = service.fetch_nearby_places("hospital", 19.0760, 72.8777, None);

    assert!(response.success);
    assert_eq!(response.data.len(), 2);
    assert_eq!(transport.calls(), ["https://one", "https://two", "https://three"]);
}

#[test]
fn all_mirrors_overloaded_gives_a_friendly_message() {
    let transport = Scripted::replying(vec![status(504), status(504), status(504)]);
    let service = service(transport.clone(), ManualClock::default());

    let response = service.fetch_nearby_places("park", 19.0760, 72.8777, None);

    assert!(!response.success);
    assert!(response.data.is_empty());
    assert_eq!(response.error.as_deref(), Some(UNAVAILABLE_MESSAGE));
    assert_eq!(transport.calls().len(), 3);
    assert!(service.cache().is_empty());
}

#[test]
fn unknown_category_never_touches_the_network() {
    let transport = Scripted::replying(Vec::new());
    let service = service(transport.clone(), ManualClock::default());

    let response = service.fetch_nearby_places("not_a_category", 19.07, 72.88, None);

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some(INVALID_CATEGORY_MESSAGE));
    assert!(transport.calls().is_empty());
}

#[test]
fn expired_entries_are_fetched_again() {
    let transport = Scripted::replying(vec![body(HOSPITALS), body(r#"{"elements": []}"#)]);
    let clock = ManualClock::default();
    let service = service(transport.clone(), clock.clone());

    let first = service.fetch_nearby_places("hospital", 19.0760, 72.8777, None);
    clock.advance(chrono::Duration::seconds(299));
    let still_fresh = service.fetch_nearby_places("hospital", 19.0760, 72.8777, None);
    clock.advance(chrono::Duration::seconds(2));
    let refetched = service.fetch_nearby_places("hospital", 19.0760, 72.8777, None);

    assert_eq!(first.data.len(), 2);
    assert_eq!(still_fresh.from_cache, Some(true));
    assert_eq!(refetched.from_cache, Some(false));
    assert!(refetched.data.is_empty());
    assert_eq!(transport.calls().len(), 2);
}

#[test]
fn clearing_the_cache_forces_a_refetch() {
    let transport = Scripted::replying(vec![body(HOSPITALS), body(HOSPITALS)]);
    let service = service(transport.clone(), ManualClock::default());

    service.fetch_nearby_places("hospital", 19.0760, 72.8777, None);
    service.clear_cache();
    let response = service.fetch_nearby_places("hospital", 19.0760, 72.8777, None);

    assert_eq!(response.from_cache, Some(false));
    assert_eq!(transport.calls().len(), 2);
}

#[test]
fn worker_pool_answers_off_thread() {
    let transport = Scripted::replying(vec![body(HOSPITALS)]);
    let service = Arc::new(service(transport.clone(), ManualClock::default()));
    let worker = NearbyWorker::new(service, 2);

    let pending = worker.queue_request("hospital", 19.0760, 72.8777, Some(3000));
    let response = pending.wait();

    assert!(response.success);
    assert_eq!(response.data.len(), 2);
}

#[test]
fn lookup_cancelled_in_flight_is_not_cached() {
    let cancel = CancelFlag::new();
    let transport = Arc::new(CancelsMidFlight {
        cancel: cancel.clone(),
    });
    let service = service(transport, ManualClock::default());

    let response = service.fetch_with_cancel("hospital", 19.0760, 72.8777, None, Some(&cancel));

    assert!(!response.success);
    assert!(response.data.is_empty());
    assert_eq!(response.error.as_deref(), Some(CANCELLED_MESSAGE));
    assert!(service.cache().is_empty());
}

#[test]
fn queued_ticket_cancelled_before_it_runs() {
    let (transport, open) = Gated::new();
    let worker = NearbyWorker::new(Arc::new(service(transport, ManualClock::default())), 1);

    // The single thread is stuck on `busy` until the gate opens, so
    // `waiting` is still queued when it is cancelled.
    let busy = worker.queue_request("hospital", 19.0760, 72.8777, None);
    let waiting = worker.queue_request("park", 19.0760, 72.8777, None);
    waiting.cancel();
    open.send(()).unwrap();

    assert!(busy.wait().success);
    let response = waiting.wait();
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some(CANCELLED_MESSAGE));
}

#[test]
fn try_result_is_empty_until_the_lookup_finishes() {
    let (transport, open) = Gated::new();
    let worker = NearbyWorker::new(Arc::new(service(transport, ManualClock::default())), 1);

    let pending = worker.queue_request("hospital", 19.0760, 72.8777, None);
    assert_eq!(pending.try_result(), None);

    open.send(()).unwrap();
    let mut result = None;
    for _ in 0..500 {
        result = pending.try_result();
        if result.is_some() {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    let response = result.expect("lookup did not finish within five seconds");
    assert!(response.success);
    assert_eq!(response.data.len(), 2);
}
