use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded, unbounded};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::NearbyService;
use crate::error::CANCELLED_MESSAGE;
use crate::overpass::CancelFlag;
use crate::types::NearbyResponse;

/// Runs nearby lookups on a small pool of threads so the caller's thread
/// (typically a UI loop) never blocks on the network.
pub struct NearbyWorker {
    queue: Option<Sender<NearbyRequest>>,
    threads: Vec<JoinHandle<()>>,
}

struct NearbyRequest {
    id: Uuid,
    category: String,
    lat: f64,
    lng: f64,
    radius_m: Option<u32>,
    cancel: CancelFlag,
    tx: Sender<NearbyResponse>,
}

/// Handle to one queued lookup.
pub struct PendingNearby {
    id: Uuid,
    cancel: CancelFlag,
    rx: Receiver<NearbyResponse>,
}

impl PendingNearby {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stops the lookup before its next mirror attempt. A cancelled lookup
    /// is never cached.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Blocks until the lookup finishes.
    pub fn wait(self) -> NearbyResponse {
        self.rx
            .recv()
            .unwrap_or_else(|_| NearbyResponse::failed(CANCELLED_MESSAGE))
    }

    /// `None` while the lookup is still running.
    pub fn try_result(&self) -> Option<NearbyResponse> {
        match self.rx.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(NearbyResponse::failed(CANCELLED_MESSAGE)),
        }
    }
}

impl NearbyWorker {
    pub fn new(service: Arc<NearbyService>, max_workers: usize) -> Self {
        let (queue, jobs) = unbounded::<NearbyRequest>();
        let mut threads = Vec::new();
        for index in 0..max_workers.max(1) {
            let jobs = jobs.clone();
            let service = service.clone();
            match std::thread::Builder::new()
                .name(format!("nearby-worker-{index}"))
                .spawn(move || run(&service, &jobs))
            {
                Ok(thread) => threads.push(thread),
                Err(err) => warn!(index, error = %err, "could not start nearby worker thread"),
            }
        }
        if threads.is_empty() {
            error!("no nearby worker threads running, lookups will report cancellation");
        }

        NearbyWorker {
            queue: Some(queue),
            threads,
        }
    }

    pub fn queue_request(
        &self,
        category: &str,
        lat: f64,
        lng: f64,
        radius_m: Option<u32>,
    ) -> PendingNearby {
        let (tx, rx) = bounded(1);
        let id = Uuid::new_v4();
        let cancel = CancelFlag::new();
        let request = NearbyRequest {
            id,
            category: category.to_string(),
            lat,
            lng,
            radius_m,
            cancel: cancel.clone(),
            tx,
        };

        if let Some(queue) = &self.queue {
            if queue.send(request).is_ok() {
                debug!(%id, category, "queued nearby request");
            }
        }

        PendingNearby { id, cancel, rx }
    }
}

impl Drop for NearbyWorker {
    fn drop(&mut self) {
        // Closing the queue lets every thread finish its current job and exit.
        self.queue.take();
        for thread in self.threads.drain(..) {
            let _ = thread.join();
        }
    }
}

fn run(service: &NearbyService, jobs: &Receiver<NearbyRequest>) {
    for request in jobs.iter() {
        if request.cancel.is_cancelled() {
            info!(id = %request.id, "skipping cancelled nearby request");
            let _ = request.tx.send(NearbyResponse::failed(CANCELLED_MESSAGE));
            continue;
        }
        let response = service.fetch_with_cancel(
            &request.category,
            request.lat,
            request.lng,
            request.radius_m,
            Some(&request.cancel),
        );
        let _ = request.tx.send(response);
    }
}
