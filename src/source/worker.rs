//! Background fetch worker.
//!
//! Owns a record source on its own thread so loads, page fetches and
//! exports never block the terminal event loop. Requests are executed in
//! the order they were submitted; responses come back over a channel in
//! that same order and are drained by the event loop with
//! [`FetchWorker::try_recv`].

use crate::source::RecordSource;
use crate::state::request::{FetchRequest, FetchResponse};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, warn};

/// Handle to the fetch thread.
#[derive(Debug)]
pub struct FetchWorker {
    requests: Option<Sender<FetchRequest>>,
    responses: Receiver<FetchResponse>,
    handle: Option<JoinHandle<()>>,
}

impl FetchWorker {
    /// Move `source` onto a new worker thread.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn<S>(mut source: S) -> std::io::Result<Self>
    where
        S: RecordSource + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<FetchRequest>();
        let (response_tx, response_rx) = mpsc::channel::<FetchResponse>();

        let handle = std::thread::Builder::new()
            .name("venture-fetch".to_string())
            .spawn(move || {
                for request in request_rx {
                    debug!(seq = %request.seq, kind = ?request.kind, "Executing fetch");
                    let response = request.execute(&mut source);
                    if response_tx.send(response).is_err() {
                        break;
                    }
                }
                debug!("Fetch worker exiting");
            })?;

        Ok(Self {
            requests: Some(request_tx),
            responses: response_rx,
            handle: Some(handle),
        })
    }

    /// Queue a request.
    ///
    /// # Errors
    ///
    /// If the worker thread is gone, returns the failure response the
    /// request would have produced so the caller can complete it anyway.
    pub fn submit(&self, request: FetchRequest) -> Result<(), Box<FetchResponse>> {
        match &self.requests {
            Some(tx) => tx.send(request).map_err(|e| {
                warn!("Fetch worker is gone");
                Box::new(e.0.unavailable())
            }),
            None => Err(Box::new(request.unavailable())),
        }
    }

    /// Next finished response, if any. Never blocks.
    pub fn try_recv(&self) -> Option<FetchResponse> {
        match self.responses.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next response.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FetchResponse> {
        match self.responses.recv_timeout(timeout) {
            Ok(response) => Some(response),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
