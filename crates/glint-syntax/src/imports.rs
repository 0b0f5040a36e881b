//! The import-coordinator seam.
//!
//! On recognizing an import spec the parser does not load the file
//! itself: it emits an [`ImportRequest`] to the external source-file
//! coordinator and keeps parsing. Each request carries a completion
//! signal the coordinator fires once the imported file has been loaded,
//! so later phases can await resolution without the parser ever
//! blocking. Scheduling, deduplication, and cycle detection are the
//! coordinator's business.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TryRecvError};
use glint_common::SrcSpan;

/// A request to load an imported file.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    /// The import path, as written in the source.
    pub path: String,
    /// The file whose parse produced this request.
    pub requesting_file: String,
    /// Where the import path appeared.
    pub span: SrcSpan,
    /// Fired (or dropped) by the coordinator when the import is loaded.
    pub done: Sender<()>,
}

/// An awaitable handle for one import request.
#[derive(Debug)]
pub struct ImportHandle {
    /// The path this handle is waiting on.
    pub path: String,
    done: Receiver<()>,
}

impl ImportHandle {
    /// Block until the coordinator has finished with this import.
    /// A coordinator that hung up counts as finished.
    pub fn wait(&self) {
        let _ = self.done.recv();
    }

    /// Check for completion without blocking.
    pub fn is_done(&self) -> bool {
        !matches!(self.done.try_recv(), Err(TryRecvError::Empty))
    }
}

/// The parser's sending end of the coordinator queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ImportQueue {
    requests: Sender<ImportRequest>,
}

impl ImportQueue {
    /// Create a queue, returning the receiving end for the coordinator.
    pub fn new() -> (Self, Receiver<ImportRequest>) {
        let (tx, rx) = unbounded();
        (Self { requests: tx }, rx)
    }

    /// Ask the coordinator to load `path`. Fire-and-forget for the
    /// caller; the returned handle becomes ready when the coordinator
    /// finishes. If the coordinator has hung up the handle is ready
    /// immediately.
    pub fn request(
        &self,
        path: impl Into<String>,
        requesting_file: impl Into<String>,
        span: SrcSpan,
    ) -> ImportHandle {
        let (done, done_rx) = bounded(1);
        let path = path.into();
        let _ = self.requests.send(ImportRequest {
            path: path.clone(),
            requesting_file: requesting_file.into(),
            span,
            done,
        });
        ImportHandle {
            path,
            done: done_rx,
        }
    }
}
