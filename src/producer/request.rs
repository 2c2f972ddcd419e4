//! Pending publish requests

use crate::producer::error::{ProduceError, ProduceResult};
use tokio::sync::oneshot;

/// One record waiting to be written
///
/// Owned by the queue until the dispatcher takes it, then by exactly one
/// write attempt. [`ProduceRequest::finish`] consumes the request, so a
/// request can only ever be resolved once.
#[derive(Debug)]
pub(crate) struct ProduceRequest {
    pub(crate) partition_key: String,
    pub(crate) payload: Vec<u8>,
    response: oneshot::Sender<ProduceResult<()>>,
}

impl ProduceRequest {
    /// Build a request together with the receiver its caller waits on
    pub(crate) fn new(
        partition_key: String,
        payload: Vec<u8>,
    ) -> (Self, oneshot::Receiver<ProduceResult<()>>) {
        let (response, receiver) = oneshot::channel();
        (
            Self {
                partition_key,
                payload,
                response,
            },
            receiver,
        )
    }

    /// Resolve the request and unblock its caller
    pub(crate) fn finish(self, result: ProduceResult<()>) {
        if self.response.send(result).is_err() {
            log::debug!(
                "caller for partition key {} went away before completion",
                self.partition_key
            );
        }
    }

    pub(crate) fn reject(self, error: ProduceError) {
        self.finish(Err(error));
    }
}
