//! One-shot stop signal for the unbounded build loop.
//!
//! The handle side is fired at most once (typically by a stdin listener); the
//! builder polls the signal side between iterations without blocking.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;

/// Create a connected handle/signal pair.
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = oneshot::channel();
    (StopHandle { tx }, StopSignal { rx, fired: false })
}

#[derive(Debug)]
pub struct StopHandle {
    tx: oneshot::Sender<()>,
}

impl StopHandle {
    /// Fire the signal. Returns `false` if the signal side is already gone.
    pub fn fire(self) -> bool {
        self.tx.send(()).is_ok()
    }
}

#[derive(Debug)]
pub struct StopSignal {
    rx: oneshot::Receiver<()>,
    fired: bool,
}

impl StopSignal {
    /// Non-blocking check. Once fired, stays fired. A handle dropped without
    /// firing never fires.
    pub fn is_fired(&mut self) -> bool {
        if !self.fired {
            match self.rx.try_recv() {
                Ok(()) => self.fired = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => {}
            }
        }
        self.fired
    }
}

/// Fire `handle` once a line (or end of input) arrives on `reader`.
pub fn spawn_line_listener<R>(reader: R, handle: StopHandle) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut line = String::new();
        if let Err(e) = BufReader::new(reader).read_line(&mut line).await {
            tracing::debug!(error = %e, "stop listener read failed");
        }
        tracing::info!("stop requested, finishing current record");
        handle.fire();
    })
}
