use crate::core::{Blockchain, CancelHandle, MineOutcome};
use log::{debug, error, info};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Periodic mining trigger running on its own thread.
///
/// Cycles never overlap: each tick calls [`Blockchain::try_mine_with`], which
/// holds the ledger write lock for the whole cycle. Stopping or dropping the
/// scheduler trips its own cancel handle, so an in-flight search ends without
/// shutting the ledger down.
pub struct MiningScheduler {
    cancel: CancelHandle,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<usize>>,
}

impl MiningScheduler {
    pub fn start(ledger: Arc<Blockchain>, interval: Duration) -> MiningScheduler {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let cancel = CancelHandle::new();
        let cycle_cancel = cancel.clone();
        info!("Starting scheduled mining every {interval:?}");

        let handle = thread::spawn(move || {
            let mut sealed = 0usize;
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if ledger.is_shut_down() {
                            debug!("Ledger shut down, scheduled mining exits");
                            break;
                        }
                        match ledger.try_mine_with(&cycle_cancel) {
                            Ok(MineOutcome::Sealed { .. }) => sealed += 1,
                            Ok(MineOutcome::EmptyPool) => {}
                            Ok(MineOutcome::Cancelled) => break,
                            Err(e) => error!("Scheduled mining failed: {e}"),
                        }
                    }
                    // Explicit stop or the scheduler was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            info!("Scheduled mining stopped after {sealed} blocks");
            sealed
        });

        MiningScheduler {
            cancel,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Signal the thread and wait for it; returns the number of blocks it sealed
    pub fn stop(mut self) -> usize {
        self.shutdown()
    }

    fn shutdown(&mut self) -> usize {
        self.cancel.cancel();
        if let Some(stop_tx) = self.stop_tx.take() {
            // The receiver is gone only if the thread already exited
            let _ = stop_tx.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                error!("Scheduled mining thread panicked");
                0
            }),
            None => 0,
        }
    }
}

impl Drop for MiningScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
