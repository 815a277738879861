//! Idle timeout for control-surface visibility
//!
//! Owns its own timer task: started once on construction, stopped once via
//! [`IdleTimeout::stop`] (or drop). Consumers report activity with
//! [`IdleTimeout::touch`] and watch the active flag; the flag flips to
//! `false` after the configured window passes without activity.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

pub struct IdleTimeout {
    activity_tx: mpsc::UnboundedSender<()>,
    active_rx: watch::Receiver<bool>,
    cancel: CancellationToken,
}

impl IdleTimeout {
    /// Start the timer task. The active flag begins as `true`.
    #[must_use]
    pub fn start(timeout: Duration) -> Self {
        let (activity_tx, mut activity_rx) = mpsc::unbounded_channel::<()>();
        let (active_tx, active_rx) = watch::channel(true);
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = task_cancel.cancelled() => break,
                    received = activity_rx.recv() => {
                        if received.is_none() {
                            break;
                        }
                        active_tx.send_replace(true);
                    }
                    () = tokio::time::sleep(timeout) => {
                        active_tx.send_replace(false);
                        // Idle: wait for the next activity before rearming.
                        tokio::select! {
                            () = task_cancel.cancelled() => break,
                            received = activity_rx.recv() => {
                                if received.is_none() {
                                    break;
                                }
                                active_tx.send_replace(true);
                            }
                        }
                    }
                }
            }
        });

        Self {
            activity_tx,
            active_rx,
            cancel,
        }
    }

    /// Report activity, resetting the idle window.
    pub fn touch(&self) {
        let _ = self.activity_tx.send(());
    }

    /// Watch channel of the active flag.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.active_rx.clone()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        *self.active_rx.borrow()
    }

    /// Stop the timer task. Safe to call more than once.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for IdleTimeout {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
