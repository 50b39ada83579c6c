//! Ctrl-C handling.
//!
//! Prompts block on stdin, so an interrupt cannot reach the code waiting for an answer. A
//! separate task waits for the signal and ends the process with [`INTERRUPTED_EXIT_CODE`].

use std::future::Future;
use std::io;

use tokio::task::JoinHandle;
use tracing::{error, warn};

/// Conventional exit status for a process ended by SIGINT.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Starts the watcher on the current runtime. Call it before any prompt is shown.
pub fn spawn_watcher() -> JoinHandle<()> {
    tokio::spawn(watch(tokio::signal::ctrl_c(), || {
        std::process::exit(INTERRUPTED_EXIT_CODE)
    }))
}

/// Waits for `signal` and runs `on_interrupt` once it fires.
pub async fn watch<S, F>(signal: S, on_interrupt: F)
where
    S: Future<Output = io::Result<()>>,
    F: FnOnce(),
{
    match signal.await {
        Ok(()) => {
            warn!("Interrupted by user, exiting");
            println!();
            println!("Exiting. Goodbye!");
            on_interrupt();
        }
        Err(e) => error!(error = %e, "Could not listen for Ctrl-C"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn interrupt_runs_the_exit_action() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        watch(async { Ok(()) }, move || flag.store(true, Ordering::SeqCst)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn listener_failure_leaves_the_process_running() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        watch(
            async { Err(io::Error::new(io::ErrorKind::Other, "no signal support")) },
            move || flag.store(true, Ordering::SeqCst),
        )
        .await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn watcher_waits_for_the_signal() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let task = tokio::spawn(watch(
            async move { rx.await.map_err(|e| io::Error::new(io::ErrorKind::Other, e)) },
            move || flag.store(true, Ordering::SeqCst),
        ));
        tokio::task::yield_now().await;
        assert!(!fired.load(Ordering::SeqCst));
        tx.send(()).unwrap();
        task.await.unwrap();
        assert!(fired.load(Ordering::SeqCst));
    }
}
