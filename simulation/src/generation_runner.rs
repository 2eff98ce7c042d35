//! Generation Runner - background thread that serializes advance requests
//!
//! Hosts may ask for a new generation from any thread. Requests go through a
//! single-slot queue and are executed one complete tick at a time.

use std::sync::mpsc::{sync_channel, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::world::{SimulationWorld, TickResult};

enum Command {
    Advance,
    Shutdown,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunnerError {
    #[error("generation runner is not running")]
    Stopped,
}

/// Owns the worker thread that advances a shared world.
pub struct GenerationRunner {
    sender: Option<SyncSender<Command>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl GenerationRunner {
    /// Start the worker.
    ///
    /// # Arguments
    /// * `world` - Shared world; hosts may lock it between ticks to read counters
    /// * `callback` - Called with each tick's result, on the worker thread
    pub fn start<F>(world: Arc<Mutex<SimulationWorld>>, callback: F) -> Self
    where
        F: Fn(TickResult) + Send + 'static,
    {
        let (sender, receiver) = sync_channel::<Command>(1);
        info!("starting generation runner");

        let handle = thread::spawn(move || {
            while let Ok(Command::Advance) = receiver.recv() {
                let tick_result = match world.lock() {
                    Ok(mut w) => w.advance_generation(),
                    Err(_) => {
                        error!("simulation world lock poisoned, stopping runner");
                        break;
                    }
                };
                callback(tick_result);
            }
            info!("generation runner stopped");
        });

        Self {
            sender: Some(sender),
            thread_handle: Some(handle),
        }
    }

    /// Queue one generation step. Blocks while a request is already waiting.
    pub fn request_advance(&self) -> Result<(), RunnerError> {
        let sender = self.sender.as_ref().ok_or(RunnerError::Stopped)?;
        sender.send(Command::Advance).map_err(|_| RunnerError::Stopped)
    }

    /// Finish queued work and stop the worker.
    pub fn stop(&mut self) {
        let Some(sender) = self.sender.take() else {
            return;
        };
        if sender.send(Command::Shutdown).is_err() {
            warn!("generation runner exited before shutdown");
        }
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join(); // Thread panic result intentionally ignored during shutdown
        }
    }

    pub fn is_running(&self) -> bool {
        self.sender.is_some()
    }
}

impl Drop for GenerationRunner {
    fn drop(&mut self) {
        self.stop();
    }
}
