//! Background noise generation with an explicit completion handle.
//!
//! The batch runs on a dedicated rayon pool driven from its own thread.
//! The caller either polls [`NoiseJob::try_complete`] between ticks or
//! blocks on [`NoiseJob::complete`]. Nothing reads the field until one of
//! them hands it over. In-flight batches cannot be cancelled.

use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, TryRecvError, bounded};

use crate::error::TerrainError;
use crate::noise_field::{NoiseField, NoiseSettings};

/// Handle to a noise field being generated in the background.
pub struct NoiseJob {
    receiver: Receiver<Result<NoiseField, TerrainError>>,
    handle: Option<JoinHandle<()>>,
    taken: bool,
}

impl NoiseJob {
    /// Start generating a `size`×`size` field.
    ///
    /// `threads == 0` sizes the worker pool from the CPU count.
    pub fn spawn(size: usize, settings: NoiseSettings, threads: usize) -> Result<Self, TerrainError> {
        let threads = if threads == 0 { num_cpus::get().max(1) } else { threads };
        let (sender, receiver) = bounded(1);

        let handle = std::thread::Builder::new()
            .name("noise-gen".into())
            .spawn(move || {
                let result = run_batch(size, &settings, threads);
                // The receiver may already be gone if the job was dropped.
                let _ = sender.send(result);
            })
            .map_err(TerrainError::Spawn)?;

        tracing::debug!(size, threads, "noise job dispatched");
        Ok(Self {
            receiver,
            handle: Some(handle),
            taken: false,
        })
    }

    /// True once the result is ready to collect.
    pub fn is_complete(&self) -> bool {
        !self.taken && !self.receiver.is_empty()
    }

    /// Non-blocking poll. Returns `None` while the batch is still running.
    pub fn try_complete(&mut self) -> Option<Result<NoiseField, TerrainError>> {
        if self.taken {
            return Some(Err(TerrainError::AlreadyTaken));
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.finish();
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finish();
                Some(Err(TerrainError::WorkerLost))
            }
        }
    }

    /// Block until the batch finishes and take the field.
    pub fn complete(mut self) -> Result<NoiseField, TerrainError> {
        if self.taken {
            return Err(TerrainError::AlreadyTaken);
        }
        let result = self.receiver.recv().map_err(|_| TerrainError::WorkerLost);
        self.finish();
        result?
    }

    fn finish(&mut self) {
        self.taken = true;
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("noise generation thread panicked");
        }
    }
}

fn run_batch(size: usize, settings: &NoiseSettings, threads: usize) -> Result<NoiseField, TerrainError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("noise-worker-{i}"))
        .build()?;
    pool.install(|| NoiseField::generate(size, settings))
}
