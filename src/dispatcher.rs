//! Random sound selection and the play-random entry point.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::backend::{PlaybackBackend, DEFAULT_TIMEOUT};
use crate::category::Category;
use crate::error::SoundError;
use crate::library::SoundLibrary;

/// Pick one candidate with uniform probability.
pub fn select_random<'a, R: Rng + ?Sized>(candidates: &'a [PathBuf], rng: &mut R) -> Result<&'a Path, SoundError> {
    candidates
        .choose(rng)
        .map(PathBuf::as_path)
        .ok_or(SoundError::EmptySelection)
}

/// Outcome of a successful playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackReport {
    pub file: PathBuf,
    pub player: String,
}

pub struct Dispatcher<R: Rng = ThreadRng> {
    library: SoundLibrary,
    backend: Box<dyn PlaybackBackend>,
    rng: R,
    timeout: Duration,
}

impl Dispatcher<ThreadRng> {
    pub fn new(library: SoundLibrary, backend: Box<dyn PlaybackBackend>) -> Self {
        Self::with_rng(library, backend, rand::thread_rng())
    }
}

impl<R: Rng> Dispatcher<R> {
    pub fn with_rng(library: SoundLibrary, backend: Box<dyn PlaybackBackend>, rng: R) -> Self {
        Dispatcher {
            library,
            backend,
            rng,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn library(&self) -> &SoundLibrary {
        &self.library
    }

    /// Choose a file for `category` without playing it.
    pub fn pick(&mut self, category: Category) -> Result<PathBuf, SoundError> {
        let candidates = self.library.candidates(category);
        match select_random(&candidates, &mut self.rng) {
            Ok(file) => Ok(file.to_path_buf()),
            Err(_) => Err(SoundError::NoCandidates { category }),
        }
    }

    /// Play one random sound for `category`. A failed file is not retried.
    pub fn try_play_random(&mut self, category: Category) -> Result<PlaybackReport, SoundError> {
        let file = self.pick(category)?;
        info!("Playing {} via {} backend", file.display(), self.backend.name());
        let player = self.backend.try_play(&file, self.timeout)?;
        Ok(PlaybackReport { file, player })
    }

    pub fn play_random(&mut self, category: Category) -> bool {
        match self.try_play_random(category) {
            Ok(report) => {
                info!("Played {} with {}", report.file.display(), report.player);
                true
            }
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }
}
