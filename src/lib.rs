//! Plays a random sound for an event category through the host's native
//! audio player. Used by the `play-sound` binary.

pub mod backend;
pub mod category;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod library;

pub use backend::{PlaybackBackend, Platform};
pub use category::Category;
pub use dispatcher::{select_random, Dispatcher, PlaybackReport};
pub use error::{PlaybackError, SoundError};
pub use library::SoundLibrary;
