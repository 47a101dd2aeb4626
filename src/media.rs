//! Audio output abstraction
//!
//! Card audio cues are short encoded clips fetched by the scheduler. The
//! player starts them without blocking the input loop; `stop` returns only
//! once the device is silent.

mod player;

pub use player::RodioPlayer;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("audio device unavailable: {0}")]
    Device(String),

    #[error("audio playback thread stopped")]
    ThreadGone,
}

/// Output device seam for card audio cues
pub trait AudioPlayer: Send + Sync {
    /// Schedule the clips for playback in order and return immediately.
    /// A clip already playing is cut off first.
    fn play(&self, clips: Vec<Vec<u8>>) -> Result<(), MediaError>;

    /// Stop playback. The device is silent when this returns; calling it
    /// while idle is a no-op.
    fn stop(&self);
}
