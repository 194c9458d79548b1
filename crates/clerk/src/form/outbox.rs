//! Client cue outbox.
//!
//! The server cannot play audio, so sound requests are queued per session
//! and handed to the page on its next poll. Requests are fire-and-forget:
//! when the queue is full the oldest cue is dropped and the caller never
//! hears about it.

use crossbeam_queue::ArrayQueue;
use redtape_common::{ClientCue, SoundCue};

/// Sound playback collaborator
pub trait SoundBoard: Send + Sync {
    fn play(&self, cue: SoundCue);
    fn set_loop(&self, cue: SoundCue, on: bool);
    fn stop(&self, cue: SoundCue);
}

/// Bounded queue of cues waiting for the page
#[derive(Debug)]
pub struct CueOutbox {
    queue: ArrayQueue<ClientCue>,
}

impl CueOutbox {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity.max(1)),
        }
    }

    pub fn push(&self, cue: ClientCue) {
        if let Some(dropped) = self.queue.force_push(cue) {
            tracing::debug!(?dropped, "Cue outbox full, dropping oldest cue");
        }
    }

    /// Take every queued cue, oldest first
    pub fn drain(&self) -> Vec<ClientCue> {
        std::iter::from_fn(|| self.queue.pop()).collect()
    }
}

impl SoundBoard for CueOutbox {
    fn play(&self, cue: SoundCue) {
        self.push(ClientCue::Play { cue });
    }

    fn set_loop(&self, cue: SoundCue, on: bool) {
        self.push(ClientCue::Loop { cue, on });
    }

    fn stop(&self, cue: SoundCue) {
        self.push(ClientCue::Stop { cue });
    }
}
