//! Email confirmation siren.
//!
//! While both email fields are filled in and differ, a siren loops and the
//! page flashes. It stops the moment they match or either is cleared.

use redtape_common::SoundCue;

use super::outbox::SoundBoard;

/// True when both fields are non-empty and differ
pub fn is_mismatch(email: &str, confirm_email: &str) -> bool {
    !email.is_empty() && !confirm_email.is_empty() && email != confirm_email
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SirenAlarm {
    active: bool,
}

impl SirenAlarm {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Re-evaluate the fields. The siren only starts or stops on a change of
    /// state, never on every keystroke.
    pub fn update(&mut self, email: &str, confirm_email: &str, sound: &dyn SoundBoard) -> bool {
        let mismatch = is_mismatch(email, confirm_email);

        match (self.active, mismatch) {
            (false, true) => {
                sound.set_loop(SoundCue::Siren, true);
                sound.play(SoundCue::Siren);
                tracing::debug!("Email mismatch siren started");
            }
            (true, false) => {
                sound.stop(SoundCue::Siren);
                sound.set_loop(SoundCue::Siren, false);
                tracing::debug!("Email mismatch siren stopped");
            }
            _ => {}
        }

        self.active = mismatch;
        mismatch
    }
}
