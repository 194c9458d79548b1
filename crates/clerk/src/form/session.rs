//! One visitor's form session.

use std::time::Duration;

use chrono::NaiveDate;
use redtape_common::{ClientCue, LocationView, SessionSnapshot};
use tokio::time::Instant;

use super::outbox::{CueOutbox, SoundBoard};
use super::siren::SirenAlarm;
use crate::captcha::{CaptchaSession, Effect, Ticket, Timings};
use crate::dob::BirthDateField;

/// A timer the store still has to arm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub ticket: Ticket,
    pub delay: Duration,
}

/// Everything the form remembers about one visitor, in memory only
#[derive(Debug)]
pub struct FormSession {
    pub captcha: CaptchaSession,
    pub birth_date: BirthDateField,
    pub siren: SirenAlarm,
    pub location: Option<LocationView>,
    pub outbox: CueOutbox,
    last_seen: Instant,
}

impl FormSession {
    pub fn new(timings: Timings, birth_color: &str, outbox_capacity: usize) -> Self {
        Self {
            captcha: CaptchaSession::new(timings),
            birth_date: BirthDateField::new(birth_color),
            siren: SirenAlarm::default(),
            location: None,
            outbox: CueOutbox::new(outbox_capacity),
            last_seen: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }

    /// Update the email pair, starting or stopping the siren
    pub fn update_emails(&mut self, email: &str, confirm_email: &str) -> bool {
        self.siren.update(email, confirm_email, &self.outbox)
    }

    /// Carry out captcha effects. Client-facing ones go to the outbox; timers
    /// are returned for the caller to arm.
    pub fn apply(&mut self, effects: Vec<Effect>) -> Vec<PendingTimer> {
        let mut timers = Vec::new();

        for effect in effects {
            match effect {
                Effect::Sound(cue) => self.outbox.play(cue),
                Effect::Celebrate => self.outbox.push(ClientCue::Confetti),
                Effect::CloseRequested => self.outbox.push(ClientCue::CloseCaptcha),
                Effect::Schedule { ticket, delay } => timers.push(PendingTimer { ticket, delay }),
            }
        }

        timers
    }

    /// Render state for the page and hand over queued cues
    pub fn snapshot(&mut self, today: NaiveDate) -> SessionSnapshot {
        SessionSnapshot {
            captcha: self.captcha.view(),
            birth_date: self.birth_date.view(today),
            email_alert: self.siren.is_active(),
            location: self.location.clone(),
            cues: self.outbox.drain(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redtape_common::{SoundCue, Stage};

    fn session() -> FormSession {
        FormSession::new(Timings::default(), "#8f8f8f", 16)
    }

    #[test]
    fn test_apply_routes_effects() {
        let mut session = session();
        let ticket = Ticket {
            generation: 1,
            timer: crate::captcha::Timer::ClearRound,
        };

        let timers = session.apply(vec![
            Effect::Sound(SoundCue::Win),
            Effect::Celebrate,
            Effect::Schedule { ticket, delay: Duration::from_secs(2) },
            Effect::CloseRequested,
        ]);

        assert_eq!(timers, vec![PendingTimer { ticket, delay: Duration::from_secs(2) }]);
        assert_eq!(
            session.outbox.drain(),
            vec![
                ClientCue::Play { cue: SoundCue::Win },
                ClientCue::Confetti,
                ClientCue::CloseCaptcha,
            ]
        );
    }

    #[test]
    fn test_snapshot_drains_cues() {
        let mut session = session();
        let today = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();

        let effects = session.captcha.open();
        session.apply(effects);
        session.update_emails("a@b.c", "a@b.d");

        let snapshot = session.snapshot(today);
        assert_eq!(snapshot.captcha.stage, Stage::Images);
        assert!(snapshot.email_alert);
        assert_eq!(snapshot.cues.len(), 3);
        assert_eq!(snapshot.birth_date.formatted, "September 18, 1945");
        assert_eq!(snapshot.birth_date.age, 78);

        assert!(session.snapshot(today).cues.is_empty());
    }
}
