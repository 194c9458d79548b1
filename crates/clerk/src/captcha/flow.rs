//! The captcha gauntlet state machine.
//!
//! ```text
//! Hidden → Images ──(exact hydrant set)──→ Rps ──(3rd win)──→ Complete
//!             ↑  └─(anything else: clear, retry)   └─(loss/tie: next round)
//! ```
//!
//! Every input and every timer returns a list of [`Effect`]s for the shell to
//! carry out. Timers are handed out as [`Ticket`]s stamped with the session
//! generation; a ticket from an earlier generation is ignored when it fires.

use std::collections::BTreeSet;
use std::time::Duration;

use rand::Rng;
use redtape_common::constants::{REQUIRED_RPS_WINS, copy, delays};
use redtape_common::{CaptchaView, Choice, RedTapeError, RoundOutcome, SoundCue, Stage};

use super::catalog;

/// Delayed transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Image "checking" pause is over, compare the selection
    ImagesChecked,
    /// Success banner shown long enough, start rock-paper-scissors
    AdvanceToRps,
    /// Show the bot's move
    RevealBot,
    /// Decide the round
    ResolveRound,
    /// Clear the finished round
    ClearRound,
    /// Ask the page to close the modal
    AutoClose,
}

/// A pending timer, valid only for the generation it was issued in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub timer: Timer,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Sound(SoundCue),
    /// Confetti on a round win
    Celebrate,
    /// Fire `ticket` back into the session after `delay`
    Schedule { ticket: Ticket, delay: Duration },
    /// The modal should close itself
    CloseRequested,
}

/// Delay for each timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub image_check: Duration,
    pub advance_to_rps: Duration,
    pub bot_reveal: Duration,
    pub round_resolve: Duration,
    pub round_clear: Duration,
    pub auto_close: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            image_check: Duration::from_millis(delays::IMAGE_CHECK_MS),
            advance_to_rps: Duration::from_millis(delays::ADVANCE_TO_RPS_MS),
            bot_reveal: Duration::from_millis(delays::BOT_REVEAL_MS),
            round_resolve: Duration::from_millis(delays::ROUND_RESOLVE_MS),
            round_clear: Duration::from_millis(delays::ROUND_CLEAR_MS),
            auto_close: Duration::from_millis(delays::AUTO_CLOSE_MS),
        }
    }
}

/// Draw the bot's move uniformly
pub fn draw_bot_move<R: Rng>(rng: &mut R) -> Choice {
    Choice::ALL[rng.random_range(0..Choice::ALL.len())]
}

/// One visitor's captcha, owned by their form session
#[derive(Debug, Clone)]
pub struct CaptchaSession {
    timings: Timings,
    generation: u64,
    stage: Stage,
    selected: BTreeSet<u8>,
    checking: bool,
    images_passed: bool,
    rps_wins: u8,
    player_choice: Option<Choice>,
    /// Drawn at the moment of play, hidden until the reveal timer
    pending_bot: Option<Choice>,
    bot_choice: Option<Choice>,
    outcome: Option<RoundOutcome>,
    prompt: Option<&'static str>,
}

impl CaptchaSession {
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            generation: 0,
            stage: Stage::Hidden,
            selected: BTreeSet::new(),
            checking: false,
            images_passed: false,
            rps_wins: 0,
            player_choice: None,
            pending_bot: None,
            bot_choice: None,
            outcome: None,
            prompt: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn selected(&self) -> &BTreeSet<u8> {
        &self.selected
    }

    pub fn player_choice(&self) -> Option<Choice> {
        self.player_choice
    }

    pub fn bot_choice(&self) -> Option<Choice> {
        self.bot_choice
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn prompt(&self) -> Option<&'static str> {
        self.prompt
    }

    /// Open (or reopen) the challenge with a clean slate.
    ///
    /// Bumps the generation, so timers from any earlier session go stale.
    pub fn open(&mut self) -> Vec<Effect> {
        self.reset();
        self.stage = Stage::Images;

        tracing::debug!(generation = self.generation, "Captcha opened");

        vec![Effect::Sound(SoundCue::Click)]
    }

    /// Close the modal. Only allowed once the gauntlet is complete; closing
    /// an already hidden captcha is a no-op.
    pub fn close(&mut self) -> Result<Vec<Effect>, RedTapeError> {
        match self.stage {
            Stage::Hidden => Ok(Vec::new()),
            Stage::Complete => {
                self.reset();
                tracing::debug!(generation = self.generation, "Captcha closed");
                Ok(Vec::new())
            }
            stage => Err(RedTapeError::NotPermitted(format!(
                "captcha cannot be closed during {stage:?}"
            ))),
        }
    }

    /// Add or remove an image from the selection
    pub fn toggle(&mut self, id: u8) -> Result<Vec<Effect>, RedTapeError> {
        if catalog::find(id).is_none() {
            return Err(RedTapeError::UnknownImage(id));
        }

        if !self.accepting_images() {
            return Ok(Vec::new());
        }

        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }

        Ok(vec![Effect::Sound(SoundCue::Click)])
    }

    /// Submit the current selection. Ignored while a previous submission is
    /// still being checked.
    pub fn submit_images(&mut self) -> Vec<Effect> {
        if !self.accepting_images() {
            return Vec::new();
        }

        self.checking = true;
        self.prompt = Some(copy::CHECKING_IMAGES);

        tracing::debug!(
            generation = self.generation,
            selected = ?self.selected,
            "Captcha images submitted"
        );

        vec![
            Effect::Sound(SoundCue::Click),
            self.schedule(Timer::ImagesChecked, self.timings.image_check),
        ]
    }

    /// Play one rock-paper-scissors move. Ignored outside the Rps stage and
    /// while the current round is still pending or on screen.
    pub fn play<R: Rng>(&mut self, choice: Choice, rng: &mut R) -> Vec<Effect> {
        if self.stage != Stage::Rps || self.player_choice.is_some() {
            return Vec::new();
        }

        self.player_choice = Some(choice);
        self.pending_bot = Some(draw_bot_move(rng));
        self.bot_choice = None;
        self.outcome = None;
        self.prompt = None;

        vec![
            Effect::Sound(SoundCue::Click),
            self.schedule(Timer::RevealBot, self.timings.bot_reveal),
        ]
    }

    /// Apply a timer that has come due
    pub fn fire(&mut self, ticket: Ticket) -> Vec<Effect> {
        if ticket.generation != self.generation {
            tracing::trace!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                timer = ?ticket.timer,
                "Stale captcha timer ignored"
            );
            return Vec::new();
        }

        match ticket.timer {
            Timer::ImagesChecked => self.check_images(),
            Timer::AdvanceToRps => self.advance_to_rps(),
            Timer::RevealBot => self.reveal_bot(),
            Timer::ResolveRound => self.resolve_round(),
            Timer::ClearRound => self.clear_round(),
            Timer::AutoClose if self.stage == Stage::Complete => vec![Effect::CloseRequested],
            Timer::AutoClose => Vec::new(),
        }
    }

    pub fn view(&self) -> CaptchaView {
        CaptchaView {
            stage: self.stage,
            selected: self.selected.iter().copied().collect(),
            checking: self.checking,
            images_passed: self.images_passed,
            rps_wins: self.rps_wins,
            required_wins: REQUIRED_RPS_WINS,
            player_choice: self.player_choice,
            bot_choice: self.bot_choice,
            outcome: self.outcome,
            prompt: self.prompt.map(str::to_string),
        }
    }

    fn reset(&mut self) {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            generation,
            ..Self::new(self.timings)
        };
    }

    fn accepting_images(&self) -> bool {
        self.stage == Stage::Images && !self.checking && !self.images_passed
    }

    fn schedule(&self, timer: Timer, delay: Duration) -> Effect {
        Effect::Schedule {
            ticket: Ticket {
                generation: self.generation,
                timer,
            },
            delay,
        }
    }

    fn check_images(&mut self) -> Vec<Effect> {
        if self.stage != Stage::Images || !self.checking {
            return Vec::new();
        }
        self.checking = false;

        if self.selected == catalog::hydrant_ids() {
            self.images_passed = true;
            self.prompt = Some(copy::IMAGES_PASSED);
            tracing::debug!(generation = self.generation, "Captcha images accepted");
            vec![
                Effect::Sound(SoundCue::Ding),
                self.schedule(Timer::AdvanceToRps, self.timings.advance_to_rps),
            ]
        } else {
            self.selected.clear();
            self.prompt = Some(copy::IMAGES_RETRY);
            tracing::debug!(generation = self.generation, "Captcha images rejected");
            vec![Effect::Sound(SoundCue::Buzzer)]
        }
    }

    fn advance_to_rps(&mut self) -> Vec<Effect> {
        if self.stage != Stage::Images || !self.images_passed {
            return Vec::new();
        }

        self.stage = Stage::Rps;
        self.images_passed = false;
        self.selected.clear();
        self.prompt = Some(copy::RPS_INTRO);

        vec![Effect::Sound(SoundCue::Whoosh)]
    }

    fn reveal_bot(&mut self) -> Vec<Effect> {
        if self.stage != Stage::Rps {
            return Vec::new();
        }
        let Some(bot) = self.pending_bot.take() else {
            return Vec::new();
        };

        self.bot_choice = Some(bot);

        vec![
            Effect::Sound(SoundCue::Reveal),
            self.schedule(Timer::ResolveRound, self.timings.round_resolve),
        ]
    }

    fn resolve_round(&mut self) -> Vec<Effect> {
        if self.stage != Stage::Rps || self.outcome.is_some() {
            return Vec::new();
        }
        let (Some(player), Some(bot)) = (self.player_choice, self.bot_choice) else {
            return Vec::new();
        };

        let outcome = player.versus(bot);
        self.outcome = Some(outcome);

        let deciding_move = match outcome {
            RoundOutcome::Lose => bot,
            RoundOutcome::Win | RoundOutcome::Tie => player,
        };
        let mut effects = vec![
            Effect::Sound(outcome.cue()),
            Effect::Sound(deciding_move.cue()),
        ];

        tracing::debug!(
            generation = self.generation,
            player = ?player,
            bot = ?bot,
            outcome = ?outcome,
            "Rock-paper-scissors round resolved"
        );

        match outcome {
            RoundOutcome::Win => {
                self.rps_wins = (self.rps_wins + 1).min(REQUIRED_RPS_WINS);
                effects.push(Effect::Celebrate);

                if self.rps_wins >= REQUIRED_RPS_WINS {
                    self.stage = Stage::Complete;
                    self.prompt = Some(copy::CAPTCHA_COMPLETE);
                    effects.push(Effect::Sound(SoundCue::Fanfare));
                    effects.push(self.schedule(Timer::AutoClose, self.timings.auto_close));
                    tracing::info!(generation = self.generation, "Captcha gauntlet completed");
                    return effects;
                }

                self.prompt = Some(copy::ROUND_WON);
            }
            RoundOutcome::Lose => self.prompt = Some(copy::ROUND_LOST),
            RoundOutcome::Tie => self.prompt = Some(copy::ROUND_TIED),
        }

        effects.push(self.schedule(Timer::ClearRound, self.timings.round_clear));
        effects
    }

    fn clear_round(&mut self) -> Vec<Effect> {
        if self.stage != Stage::Rps || self.outcome.is_none() {
            return Vec::new();
        }

        self.player_choice = None;
        self.bot_choice = None;
        self.outcome = None;
        self.prompt = Some(copy::RPS_INTRO);

        Vec::new()
    }
}

impl Default for CaptchaSession {
    fn default() -> Self {
        Self::new(Timings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Tickets scheduled by a batch of effects
    fn tickets(effects: &[Effect]) -> Vec<Ticket> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Schedule { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .collect()
    }

    fn only_ticket(effects: &[Effect]) -> Ticket {
        let mut found = tickets(effects);
        assert_eq!(found.len(), 1, "expected one timer in {effects:?}");
        found.remove(0)
    }

    fn select_hydrants(session: &mut CaptchaSession) {
        for id in catalog::hydrant_ids() {
            session.toggle(id).unwrap();
        }
    }

    /// Open the captcha and get it into the Rps stage
    fn session_at_rps() -> CaptchaSession {
        let mut session = CaptchaSession::default();
        session.open();
        select_hydrants(&mut session);
        let submitted = session.submit_images();
        let checked = session.fire(only_ticket(&submitted));
        session.fire(only_ticket(&checked));
        assert_eq!(session.stage(), Stage::Rps);
        session
    }

    /// Play one full round, forcing the bot's move through the seeded rng
    fn play_round(session: &mut CaptchaSession, rng: &mut StdRng, wanted: RoundOutcome) -> Vec<Effect> {
        let bot = draw_bot_move(&mut rng.clone());
        let choice = match wanted {
            RoundOutcome::Win => bot.beaten_by(),
            RoundOutcome::Lose => bot.beaten_by().beaten_by(),
            RoundOutcome::Tie => bot,
        };

        let played = session.play(choice, rng);
        let reveal = session.fire(only_ticket(&played));
        assert_eq!(session.bot_choice(), Some(bot));
        let resolved = session.fire(only_ticket(&reveal));
        assert_eq!(session.outcome(), Some(wanted));
        resolved
    }

    #[test]
    fn test_open_resets_everything() {
        let mut session = session_at_rps();
        let before = session.generation;

        let effects = session.open();
        assert_eq!(effects, vec![Effect::Sound(SoundCue::Click)]);
        assert_eq!(session.stage(), Stage::Images);
        assert_eq!(session.generation, before + 1);
        assert!(session.selected().is_empty());
        assert_eq!(session.rps_wins, 0);
        assert_eq!(session.player_choice(), None);
        assert_eq!(session.prompt(), None);
    }

    #[test]
    fn test_toggle_is_membership_flip() {
        let mut session = CaptchaSession::default();
        session.open();

        session.toggle(3).unwrap();
        session.toggle(5).unwrap();
        session.toggle(3).unwrap();
        assert_eq!(session.selected().iter().copied().collect::<Vec<_>>(), vec![5]);

        assert!(matches!(session.toggle(42), Err(RedTapeError::UnknownImage(42))));
    }

    #[test]
    fn test_toggle_ignored_outside_images() {
        let mut session = CaptchaSession::default();
        assert!(session.toggle(1).unwrap().is_empty());
        assert!(session.selected().is_empty());
    }

    #[test]
    fn test_exact_hydrants_advance_to_rps() {
        let mut session = CaptchaSession::default();
        session.open();
        select_hydrants(&mut session);

        let submitted = session.submit_images();
        assert_eq!(session.prompt(), Some(copy::CHECKING_IMAGES));
        assert!(matches!(
            submitted[1],
            Effect::Schedule { delay, .. } if delay == Duration::from_millis(1500)
        ));

        let checked = session.fire(only_ticket(&submitted));
        assert!(checked.contains(&Effect::Sound(SoundCue::Ding)));
        assert_eq!(session.stage(), Stage::Images);
        assert!(session.view().images_passed);

        let advanced = session.fire(only_ticket(&checked));
        assert_eq!(advanced, vec![Effect::Sound(SoundCue::Whoosh)]);
        assert_eq!(session.stage(), Stage::Rps);
    }

    #[test]
    fn test_wrong_selection_clears_and_retries() {
        let hydrants = catalog::hydrant_ids();
        let missing_one: Vec<u8> = hydrants.iter().copied().skip(1).collect();
        let mut with_decoy: Vec<u8> = hydrants.iter().copied().collect();
        with_decoy.push(2);

        for selection in [Vec::new(), missing_one, with_decoy, vec![2, 5, 6, 8]] {
            let mut session = CaptchaSession::default();
            session.open();
            for id in &selection {
                session.toggle(*id).unwrap();
            }

            let submitted = session.submit_images();
            let checked = session.fire(only_ticket(&submitted));
            assert_eq!(checked, vec![Effect::Sound(SoundCue::Buzzer)], "{selection:?}");
            assert_eq!(session.stage(), Stage::Images);
            assert!(session.selected().is_empty());
            assert_eq!(session.prompt(), Some(copy::IMAGES_RETRY));

            // Retrying is always possible
            select_hydrants(&mut session);
            assert_eq!(tickets(&session.submit_images()).len(), 1);
        }
    }

    #[test]
    fn test_repeated_submit_ignored_while_checking() {
        let mut session = CaptchaSession::default();
        session.open();
        select_hydrants(&mut session);

        assert_eq!(tickets(&session.submit_images()).len(), 1);
        assert!(session.submit_images().is_empty());
        assert!(session.toggle(2).unwrap().is_empty());
        assert_eq!(session.selected(), &catalog::hydrant_ids());
    }

    #[test]
    fn test_three_wins_complete_despite_losses_and_ties() {
        let mut session = session_at_rps();
        let mut rng = StdRng::seed_from_u64(7);

        let script = [
            RoundOutcome::Lose,
            RoundOutcome::Win,
            RoundOutcome::Tie,
            RoundOutcome::Tie,
            RoundOutcome::Win,
            RoundOutcome::Lose,
        ];
        let mut wins = 0;

        for outcome in script {
            let resolved = play_round(&mut session, &mut rng, outcome);
            if outcome == RoundOutcome::Win {
                wins += 1;
                assert!(resolved.contains(&Effect::Celebrate));
            } else {
                assert!(!resolved.contains(&Effect::Celebrate));
            }
            assert_eq!(session.rps_wins, wins);
            assert_eq!(session.stage(), Stage::Rps);

            session.fire(only_ticket(&resolved));
            assert_eq!(session.player_choice(), None);
            assert_eq!(session.outcome(), None);
        }

        let finished = play_round(&mut session, &mut rng, RoundOutcome::Win);
        assert_eq!(session.stage(), Stage::Complete);
        assert_eq!(session.rps_wins, 3);
        assert!(finished.contains(&Effect::Sound(SoundCue::Fanfare)));

        let close = session.fire(only_ticket(&finished));
        assert_eq!(close, vec![Effect::CloseRequested]);
    }

    #[test]
    fn test_round_resolution_cues() {
        let mut session = session_at_rps();
        let mut rng = StdRng::seed_from_u64(11);

        let resolved = play_round(&mut session, &mut rng, RoundOutcome::Tie);
        let player = session.player_choice().unwrap();
        assert_eq!(resolved[0], Effect::Sound(SoundCue::Tie));
        assert_eq!(resolved[1], Effect::Sound(player.cue()));
        session.fire(only_ticket(&resolved));

        let resolved = play_round(&mut session, &mut rng, RoundOutcome::Lose);
        let bot = session.bot_choice().unwrap();
        assert_eq!(resolved[0], Effect::Sound(SoundCue::Lose));
        assert_eq!(resolved[1], Effect::Sound(bot.cue()));
    }

    #[test]
    fn test_one_move_per_round() {
        let mut session = session_at_rps();
        let mut rng = StdRng::seed_from_u64(3);

        let first = session.play(Choice::Rock, &mut rng);
        assert_eq!(tickets(&first).len(), 1);
        assert!(session.play(Choice::Paper, &mut rng).is_empty());
        assert_eq!(session.player_choice(), Some(Choice::Rock));

        // Still locked while the bot move is on screen
        session.fire(only_ticket(&first));
        assert!(session.play(Choice::Scissors, &mut rng).is_empty());
    }

    #[test]
    fn test_bot_move_hidden_until_reveal() {
        let mut session = session_at_rps();
        let mut rng = StdRng::seed_from_u64(5);

        session.play(Choice::Rock, &mut rng);
        assert_eq!(session.bot_choice(), None);
        assert!(session.view().bot_choice.is_none());
    }

    #[test]
    fn test_bot_moves_cover_all_choices() {
        let mut rng = StdRng::seed_from_u64(1);
        let seen: BTreeSet<_> = (0..200).map(|_| draw_bot_move(&mut rng) as u8).collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_stale_ticket_after_reopen_is_ignored() {
        let mut session = CaptchaSession::default();
        session.open();
        select_hydrants(&mut session);
        let stale = only_ticket(&session.submit_images());

        session.open();
        select_hydrants(&mut session);

        assert!(session.fire(stale).is_empty());
        assert_eq!(session.selected(), &catalog::hydrant_ids());
        assert_eq!(session.prompt(), None);
        assert_eq!(session.stage(), Stage::Images);
    }

    #[test]
    fn test_stale_round_timer_after_close_is_ignored() {
        let mut session = session_at_rps();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..2 {
            let won = play_round(&mut session, &mut rng, RoundOutcome::Win);
            session.fire(only_ticket(&won));
        }
        let finished = play_round(&mut session, &mut rng, RoundOutcome::Win);
        assert_eq!(session.stage(), Stage::Complete);
        let auto_close = only_ticket(&finished);

        session.close().unwrap();
        assert_eq!(session.stage(), Stage::Hidden);
        assert!(session.fire(auto_close).is_empty());
    }

    #[test]
    fn test_close_only_when_complete() {
        let mut session = CaptchaSession::default();
        assert!(session.close().unwrap().is_empty());

        session.open();
        assert!(matches!(session.close(), Err(RedTapeError::NotPermitted(_))));
        assert_eq!(session.stage(), Stage::Images);

        let mut session = session_at_rps();
        assert!(session.close().is_err());
    }
}
