//! Core types shared across the form shell.

use serde::{Deserialize, Serialize};

/// 24-bit RGB value backing the date-of-birth picker.
///
/// - R encodes the day
/// - G encodes the month
/// - B encodes the year (1900-2025)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorValue(u32);

impl ColorValue {
    pub fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(u32::from(red) << 16 | u32::from(green) << 8 | u32::from(blue))
    }

    /// Parse `#rrggbb` or `rrggbb`. Anything short of six hex digits is `None`.
    pub fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.strip_prefix('#').unwrap_or(input);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
        Some(Self::from_rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(&self) -> u8 {
        self.0 as u8
    }
}

/// Captcha stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Modal closed
    #[default]
    Hidden,
    /// "Select all fire hydrants"
    Images,
    /// Best-of-whatever rock-paper-scissors against the bot
    Rps,
    /// Gauntlet cleared, modal about to close
    Complete,
}

/// A rock-paper-scissors move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// Returns true if `self` beats `other`
    pub fn beats(&self, other: Choice) -> bool {
        other.beaten_by() == *self
    }

    /// Outcome of `self` (the player) against `bot`
    pub fn versus(&self, bot: Choice) -> RoundOutcome {
        if self.beats(bot) {
            RoundOutcome::Win
        } else if bot.beats(*self) {
            RoundOutcome::Lose
        } else {
            RoundOutcome::Tie
        }
    }

    /// The move that beats this one
    pub fn beaten_by(&self) -> Choice {
        match self {
            Self::Rock => Self::Paper,
            Self::Paper => Self::Scissors,
            Self::Scissors => Self::Rock,
        }
    }

    /// Cue played when this move decides a round
    pub fn cue(&self) -> SoundCue {
        match self {
            Self::Rock => SoundCue::Rock,
            Self::Paper => SoundCue::Paper,
            Self::Scissors => SoundCue::Scissors,
        }
    }
}

/// Result of one rock-paper-scissors round, from the player's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundOutcome {
    Win,
    Lose,
    Tie,
}

impl RoundOutcome {
    pub fn cue(&self) -> SoundCue {
        match self {
            Self::Win => SoundCue::Win,
            Self::Lose => SoundCue::Lose,
            Self::Tie => SoundCue::Tie,
        }
    }
}

/// One tile of the image captcha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaptchaImage {
    pub id: u8,
    pub asset_ref: &'static str,
    /// Correct answer?
    pub is_hydrant: bool,
}

/// Named sound assets the page knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Click,
    Buzzer,
    Ding,
    Whoosh,
    Reveal,
    Win,
    Lose,
    Tie,
    Rock,
    Paper,
    Scissors,
    Fanfare,
    Siren,
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Buzzer => "buzzer",
            Self::Ding => "ding",
            Self::Whoosh => "whoosh",
            Self::Reveal => "reveal",
            Self::Win => "win",
            Self::Lose => "lose",
            Self::Tie => "tie",
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
            Self::Fanfare => "fanfare",
            Self::Siren => "siren",
        }
    }
}

/// Fire-and-forget instruction for the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientCue {
    Play { cue: SoundCue },
    Loop { cue: SoundCue, on: bool },
    Stop { cue: SoundCue },
    /// Decorative confetti burst
    Confetti,
    /// Captcha modal should close itself
    CloseCaptcha,
}

/// Captcha state as rendered by the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptchaView {
    pub stage: Stage,
    pub selected: Vec<u8>,
    /// Image submission is being "checked"
    pub checking: bool,
    /// Images accepted, waiting to advance
    pub images_passed: bool,
    pub rps_wins: u8,
    pub required_wins: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_choice: Option<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_choice: Option<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<RoundOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Decoded date of birth as rendered by the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirthDateView {
    /// Last raw picker value, valid or not
    pub color: String,
    pub day: u8,
    pub month: u8,
    pub year: u16,
    /// e.g. "February 29, 2024"
    pub formatted: String,
    pub age: u32,
}

/// Last map pin and whether it satisfies the region requirement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationView {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub valid: bool,
    pub required_region: String,
}

/// Everything the page needs to re-render, plus cues queued since the last poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub captcha: CaptchaView,
    pub birth_date: BirthDateView,
    pub email_alert: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationView>,
    pub cues: Vec<ClientCue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let color = ColorValue::parse_hex("#FF8000").unwrap();
        assert_eq!((color.red(), color.green(), color.blue()), (255, 128, 0));
        assert_eq!(ColorValue::parse_hex("0a0b0c"), Some(ColorValue::from_rgb(10, 11, 12)));
    }

    #[test]
    fn test_parse_hex_rejects_partial_input() {
        for input in ["", "#", "#12345", "#1234567", "##123456", "#12345g", "rgb(1,2,3)"] {
            assert_eq!(ColorValue::parse_hex(input), None, "{input:?}");
        }
    }

    #[test]
    fn test_rock_paper_scissors_all_pairs() {
        use Choice::*;
        use RoundOutcome::*;

        let table = [
            (Rock, Rock, Tie),
            (Rock, Paper, Lose),
            (Rock, Scissors, Win),
            (Paper, Rock, Win),
            (Paper, Paper, Tie),
            (Paper, Scissors, Lose),
            (Scissors, Rock, Lose),
            (Scissors, Paper, Win),
            (Scissors, Scissors, Tie),
        ];

        for (player, bot, expected) in table {
            assert_eq!(player.versus(bot), expected, "{player:?} vs {bot:?}");
        }
    }

    #[test]
    fn test_beaten_by_wins() {
        for choice in Choice::ALL {
            assert_eq!(choice.beaten_by().versus(choice), RoundOutcome::Win);
        }
    }

    #[test]
    fn test_client_cue_serialization() {
        let json = serde_json::to_string(&ClientCue::Loop { cue: SoundCue::Siren, on: true }).unwrap();
        assert_eq!(json, r#"{"kind":"loop","cue":"siren","on":true}"#);

        let json = serde_json::to_string(&ClientCue::CloseCaptcha).unwrap();
        assert_eq!(json, r#"{"kind":"close_captcha"}"#);
    }

    #[test]
    fn test_stage_serialization() {
        assert_eq!(serde_json::to_string(&Stage::Rps).unwrap(), r#""rps""#);
        assert_eq!(Stage::default(), Stage::Hidden);
    }
}
