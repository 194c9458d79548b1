//! Shared constants for the Red Tape form.

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Idle form sessions are dropped after this long (30 minutes)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// How often the sweeper looks for idle sessions
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Pending client cues kept per session before the oldest are dropped
pub const DEFAULT_OUTBOX_CAPACITY: usize = 64;

/// Siren played while the email confirmation does not match
pub const DEFAULT_SIREN_URL: &str = "https://actions.google.com/sounds/v1/alarms/alarm_clock.ogg";

/// Where the page fetches every other cue from (`{base}/{cue}.ogg`)
pub const DEFAULT_CUE_BASE_URL: &str = "/sounds";

/// Initial value of the date-of-birth color picker
pub const DEFAULT_BIRTH_COLOR: &str = "#8f8f8f";

/// Date of birth shown before the picker is first touched (18 September 1945).
/// It does not match what the initial color decodes to.
pub const DEFAULT_BIRTH_DAY: u8 = 18;
pub const DEFAULT_BIRTH_MONTH: u8 = 9;
pub const DEFAULT_BIRTH_YEAR: u16 = 1945;

/// Earliest year the blue channel can encode
pub const EARLIEST_BIRTH_YEAR: u16 = 1900;

/// Latest year the blue channel can encode
pub const LATEST_BIRTH_YEAR: u16 = 2025;

/// Rock-paper-scissors wins needed to finish the captcha
pub const REQUIRED_RPS_WINS: u8 = 3;

/// Captcha timer defaults, in milliseconds
pub mod delays {
    /// "Checking..." pause after an image submission
    pub const IMAGE_CHECK_MS: u64 = 1500;

    /// Success banner shown before the rock-paper-scissors stage
    pub const ADVANCE_TO_RPS_MS: u64 = 1500;

    /// Player move recorded, bot move still hidden
    pub const BOT_REVEAL_MS: u64 = 300;

    /// Bot move shown, outcome still hidden
    pub const ROUND_RESOLVE_MS: u64 = 500;

    /// Outcome on screen before the next round starts
    pub const ROUND_CLEAR_MS: u64 = 2000;

    /// Completion banner before the modal asks to close
    pub const AUTO_CLOSE_MS: u64 = 1500;
}

/// Target region a map pin must land in
pub mod region {
    /// ISO 3166-2 subdivision code reported by the geocoder
    pub const DEFAULT_REGION_CODE: &str = "CA-ON";

    /// ISO 3166-1 country code reported by the geocoder
    pub const DEFAULT_COUNTRY_CODE: &str = "ca";

    /// Human readable name shown next to the map
    pub const DEFAULT_LABEL: &str = "Ontario, Canada";
}

/// HTTP header names
pub mod headers {
    /// Form session token
    pub const X_FORM_SESSION: &str = "X-Form-Session";
}

/// Fixed copy shown to the user
pub mod copy {
    pub const SUBMISSION_RECEIPT: &str =
        "Thank you for submitting absolutely nothing of value.\n\n(Also, none of this was saved.)";

    pub const EMAIL_MISMATCH: &str = "Emails do not match.";

    pub const CHECKING_IMAGES: &str = "Checking...";

    pub const IMAGES_RETRY: &str = "Incorrect. Select ALL the fire hydrants and try again.";

    pub const IMAGES_PASSED: &str = "Verified! One more tiny step.";

    pub const RPS_INTRO: &str = "Beat the bot at rock-paper-scissors three times.";

    pub const ROUND_WON: &str = "You win this round!";

    pub const ROUND_LOST: &str = "The bot wins this round.";

    pub const ROUND_TIED: &str = "Tie. Nobody wins.";

    pub const CAPTCHA_COMPLETE: &str = "You are probably human.";
}
