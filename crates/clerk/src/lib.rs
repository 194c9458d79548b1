//! # Clerk - Red Tape form shell
//!
//! Serves the Very Important Official Form and owns every visitor's
//! ephemeral form session: the RGB date of birth, the email siren, the
//! geofenced pin, and the captcha gauntlet with its timers.
//!
//! ## Architecture
//! ```text
//! Browser ⇄ Clerk (axum) ⇄ SessionStore (memory only)
//!                               ↓
//!                        captcha timers (tokio)
//! ```
//!
//! Nothing is persisted. The final submission is thrown away.

pub mod captcha;
pub mod config;
pub mod dob;
pub mod form;
pub mod routes;
pub mod sessions;
pub mod state;
