//! The captcha gauntlet: pick the hydrants, then beat the bot three times.

pub mod catalog;
mod flow;
mod tiles;

pub use flow::{CaptchaSession, Effect, Ticket, Timer, Timings};
pub use tiles::{Tile, TileSet};
