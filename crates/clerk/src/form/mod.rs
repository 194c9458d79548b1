//! The form's fields and the per-visitor session that holds them.

pub mod location;
mod outbox;
mod session;
pub mod siren;

pub use location::{PinDrop, RequiredRegion};
pub use outbox::{CueOutbox, SoundBoard};
pub use session::{FormSession, PendingTimer};
pub use siren::SirenAlarm;
