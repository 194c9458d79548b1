//! Date of birth, entered as a color.

mod decoder;
mod field;

pub use field::BirthDateField;
