//! The color picker field and its last good decode.

use chrono::NaiveDate;
use redtape_common::{BirthDateView, ColorValue};

use super::decoder::{DecodedBirthDate, decode};

/// Raw picker input plus the date decoded from the last complete color.
///
/// Until the first complete color arrives the field shows the default date,
/// whatever the initial picker value would decode to.
#[derive(Debug, Clone)]
pub struct BirthDateField {
    raw: String,
    decoded: DecodedBirthDate,
}

impl BirthDateField {
    pub fn new(initial: &str) -> Self {
        Self {
            raw: initial.to_string(),
            decoded: DecodedBirthDate::default(),
        }
    }

    /// Record picker input. Only a full six-digit hex value changes the
    /// decoded date; returns whether it did.
    pub fn update(&mut self, input: &str) -> bool {
        self.raw = input.to_string();

        match ColorValue::parse_hex(input) {
            Some(color) => {
                let decoded = decode(color);
                let changed = decoded != self.decoded;
                self.decoded = decoded;
                changed
            }
            None => false,
        }
    }

    pub fn view(&self, today: NaiveDate) -> BirthDateView {
        BirthDateView {
            color: self.raw.clone(),
            day: self.decoded.valid_day(),
            month: self.decoded.month,
            year: self.decoded.year,
            formatted: self.decoded.formatted(),
            age: self.decoded.age_on(today),
        }
    }
}
