//! RGB to date-of-birth decoding.
//!
//! - R / 8 is the day
//! - G / 16 is the month
//! - B scaled onto 1900-2025 is the year
//!
//! Rounding is half-up in integer arithmetic, so every color decodes.

use chrono::{Datelike, NaiveDate};
use redtape_common::ColorValue;
use redtape_common::constants::{
    DEFAULT_BIRTH_DAY, DEFAULT_BIRTH_MONTH, DEFAULT_BIRTH_YEAR, EARLIEST_BIRTH_YEAR,
    LATEST_BIRTH_YEAR,
};

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Day, month, and year recovered from a color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedBirthDate {
    /// 1-31, not yet clamped to the month's length
    pub day: u8,
    /// 1-12
    pub month: u8,
    /// 1900-2025
    pub year: u16,
}

impl Default for DecodedBirthDate {
    fn default() -> Self {
        Self {
            day: DEFAULT_BIRTH_DAY,
            month: DEFAULT_BIRTH_MONTH,
            year: DEFAULT_BIRTH_YEAR,
        }
    }
}

/// Decode a color into a clamped birth date
pub fn decode(color: ColorValue) -> DecodedBirthDate {
    let day = rounded_div(u32::from(color.red()), 8).clamp(1, 31);
    let month = rounded_div(u32::from(color.green()), 16).clamp(1, 12);
    let span = u32::from(LATEST_BIRTH_YEAR - EARLIEST_BIRTH_YEAR);
    let year = (u32::from(EARLIEST_BIRTH_YEAR) + rounded_div(u32::from(color.blue()) * span, 255))
        .clamp(u32::from(EARLIEST_BIRTH_YEAR), u32::from(LATEST_BIRTH_YEAR));

    DecodedBirthDate {
        day: day as u8,
        month: month as u8,
        year: year as u16,
    }
}

fn rounded_div(numerator: u32, denominator: u32) -> u32 {
    (numerator + denominator / 2) / denominator
}

/// Proleptic Gregorian leap year rule
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(month: u8, year: u16) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl DecodedBirthDate {
    /// Day clamped to the length of the decoded month
    pub fn valid_day(&self) -> u8 {
        self.day.min(days_in_month(self.month, self.year))
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[usize::from(self.month.clamp(1, 12) - 1)]
    }

    /// "February 29, 2024"
    pub fn formatted(&self) -> String {
        format!("{} {}, {}", self.month_name(), self.valid_day(), self.year)
    }

    /// Whole years between the birth date and `today`, never negative
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        let mut age = today.year() - i32::from(self.year);
        let birthday = (u32::from(self.month), u32::from(self.valid_day()));
        if (today.month(), today.day()) < birthday {
            age -= 1;
        }
        age.max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_decode_ranges_for_every_channel_value() {
        for value in 0..=255u8 {
            for color in [
                ColorValue::from_rgb(value, 0, 0),
                ColorValue::from_rgb(0, value, 0),
                ColorValue::from_rgb(0, 0, value),
                ColorValue::from_rgb(value, value, value),
            ] {
                let decoded = decode(color);
                assert!((1..=31).contains(&decoded.day), "{color:?}");
                assert!((1..=12).contains(&decoded.month), "{color:?}");
                assert!((1900..=2025).contains(&decoded.year), "{color:?}");
            }
        }
    }

    #[test]
    fn test_zero_channels_default_to_first() {
        let decoded = decode(ColorValue::from_rgb(0, 0, 0));
        assert_eq!(decoded, DecodedBirthDate { day: 1, month: 1, year: 1900 });
    }

    #[test]
    fn test_decode_rounding() {
        // 4/8 = 0.5 rounds up, 3/8 rounds down then clamps to 1
        assert_eq!(decode(ColorValue::from_rgb(4, 0, 0)).day, 1);
        assert_eq!(decode(ColorValue::from_rgb(3, 0, 0)).day, 1);
        assert_eq!(decode(ColorValue::from_rgb(12, 0, 0)).day, 2);
        assert_eq!(decode(ColorValue::from_rgb(255, 255, 255)), DecodedBirthDate {
            day: 31,
            month: 12,
            year: 2025,
        });
        // 143 -> 17.875 -> 18, 8.9375 -> 9, 1970.09 -> 1970
        assert_eq!(decode(ColorValue::from_rgb(0x8f, 0x8f, 0x8f)), DecodedBirthDate {
            day: 18,
            month: 9,
            year: 1970,
        });
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_formatted_clamps_february() {
        let leap = DecodedBirthDate { day: 31, month: 2, year: 2024 };
        assert_eq!(leap.valid_day(), 29);
        assert_eq!(leap.formatted(), "February 29, 2024");

        let common = DecodedBirthDate { day: 31, month: 2, year: 2023 };
        assert_eq!(common.valid_day(), 28);
        assert_eq!(common.formatted(), "February 28, 2023");

        let april = DecodedBirthDate { day: 31, month: 4, year: 1999 };
        assert_eq!(april.formatted(), "April 30, 1999");
    }

    #[test]
    fn test_age_around_birthday() {
        let birth = DecodedBirthDate { day: 15, month: 6, year: 2000 };
        assert_eq!(birth.age_on(date(2024, 6, 14)), 23);
        assert_eq!(birth.age_on(date(2024, 6, 15)), 24);
        assert_eq!(birth.age_on(date(2024, 7, 1)), 24);
    }

    #[test]
    fn test_age_uses_clamped_day() {
        // Feb 31 2023 is really Feb 28, so Feb 28 is the birthday
        let birth = DecodedBirthDate { day: 31, month: 2, year: 2023 };
        assert_eq!(birth.age_on(date(2024, 2, 28)), 1);
        assert_eq!(birth.age_on(date(2024, 2, 27)), 0);
    }

    #[test]
    fn test_age_never_negative() {
        let birth = DecodedBirthDate { day: 31, month: 12, year: 2025 };
        assert_eq!(birth.age_on(date(2020, 1, 1)), 0);
    }
}
