//! DOS date/time codec.
//!
//! ZIP timestamps use the legacy DOS packed format: two 16-bit words with
//! 2-second resolution and no timezone. The civil side of the conversion is
//! a [`NaiveDateTime`], which carries no timezone either; interpreting it as
//! local time (and resolving any DST ambiguity) is up to the caller.
//!
//! Packed layout:
//!
//! ```text
//! time bits 0-4   seconds / 2        date bits 0-4   day (1-31)
//! time bits 5-10  minute             date bits 5-8   month (1-12)
//! time bits 11-15 hour (0-23)        date bits 9-15  year - 1980
//! ```

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// A packed DOS date/time pair as stored in ZIP headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosDateTime {
    pub date: u16,
    pub time: u16,
}

impl DosDateTime {
    pub fn new(date: u16, time: u16) -> Self {
        Self { date, time }
    }

    /// Unpack into a civil timestamp.
    ///
    /// Returns `None` when the packed fields do not name a real date or
    /// time, e.g. month 0 or day 0, which archivers sometimes emit for
    /// members with no meaningful timestamp.
    pub fn to_civil(self) -> Option<NaiveDateTime> {
        let sec = u32::from(self.time & 0x1f) * 2;
        let min = u32::from((self.time >> 5) & 0x3f);
        let hour = u32::from(self.time >> 11);

        let day = u32::from(self.date & 0x1f);
        let month = u32::from((self.date >> 5) & 0xf);
        let year = i32::from(self.date >> 9) + 1980;

        NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, min, sec)
    }

    /// Pack a civil timestamp into DOS representation.
    ///
    /// Seconds are truncated to even values (the format has 2-second
    /// resolution) and years are clamped to the representable 1980-2107
    /// range.
    pub fn from_civil(dt: NaiveDateTime) -> Self {
        let time = (dt.second() / 2) as u16
            | ((dt.minute() as u16) << 5)
            | ((dt.hour() as u16) << 11);

        let year = (dt.year().clamp(1980, 2107) - 1980) as u16;
        let date = dt.day() as u16 | ((dt.month() as u16) << 5) | (year << 9);

        Self { date, time }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civil(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn unpacks_known_timestamp() {
        // 2024-03-15 12:30:00
        let dos = DosDateTime::new(0x586f, 0x63c0);
        assert_eq!(dos.to_civil(), Some(civil(2024, 3, 15, 12, 30, 0)));
    }

    #[test]
    fn packs_known_timestamp() {
        let dos = DosDateTime::from_civil(civil(2024, 3, 15, 12, 30, 0));
        assert_eq!(dos, DosDateTime::new(0x586f, 0x63c0));
    }

    #[test]
    fn round_trips_even_second_timestamps() {
        let samples = [
            civil(1980, 1, 1, 0, 0, 0),
            civil(1999, 12, 31, 23, 59, 58),
            civil(2024, 2, 29, 6, 7, 8),
            civil(2107, 12, 31, 23, 59, 58),
        ];
        for t in samples {
            let dos = DosDateTime::from_civil(t);
            assert_eq!(dos.to_civil(), Some(t), "round trip failed for {t}");
        }
    }

    #[test]
    fn truncates_odd_seconds() {
        let dos = DosDateTime::from_civil(civil(2020, 6, 1, 10, 20, 13));
        assert_eq!(dos.to_civil(), Some(civil(2020, 6, 1, 10, 20, 12)));
    }

    #[test]
    fn rejects_zeroed_date() {
        // date 0 means year 1980, month 0, day 0: not a real date.
        assert_eq!(DosDateTime::new(0, 0).to_civil(), None);
    }

    #[test]
    fn clamps_years_outside_dos_range() {
        let dos = DosDateTime::from_civil(civil(1970, 5, 4, 1, 2, 2));
        assert_eq!(dos.to_civil(), Some(civil(1980, 5, 4, 1, 2, 2)));
    }
}
