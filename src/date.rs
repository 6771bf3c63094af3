//! FAT packed date/time fields decoded into calendar values.
//!
//! FAT stores local wall-clock time with no timezone or DST marker; the
//! values here are therefore plain calendar fields, not absolute instants.
//! Interpreting them as local time (DST included) is up to the host.

/// A DOS date.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Date {
    /// Year number.
    /// Valid range is [1980, 2107].
    year: u16,
    /// Month of the year.
    /// Valid range is [1, 12].
    month: u8,
    /// Day of the month.
    /// Valid range is [1, 31].
    day: u8,
}

impl Date {
    const MIN_YEAR: u16 = 1980;

    #[must_use]
    /// Decodes a packed FAT date.
    ///
    /// Bits 15-9 hold the year offset from 1980, bits 8-5 the month and
    /// bits 4-0 the day.
    pub fn decode(dos_date: u16) -> Self {
        let year = (dos_date >> 9) + Self::MIN_YEAR;
        let month = u8::try_from((dos_date >> 5) & 0xF).unwrap_or(0);
        let day = u8::try_from(dos_date & 0x1F).unwrap_or(0);
        Self { year, month, day }
    }

    #[must_use]
    #[inline]
    pub const fn year(&self) -> u16 {
        self.year
    }

    #[must_use]
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[must_use]
    #[inline]
    pub const fn day(&self) -> u8 {
        self.day
    }
}

/// A DOS time, with the native two-second resolution.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Time {
    /// Hours.
    /// Valid range is [0, 23].
    hour: u8,
    /// Minutes.
    /// Valid range is [0, 59].
    min: u8,
    /// Seconds.
    /// Valid range is [0, 58], always even.
    sec: u8,
}

impl Time {
    /// Midnight, used where a FAT field carries a date but no time.
    pub const ZERO: Self = Self {
        hour: 0,
        min: 0,
        sec: 0,
    };

    #[must_use]
    /// Decodes a packed FAT time.
    ///
    /// Bits 15-11 hold the hour, bits 10-5 the minute and bits 4-0 the
    /// seconds in two-second units.
    pub fn decode(dos_time: u16) -> Self {
        let hour = u8::try_from(dos_time >> 11).unwrap_or(0);
        let min = u8::try_from((dos_time >> 5) & 0x3F).unwrap_or(0);
        let sec = u8::try_from((dos_time & 0x1F) * 2).unwrap_or(0);
        Self { hour, min, sec }
    }

    #[must_use]
    #[inline]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    #[must_use]
    #[inline]
    pub const fn min(&self) -> u8 {
        self.min
    }

    #[must_use]
    #[inline]
    pub const fn sec(&self) -> u8 {
        self.sec
    }
}

/// A DOS date and time.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DateTime {
    date: Date,
    time: Time,
}

impl DateTime {
    #[must_use]
    #[inline]
    pub const fn new(date: Date, time: Time) -> Self {
        Self { date, time }
    }

    #[must_use]
    /// Decodes a packed date/time field pair.
    pub fn decode(dos_date: u16, dos_time: u16) -> Self {
        Self::new(Date::decode(dos_date), Time::decode(dos_time))
    }

    #[must_use]
    /// Decodes a date-only field; the time half is midnight.
    pub fn decode_date_only(dos_date: u16) -> Self {
        Self::new(Date::decode(dos_date), Time::ZERO)
    }

    #[must_use]
    #[inline]
    pub const fn date(&self) -> Date {
        self.date
    }

    #[must_use]
    #[inline]
    pub const fn time(&self) -> Time {
        self.time
    }
}
