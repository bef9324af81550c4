use std::fmt;

#[cfg(feature = "time-calculation")]
use chrono::{DateTime, LocalResult, TimeZone, Utc};
use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};

#[cfg(feature = "time-calculation")]
use crate::error::GribError;

/// Reference time of data, as carried by the identification section.
///
/// It is only printed alongside sections and never takes part in
/// decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct ReferenceTime {
    /// Year (4 digits).
    pub year: u16,
    /// Month.
    pub month: u8,
    /// Day.
    pub day: u8,
    /// Hour.
    pub hour: u8,
    /// Minute.
    pub minute: u8,
    /// Second.
    pub second: u8,
}

impl ReferenceTime {
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Converts the reference time into a [`DateTime<Utc>`], failing for
    /// values that do not form a valid date and time.
    #[cfg(feature = "time-calculation")]
    pub fn to_date_time(&self) -> Result<DateTime<Utc>, GribError> {
        let result = Utc.with_ymd_and_hms(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        );
        if let LocalResult::Single(date_time) = result {
            Ok(date_time)
        } else {
            Err(GribError::InvalidValue(format!("invalid date time: {self}")))
        }
    }
}

impl fmt::Display for ReferenceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
