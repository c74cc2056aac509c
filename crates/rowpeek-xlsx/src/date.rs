//! Spreadsheet date serial conversion

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rowpeek_core::CellValue;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Largest serial Excel accepts (9999-12-31)
const MAX_SERIAL: f64 = 2_958_466.0;

/// Convert a date serial to a calendar date-time.
///
/// The 1900 system counts from 1899-12-30 and includes Excel's phantom
/// 1900-02-29, so serials below 60 are shifted by one day. The 1904 system
/// counts from 1904-01-01. Times are rounded to the nearest second. Returns
/// `None` for negative or out-of-range serials.
pub(crate) fn serial_to_datetime(serial: f64, date1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial >= MAX_SERIAL {
        return None;
    }

    let epoch = if date1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)?
    } else if serial < 60.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };

    let mut days = serial.floor() as i64;
    let mut seconds = ((serial - serial.floor()) * SECONDS_PER_DAY).round() as i64;
    if seconds >= SECONDS_PER_DAY as i64 {
        days += 1;
        seconds = 0;
    }

    epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::seconds(seconds))
}

/// Time of day for a serial with no whole days.
///
/// Returns `None` unless `serial` is in `[0, 1)` and stays below a full day
/// after rounding to the nearest second.
pub(crate) fn serial_to_time(serial: f64) -> Option<NaiveTime> {
    if !(0.0..1.0).contains(&serial) {
        return None;
    }
    let seconds = (serial * SECONDS_PER_DAY).round() as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
}

/// Value of a number cell whose style carries a date/time format.
///
/// Serials below one day read as a time of day, larger ones as a date-time.
pub(crate) fn date_cell(serial: f64, date1904: bool) -> Option<CellValue> {
    serial_to_time(serial)
        .map(CellValue::Time)
        .or_else(|| serial_to_datetime(serial, date1904).map(CellValue::DateTime))
}
