// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Day-serial date codec. Spreadsheet exports encode dates as a count
//! of days since 1899-12-30, so serial 25569 is 1970-01-01 and serial
//! 44197 is 2021-01-01. Both conversion directions go through this
//! one formula.

use time::Date;

// Julian day number of serial 0 (1899-12-30).
const SERIAL_EPOCH_JULIAN: i64 = 2_415_019;

pub fn serial_to_date(serial: i64) -> Option<Date> {
    let julian = serial.checked_add(SERIAL_EPOCH_JULIAN)?;
    let julian = i32::try_from(julian).ok()?;
    Date::from_julian_day(julian).ok()
}

pub fn date_to_serial(date: Date) -> i64 {
    i64::from(date.to_julian_day()) - SERIAL_EPOCH_JULIAN
}
