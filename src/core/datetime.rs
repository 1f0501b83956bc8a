//! Calendar helpers.

use chrono::{Local, NaiveDate};

/// Whole years elapsed between `date` and today, accounting for whether
/// the anniversary has been reached this year.
///
/// Returns `None` for dates in the future.
pub fn years_since(date: NaiveDate) -> Option<u32> {
    Local::now().date_naive().years_since(date)
}
