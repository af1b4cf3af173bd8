// SPDX-FileCopyrightText: The newsbox authors
// SPDX-License-Identifier: MPL-2.0

//! Entry dates

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

// yyyy-MM-dd
const DATE_LEN: usize = 4 + 1 + 2 + 1 + 2;

/// Parse a calendar date in the form `YYYY-MM-DD`.
///
/// Leading or trailing whitespace is not tolerated.
#[must_use]
pub fn parse(input: &str) -> Option<Date> {
    if input.len() != DATE_LEN || !input.is_ascii() {
        return None;
    }
    Date::parse(input, DATE_FORMAT).ok()
}

/// Format a [`Date`] as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if formatting of the given `date` fails.
pub fn format(date: Date) -> Result<String, time::error::Format> {
    date.format(DATE_FORMAT)
}
