//! Parsing raw form fields into validated values with user-facing messages.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, error::capitalise_first_char, money::Money};

/// The format used by `<input type="date">`, e.g. "2025-01-31".
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The trimmed value of a form field, or `None` if the field is missing or blank.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Parse a required, positive amount of money.
///
/// `message` is returned when the field is missing, unparsable or not positive.
/// Amounts with too many decimal places or that are too large get a message
/// describing that problem instead.
pub fn parse_positive_amount(raw: Option<&str>, message: &str) -> Result<Money, String> {
    let Some(raw) = raw else {
        return Err(message.to_owned());
    };

    match raw.parse::<Money>() {
        Ok(amount) if amount.is_positive() => Ok(amount),
        Ok(_) | Err(Error::InvalidAmount(_)) => Err(message.to_owned()),
        Err(error) => Err(capitalise_first_char(&error.to_string())),
    }
}

/// Parse a date in [DATE_FORMAT].
///
/// # Errors
///
/// Returns [Error::InvalidDateFormat] if `raw` is not a valid date.
pub fn parse_date(raw: &str) -> Result<Date, Error> {
    Date::parse(raw.trim(), DATE_FORMAT)
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), raw.to_owned()))
}

/// Message for a date field that could not be parsed.
pub const INVALID_DATE_MESSAGE: &str = "Enter a valid date.";

/// Check that `date` is not after `today`.
///
/// # Errors
///
/// Returns [Error::FutureDate] if `date` is in the future.
pub fn ensure_not_future(date: Date, today: Date) -> Result<Date, Error> {
    if date > today {
        return Err(Error::FutureDate(date));
    }

    Ok(date)
}
