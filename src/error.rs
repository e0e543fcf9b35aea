//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::Date;

use crate::{
    alert::Alert, internal_server_error::InternalServerError, money::Money,
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of username and password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing the date in the cookie or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used to create a username.
    #[error("Username cannot be empty")]
    EmptyUsername,

    /// The username is already taken by another user.
    #[error("that username is already taken")]
    DuplicateUsername,

    /// An empty string was used to create a savings goal name.
    #[error("Goal name cannot be empty")]
    EmptyGoalName,

    /// Another savings goal owned by the same user already has this name.
    #[error("you already have a savings goal with that name")]
    DuplicateGoalName,

    /// The string could not be parsed as an amount of money.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The amount has more than two decimal places.
    #[error("{0} has more than two decimal places")]
    AmountPrecision(String),

    /// The amount is outside the range the application can store.
    #[error("{0} is too large")]
    AmountTooLarge(String),

    /// A contribution amount or savings target that is zero or negative.
    #[error("{0} must be more than zero")]
    NonPositiveAmount(Money),

    /// A savings goal target date before today.
    #[error("the target date {0} is in the past")]
    PastTargetDate(Date),

    /// The code does not name a known income type, expense category or payment source.
    #[error("\"{0}\" is not a valid choice")]
    InvalidChoice(String),

    /// A date in the future was used to record income or an expense.
    ///
    /// Income and expenses record events that have already happened, therefore
    /// future dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while writing a CSV export.
    #[error("could not write CSV: {0}")]
    CSVExportError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The savings goal does not exist or belongs to another user.
    #[error("the savings goal could not be found")]
    MissingGoal,

    /// Tried to delete a savings goal that does not exist
    #[error("tried to delete a savings goal that is not in the database")]
    DeleteMissingGoal,

    /// Tried to update an income entry that does not exist
    #[error("tried to update income that is not in the database")]
    UpdateMissingIncome,

    /// Tried to delete an income entry that does not exist
    #[error("tried to delete income that is not in the database")]
    DeleteMissingIncome,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("savings_goal.name") =>
            {
                Error::DuplicateGoalName
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CSVExportError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::MissingGoal => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::FutureDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid date".to_owned(),
                    details: format!(
                        "{date} is a date in the future, which is not allowed. \
                        Change the date to today or earlier."
                    ),
                },
            ),
            error @ (Error::InvalidAmount(_)
            | Error::AmountPrecision(_)
            | Error::AmountTooLarge(_)
            | Error::NonPositiveAmount(_)) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: capitalise_first_char(&error.to_string()),
                },
            ),
            Error::PastTargetDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid target date".to_owned(),
                    details: format!("{date} has already passed. Choose today or a later date."),
                },
            ),
            Error::InvalidChoice(choice) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid choice".to_owned(),
                    details: format!("\"{choice}\" is not one of the available options."),
                },
            ),
            Error::MissingGoal => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not find savings goal".to_owned(),
                    details: "The savings goal could not be found. \
                    Try refreshing the page to see if the goal has been deleted."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingGoal => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete savings goal".to_owned(),
                    details: "The savings goal could not be found. \
                    Try refreshing the page to see if the goal has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingIncome => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update income".to_owned(),
                    details: "The income could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingIncome => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete income".to_owned(),
                    details: "The income could not be found. \
                    Try refreshing the page to see if the income has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update expense".to_owned(),
                    details: "The expense could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete expense".to_owned(),
                    details: "The expense could not be found. \
                    Try refreshing the page to see if the expense has already been deleted."
                        .to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

/// Uppercase the first character of `string`.
pub(crate) fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
