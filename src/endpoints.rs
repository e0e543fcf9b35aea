//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/savings/{goal_id}/edit', use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing savings goals and the contribution form.
pub const SAVINGS_VIEW: &str = "/savings";
/// The page for editing a savings goal.
pub const EDIT_SAVINGS_GOAL_VIEW: &str = "/savings/{goal_id}/edit";
/// The CSV download of a user's savings goals.
pub const SAVINGS_EXPORT: &str = "/savings/export";
/// The page listing income and the form for recording income.
pub const INCOME_VIEW: &str = "/income";
/// The page for editing an income entry.
pub const EDIT_INCOME_VIEW: &str = "/income/{income_id}/edit";
/// The CSV download of a user's income.
pub const INCOME_EXPORT: &str = "/income/export";
/// The page listing expenses and the form for recording expenses.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page for editing an expense.
pub const EDIT_EXPENSE_VIEW: &str = "/expenses/{expense_id}/edit";
/// The CSV download of a user's expenses.
pub const EXPENSES_EXPORT: &str = "/expenses/export";
/// The page for displaying the merged transaction history.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The CSV download of the merged transaction history.
pub const TRANSACTIONS_EXPORT: &str = "/transactions/export";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for instructions for resetting the user's password.
pub const FORGOT_PASSWORD_VIEW: &str = "/forgot_password";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create users.
pub const USERS: &str = "/api/users";
/// The route to contribute to a new or existing savings goal.
pub const SAVINGS_API: &str = "/api/savings";
/// The route to edit or delete a single savings goal.
pub const SAVINGS_GOAL: &str = "/api/savings/{goal_id}";
/// The route to record income.
pub const INCOME_API: &str = "/api/income";
/// The route to edit or delete a single income entry.
pub const INCOME: &str = "/api/income/{income_id}";
/// The route to record expenses.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to edit or delete a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/savings/{goal_id}', '{goal_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::DASHBOARD_VIEW,
            endpoints::SAVINGS_VIEW,
            endpoints::EDIT_SAVINGS_GOAL_VIEW,
            endpoints::SAVINGS_EXPORT,
            endpoints::INCOME_VIEW,
            endpoints::EDIT_INCOME_VIEW,
            endpoints::INCOME_EXPORT,
            endpoints::EXPENSES_VIEW,
            endpoints::EDIT_EXPENSE_VIEW,
            endpoints::EXPENSES_EXPORT,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::TRANSACTIONS_EXPORT,
            endpoints::REGISTER_VIEW,
            endpoints::LOG_IN_VIEW,
            endpoints::FORGOT_PASSWORD_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::STATIC,
            endpoints::COFFEE,
            endpoints::LOG_IN_API,
            endpoints::LOG_OUT,
            endpoints::USERS,
            endpoints::SAVINGS_API,
            endpoints::SAVINGS_GOAL,
            endpoints::INCOME_API,
            endpoints::INCOME,
            endpoints::EXPENSES_API,
            endpoints::EXPENSE,
        ] {
            assert_endpoint_is_valid_uri(&format_endpoint(endpoint, 1));
        }
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/savings/{goal_id}", 1);

        assert_eq!(formatted_path, "/savings/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/savings", 1);

        assert_eq!(formatted_path, "/savings");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/savings/{goal_id}/edit", 42);

        assert_eq!(formatted_path, "/savings/42/edit");
    }
}
