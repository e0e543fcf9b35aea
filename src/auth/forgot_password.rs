//! The page explaining how a forgotten password can be reset.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::html::{base, log_in_register};

fn forgot_password_view() -> Markup {
    let instructions = html! {
        p class="text-justify text-gray-900 dark:text-white"
        {
            "Passwords are reset by whoever runs this server. Ask them to run "
            code { "reset_password --db-path <DATABASE> --username <YOUR USERNAME>" }
            " from the directory the server runs in, then log in with the new password."
        }
    };

    base(
        "Forgot Password",
        &[],
        &log_in_register("Forgot your password?", &instructions),
    )
}

/// Renders a page describing how the user's password can be reset.
pub async fn get_forgot_password_page() -> Response {
    forgot_password_view().into_response()
}

#[cfg(test)]
mod forgot_password_tests {
    use axum::http::StatusCode;

    use crate::{
        auth::forgot_password::get_forgot_password_page,
        test_utils::{assert_valid_html, parse_html_document, select_text},
    };

    #[tokio::test]
    async fn page_names_reset_password_program() {
        let response = get_forgot_password_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let code = select_text(&document, "code");
        assert_eq!(code.len(), 1);
        assert!(code[0].starts_with("reset_password"));
    }
}
