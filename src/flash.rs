//! One-shot messages that survive a redirect.
//!
//! A handler that redirects after a successful change stores a message with
//! [set_flash], and the page it redirects to shows it once with [take_flash].

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

const COOKIE_FLASH: &str = "flash";

/// A message to show on the next page the user loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Flash {
    /// The change went as requested.
    Success(String),
    /// The change was made, but not exactly as requested, e.g. an amount was capped.
    Info(String),
}

impl Flash {
    /// Render the message as a dismissable banner.
    pub fn view(&self) -> Markup {
        let (message, style) = match self {
            Flash::Success(message) => (
                message,
                "text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400",
            ),
            Flash::Info(message) => (
                message,
                "text-blue-800 bg-blue-50 dark:bg-gray-800 dark:text-blue-400",
            ),
        };

        html! {
            div
                id="flash-message"
                role="status"
                class={ "w-full max-w-5xl p-4 mb-4 text-sm rounded-lg " (style) }
            {
                (message)
            }
        }
    }
}

/// Store `flash` so that the next call to [take_flash] returns it.
pub fn set_flash(jar: PrivateCookieJar, flash: &Flash) -> PrivateCookieJar {
    let value = match serde_json::to_string(flash) {
        Ok(value) => value,
        Err(error) => {
            tracing::error!("could not serialize flash message {flash:?}: {error}");
            return jar;
        }
    };

    jar.add(
        Cookie::build((COOKIE_FLASH, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Remove the pending flash message from the cookie jar, if any.
///
/// The returned jar must be included in the response so that the client
/// forgets the message.
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(COOKIE_FLASH) else {
        return (jar, None);
    };

    let flash = serde_json::from_str(cookie.value_trimmed())
        .inspect_err(|error| tracing::warn!("discarding unreadable flash message: {error}"))
        .ok();

    (jar.remove(Cookie::build(COOKIE_FLASH).path("/")), flash)
}
