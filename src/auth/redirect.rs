//! Building the "log in, then come back here" redirect URL.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Parse `raw_url` and return its path and query if it is a safe place to send a user after they log in.
///
/// Only same-origin relative paths are allowed, and redirecting back to the
/// log in page itself is rejected.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    safe_path_and_query(&uri)
}

/// Like [normalize_redirect_url], but accepts absolute URLs such as the
/// `HX-Current-URL` header and keeps only their path and query.
fn normalize_current_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    safe_path_and_query(&uri)
}

fn safe_path_and_query(uri: &Uri) -> Option<String> {
    let path_and_query = uri.path_and_query()?;
    let text = path_and_query.as_str();

    let is_safe = text.starts_with('/')
        && !text.starts_with("//")
        && path_and_query.path() != endpoints::LOG_IN_VIEW;

    is_safe.then(|| text.to_owned())
}

/// The log in page URL with a `redirect_url` query parameter pointing back
/// to the page the user was trying to reach.
///
/// For `/api` requests the page is taken from the `HX-Current-URL` header sent by HTMX.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let target = if request.uri().path().starts_with("/api") {
        current_url_from_htmx_headers(request)?
    } else {
        normalize_redirect_url(request.uri().path_and_query()?.as_str())?
    };

    build_log_in_redirect_url_from_target(&target)
}

pub(super) fn build_log_in_redirect_url_from_target(target: &str) -> Option<String> {
    serde_urlencoded::to_string([("redirect_url", target)])
        .inspect_err(|error| tracing::error!("Could not encode redirect URL {target}: {error}"))
        .ok()
        .map(|query| format!("{}?{}", endpoints::LOG_IN_VIEW, query))
}

fn current_url_from_htmx_headers(request: &Request) -> Option<String> {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    };

    if !header("hx-request").is_some_and(|value| value.eq_ignore_ascii_case("true")) {
        tracing::warn!("Missing HX-Request header for /api request.");
        return None;
    }

    let Some(current_url) = header("hx-current-url") else {
        tracing::warn!("Missing HX-Current-URL header for /api request.");
        return None;
    };

    let redirect_url = normalize_current_url(current_url);
    if redirect_url.is_none() {
        tracing::warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    redirect_url
}
