use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key},
};

use crate::flash::{Flash, set_flash, take_flash};

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    assert_eq!(get_header(response, "content-type"), content_type);
}

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    response
        .headers()
        .get(header_name)
        .unwrap_or_else(|| panic!("Headers missing {header_name}"))
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}

pub(crate) async fn get_body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).to_string()
}

/// Decrypt the flash message set by `response`, if any.
#[track_caller]
pub(crate) fn get_flash(response: &Response<Body>, key: Key) -> Option<Flash> {
    take_flash(next_request_jar(response, key)?).1
}

/// The cookie jar a browser would send with its next request after `response`.
///
/// Only the flash cookie is carried over.
pub(crate) fn next_request_jar(response: &Response<Body>, key: Key) -> Option<PrivateCookieJar> {
    let cookie = get_set_cookies(response)
        .into_iter()
        .find(|cookie| cookie.name() == "flash")?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_str(&format!("flash={}", cookie.value())).unwrap(),
    );

    Some(PrivateCookieJar::from_headers(&headers, key))
}

/// A cookie jar from a request that carries `flash` in its encrypted cookie.
pub(crate) fn jar_with_flash(flash: &Flash, key: Key) -> PrivateCookieJar {
    let response = set_flash(PrivateCookieJar::new(key.clone()), flash).into_response();

    next_request_jar(&response, key).expect("Could not set the flash cookie")
}

/// The cookies set by `response`.
pub(crate) fn get_set_cookies(response: &Response<Body>) -> Vec<Cookie<'static>> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| Cookie::parse(value.to_owned()).ok())
        .collect()
}
