//! User accounts, log-in sessions and the middleware that protects routes.
//!
//! Sessions are stored in a private (encrypted) cookie holding a [Token](token::Token)
//! with the user's ID and an expiry time.

mod cookie;
mod forgot_password;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod register_user;
mod token;
mod user;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use forgot_password::get_forgot_password_page;
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use register_user::{get_register_page, register_user};
pub use user::{User, UserID, Username, get_user_by_username, update_user_password};

pub(crate) use user::{create_user, create_user_table};
