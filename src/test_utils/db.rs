use rusqlite::Connection;

use crate::{
    PasswordHash, UserID, Username,
    auth::create_user,
    db::initialize,
};

/// An in-memory database with every table created.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a user named `username` and return its ID.
#[track_caller]
pub(crate) fn insert_test_user(username: &str, connection: &Connection) -> UserID {
    create_user(
        Username::new(username).unwrap(),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
    .id
}
