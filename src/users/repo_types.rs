use sqlx::FromRow;
use time::OffsetDateTime;

/// Column widths of the `users` table, in characters.
pub const NAME_MAX_CHARS: usize = 80;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const PASSWORD_MAX_CHARS: usize = 255;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime, // always >= created_at
}

/// Fields supplied by the client when creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Full replacement of the mutable fields.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub password: String,
}
