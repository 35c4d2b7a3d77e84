use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;
use crate::users::repo_types::{
    NewUser, User, UserChanges, EMAIL_MAX_CHARS, NAME_MAX_CHARS, PASSWORD_MAX_CHARS,
};

/// Request body for `POST /users`. Keys other than these three are rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `PUT /users/:id`. All fields are required.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User as returned to the client.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        check_lengths(&self.name, &self.email, &self.password)
    }
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        check_lengths(&self.name, &self.email, &self.password)
    }
}

/// Both backends get the same limits as the `users` columns.
fn check_lengths(name: &str, email: &str, password: &str) -> Result<(), AppError> {
    for (field, value, max) in [
        ("name", name, NAME_MAX_CHARS),
        ("email", email, EMAIL_MAX_CHARS),
        ("password", password, PASSWORD_MAX_CHARS),
    ] {
        if value.chars().count() > max {
            return Err(AppError::BadRequest(format!(
                "`{field}` must be at most {max} characters"
            )));
        }
    }
    Ok(())
}

impl From<CreateUserRequest> for NewUser {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            password: r.password,
        }
    }
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            password: r.password,
        }
    }
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            password: u.password,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn user_response_shape() {
        let response = UserResponse::from(User {
            id: 1,
            name: "Ann".into(),
            email: "a@x.com".into(),
            password: "p".into(),
            created_at: datetime!(2024-03-01 10:00:00 UTC),
            updated_at: datetime!(2024-03-02 11:30:00 UTC),
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "name": "Ann",
                "email": "a@x.com",
                "password": "p",
                "created_at": "2024-03-01T10:00:00Z",
                "updated_at": "2024-03-02T11:30:00Z",
            })
        );
    }

    #[test]
    fn create_request_rejects_unknown_keys() {
        let err = serde_json::from_str::<CreateUserRequest>(
            r#"{"name":"Ann","email":"a@x.com","password":"p","id":99}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown field `id`"));
    }

    #[test]
    fn lengths_follow_column_widths() {
        let request = |name: String| CreateUserRequest {
            name,
            email: "a@x.com".into(),
            password: "p".into(),
        };
        assert!(request("a".repeat(NAME_MAX_CHARS)).validate().is_ok());
        // limits count characters, not bytes
        assert!(request("é".repeat(NAME_MAX_CHARS)).validate().is_ok());

        let err = request("a".repeat(NAME_MAX_CHARS + 1)).validate().unwrap_err();
        assert_eq!(err.to_string(), "`name` must be at most 80 characters");

        let long_password = UpdateUserRequest {
            name: "Ann".into(),
            email: "a@x.com".into(),
            password: "x".repeat(PASSWORD_MAX_CHARS + 1),
        };
        assert!(long_password.validate().is_err());
    }

    #[test]
    fn create_request_requires_every_field() {
        let err = serde_json::from_str::<CreateUserRequest>(r#"{"name":"Ann","email":"a@x.com"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("password"));
    }
}
