//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain constructors report what is wrong; these helpers turn that into
//! `400 Bad Request` errors carrying `{"field", "code"}` details.

use serde_json::json;

use crate::domain::{
    Error, LoginValidationError, MiniatureValidationError, RegistrationValidationError, Role,
    UserId, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    EmptyField,
    TooShort,
    TooLong,
    InvalidEmail,
    InvalidUuid,
    InvalidRole,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::EmptyField => "empty_field",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidRole => "invalid_role",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn value_error(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

fn user_field_error(err: &UserValidationError) -> Error {
    use UserValidationError as E;

    let (field, code) = match err {
        E::EmptyId | E::InvalidId => ("id", ErrorCode::InvalidUuid),
        E::EmptyUsername => ("username", ErrorCode::EmptyField),
        E::UsernameTooShort { .. } => ("username", ErrorCode::TooShort),
        E::UsernameTooLong { .. } => ("username", ErrorCode::TooLong),
        E::EmptyEmail => ("email", ErrorCode::EmptyField),
        E::EmailTooShort { .. } => ("email", ErrorCode::TooShort),
        E::EmailTooLong { .. } => ("email", ErrorCode::TooLong),
        E::EmailMissingAt => ("email", ErrorCode::InvalidEmail),
    };
    field_error(FieldName::new(field), code, err.to_string())
}

pub(crate) fn registration_error(err: RegistrationValidationError) -> Error {
    match err {
        RegistrationValidationError::Field(inner) => user_field_error(&inner),
        RegistrationValidationError::EmptyPassword => field_error(
            FieldName::new("password"),
            ErrorCode::EmptyField,
            err.to_string(),
        ),
    }
}

pub(crate) fn login_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => "username",
        LoginValidationError::EmptyPassword => "password",
    };
    field_error(FieldName::new(field), ErrorCode::EmptyField, err.to_string())
}

pub(crate) fn miniature_error(err: MiniatureValidationError) -> Error {
    let code = match err {
        MiniatureValidationError::EmptyField { .. } => ErrorCode::EmptyField,
        MiniatureValidationError::FieldTooLong { .. } => ErrorCode::TooLong,
    };
    field_error(FieldName::new(err.field()), code, err.to_string())
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| {
        value_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_role(value: &str, field: FieldName) -> Result<Role, Error> {
    value
        .parse::<Role>()
        .map_err(|err| value_error(field, ErrorCode::InvalidRole, err.to_string(), value))
}
