//! Transport-level status of a rendered outcome.

use crate::exit_codes;
use std::fmt;

/// Status a transport attaches to a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Created,
    Forbidden,
    NotFound,
    Conflict,
    UnprocessableEntity,
    InternalError,
}

impl Status {
    /// HTTP status code equivalent.
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::Forbidden => 403,
            Status::NotFound => 404,
            Status::Conflict => 409,
            Status::UnprocessableEntity => 422,
            Status::InternalError => 500,
        }
    }

    /// CLI exit code equivalent.
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok | Status::Created => exit_codes::SUCCESS,
            Status::Forbidden => exit_codes::UNAUTHORIZED,
            Status::NotFound => exit_codes::NOT_FOUND,
            Status::Conflict => exit_codes::CONFLICT,
            Status::UnprocessableEntity => exit_codes::USER_ERROR,
            Status::InternalError => exit_codes::INTERNAL_ERROR,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Status::Ok | Status::Created)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Status::Ok => "OK",
            Status::Created => "Created",
            Status::Forbidden => "Forbidden",
            Status::NotFound => "Not Found",
            Status::Conflict => "Conflict",
            Status::UnprocessableEntity => "Unprocessable Entity",
            Status::InternalError => "Internal Server Error",
        };
        write!(f, "{} {}", self.code(), reason)
    }
}
