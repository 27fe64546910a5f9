//! Standard response envelope: `{code, data, msg}`.
//!
//! Every endpoint answers HTTP 200; success and failure are told apart by `code`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const CODE_OK: i32 = 0;
pub const CODE_ERROR: i32 = -1;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub code: i32,
    pub data: Option<T>,
    pub msg: String,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Envelope {
            code: CODE_OK,
            data: Some(data),
            msg: String::new(),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Envelope {
            code: CODE_ERROR,
            data: None,
            msg: msg.into(),
        }
    }
}

impl Envelope<()> {
    /// Success without a payload (`data: null`).
    pub fn empty() -> Self {
        Envelope {
            code: CODE_OK,
            data: None,
            msg: String::new(),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
