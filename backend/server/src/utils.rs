use axum::body::Bytes;
use chrono::{DateTime, Local};
use serde_json::{Map, Value};

use crate::error::AppError::{self, MalformedPayload};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub fn timestamp(now: DateTime<Local>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

pub fn now_timestamp() -> String {
    timestamp(Local::now())
}

pub fn get_fields_from_body(body: &Bytes) -> Result<Map<String, Value>, AppError> {
    if body.is_empty() {
        return Err(MalformedPayload("request body is empty".to_string()));
    }

    serde_json::from_slice(body).map_err(|e| MalformedPayload(e.to_string()))
}
