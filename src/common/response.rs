// Success response envelope helpers
//
// All success responses share the `{success:true, data, message?}` shape so
// clients can branch on `success` without inspecting status codes.

use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// Wrap a payload in the success envelope: `{success:true, data}`
pub fn success<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": data,
    }))
}

/// Success envelope with a human-readable message alongside the data
pub fn success_with_message<T: Serialize>(data: T, message: &str) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": data,
        "message": message,
    }))
}

/// Success envelope carrying only a message, no data payload
pub fn message_only(message: &str) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
    }))
}
