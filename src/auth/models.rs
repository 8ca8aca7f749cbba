//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// JWT claims structure
///
/// `user_id` is the only identity claim; verification fails if it is absent.
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
}

/// User database model
///
/// `google_id` is internal and excluded from API responses.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub email_verified: bool,
    #[serde(skip_serializing, default)]
    pub google_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Query params on GET /auth/google
#[derive(Debug, Deserialize)]
pub struct LoginUrlQuery {
    pub state: Option<String>,
}

/// Query params on the OAuth callback
#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    #[allow(dead_code)]
    pub state: Option<String>,
}

/// POST /auth/email/send-otp body
#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

/// POST /auth/email/verify-otp body
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}
