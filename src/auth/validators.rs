// src/auth/validators.rs

use super::models::*;
use crate::common::{is_valid_email, ValidationResult, Validator};

pub struct OtpValidator;

impl Validator<SendOtpRequest> for OtpValidator {
    fn validate(&self, data: &SendOtpRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.email.trim().is_empty() {
            result.add_error("email", "Email is required");
        } else if !is_valid_email(&data.email) {
            result.add_error("email", "Email must be a valid address");
        }

        result
    }
}

impl Validator<VerifyOtpRequest> for OtpValidator {
    fn validate(&self, data: &VerifyOtpRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.email.trim().is_empty() {
            result.add_error("email", "Email is required");
        } else if !is_valid_email(&data.email) {
            result.add_error("email", "Email must be a valid address");
        }

        if data.code.len() != 6 {
            result.add_error("code", "Code must be exactly 6 characters");
        } else if !data
            .code
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
        {
            result.add_error("code", "Code must be uppercase letters and digits");
        }

        result
    }
}
