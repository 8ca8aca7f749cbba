// Common module - shared types and utilities across all modules

pub mod error;
pub mod helpers;
pub mod id_generator;
pub mod migrations;
pub mod response;
pub mod state;
pub mod validation;

// Re-export commonly used types for convenience
pub use error::ApiError;
pub use helpers::safe_email_log;
pub use id_generator::generate_user_id;
pub use response::{message_only, success, success_with_message};
pub use state::AppState;
pub use validation::{is_valid_email, ValidationResult, Validator};
