// Services module - external collaborators and business logic

pub mod email;
pub mod google;
pub mod otp;
pub mod secret_store;
pub mod users;

pub use email::EmailService;
pub use google::GoogleService;
pub use otp::OtpService;
pub use secret_store::SecretStore;
pub use users::UserService;
