pub mod generator;
pub mod models;
pub mod service;
pub mod store;

pub use models::OneTimePasscode;
pub use service::OtpService;
pub use store::{PasscodeStore, PgPasscodeStore};
