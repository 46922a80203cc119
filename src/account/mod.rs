pub mod models;
pub mod service;
pub mod store;

pub use models::{Account, ProfileType};
pub use service::{AuthService, RegisterOutcome};
pub use store::{AccountStore, PgAccountStore};
