//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod config;
pub mod register;

// Re-exports
pub use authenticate::AuthenticateUseCase;
pub use config::AuthConfig;
pub use register::{RegisterInput, RegisterUseCase};
