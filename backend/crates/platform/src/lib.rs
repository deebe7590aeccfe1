//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, HMAC signing)
//! - Password hashing (Argon2id)
//! - Cookie management
//! - HTML template loading and rendering

pub mod cookie;
pub mod crypto;
pub mod password;
pub mod template;
