//! Cryptographic functions for the bookkeeper
//!
//! Provides PBKDF2-HMAC-SHA256 password digests with per-credential salts
//! and zeroizing containers for passwords held in memory.

pub mod password;
pub mod secure_memory;

pub use password::{generate_initial_password, PasswordDigest, PBKDF2_ITERATIONS};
pub use secure_memory::SecureString;
