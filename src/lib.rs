//! Bookkeeper - tenant-scoped bookkeeping console
//!
//! Every company ("tenant") has its own isolated store. Employees log in with
//! short initials and a password before entering data.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and settings
//! - `error`: Custom error types
//! - `models`: Persons, credentials, languages and keys
//! - `storage`: Per-tenant JSON stores
//! - `tenant`: Normalizing, locating and fuzzy-matching tenant stores
//! - `services`: Initials generation, person and credential management
//! - `auth`: Login state machine, password change and the interactive session
//! - `audit`: Append-only audit log
//! - `crypto`: Password hashing and secret handling
//! - `cli`, `display`: Command handlers, prompts and table output
//!
//! # Example
//!
//! ```rust,ignore
//! use bookkeeper::config::{BookkeeperPaths, Settings};
//! use bookkeeper::tenant::{locate, normalize};
//!
//! let paths = BookkeeperPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let stores = locate(&paths.tenants_dir())?;
//! let wanted = normalize("Acme Corp")?; // Acme_Corp.db
//! ```

pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod tenant;

pub use error::{BookkeeperError, BookkeeperResult};
