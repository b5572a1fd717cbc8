//! Tenant resolution
//!
//! Every company has its own store file in the tenant directory. This module
//! maps free-text company input to one of those stores:
//!
//! - `normalize`: canonical store name for a company
//! - `locate`: stores currently on disk
//! - `decide`: fuzzy match of a requested name against located stores
//! - `TenantResolver`: the interactive, bounded resolution loop

pub mod locator;
pub mod matcher;
pub mod name;
pub mod resolver;

pub use locator::locate;
pub use matcher::{decide, similarity, MatchDecision};
pub use name::{normalize, TenantName, STORE_SUFFIX};
pub use resolver::{Resolution, TenantResolver};
