//! Authentication and interactive sessions
//!
//! - `Authenticator`: the login state machine over one tenant store
//! - `change_password_flow`: bounded password rotation
//! - `Session`: owns the store handle and drives the menus

pub mod flow;
pub mod session;

pub use flow::{change_password_flow, AuthState, Authenticator, MAX_PASSWORD_ATTEMPTS};
pub use session::{LoginChoice, Session, SessionEnd, SettingsChoice, StartChoice};
