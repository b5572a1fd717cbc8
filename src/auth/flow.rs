//! Login and password change flows
//!
//! Login runs as a small state machine:
//!
//! ```text
//! LoggedOut -> IdentifierEntered -> RelationChecked -> PasswordPrompted
//!           -> Authenticated | Rejected
//! ```
//!
//! Unknown initials and external relations are both plain `Rejected`; the
//! caller cannot tell them apart.

use crate::audit::AuditEntry;
use crate::cli::prompt::Prompt;
use crate::crypto::SecureString;
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::Initials;
use crate::services::credential::{validate_new_password, CredentialManager};
use crate::storage::TenantStore;

/// Verification attempts allowed when changing a password
pub const MAX_PASSWORD_ATTEMPTS: u32 = 3;

/// Audited in place of rejected input that names no known person
pub const UNKNOWN_IDENTIFIER: &str = "<unknown>";

/// States of one login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    /// Raw input, not yet looked up
    IdentifierEntered(String),
    /// Known initials whose relation is checked next
    RelationChecked(Initials),
    /// Internal relation; the password is asked and verified next
    PasswordPrompted(Initials),
    Authenticated(Initials),
    Rejected,
}

impl AuthState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AuthState::Authenticated(_) | AuthState::Rejected)
    }

    /// Initials of an authenticated login
    pub fn identifier(&self) -> Option<&Initials> {
        match self {
            AuthState::Authenticated(initials) => Some(initials),
            _ => None,
        }
    }
}

/// Drives logins against one tenant store
pub struct Authenticator<'a> {
    store: &'a TenantStore,
}

impl<'a> Authenticator<'a> {
    pub fn new(store: &'a TenantStore) -> Self {
        Self { store }
    }

    /// Run one login attempt to `Authenticated` or `Rejected`
    ///
    /// Rejections are audited with the initials only when they belong to a
    /// known person; anything else typed at the prompt is never recorded.
    pub fn authenticate(&self, prompt: &mut dyn Prompt) -> BookkeeperResult<AuthState> {
        let mut known: Option<Initials> = None;
        let mut state = AuthState::LoggedOut;

        while !state.is_terminal() {
            if let AuthState::RelationChecked(initials) = &state {
                known = Some(initials.clone());
            }
            state = self.step(state, prompt)?;
        }

        match &state {
            AuthState::Authenticated(initials) => {
                tracing::info!(initials = %initials, tenant = %self.store.name(), "login granted");
                self.store
                    .audit(AuditEntry::login(initials.to_string(), true))?;
            }
            _ => {
                tracing::info!(tenant = %self.store.name(), "login rejected");
                let identifier = known
                    .map(|initials| initials.to_string())
                    .unwrap_or_else(|| UNKNOWN_IDENTIFIER.to_string());
                self.store.audit(AuditEntry::login(identifier, false))?;
            }
        }

        Ok(state)
    }

    /// Advance the state machine by one transition
    pub fn step(&self, state: AuthState, prompt: &mut dyn Prompt) -> BookkeeperResult<AuthState> {
        let credentials = CredentialManager::new(self.store);

        let next = match state {
            AuthState::LoggedOut => AuthState::IdentifierEntered(prompt.line("Initials: ")?),
            AuthState::IdentifierEntered(input) => match Initials::parse(&input) {
                Ok(initials) if self.store.persons.get_by_initials(&initials)?.is_some() => {
                    AuthState::RelationChecked(initials)
                }
                _ => AuthState::Rejected,
            },
            AuthState::RelationChecked(initials) => {
                if credentials.is_internal(initials.as_str())? {
                    AuthState::PasswordPrompted(initials)
                } else {
                    AuthState::Rejected
                }
            }
            AuthState::PasswordPrompted(initials) => {
                let password = prompt.secret("Password: ")?;
                if credentials.verify(initials.as_str(), &password)? {
                    AuthState::Authenticated(initials)
                } else {
                    AuthState::Rejected
                }
            }
            terminal => terminal,
        };

        Ok(next)
    }
}

/// Change the password of `initials` interactively
///
/// The current password may be entered up to three times. Returns the new
/// password once it is stored, or `None` if the current password was never
/// confirmed or no acceptable new password was given.
pub fn change_password_flow(
    store: &TenantStore,
    initials: &Initials,
    prompt: &mut dyn Prompt,
) -> BookkeeperResult<Option<SecureString>> {
    let credentials = CredentialManager::new(store);

    let mut current = None;
    for attempt in 1..=MAX_PASSWORD_ATTEMPTS {
        let candidate = prompt.secret("Current password: ")?;
        if credentials.verify(initials.as_str(), &candidate)? {
            current = Some(candidate);
            break;
        }
        prompt.say(&format!(
            "Wrong password ({} of {} attempts)",
            attempt, MAX_PASSWORD_ATTEMPTS
        ));
    }

    let Some(current) = current else {
        tracing::info!(initials = %initials, "password change abandoned");
        return Ok(None);
    };

    for _ in 0..MAX_PASSWORD_ATTEMPTS {
        let new = prompt.secret("New password: ")?;
        let repeated = prompt.secret("Repeat new password: ")?;

        if new != repeated {
            prompt.say("Passwords do not match.");
            continue;
        }
        if let Err(e) = validate_new_password(&new) {
            prompt.say(&e.to_string());
            continue;
        }

        match credentials.update(initials.as_str(), &current, &new) {
            Ok(()) => {
                prompt.say("Password changed.");
                return Ok(Some(new));
            }
            Err(e @ BookkeeperError::Validation(_)) => prompt.say(&e.to_string()),
            Err(e) => return Err(e),
        }
    }

    Ok(None)
}
