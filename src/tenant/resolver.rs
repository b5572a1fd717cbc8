//! Interactive tenant resolution
//!
//! Turns company-name input into exactly one tenant: an existing store or a
//! new one the user agreed to create. Input is retried a bounded number of
//! times.

use std::path::Path;

use crate::cli::prompt::Prompt;
use crate::config::Settings;
use crate::error::{BookkeeperError, BookkeeperResult};

use super::locator::locate;
use super::matcher::{decide, MatchDecision};
use super::name::{normalize, TenantName};

/// Which tenant the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A store that already exists on disk
    Existing(TenantName),
    /// No store matched; this one must be created
    New(TenantName),
}

impl Resolution {
    pub fn name(&self) -> &TenantName {
        match self {
            Resolution::Existing(name) | Resolution::New(name) => name,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Resolution::New(_))
    }
}

/// Resolves company names against one tenant directory
pub struct TenantResolver<'a> {
    dir: &'a Path,
    settings: &'a Settings,
}

impl<'a> TenantResolver<'a> {
    pub fn new(dir: &'a Path, settings: &'a Settings) -> Self {
        Self { dir, settings }
    }

    /// Ask for a company until one tenant is chosen
    ///
    /// Gives up with `Aborted` after `max_company_attempts` inputs.
    pub fn resolve(&self, prompt: &mut dyn Prompt) -> BookkeeperResult<Resolution> {
        let located = locate(self.dir)?;

        for attempt in 1..=self.settings.max_company_attempts {
            let input = prompt.line("Company: ")?;

            let requested = match normalize(&input) {
                Ok(name) => name,
                Err(e) if e.is_validation() => {
                    prompt.say(&e.to_string());
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(resolution) = self.resolve_once(&requested, &located, prompt)? {
                tracing::info!(
                    tenant = %resolution.name(),
                    new = resolution.is_new(),
                    attempt,
                    "resolved tenant"
                );
                return Ok(resolution);
            }
        }

        Err(BookkeeperError::Aborted(format!(
            "no company chosen after {} attempts",
            self.settings.max_company_attempts
        )))
    }

    /// Resolve one input; `None` means ask again
    fn resolve_once(
        &self,
        requested: &TenantName,
        located: &[TenantName],
        prompt: &mut dyn Prompt,
    ) -> BookkeeperResult<Option<Resolution>> {
        match decide(requested, located, &self.settings.matching) {
            MatchDecision::Exact(name) => Ok(Some(Resolution::Existing(name))),
            MatchDecision::Accept { name, score } => {
                tracing::debug!(tenant = %name, score, "accepted close match");
                prompt.say(&format!("Opening {}", name.display_name()));
                Ok(Some(Resolution::Existing(name)))
            }
            MatchDecision::Confirm { name, .. } => {
                let question = format!("Did you mean {}?", name.display_name());
                if prompt.confirm(&question)? {
                    Ok(Some(Resolution::Existing(name)))
                } else {
                    self.offer_new(requested, prompt)
                }
            }
            MatchDecision::NoMatch { .. } => self.offer_new(requested, prompt),
        }
    }

    fn offer_new(
        &self,
        requested: &TenantName,
        prompt: &mut dyn Prompt,
    ) -> BookkeeperResult<Option<Resolution>> {
        if !self.settings.confirm_new_tenant {
            return Ok(Some(Resolution::New(requested.clone())));
        }

        let question = format!(
            "No company named {} found. Create it?",
            requested.display_name()
        );
        if prompt.confirm(&question)? {
            Ok(Some(Resolution::New(requested.clone())))
        } else {
            Ok(None)
        }
    }
}
