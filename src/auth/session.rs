//! Interactive session
//!
//! A session owns the one store handle of the chosen tenant from resolution
//! until the process leaves the session, whichever way it leaves. Menus are
//! plain enums parsed from the user's choice.

use serde_json::json;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::cli::prompt::Prompt;
use crate::config::{BookkeeperPaths, Settings};
use crate::display::{format_person_list, format_settings};
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{Initials, Language, PersonName};
use crate::services::{CreatePersonInput, CredentialManager, CredentialSummary, PersonService};
use crate::storage::TenantStore;
use crate::tenant::{Resolution, TenantResolver};

use super::flow::{change_password_flow, AuthState, Authenticator};

/// Choices before login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginChoice {
    Login,
    Quit,
}

impl LoginChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" | "login" => Some(Self::Login),
            "2" | "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Choices after login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartChoice {
    NewPerson,
    Settings,
    ListPersons,
    Logout,
    Quit,
}

impl StartChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" => Some(Self::NewPerson),
            "2" => Some(Self::Settings),
            "3" => Some(Self::ListPersons),
            "4" | "logout" => Some(Self::Logout),
            "5" | "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Choices in the settings menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChoice {
    Language,
    Password,
    Show,
    Back,
}

impl SettingsChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" => Some(Self::Language),
            "2" => Some(Self::Password),
            "3" => Some(Self::Show),
            "4" | "" | "back" => Some(Self::Back),
            _ => None,
        }
    }
}

const LOGIN_MENU: &str = "1: Login\n2: Quit";
const START_MENU: &str = "1: New person\n2: Settings\n3: List persons\n4: Logout\n5: Quit";
const SETTINGS_MENU: &str = "1: Change language\n2: Change password\n3: Show settings\n4: Back";

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
}

/// What to do after the start menu
enum AfterStart {
    Logout,
    Quit,
}

/// One interactive session on one tenant
#[derive(Debug)]
pub struct Session {
    store: TenantStore,
    settings: Settings,
    authenticated: bool,
    identifier: Option<Initials>,
    language: Language,
}

impl Session {
    /// Resolve a tenant interactively and open its store
    ///
    /// A newly created tenant is recorded in the audit log.
    pub fn start(
        paths: &BookkeeperPaths,
        settings: Settings,
        prompt: &mut dyn Prompt,
    ) -> BookkeeperResult<Self> {
        paths.ensure_directories()?;
        let tenants_dir = paths.tenants_dir();

        let resolution = TenantResolver::new(&tenants_dir, &settings).resolve(prompt)?;
        let store = TenantStore::open(&tenants_dir, resolution.name())?
            .with_audit(AuditLogger::new(paths.audit_log()));

        if let Resolution::New(name) = &resolution {
            store.audit(AuditEntry::create(
                EntityType::Tenant,
                name.to_string(),
                Some(name.display_name()),
                &json!({ "path": store.path().display().to_string() }),
            ))?;
            prompt.say(&format!("Created company {}", name.display_name()));
        }

        Ok(Self::new(store, settings))
    }

    pub fn new(store: TenantStore, settings: Settings) -> Self {
        let language = settings.default_language;
        Self {
            store,
            settings,
            authenticated: false,
            identifier: None,
            language,
        }
    }

    pub fn store(&self) -> &TenantStore {
        &self.store
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Initials of the logged-in person
    pub fn identifier(&self) -> Option<&Initials> {
        self.identifier.as_ref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Run menus until the user quits
    ///
    /// A tenant without persons first gets its first employee.
    pub fn run(&mut self, prompt: &mut dyn Prompt) -> BookkeeperResult<SessionEnd> {
        if self.store.is_empty()? {
            self.bootstrap_first_employee(prompt)?;
        }

        loop {
            prompt.say(&format!("\n{}\n{}", self.store.name().display_name(), LOGIN_MENU));
            match LoginChoice::parse(&prompt.line("> ")?) {
                Some(LoginChoice::Login) => {
                    if !self.login(prompt)? {
                        continue;
                    }
                    match self.start_menu(prompt)? {
                        AfterStart::Logout => self.logout(),
                        AfterStart::Quit => return Ok(SessionEnd::Quit),
                    }
                }
                Some(LoginChoice::Quit) => return Ok(SessionEnd::Quit),
                None => prompt.say("Unknown choice"),
            }
        }
    }

    /// Persist and release the store
    pub fn close(self) -> BookkeeperResult<()> {
        self.store.close()
    }

    /// Create the first employee of a new tenant
    ///
    /// The first employee is always internal and is created by the OS user.
    /// Invalid names are asked again, up to `max_company_attempts` times.
    pub fn bootstrap_first_employee(&mut self, prompt: &mut dyn Prompt) -> BookkeeperResult<()> {
        prompt.say("This company has no employees yet. Create the first one.");
        let created_by = os_user();
        let service = PersonService::new(&self.store);

        for _ in 0..self.settings.max_company_attempts {
            let created = read_name(prompt).and_then(|name| {
                service.create(
                    CreatePersonInput {
                        name,
                        is_internal: true,
                        language: self.language,
                        allow_duplicate_name: false,
                    },
                    &created_by,
                    self.settings.initial_password_length,
                )
            });

            match created {
                Ok(created) => {
                    prompt.say(&format!(
                        "Created {} with initials {}",
                        created.person.name(),
                        created.person.initials
                    ));
                    prompt.say(&format!(
                        "Initial password for {}: {}",
                        created.person.initials,
                        created.initial_password.as_str()
                    ));
                    prompt.say("It must be changed at the first login.");
                    return Ok(());
                }
                Err(e) if e.is_validation() => prompt.say(&e.to_string()),
                Err(e) => return Err(e),
            }
        }

        Err(BookkeeperError::Aborted(
            "no valid name for the first employee".into(),
        ))
    }

    /// One login attempt; forces a password change when one is due
    fn login(&mut self, prompt: &mut dyn Prompt) -> BookkeeperResult<bool> {
        let state = Authenticator::new(&self.store).authenticate(prompt)?;
        let AuthState::Authenticated(initials) = state else {
            prompt.say("Login failed");
            return Ok(false);
        };

        let credentials = CredentialManager::new(&self.store);
        if credentials.must_change_password(initials.as_str())? {
            prompt.say("Your password must be changed now.");
            if change_password_flow(&self.store, &initials, prompt)?.is_none() {
                prompt.say("Password not changed; logged out.");
                return Ok(false);
            }
        }

        if let Some(credential) = credentials.get(initials.as_str())? {
            self.language = credential.language;
        }
        self.authenticated = true;
        self.identifier = Some(initials);
        Ok(true)
    }

    fn logout(&mut self) {
        if let Some(initials) = self.identifier.take() {
            tracing::debug!(initials = %initials, "logged out");
        }
        self.authenticated = false;
        self.language = self.settings.default_language;
    }

    fn acting_identifier(&self) -> BookkeeperResult<Initials> {
        match (&self.identifier, self.authenticated) {
            (Some(initials), true) => Ok(initials.clone()),
            _ => Err(BookkeeperError::Credential("Not logged in".into())),
        }
    }

    fn start_menu(&mut self, prompt: &mut dyn Prompt) -> BookkeeperResult<AfterStart> {
        loop {
            prompt.say(&format!("\n{}", START_MENU));
            match StartChoice::parse(&prompt.line("> ")?) {
                Some(StartChoice::NewPerson) => self.new_person(prompt)?,
                Some(StartChoice::Settings) => self.settings_menu(prompt)?,
                Some(StartChoice::ListPersons) => {
                    let persons = PersonService::new(&self.store).list()?;
                    prompt.say(&format_person_list(&persons));
                }
                Some(StartChoice::Logout) => return Ok(AfterStart::Logout),
                Some(StartChoice::Quit) => return Ok(AfterStart::Quit),
                None => prompt.say("Unknown choice"),
            }
        }
    }

    fn new_person(&mut self, prompt: &mut dyn Prompt) -> BookkeeperResult<()> {
        let acting = self.acting_identifier()?;
        let name = match read_name(prompt) {
            Ok(name) => name,
            Err(e) if e.is_validation() => {
                prompt.say(&e.to_string());
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        let is_internal = prompt.confirm("Employee (may log in)?")?;

        let mut input = CreatePersonInput {
            name,
            is_internal,
            language: self.settings.default_language,
            allow_duplicate_name: false,
        };

        let service = PersonService::new(&self.store);
        let password_length = self.settings.initial_password_length;
        let created = match service.create(input.clone(), acting.as_str(), password_length) {
            Err(BookkeeperError::Duplicate { identifier, .. }) => {
                if !prompt.confirm(&format!("{} already exists. Create anyway?", identifier))? {
                    return Ok(());
                }
                input.allow_duplicate_name = true;
                service.create(input, acting.as_str(), password_length)
            }
            other => other,
        };
        let created = match created {
            Ok(created) => created,
            Err(e) if e.is_validation() => {
                prompt.say(&e.to_string());
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        prompt.say(&format!(
            "Created {} with initials {}",
            created.person.name(),
            created.person.initials
        ));
        if created.credential.is_internal {
            prompt.say(&format!(
                "Initial password for {}: {}",
                created.person.initials,
                created.initial_password.as_str()
            ));
        }
        Ok(())
    }

    fn settings_menu(&mut self, prompt: &mut dyn Prompt) -> BookkeeperResult<()> {
        let initials = self.acting_identifier()?;
        let credentials = CredentialManager::new(&self.store);

        loop {
            prompt.say(&format!("\n{}", SETTINGS_MENU));
            match SettingsChoice::parse(&prompt.line("> ")?) {
                Some(SettingsChoice::Language) => {
                    if let Some(language) = choose_language(prompt)? {
                        credentials.set_language(initials.as_str(), language)?;
                        self.language = language;
                        prompt.say(&format!("Language set to {}", language.native_name()));
                    }
                }
                Some(SettingsChoice::Password) => {
                    change_password_flow(&self.store, &initials, prompt)?;
                }
                Some(SettingsChoice::Show) => {
                    let credential = credentials
                        .get(initials.as_str())?
                        .ok_or_else(|| BookkeeperError::credential_not_found(initials.as_str()))?;
                    prompt.say(&format_settings(&CredentialSummary::from(&credential)));
                }
                Some(SettingsChoice::Back) => return Ok(()),
                None => prompt.say("Unknown choice"),
            }
        }
    }
}

/// Ask for first, middle and last name
fn read_name(prompt: &mut dyn Prompt) -> BookkeeperResult<PersonName> {
    let first = prompt.line("First name: ")?;
    let middle = prompt.line("Middle names (optional): ")?;
    let last = prompt.line("Last name: ")?;

    let middle = if middle.is_empty() {
        None
    } else {
        Some(middle.as_str())
    };
    PersonName::new(&first, middle, &last).map_err(|e| BookkeeperError::Validation(e.to_string()))
}

/// Offer the languages by number or code; empty input keeps the current one
fn choose_language(prompt: &mut dyn Prompt) -> BookkeeperResult<Option<Language>> {
    let menu: Vec<String> = Language::all()
        .iter()
        .enumerate()
        .map(|(i, l)| format!("{}: {} ({})", i + 1, l.native_name(), l.code()))
        .collect();
    prompt.say(&menu.join("\n"));

    let answer = prompt.line("Language: ")?;
    if answer.is_empty() {
        return Ok(None);
    }

    let chosen = answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| Language::all().get(i).copied())
        .or_else(|| Language::parse(&answer));

    if chosen.is_none() {
        prompt.say("Unknown language");
    }
    Ok(chosen)
}

/// Name of the OS user, for records created before anyone logged in
fn os_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "system".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::prompt::ScriptedPrompt;
    use crate::tenant::normalize;
    use tempfile::TempDir;

    fn initial_password(prompt: &ScriptedPrompt) -> String {
        prompt
            .transcript
            .iter()
            .find_map(|line| line.strip_prefix("Initial password for "))
            .and_then(|rest| rest.split_once(": "))
            .map(|(_, password)| password.to_string())
            .unwrap()
    }

    #[test]
    fn test_menu_parsing() {
        assert_eq!(LoginChoice::parse("1"), Some(LoginChoice::Login));
        assert_eq!(LoginChoice::parse(" Quit "), Some(LoginChoice::Quit));
        assert_eq!(LoginChoice::parse("3"), None);
        assert_eq!(StartChoice::parse("4"), Some(StartChoice::Logout));
        assert_eq!(SettingsChoice::parse(""), Some(SettingsChoice::Back));
    }

    #[test]
    fn test_new_company_end_to_end() {
        let temp = TempDir::new().unwrap();
        let paths = BookkeeperPaths::with_base_dir(temp.path().to_path_buf());

        // first run: create the company and its first employee, then quit
        let mut first_run = ScriptedPrompt::new(["Acme Corp", "y", "Jon", "", "Outsh", "2"]);
        let mut session = Session::start(&paths, Settings::default(), &mut first_run).unwrap();
        assert_eq!(session.run(&mut first_run).unwrap(), SessionEnd::Quit);
        session.close().unwrap();

        assert!(paths.tenants_dir().join("Acme_Corp.db").exists());
        assert!(first_run.saw("Created Jon Outsh with initials jo"));
        let password = initial_password(&first_run);

        // second run: log in, forced password change, quit from the start menu
        let mut second_run = ScriptedPrompt::new([
            "Acme Corp",
            "1",
            "jo",
            password.as_str(),
            password.as_str(),
            "new secret 1",
            "new secret 1",
            "5",
        ]);
        let mut session = Session::start(&paths, Settings::default(), &mut second_run).unwrap();
        assert_eq!(session.run(&mut second_run).unwrap(), SessionEnd::Quit);
        assert!(session.is_authenticated());
        assert_eq!(session.identifier().map(|i| i.as_str()), Some("jo"));
        assert!(CredentialManager::new(session.store())
            .verify("jo", "new secret 1")
            .unwrap());
        assert_eq!(second_run.remaining(), 0);
    }

    #[test]
    fn test_logout_keeps_store_and_allows_relogin() {
        let temp = TempDir::new().unwrap();
        let store = TenantStore::open(temp.path(), &normalize("Acme").unwrap()).unwrap();
        let mut session = Session::new(store, Settings::default());

        let mut prompt = ScriptedPrompt::new(["Jon", "", "Outsh"]);
        session.bootstrap_first_employee(&mut prompt).unwrap();
        let password = initial_password(&prompt);
        CredentialManager::new(session.store())
            .update("jo", &password, "steady password")
            .unwrap();

        let mut prompt = ScriptedPrompt::new([
            "1",
            "jo",
            "steady password",
            "4",
            "1",
            "jo",
            "wrong",
            "1",
            "jo",
            "steady password",
            "5",
        ]);
        assert_eq!(session.run(&mut prompt).unwrap(), SessionEnd::Quit);
        assert!(prompt.saw("Login failed"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_add_person_and_change_language() {
        let temp = TempDir::new().unwrap();
        let store = TenantStore::open(temp.path(), &normalize("Acme").unwrap()).unwrap();
        let mut session = Session::new(store, Settings::default());

        let mut prompt = ScriptedPrompt::new(["Jon", "", "Outsh"]);
        session.bootstrap_first_employee(&mut prompt).unwrap();
        let password = initial_password(&prompt);
        CredentialManager::new(session.store())
            .update("jo", &password, "steady password")
            .unwrap();

        let mut prompt = ScriptedPrompt::new([
            "1",
            "jo",
            "steady password",
            // new external contact
            "1",
            "Peter",
            "",
            "Pan",
            "n",
            // same name again, declined
            "1",
            "peter",
            "",
            "pan",
            "n",
            "n",
            // settings: language de, show, back
            "2",
            "1",
            "de",
            "3",
            "4",
            "3",
            "5",
        ]);
        session.run(&mut prompt).unwrap();

        assert!(prompt.saw("Created Peter Pan with initials pp"));
        assert!(prompt.saw("already exists. Create anyway?"));
        assert!(!prompt.saw("Initial password for pp"));
        assert!(prompt.saw("Deutsch (de)"));
        assert_eq!(session.language(), Language::De);

        let persons = PersonService::new(session.store()).list().unwrap();
        assert_eq!(persons.len(), 2);
        assert_eq!(persons[1].created_by, "jo");
        assert!(!CredentialManager::new(session.store()).is_internal("pp").unwrap());
    }

    #[test]
    fn test_invalid_first_employee_name_is_asked_again() {
        let temp = TempDir::new().unwrap();
        let store = TenantStore::open(temp.path(), &normalize("Acme").unwrap()).unwrap();
        let mut session = Session::new(store, Settings::default());

        let mut prompt =
            ScriptedPrompt::new(["Jon2", "", "Outsh", "Jon", "", "Outsh", "2"]);
        assert_eq!(session.run(&mut prompt).unwrap(), SessionEnd::Quit);

        assert!(prompt.saw("alphabetic, got 'Jon2'"));
        assert!(prompt.saw("Created Jon Outsh with initials jo"));
        assert_eq!(prompt.remaining(), 0);
    }

    #[test]
    fn test_first_employee_gives_up_after_bounded_attempts() {
        let temp = TempDir::new().unwrap();
        let store = TenantStore::open(temp.path(), &normalize("Acme").unwrap()).unwrap();
        let mut session = Session::new(store, Settings::default());

        let mut prompt = ScriptedPrompt::new([
            "J1", "", "Outsh", "J2", "", "Outsh", "J3", "", "Outsh", "Jon", "", "Outsh",
        ]);
        let err = session.run(&mut prompt).unwrap_err();

        assert!(err.is_aborted());
        assert_eq!(prompt.remaining(), 3);
        assert!(session.store().is_empty().unwrap());
    }

    #[test]
    fn test_aborted_resolution_opens_nothing() {
        let temp = TempDir::new().unwrap();
        let paths = BookkeeperPaths::with_base_dir(temp.path().to_path_buf());
        let mut prompt = ScriptedPrompt::new(["One", "n", "Two", "n", "Three", "n"]);

        let err = Session::start(&paths, Settings::default(), &mut prompt).unwrap_err();

        assert!(err.is_aborted());
        assert!(crate::tenant::locate(&paths.tenants_dir()).unwrap().is_empty());
    }
}
