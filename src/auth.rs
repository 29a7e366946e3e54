use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Instant;

use crate::timer::{self, CLOSE_RESET_DELAY, SUBMIT_DELAY, ScheduledTask};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn title(&self) -> &'static str {
        match self {
            AuthMode::Login => "Sign In",
            AuthMode::Register => "Create Account",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            AuthMode::Login => "Welcome back",
            AuthMode::Register => "Create account",
        }
    }

    pub fn pending_label(&self) -> &'static str {
        match self {
            AuthMode::Login => "Signing in...",
            AuthMode::Register => "Creating account...",
        }
    }

    pub fn success_text(&self) -> (&'static str, &'static str) {
        match self {
            AuthMode::Login => (
                "Welcome back! 👋",
                "You have successfully logged in to SeekJob.",
            ),
            AuthMode::Register => (
                "Account Created! 🎉",
                "Your account has been created. Start exploring jobs!",
            ),
        }
    }

    /// Label of the button that dismisses the success screen.
    pub fn success_button(&self) -> &'static str {
        match self {
            AuthMode::Login => "Browse Jobs",
            AuthMode::Register => "Get Started",
        }
    }

    pub fn other(&self) -> AuthMode {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }

    pub fn fields(&self) -> &'static [Field] {
        match self {
            AuthMode::Login => &[Field::Email, Field::Password],
            AuthMode::Register => &[
                Field::Name,
                Field::Email,
                Field::Password,
                Field::ConfirmPassword,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Full name",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::ConfirmPassword => "Confirm password",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Credentials {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::ConfirmPassword => &mut self.confirm_password,
        }
    }
}

pub type FieldErrors = BTreeMap<Field, &'static str>;

/// Checks every field independently; an empty map means the form can be sent.
pub fn validate(mode: AuthMode, fields: &Credentials) -> FieldErrors {
    let mut errs = FieldErrors::new();

    if fields.email.is_empty() {
        errs.insert(Field::Email, "Email is required");
    } else if !EMAIL_RE.is_match(&fields.email) {
        errs.insert(Field::Email, "Enter a valid email");
    }

    if fields.password.is_empty() {
        errs.insert(Field::Password, "Password is required");
    } else if fields.password.chars().count() < MIN_PASSWORD_LEN {
        errs.insert(Field::Password, "Minimum 6 characters");
    }

    if mode == AuthMode::Register {
        if fields.name.is_empty() {
            errs.insert(Field::Name, "Full name is required");
        }
        if fields.confirm_password.is_empty() {
            errs.insert(Field::ConfirmPassword, "Please confirm your password");
        } else if fields.password != fields.confirm_password {
            errs.insert(Field::ConfirmPassword, "Passwords do not match");
        }
    }

    errs
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    /// Waiting out the simulated network delay.
    Submitting(ScheduledTask),
    Succeeded,
}

/// Sign-in / register dialog. Nothing is ever sent anywhere.
#[derive(Debug, Clone)]
pub struct AuthModal {
    open: bool,
    initial_mode: AuthMode,
    mode: AuthMode,
    fields: Credentials,
    errors: FieldErrors,
    phase: Phase,
    focus: usize,
    show_password: bool,
    show_confirm: bool,
    pending_reset: Option<ScheduledTask>,
}

impl Default for AuthModal {
    fn default() -> Self {
        Self {
            open: false,
            initial_mode: AuthMode::Login,
            mode: AuthMode::Login,
            fields: Credentials::default(),
            errors: FieldErrors::new(),
            phase: Phase::Editing,
            focus: 0,
            show_password: false,
            show_confirm: false,
            pending_reset: None,
        }
    }
}

impl AuthModal {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn fields(&self) -> &Credentials {
        &self.fields
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether `field` is shown in clear text. Non-secret fields always are.
    pub fn is_revealed(&self, field: Field) -> bool {
        match field {
            Field::Password => self.show_password,
            Field::ConfirmPassword => self.show_confirm,
            _ => true,
        }
    }

    pub fn focused(&self) -> Field {
        let fields = self.mode.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn open(&mut self, mode: AuthMode) {
        self.pending_reset = None;
        self.reset_form();
        self.initial_mode = mode;
        self.mode = mode;
        self.open = true;
    }

    /// Hides the dialog. An in-flight submit is dropped; the form clears shortly after.
    pub fn close(&mut self, now: Instant) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Phase::Submitting(_) = self.phase {
            log::debug!("Auth submit cancelled by close");
            self.phase = Phase::Editing;
        }
        self.pending_reset = Some(ScheduledTask::after(now, CLOSE_RESET_DELAY));
    }

    pub fn switch_mode(&mut self, mode: AuthMode) {
        self.reset_form();
        self.mode = mode;
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.mode.fields().len();
    }

    pub fn focus_prev(&mut self) {
        let n = self.mode.fields().len();
        self.focus = (self.focus + n - 1) % n;
    }

    /// Flips visibility of the confirmation field when it has focus, of the
    /// password otherwise.
    pub fn toggle_reveal(&mut self) {
        if self.focused() == Field::ConfirmPassword {
            self.show_confirm = !self.show_confirm;
        } else {
            self.show_password = !self.show_password;
        }
    }

    pub fn type_char(&mut self, c: char) {
        let field = self.focused();
        self.edit(field, |value| value.push(c));
    }

    pub fn backspace(&mut self) {
        let field = self.focused();
        self.edit(field, |value| {
            value.pop();
        });
    }

    fn edit(&mut self, field: Field, f: impl FnOnce(&mut String)) {
        if self.phase != Phase::Editing {
            return;
        }
        f(self.fields.get_mut(field));
        self.errors.remove(&field);
    }

    /// Returns true if the form passed validation and the simulated request started.
    pub fn submit(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Editing {
            return false;
        }
        let errs = validate(self.mode, &self.fields);
        if !errs.is_empty() {
            log::debug!("Auth form rejected: {} field error(s)", errs.len());
            self.errors = errs;
            return false;
        }
        self.phase = Phase::Submitting(ScheduledTask::after(now, SUBMIT_DELAY));
        true
    }

    pub fn tick(&mut self, now: Instant) {
        if let Phase::Submitting(task) = self.phase {
            if task.is_due(now) {
                log::debug!("Auth {} succeeded", self.mode.title());
                self.phase = Phase::Succeeded;
            }
        }
        if timer::fire(&mut self.pending_reset, now) {
            self.reset_form();
            self.mode = self.initial_mode;
        }
    }

    fn reset_form(&mut self) {
        self.fields = Credentials::default();
        self.errors.clear();
        self.phase = Phase::Editing;
        self.focus = 0;
        self.show_password = false;
        self.show_confirm = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn creds(name: &str, email: &str, password: &str, confirm: &str) -> Credentials {
        Credentials {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn fill(modal: &mut AuthModal, text: &str) {
        for c in text.chars() {
            modal.type_char(c);
        }
    }

    #[test]
    fn test_validate_login_required_fields() {
        let errs = validate(AuthMode::Login, &Credentials::default());
        assert_eq!(errs.get(&Field::Email), Some(&"Email is required"));
        assert_eq!(errs.get(&Field::Password), Some(&"Password is required"));
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn test_validate_email_format() {
        for bad in ["plain", "a@b", "@.", "no at.com"] {
            let errs = validate(AuthMode::Login, &creds("", bad, "secret1", ""));
            assert_eq!(errs.get(&Field::Email), Some(&"Enter a valid email"), "{}", bad);
        }
        for good in ["a@b.c", "jane.doe@example.com"] {
            let errs = validate(AuthMode::Login, &creds("", good, "secret1", ""));
            assert!(errs.is_empty(), "{}", good);
        }
    }

    #[test]
    fn test_validate_password_length() {
        let errs = validate(AuthMode::Login, &creds("", "a@b.c", "12345", ""));
        assert_eq!(errs.get(&Field::Password), Some(&"Minimum 6 characters"));
        let errs = validate(AuthMode::Login, &creds("", "a@b.c", "123456", ""));
        assert!(errs.is_empty());
    }

    #[test]
    fn test_validate_register_fields() {
        let errs = validate(AuthMode::Register, &creds("", "a@b.c", "secret1", ""));
        assert_eq!(errs.get(&Field::Name), Some(&"Full name is required"));
        assert_eq!(
            errs.get(&Field::ConfirmPassword),
            Some(&"Please confirm your password")
        );

        let errs = validate(AuthMode::Register, &creds("Ana", "a@b.c", "secret1", "secret2"));
        assert_eq!(errs.get(&Field::ConfirmPassword), Some(&"Passwords do not match"));
        assert_eq!(errs.len(), 1);

        // Login ignores register-only fields.
        let errs = validate(AuthMode::Login, &creds("", "a@b.c", "secret1", "other"));
        assert!(errs.is_empty());
    }

    #[test]
    fn test_fields_are_validated_independently() {
        let errs = validate(AuthMode::Register, &creds("Ana", "bad", "123", "123"));
        assert_eq!(errs.get(&Field::Email), Some(&"Enter a valid email"));
        assert_eq!(errs.get(&Field::Password), Some(&"Minimum 6 characters"));
        assert!(errs.get(&Field::Name).is_none());
        assert!(errs.get(&Field::ConfirmPassword).is_none());
    }

    #[test]
    fn test_editing_clears_only_that_fields_error() {
        let t0 = Instant::now();
        let mut modal = AuthModal::default();
        modal.open(AuthMode::Login);
        assert!(!modal.submit(t0));
        assert!(modal.error(Field::Email).is_some());
        assert!(modal.error(Field::Password).is_some());

        assert_eq!(modal.focused(), Field::Email);
        modal.type_char('x');
        assert!(modal.error(Field::Email).is_none());
        assert!(modal.error(Field::Password).is_some());
    }

    #[test]
    fn test_submit_waits_for_simulated_delay() {
        let t0 = Instant::now();
        let mut modal = AuthModal::default();
        modal.open(AuthMode::Login);
        fill(&mut modal, "jane@example.com");
        modal.focus_next();
        fill(&mut modal, "hunter22");

        assert!(modal.submit(t0));
        assert!(matches!(modal.phase(), Phase::Submitting(_)));
        // Typing is ignored while the request is in flight.
        modal.type_char('!');
        assert_eq!(modal.fields().password, "hunter22");

        modal.tick(t0 + Duration::from_millis(1199));
        assert!(matches!(modal.phase(), Phase::Submitting(_)));
        modal.tick(t0 + SUBMIT_DELAY);
        assert_eq!(modal.phase(), Phase::Succeeded);
    }

    #[test]
    fn test_close_cancels_submit_and_resets_later() {
        let t0 = Instant::now();
        let mut modal = AuthModal::default();
        modal.open(AuthMode::Register);
        fill(&mut modal, "Ana");
        modal.focus_next();
        fill(&mut modal, "ana@example.com");
        modal.focus_next();
        fill(&mut modal, "secret1");
        modal.focus_next();
        fill(&mut modal, "secret1");
        assert!(modal.submit(t0));

        modal.close(t0 + Duration::from_millis(100));
        assert!(!modal.is_open());
        assert_eq!(modal.phase(), Phase::Editing);

        // The submit deadline passes but nothing fires into the closed dialog.
        modal.tick(t0 + Duration::from_millis(250));
        assert_eq!(modal.fields().name, "Ana");
        modal.tick(t0 + SUBMIT_DELAY);
        assert_eq!(modal.phase(), Phase::Editing);
        assert_eq!(modal.fields(), &Credentials::default());
        assert_eq!(modal.mode(), AuthMode::Register);
    }

    #[test]
    fn test_reopen_cancels_pending_reset() {
        let t0 = Instant::now();
        let mut modal = AuthModal::default();
        modal.open(AuthMode::Login);
        modal.close(t0);
        modal.open(AuthMode::Register);
        fill(&mut modal, "Ana");
        modal.tick(t0 + CLOSE_RESET_DELAY * 2);
        assert_eq!(modal.fields().name, "Ana");
        assert_eq!(modal.mode(), AuthMode::Register);
    }

    #[test]
    fn test_switch_mode_clears_form() {
        let t0 = Instant::now();
        let mut modal = AuthModal::default();
        modal.open(AuthMode::Login);
        fill(&mut modal, "jane@example.com");
        modal.submit(t0);
        modal.switch_mode(AuthMode::Register);
        assert_eq!(modal.mode(), AuthMode::Register);
        assert_eq!(modal.fields(), &Credentials::default());
        assert!(modal.error(Field::Password).is_none());
        assert_eq!(modal.focused(), Field::Name);
    }

    #[test]
    fn test_focus_wraps_around() {
        let mut modal = AuthModal::default();
        modal.open(AuthMode::Login);
        modal.focus_prev();
        assert_eq!(modal.focused(), Field::Password);
        modal.focus_next();
        assert_eq!(modal.focused(), Field::Email);
    }

    #[test]
    fn test_secret_fields_reveal_independently() {
        let mut modal = AuthModal::default();
        modal.open(AuthMode::Register);
        assert!(modal.is_revealed(Field::Name));
        assert!(!modal.is_revealed(Field::Password));
        assert!(!modal.is_revealed(Field::ConfirmPassword));

        modal.focus_next();
        modal.focus_next();
        assert_eq!(modal.focused(), Field::Password);
        modal.toggle_reveal();
        assert!(modal.is_revealed(Field::Password));
        assert!(!modal.is_revealed(Field::ConfirmPassword));

        modal.focus_next();
        modal.toggle_reveal();
        assert!(modal.is_revealed(Field::ConfirmPassword));
        modal.toggle_reveal();
        assert!(!modal.is_revealed(Field::ConfirmPassword));
        assert!(modal.is_revealed(Field::Password));

        modal.switch_mode(AuthMode::Login);
        assert!(!modal.is_revealed(Field::Password));
    }

    #[test]
    fn test_success_button_labels() {
        assert_eq!(AuthMode::Login.success_button(), "Browse Jobs");
        assert_eq!(AuthMode::Register.success_button(), "Get Started");
    }
}
