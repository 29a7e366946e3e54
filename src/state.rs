use std::time::Instant;

use crate::auth::{AuthModal, AuthMode};
use crate::catalog::Catalog;
use crate::filter::{FilterSpec, Selection, compute_visible};
use crate::models::{Category, JobPosting};
use crate::reveal::RevealCursor;
use crate::saved::SavedSet;
use crate::timer::{self, ScheduledTask, TOAST_TTL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: &'static str,
    expires: Option<ScheduledTask>,
}

/// Everything the board shows, as one snapshot.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dark_mode: bool,
    pub filter: FilterSpec,
    pub category: Category,
    pub saved_only: bool,
    pub saved: SavedSet,
    pub cursor: RevealCursor,
    pub auth: AuthModal,
    pub toast: Option<Toast>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(FilterSpec),
    SelectCategory(Category),
    ToggleSavedOnly,
    ToggleSave(u32),
    LoadMore,
    ToggleDarkMode,
    OpenAuth(AuthMode),
    CloseAuth,
    Auth(AuthInput),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthInput {
    Char(char),
    Backspace,
    NextField,
    PrevField,
    SwitchMode,
    TogglePassword,
    Submit,
}

/// Side effects the caller must carry out after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    PersistDarkMode(bool),
}

impl AppState {
    pub fn new(dark_mode: bool) -> Self {
        Self {
            dark_mode,
            filter: FilterSpec::default(),
            category: Category::All,
            saved_only: false,
            saved: SavedSet::new(),
            cursor: RevealCursor::new(),
            auth: AuthModal::default(),
            toast: None,
        }
    }

    pub fn visible<'a>(&self, catalog: &'a Catalog) -> Vec<&'a JobPosting> {
        compute_visible(
            catalog,
            &self.filter,
            &Selection::Only(self.category),
            self.saved_only,
            &self.saved,
        )
    }

    pub fn reduce(mut self, action: Action, now: Instant) -> (Self, Option<Effect>) {
        let mut effect = None;
        match action {
            Action::Search(filter) => {
                if filter.is_empty() {
                    log::debug!("Search cleared");
                } else {
                    log::debug!("Search submitted: {:?}", filter);
                }
                self.filter = filter;
            }
            Action::SelectCategory(category) => {
                log::debug!("Category {:?} selected", category);
                self.category = category;
            }
            Action::ToggleSavedOnly => {
                self.saved_only = !self.saved_only;
                log::debug!("Saved-only view {}", if self.saved_only { "on" } else { "off" });
            }
            Action::ToggleSave(id) => {
                let message = if self.saved.toggle(id) {
                    "✓ Saved!"
                } else {
                    "✓ Removed"
                };
                self.toast = Some(Toast {
                    message,
                    expires: Some(ScheduledTask::after(now, TOAST_TTL)),
                });
            }
            Action::LoadMore => self.cursor = self.cursor.load_more(),
            Action::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
                effect = Some(Effect::PersistDarkMode(self.dark_mode));
            }
            Action::OpenAuth(mode) => self.auth.open(mode),
            Action::CloseAuth => self.auth.close(now),
            Action::Auth(input) => self.apply_auth_input(input, now),
            Action::Tick => {
                self.auth.tick(now);
                let expired = self
                    .toast
                    .as_mut()
                    .is_some_and(|t| timer::fire(&mut t.expires, now));
                if expired {
                    self.toast = None;
                }
            }
        }
        (self, effect)
    }

    fn apply_auth_input(&mut self, input: AuthInput, now: Instant) {
        let auth = &mut self.auth;
        if !auth.is_open() {
            return;
        }
        match input {
            AuthInput::Char(c) => auth.type_char(c),
            AuthInput::Backspace => auth.backspace(),
            AuthInput::NextField => auth.focus_next(),
            AuthInput::PrevField => auth.focus_prev(),
            AuthInput::SwitchMode => {
                let other = auth.mode().other();
                auth.switch_mode(other);
            }
            AuthInput::TogglePassword => auth.toggle_reveal(),
            AuthInput::Submit => {
                auth.submit(now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Phase;
    use crate::timer::SUBMIT_DELAY;
    use std::time::Duration;

    fn step(state: AppState, actions: Vec<Action>, now: Instant) -> AppState {
        actions
            .into_iter()
            .fold(state, |s, a| s.reduce(a, now).0)
    }

    fn ids(state: &AppState, catalog: &Catalog) -> Vec<u32> {
        state.visible(catalog).iter().map(|j| j.id).collect()
    }

    #[test]
    fn test_initial_state_shows_whole_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let state = AppState::new(false);
        assert_eq!(ids(&state, &catalog).len(), 12);
        assert_eq!(state.cursor.count(), 8);
    }

    #[test]
    fn test_clearing_search_restores_full_set() {
        let catalog = Catalog::builtin().unwrap();
        let now = Instant::now();
        let state = step(
            AppState::new(false),
            vec![Action::Search(FilterSpec {
                job_query: "python".to_string(),
                ..Default::default()
            })],
            now,
        );
        assert_eq!(ids(&state, &catalog), vec![3, 8]);

        let state = step(state, vec![Action::Search(FilterSpec::default())], now);
        assert_eq!(ids(&state, &catalog), (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_category_replaces_previous_category() {
        let catalog = Catalog::builtin().unwrap();
        let now = Instant::now();
        let state = step(
            AppState::new(false),
            vec![
                Action::SelectCategory(Category::Featured),
                Action::SelectCategory(Category::Remote),
            ],
            now,
        );
        assert_eq!(ids(&state, &catalog), vec![10]);
    }

    #[test]
    fn test_saved_only_tracks_toggles_immediately() {
        let catalog = Catalog::builtin().unwrap();
        let now = Instant::now();
        let state = step(AppState::new(false), vec![Action::ToggleSavedOnly], now);
        assert!(ids(&state, &catalog).is_empty());

        let state = step(state, vec![Action::ToggleSave(4), Action::ToggleSave(9)], now);
        assert_eq!(ids(&state, &catalog), vec![4, 9]);

        let state = step(state, vec![Action::ToggleSave(4)], now);
        assert_eq!(ids(&state, &catalog), vec![9]);
    }

    #[test]
    fn test_toast_reports_and_expires() {
        let t0 = Instant::now();
        let state = step(AppState::new(false), vec![Action::ToggleSave(1)], t0);
        assert_eq!(state.toast.as_ref().map(|t| t.message), Some("✓ Saved!"));

        let later = t0 + Duration::from_millis(2000);
        let state = step(state, vec![Action::ToggleSave(1)], later);
        assert_eq!(state.toast.as_ref().map(|t| t.message), Some("✓ Removed"));

        // The first toast's deadline has passed, but it was replaced.
        let state = step(state, vec![Action::Tick], t0 + TOAST_TTL);
        assert!(state.toast.is_some());
        let state = step(state, vec![Action::Tick], later + TOAST_TTL);
        assert!(state.toast.is_none());
    }

    #[test]
    fn test_load_more_never_shrinks_after_narrower_search() {
        let catalog = Catalog::builtin().unwrap();
        let now = Instant::now();
        let state = step(AppState::new(false), vec![Action::LoadMore], now);
        assert_eq!(state.cursor.count(), 12);

        let state = step(
            state,
            vec![Action::SelectCategory(Category::Management)],
            now,
        );
        let visible = state.visible(&catalog);
        assert_eq!(state.cursor.count(), 12);
        assert_eq!(state.cursor.page(&visible).len(), 2);
    }

    #[test]
    fn test_dark_mode_toggle_requests_persistence() {
        let now = Instant::now();
        let (state, effect) = AppState::new(false).reduce(Action::ToggleDarkMode, now);
        assert!(state.dark_mode);
        assert_eq!(effect, Some(Effect::PersistDarkMode(true)));

        let (state, effect) = state.reduce(Action::ToggleDarkMode, now);
        assert!(!state.dark_mode);
        assert_eq!(effect, Some(Effect::PersistDarkMode(false)));

        let (_, effect) = state.reduce(Action::LoadMore, now);
        assert_eq!(effect, None);
    }

    #[test]
    fn test_auth_flow_through_reducer() {
        let t0 = Instant::now();
        let mut actions = vec![Action::OpenAuth(AuthMode::Login)];
        actions.extend("jane@example.com".chars().map(|c| Action::Auth(AuthInput::Char(c))));
        actions.push(Action::Auth(AuthInput::NextField));
        actions.extend("secret1".chars().map(|c| Action::Auth(AuthInput::Char(c))));
        actions.push(Action::Auth(AuthInput::Submit));

        let state = step(AppState::new(false), actions, t0);
        assert!(matches!(state.auth.phase(), Phase::Submitting(_)));

        let state = step(state, vec![Action::Tick], t0 + SUBMIT_DELAY);
        assert_eq!(state.auth.phase(), Phase::Succeeded);
    }

    #[test]
    fn test_auth_input_ignored_while_closed() {
        let now = Instant::now();
        let state = step(
            AppState::new(false),
            vec![Action::Auth(AuthInput::Char('a'))],
            now,
        );
        assert_eq!(state.auth.fields().email, "");
    }
}
