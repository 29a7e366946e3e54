use crate::filter::{FilterSpec, Selection};
use crate::models::{Choice, JobType, Level, SortBy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Job,
    Company,
    Location,
    Sort,
    Type,
    Level,
}

impl SearchField {
    pub fn placeholder(&self) -> &'static str {
        match self {
            SearchField::Job => "Job title, keywords...",
            SearchField::Company => "Company name...",
            SearchField::Location => "City, remote...",
            SearchField::Sort => "Sort by",
            SearchField::Type => "Job Type",
            SearchField::Level => "Experience",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            SearchField::Job | SearchField::Company | SearchField::Location
        )
    }
}

/// One-key searches offered under the search bar.
pub const POPULAR_SEARCHES: [&str; 5] = [
    "React Developer",
    "UI/UX Designer",
    "Data Scientist",
    "Product Manager",
    "Remote",
];

const TEXT_FIELDS: [SearchField; 3] = [SearchField::Job, SearchField::Company, SearchField::Location];
const ALL_FIELDS: [SearchField; 6] = [
    SearchField::Job,
    SearchField::Company,
    SearchField::Location,
    SearchField::Sort,
    SearchField::Type,
    SearchField::Level,
];

/// What the user has typed but not yet submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBar {
    pub job: String,
    pub company: String,
    pub location: String,
    pub sort: Option<SortBy>,
    pub job_type: Option<JobType>,
    pub level: Option<Level>,
    show_filters: bool,
    focus: SearchField,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self {
            job: String::new(),
            company: String::new(),
            location: String::new(),
            sort: None,
            job_type: None,
            level: None,
            show_filters: false,
            focus: SearchField::Job,
        }
    }
}

impl SearchBar {
    pub fn focus(&self) -> SearchField {
        self.focus
    }

    pub fn show_filters(&self) -> bool {
        self.show_filters
    }

    pub fn fields(&self) -> &'static [SearchField] {
        if self.show_filters {
            &ALL_FIELDS
        } else {
            &TEXT_FIELDS
        }
    }

    pub fn toggle_filters(&mut self) {
        self.show_filters = !self.show_filters;
        if !self.fields().contains(&self.focus) {
            self.focus = SearchField::Job;
        }
    }

    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.step_focus(self.fields().len() - 1);
    }

    fn step_focus(&mut self, by: usize) {
        let fields = self.fields();
        let at = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(at + by) % fields.len()];
    }

    pub fn type_char(&mut self, c: char) {
        if let Some(text) = self.text_mut(self.focus) {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut(self.focus) {
            text.pop();
        }
    }

    /// Moves the focused dropdown to its next (or previous) option, passing
    /// through the empty placeholder.
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            SearchField::Sort => self.sort = cycle_option(self.sort, forward),
            SearchField::Type => self.job_type = cycle_option(self.job_type, forward),
            SearchField::Level => self.level = cycle_option(self.level, forward),
            _ => {}
        }
    }

    fn text_mut(&mut self, field: SearchField) -> Option<&mut String> {
        match field {
            SearchField::Job => Some(&mut self.job),
            SearchField::Company => Some(&mut self.company),
            SearchField::Location => Some(&mut self.location),
            _ => None,
        }
    }

    /// Current contents of a field, or `None` when it shows its placeholder.
    pub fn display(&self, field: SearchField) -> Option<&str> {
        let shown = match field {
            SearchField::Job => Some(self.job.as_str()),
            SearchField::Company => Some(self.company.as_str()),
            SearchField::Location => Some(self.location.as_str()),
            SearchField::Sort => self.sort.map(|v| v.label()),
            SearchField::Type => self.job_type.map(|v| v.label()),
            SearchField::Level => self.level.map(|v| v.label()),
        };
        shown.filter(|s| !s.is_empty())
    }

    pub fn submit(&self) -> FilterSpec {
        FilterSpec {
            job_query: self.job.clone(),
            company_query: self.company.clone(),
            location_query: self.location.clone(),
            job_type: selection(self.job_type),
            level: selection(self.level),
            sort_by: selection(self.sort),
        }
    }

    /// Puts `term` in the job field and submits, keeping every other input.
    pub fn quick_search(&mut self, term: &str) -> FilterSpec {
        self.job = term.to_string();
        self.submit()
    }

    /// True when there is something for `clear` to remove. The sort choice alone does not count.
    pub fn has_input(&self) -> bool {
        !self.job.is_empty()
            || !self.company.is_empty()
            || !self.location.is_empty()
            || self.job_type.is_some()
            || self.level.is_some()
    }

    /// Empties every input and returns the matching (empty) filter.
    pub fn clear(&mut self) -> FilterSpec {
        let show_filters = self.show_filters;
        let focus = self.focus;
        *self = Self {
            show_filters,
            focus,
            ..Self::default()
        };
        FilterSpec::default()
    }
}

fn selection<T>(value: Option<T>) -> Selection<T> {
    value.map_or(Selection::Any, Selection::Only)
}

fn cycle_option<T: Choice>(current: Option<T>, forward: bool) -> Option<T> {
    let all = T::ALL;
    let at = current.and_then(|v| all.iter().position(|o| *o == v));
    match (at, forward) {
        (None, true) => all.first().copied(),
        (None, false) => all.last().copied(),
        (Some(i), true) => all.get(i + 1).copied(),
        (Some(0), false) => None,
        (Some(i), false) => all.get(i - 1).copied(),
    }
}
