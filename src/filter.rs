use crate::catalog::Catalog;
use crate::models::{Category, Choice, JobPosting, JobType, Level, SortBy};
use crate::saved::SavedSet;

/// Titles the Management pill shows. A closed list, matched exactly.
const MANAGEMENT_TITLES: [&str; 2] = ["Product Manager", "CTO"];
/// Titles the Technology pill hides. Everything else counts as technology.
const NON_TECH_TITLES: [&str; 2] = ["Brand Designer", "UI/UX Designer"];

/// Dropdown input: nothing picked, a known option, or text no option matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    Any,
    Only(T),
    Unrecognized(String),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::Any
    }
}

impl<T: Choice> Selection<T> {
    pub fn from_input(input: &str) -> Self {
        if input.is_empty() {
            return Selection::Any;
        }
        match T::parse(input) {
            Some(value) => Selection::Only(value),
            None => Selection::Unrecognized(input.to_string()),
        }
    }

    pub fn as_input(&self) -> &str {
        match self {
            Selection::Any => "",
            Selection::Only(v) => v.as_str(),
            Selection::Unrecognized(s) => s,
        }
    }

    fn admits(&self, pred: impl FnOnce(T) -> bool) -> bool {
        match self {
            Selection::Any => true,
            Selection::Only(v) => pred(*v),
            Selection::Unrecognized(_) => false,
        }
    }
}

/// Constraints submitted by the search bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    pub job_query: String,
    pub company_query: String,
    pub location_query: String,
    pub job_type: Selection<JobType>,
    pub level: Selection<Level>,
    /// Carried for the search bar's sake; results are never reordered by it.
    pub sort_by: Selection<SortBy>,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        *self == FilterSpec::default()
    }

    pub fn matches(&self, job: &JobPosting) -> bool {
        if !self.job_query.is_empty() {
            let q = self.job_query.to_lowercase();
            let hit = job.title.to_lowercase().contains(&q)
                || job.tags.iter().any(|t| t.to_lowercase().contains(&q))
                || job.desc.to_lowercase().contains(&q);
            if !hit {
                return false;
            }
        }
        if !contains_ci(&job.company, &self.company_query) {
            return false;
        }
        if !contains_ci(&job.location, &self.location_query) {
            return false;
        }
        self.job_type.admits(|t| t == job.job_type) && self.level.admits(|l| l == job.level)
    }
}

fn contains_ci(haystack: &str, query: &str) -> bool {
    query.is_empty() || haystack.to_lowercase().contains(&query.to_lowercase())
}

impl Category {
    pub fn matches(&self, job: &JobPosting) -> bool {
        match self {
            Category::All => true,
            Category::Featured => job.featured,
            Category::Remote => job.job_type == JobType::Remote,
            Category::Design => job.title.to_lowercase().contains("design"),
            Category::Management => MANAGEMENT_TITLES.contains(&job.title.as_str()),
            Category::Technology => !NON_TECH_TITLES.contains(&job.title.as_str()),
        }
    }
}

/// Postings to render, in catalog order.
pub fn compute_visible<'a>(
    catalog: &'a Catalog,
    filter: &FilterSpec,
    category: &Selection<Category>,
    saved_only: bool,
    saved: &SavedSet,
) -> Vec<&'a JobPosting> {
    catalog
        .postings()
        .iter()
        .filter(|job| filter.matches(job))
        .filter(|job| category.admits(|c| c.matches(job)))
        .filter(|job| !saved_only || saved.contains(job.id))
        .collect()
}
