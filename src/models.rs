use serde::{Deserialize, Serialize};

/// A value picked from a fixed set of dropdown options.
pub trait Choice: Copy + PartialEq + Sized + 'static {
    const ALL: &'static [Self];

    /// Wire value, e.g. "full-time".
    fn as_str(&self) -> &'static str;

    /// Human label shown in the dropdown.
    fn label(&self) -> &'static str;

    /// Exact, case-sensitive lookup.
    fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Remote,
    Contract,
    Internship,
}

impl Choice for JobType {
    const ALL: &'static [Self] = &[
        JobType::FullTime,
        JobType::PartTime,
        JobType::Remote,
        JobType::Contract,
        JobType::Internship,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Remote => "remote",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Remote => "Remote",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Entry,
    Mid,
    Senior,
    Lead,
}

impl Choice for Level {
    const ALL: &'static [Self] = &[Level::Entry, Level::Mid, Level::Senior, Level::Lead];

    fn as_str(&self) -> &'static str {
        match self {
            Level::Entry => "entry",
            Level::Mid => "mid",
            Level::Senior => "senior",
            Level::Lead => "lead",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Level::Entry => "Entry Level",
            Level::Mid => "Mid Level",
            Level::Senior => "Senior",
            Level::Lead => "Lead / Manager",
        }
    }
}

/// Requested ordering. Collected by the search bar but never applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Relevance,
    Recent,
    Salary,
}

impl Choice for SortBy {
    const ALL: &'static [Self] = &[SortBy::Relevance, SortBy::Recent, SortBy::Salary];

    fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::Recent => "recent",
            SortBy::Salary => "salary",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SortBy::Relevance => "Relevance",
            SortBy::Recent => "Most Recent",
            SortBy::Salary => "Salary",
        }
    }
}

/// Coarse grouping shown as a row of pills above the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    All,
    Technology,
    Design,
    Management,
    Remote,
    Featured,
}

impl Choice for Category {
    const ALL: &'static [Self] = &[
        Category::All,
        Category::Technology,
        Category::Design,
        Category::Management,
        Category::Remote,
        Category::Featured,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Technology => "Technology",
            Category::Design => "Design",
            Category::Management => "Management",
            Category::Remote => "Remote",
            Category::Featured => "Featured",
        }
    }

    fn label(&self) -> &'static str {
        self.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: u32,
    pub title: String,
    pub company: String,
    pub location: String,
    pub time: String, // recency label, e.g. "14 Hrs"
    pub desc: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub level: Level,
    pub salary: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub logo: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_exact_and_case_sensitive() {
        assert_eq!(JobType::parse("remote"), Some(JobType::Remote));
        assert_eq!(JobType::parse("full-time"), Some(JobType::FullTime));
        assert_eq!(JobType::parse("Remote"), None);
        assert_eq!(JobType::parse(""), None);
        assert_eq!(Level::parse("lead"), Some(Level::Lead));
        assert_eq!(Level::parse("LEAD"), None);
        assert_eq!(Category::parse("Featured"), Some(Category::Featured));
        assert_eq!(Category::parse("featured"), None);
    }

    #[test]
    fn test_every_choice_parses_its_own_wire_value() {
        for t in JobType::ALL {
            assert_eq!(JobType::parse(t.as_str()), Some(*t));
        }
        for l in Level::ALL {
            assert_eq!(Level::parse(l.as_str()), Some(*l));
        }
        for s in SortBy::ALL {
            assert_eq!(SortBy::parse(s.as_str()), Some(*s));
        }
    }

    #[test]
    fn test_posting_serializes_type_field() {
        let job = JobPosting {
            id: 1,
            title: "Web Developer".to_string(),
            company: "Apple Inc.".to_string(),
            location: "Bengaluru, KA".to_string(),
            time: "Now".to_string(),
            desc: String::new(),
            job_type: JobType::PartTime,
            level: Level::Mid,
            salary: String::new(),
            tags: vec![],
            featured: false,
            logo: "apple.png".to_string(),
        };
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["type"], "part-time");
        assert_eq!(json["level"], "mid");
    }
}
