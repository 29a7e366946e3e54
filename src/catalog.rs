use anyhow::{Result, bail};
use std::collections::HashSet;

use crate::models::{JobPosting, JobType, Level};

/// The fixed set of postings shown on the board. Never mutated after construction.
pub struct Catalog {
    postings: Vec<JobPosting>,
}

impl Catalog {
    pub fn new(postings: Vec<JobPosting>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(postings.len());
        for job in &postings {
            if job.id == 0 {
                bail!("Posting '{}' has id 0; ids must be positive", job.title);
            }
            if !seen.insert(job.id) {
                bail!("Duplicate posting id {}", job.id);
            }
        }
        Ok(Self { postings })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(builtin_postings())
    }

    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    pub fn get(&self, id: u32) -> Option<&JobPosting> {
        self.postings.iter().find(|j| j.id == id)
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }
}

#[allow(clippy::too_many_arguments)]
fn posting(
    id: u32,
    logo: &str,
    title: &str,
    time: &str,
    location: &str,
    desc: &str,
    company: &str,
    job_type: JobType,
    level: Level,
    salary: &str,
    tags: &[&str],
    featured: bool,
) -> JobPosting {
    JobPosting {
        id,
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        time: time.to_string(),
        desc: desc.to_string(),
        job_type,
        level,
        salary: salary.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        featured,
        logo: logo.to_string(),
    }
}

fn builtin_postings() -> Vec<JobPosting> {
    use JobType::*;
    use Level::*;

    vec![
        posting(
            1,
            "apple.png",
            "Web Developer",
            "Now",
            "Bengaluru, KA",
            "We want a front-end developer for our company. You must be experienced in developing visually appealing websites with React and modern CSS.",
            "Apple Inc.",
            FullTime,
            Mid,
            "₹18L - ₹28L",
            &["React", "CSS", "TypeScript"],
            true,
        ),
        posting(
            2,
            "google.png",
            "UI/UX Designer",
            "1 day",
            "Hyderabad, TS",
            "Google wants to hire UI/UX designers for a secret project. You must be experienced in Figma and Adobe XD with a strong portfolio.",
            "Google",
            FullTime,
            Senior,
            "₹22L - ₹35L",
            &["Figma", "Adobe XD", "Prototyping"],
            true,
        ),
        posting(
            3,
            "amazon.png",
            "Software Engineer",
            "14 Hrs",
            "Pune, MH",
            "Amazon wants to hire Software Engineers. You must be experienced in JavaScript (MERN stack) and Python programming languages.",
            "Amazon",
            FullTime,
            Senior,
            "₹25L - ₹40L",
            &["Node.js", "Python", "AWS"],
            false,
        ),
        posting(
            4,
            "adobe2.png",
            "Product Manager",
            "2 Hrs",
            "Bengaluru, KA",
            "Adobe wants to hire a highly experienced Product Manager who can manage the whole team to succeed in delivering world-class products.",
            "Adobe",
            FullTime,
            Lead,
            "₹30L - ₹50L",
            &["Agile", "Roadmapping", "Analytics"],
            false,
        ),
        posting(
            5,
            "x.png",
            "CTO",
            "Now",
            "Mumbai, MH",
            "X wants a CTO for our company. You must be experienced in developing scalable systems and leading engineering teams.",
            "X Corp.",
            FullTime,
            Lead,
            "₹60L - ₹1.2Cr",
            &["Leadership", "Architecture", "Strategy"],
            true,
        ),
        posting(
            6,
            "amazon.png",
            "Game Developer",
            "Now",
            "Noida, UP",
            "EA wants a Game Developer. You must be experienced in Unity and Unreal Engine with shipped game titles.",
            "Electronic Arts",
            FullTime,
            Mid,
            "₹15L - ₹25L",
            &["Unity", "Unreal", "C++"],
            false,
        ),
        posting(
            7,
            "hu.png",
            "App Developer",
            "Now",
            "Chennai, TN",
            "Huawei wants a Mobile and Desktop App Developer. You must be experienced in developing visually appealing cross-platform apps.",
            "Huawei",
            FullTime,
            Mid,
            "₹14L - ₹22L",
            &["Flutter", "React Native", "Swift"],
            false,
        ),
        posting(
            8,
            "intel.png",
            "Data Scientist",
            "Now",
            "Hyderabad, TS",
            "We want a Data Scientist for our company. You must be experienced in developing and analyzing large datasets using ML/AI techniques.",
            "Intel",
            FullTime,
            Senior,
            "₹20L - ₹35L",
            &["Python", "TensorFlow", "SQL"],
            false,
        ),
        posting(
            9,
            "samsung.png",
            "Tech Analyst",
            "12 Hrs",
            "Gurugram, HR",
            "We want a Tech Analyst for our company. Strong analytical skills and experience with market research and competitive analysis required.",
            "Samsung",
            Contract,
            Mid,
            "₹12L - ₹20L",
            &["Research", "Excel", "Power BI"],
            false,
        ),
        posting(
            10,
            "tiktok.png",
            "React Developer",
            "5 days",
            "Remote (India)",
            "We want a React Developer with strong experience in building scalable web applications and component libraries.",
            "TikTok",
            Remote,
            Mid,
            "₹16L - ₹26L",
            &["React", "Redux", "GraphQL"],
            false,
        ),
        posting(
            11,
            "ms.png",
            "C/C++ Developer",
            "Now",
            "Bengaluru, KA",
            "Microsoft wants a C/C++ Developer for our company. Experience with low-level systems programming and performance optimization required.",
            "Microsoft",
            FullTime,
            Senior,
            "₹24L - ₹38L",
            &["C++", "Systems", "Performance"],
            false,
        ),
        posting(
            12,
            "nike.png",
            "Brand Designer",
            "2 days",
            "Mumbai, MH",
            "We want a Brand Designer for our company. Strong portfolio in brand identity, visual design, and creative direction required.",
            "Nike",
            FullTime,
            Mid,
            "₹12L - ₹20L",
            &["Branding", "Illustrator", "Photoshop"],
            false,
        ),
    ]
}
