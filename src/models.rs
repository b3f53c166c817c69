use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(rename = "Job Title", default)]
    pub title: String,
    #[serde(rename = "Company Name", default)]
    pub company_name: String,
    #[serde(rename = "Company Logo", default)]
    pub company_logo: String,
    #[serde(rename = "Required Qualifications", default)]
    pub qualification: String,
    #[serde(rename = "Required Skills", default)]
    pub skills: String, // comma-delimited
    #[serde(rename = "Programming Languages", default)]
    pub languages: String, // comma-delimited
    #[serde(
        rename = "Min Salary (LPA)",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub min_salary: Option<f64>,
    #[serde(
        rename = "Max Salary (LPA)",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub max_salary: Option<f64>,
    #[serde(rename = "LinkedIn Profile", default)]
    pub profile_link: String,
}

impl JobPosting {
    pub fn new(title: &str, qualification: &str, skills: &str, languages: &str) -> Self {
        Self {
            title: title.to_string(),
            qualification: qualification.to_string(),
            skills: skills.to_string(),
            languages: languages.to_string(),
            ..Default::default()
        }
    }

    pub fn with_salary(mut self, min: f64, max: f64) -> Self {
        self.min_salary = Some(min);
        self.max_salary = Some(max);
        self
    }

    /// Formats the salary band, e.g. "6 - 12 LPA".
    pub fn salary_range(&self) -> String {
        match (self.min_salary, self.max_salary) {
            (Some(min), Some(max)) => format!("{} - {} LPA", min, max),
            (Some(min), None) => format!("{}+ LPA", min),
            (None, Some(max)) => format!("up to {} LPA", max),
            (None, None) => "-".to_string(),
        }
    }
}

/// What the user is looking for. Skill and language order is kept as given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserQuery {
    pub qualification: String,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
}

impl UserQuery {
    pub fn new(qualification: &str, skills: &[String], languages: &[String]) -> Self {
        Self {
            qualification: qualification.to_string(),
            skills: dedup_preserving_order(skills),
            languages: dedup_preserving_order(languages),
        }
    }
}

fn dedup_preserving_order(items: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredPosting<'a> {
    pub posting: &'a JobPosting,
    pub score: f64,
}

/// Ranked postings, one per distinct title, best first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecommendationResult<'a> {
    pub entries: Vec<ScoredPosting<'a>>,
}

impl<'a> RecommendationResult<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredPosting<'a>> {
        self.entries.iter()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.posting.title.as_str()).collect()
    }
}
