use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use crate::models::JobPosting;
use crate::normalize::normalize;

pub fn load_catalog(path: &Path) -> Result<Vec<JobPosting>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open catalog: {}", path.display()))?;
    read_catalog(file).with_context(|| format!("Failed to read catalog: {}", path.display()))
}

/// Reads CSV rows with a header line. A cell that isn't valid UTF-8 is read
/// as empty so the rest of its row still loads.
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<JobPosting>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = decode_record(
        csv_reader
            .byte_headers()
            .context("Catalog has no header row")?,
    );

    let mut postings = Vec::new();
    for (line, record) in csv_reader.byte_records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(row = line + 1, error = %e, "skipping unreadable catalog row");
                continue;
            }
        };
        match decode_record(&record).deserialize::<JobPosting>(Some(&headers)) {
            Ok(posting) => postings.push(posting),
            Err(e) => warn!(row = line + 1, error = %e, "skipping malformed catalog row"),
        }
    }

    debug!(postings = postings.len(), "loaded catalog");
    Ok(postings)
}

fn decode_record(record: &csv::ByteRecord) -> csv::StringRecord {
    record
        .iter()
        .map(|cell| match std::str::from_utf8(cell) {
            Ok(text) => text.to_string(),
            Err(_) => {
                warn!("blanking catalog cell with invalid UTF-8");
                String::new()
            }
        })
        .collect()
}

/// All postings with the given title, case-insensitively.
pub fn postings_with_title<'a>(catalog: &'a [JobPosting], title: &str) -> Vec<&'a JobPosting> {
    let wanted = title.trim().to_lowercase();
    catalog
        .iter()
        .filter(|p| p.title.trim().to_lowercase() == wanted)
        .collect()
}

/// The choices a user picks from, in first-seen order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogOptions {
    pub qualifications: Vec<String>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
}

impl CatalogOptions {
    pub fn from_catalog(catalog: &[JobPosting]) -> Self {
        let mut options = Self::default();
        for posting in catalog {
            push_unique(&mut options.qualifications, posting.qualification.trim());
            for skill in split_multi(&posting.skills) {
                push_unique(&mut options.skills, skill);
            }
            for language in split_multi(&posting.languages) {
                push_unique(&mut options.languages, language);
            }
        }
        options
    }

    pub fn has_qualification(&self, input: &str) -> bool {
        let wanted = normalize(input);
        self.qualifications.iter().any(|q| normalize(q) == wanted)
    }

    /// Closest catalog qualification to `input` and its similarity in [0, 1].
    pub fn closest_qualification(&self, input: &str) -> Option<(&str, f64)> {
        let wanted = normalize(input);
        self.qualifications
            .iter()
            .map(|q| (q.as_str(), strsim::normalized_levenshtein(&wanted, &normalize(q))))
            .fold(None, |best: Option<(&str, f64)>, candidate| match best {
                Some(b) if b.1 >= candidate.1 => Some(b),
                _ => Some(candidate),
            })
    }
}

fn split_multi(field: &str) -> impl Iterator<Item = &str> {
    field.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Job Title,Company Name,Company Logo,Required Qualifications,Required Skills,Programming Languages,Min Salary (LPA),Max Salary (LPA),LinkedIn Profile
Data Analyst,Acme,https://logo/acme.png,B.Sc Statistics,\"Excel, Tableau\",\"SQL, Python\",4,8,https://linkedin.com/acme
ML Engineer,Beta,https://logo/beta.png,M.Tech AI,\"Deep Learning, MLOps\",\"Python, C++\",12,20,https://linkedin.com/beta
";

    #[test]
    fn test_reads_all_columns() {
        let catalog = read_catalog(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        let first = &catalog[0];
        assert_eq!(first.title, "Data Analyst");
        assert_eq!(first.company_name, "Acme");
        assert_eq!(first.skills, "Excel, Tableau");
        assert_eq!(first.min_salary, Some(4.0));
        assert_eq!(first.max_salary, Some(8.0));
        assert_eq!(first.profile_link, "https://linkedin.com/acme");
    }

    #[test]
    fn test_bad_salary_becomes_none() {
        let data = "\
Job Title,Required Qualifications,Required Skills,Programming Languages,Min Salary (LPA)
Tester,Diploma,Testing,Java,negotiable
";
        let catalog = read_catalog(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].min_salary, None);
        assert_eq!(catalog[0].company_name, "");
    }

    #[test]
    fn test_short_rows_default_missing_fields() {
        let data = "\
Job Title,Required Qualifications,Required Skills,Programming Languages
Tester,Diploma
";
        let catalog = read_catalog(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].qualification, "Diploma");
        assert_eq!(catalog[0].skills, "");
    }

    #[test]
    fn test_invalid_utf8_cell_keeps_posting() {
        let mut data: Vec<u8> = b"Job Title,Company Name,Required Qualifications,Required Skills,Programming Languages\n".to_vec();
        data.extend_from_slice(b"Chemist,Acme\xff\xfe,PhD Chemistry,Lab Safety,Matlab\n");
        data.extend_from_slice(b"Nurse,Care Ltd,Nursing Diploma,Patient Care,None\n");

        let catalog = read_catalog(data.as_slice()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].title, "Chemist");
        assert_eq!(catalog[0].company_name, "");
        assert_eq!(catalog[0].qualification, "PhD Chemistry");

        let result = crate::recommend("PhD Chemistry", &[], &[], &catalog);
        assert_eq!(result.entries[0].posting.title, "Chemist");
    }

    #[test]
    fn test_empty_catalog_with_header() {
        let data = "Job Title,Required Qualifications\n";
        assert!(read_catalog(data.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_options_are_distinct_and_ordered() {
        let catalog = vec![
            JobPosting::new("A", "MBA", "Sales, Excel", "R"),
            JobPosting::new("B", "B.Tech", "Excel,SQL ,", "Python, R"),
            JobPosting::new("C", "MBA", "", ""),
        ];
        let options = CatalogOptions::from_catalog(&catalog);
        assert_eq!(options.qualifications, vec!["MBA", "B.Tech"]);
        assert_eq!(options.skills, vec!["Sales", "Excel", "SQL"]);
        assert_eq!(options.languages, vec!["R", "Python"]);
    }

    #[test]
    fn test_closest_qualification() {
        let catalog = vec![
            JobPosting::new("A", "Bachelor in Computer Science", "", ""),
            JobPosting::new("B", "Master in Finance", "", ""),
        ];
        let options = CatalogOptions::from_catalog(&catalog);
        assert!(options.has_qualification("bachelor in computer science"));
        assert!(!options.has_qualification("Bachelor of Computing"));
        let (best, similarity) = options.closest_qualification("Masters in Finance").unwrap();
        assert_eq!(best, "Master in Finance");
        assert!(similarity > 0.8);
        assert!(CatalogOptions::default().closest_qualification("x").is_none());
    }

    #[test]
    fn test_postings_with_title_ignores_case() {
        let catalog = vec![
            JobPosting::new("Data Analyst", "", "", ""),
            JobPosting::new("data analyst ", "", "", ""),
            JobPosting::new("ML Engineer", "", "", ""),
        ];
        assert_eq!(postings_with_title(&catalog, "DATA ANALYST").len(), 2);
    }
}
