use std::io::Write;

use jobmatch::catalog::load_catalog;
use jobmatch::salary::{SalaryOutcome, partition_by_salary};
use jobmatch::recommend;

const CATALOG: &str = "\
Job Title,Company Name,Company Logo,Required Qualifications,Required Skills,Programming Languages,Min Salary (LPA),Max Salary (LPA),LinkedIn Profile
Data Scientist,Orbit,https://logo/orbit.png,M.Sc Data Science,\"Machine Learning, Statistics\",\"Python, R\",10,18,https://linkedin.com/orbit
Data Scientist,Nimbus,https://logo/nimbus.png,B.Tech Computer Science,\"Machine Learning, NLP\",\"Python\",14,22,https://linkedin.com/nimbus
Web Developer,Pixel,https://logo/pixel.png,B.Tech Computer Science,\"React, CSS\",\"JavaScript, TypeScript\",5,9,https://linkedin.com/pixel
Accountant,Ledger,https://logo/ledger.png,B.Com,\"Tally, Taxation\",\"\",3,6,https://linkedin.com/ledger
Cloud Engineer,Stratus,https://logo/stratus.png,B.Tech Computer Science,\"AWS, Kubernetes\",\"Go, Python\",12,24,https://linkedin.com/stratus
";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn write_catalog() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();
    file
}

#[test]
fn test_recommend_from_csv_catalog() {
    let file = write_catalog();
    let catalog = load_catalog(file.path()).unwrap();
    assert_eq!(catalog.len(), 5);

    let result = recommend(
        "B.Tech Computer Science",
        &strings(&["Machine Learning"]),
        &strings(&["Python"]),
        &catalog,
    );

    assert_eq!(result.len(), 3);
    assert_eq!(result.entries[0].posting.title, "Data Scientist");
    assert_eq!(result.entries[0].posting.company_name, "Nimbus");
    assert!(!result.titles().contains(&"Accountant"));
    for pair in result.entries.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_salary_partition_over_recommendation() {
    let file = write_catalog();
    let catalog = load_catalog(file.path()).unwrap();
    let result = recommend(
        "B.Tech Computer Science",
        &strings(&["Machine Learning"]),
        &strings(&["Python"]),
        &catalog,
    );

    let split = partition_by_salary(&result, 12.0);
    assert_eq!(split.total(), result.len());
    assert!(split.shown.iter().all(|e| e.posting.min_salary.unwrap() <= 12.0));
    assert!(split.hidden.iter().all(|e| e.posting.min_salary.unwrap() > 12.0));

    // each half keeps the ranking order
    let order: Vec<&str> = result.titles();
    let position = |title: &str| order.iter().position(|t| *t == title).unwrap();
    for half in [&split.shown, &split.hidden] {
        for pair in half.windows(2) {
            assert!(position(&pair[0].posting.title) < position(&pair[1].posting.title));
        }
    }
    assert!(matches!(split.outcome(), SalaryOutcome::Partial { .. }));
}

#[test]
fn test_missing_catalog_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_catalog(&dir.path().join("missing.csv")).unwrap_err();
    assert!(err.to_string().contains("Failed to open catalog"));
}
