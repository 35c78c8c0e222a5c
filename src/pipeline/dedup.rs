//! Duplicate detection for canonical job offers.
//!
//! Two passes over the collected offers:
//!
//! 1. **Exact**: the first offer for each link wins, later ones are dropped.
//! 2. **Fuzzy**: among the survivors, an offer is dropped when an earlier one
//!    has a near-identical title and the same company (or either company is
//!    missing or empty). A whitespace-only company has no tokens and matches
//!    nothing. Similarity is the Jaccard index over lowercase whitespace
//!    tokens.
//!
//! The fuzzy pass compares every pair and is O(n²) in the number of exact
//! survivors. Run volumes are bounded by `sources × max_per_site`, which
//! keeps this affordable.

use std::collections::HashSet;

use crate::models::JobOffer;

/// Title similarity above which two offers may be the same posting.
pub const TITLE_THRESHOLD: f64 = 0.8;

/// Company similarity above which two companies count as the same.
pub const COMPANY_THRESHOLD: f64 = 0.8;

/// Removes exact and near-duplicate job offers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateDetector;

impl DuplicateDetector {
    pub fn new() -> Self {
        Self
    }

    /// Remove duplicates, keeping the earliest of each group in input order.
    pub fn remove_duplicates(&self, offers: Vec<JobOffer>) -> Vec<JobOffer> {
        let unique = Self::remove_exact(offers);
        Self::remove_fuzzy(unique)
    }

    fn remove_exact(offers: Vec<JobOffer>) -> Vec<JobOffer> {
        let mut seen = HashSet::new();
        offers
            .into_iter()
            .filter(|offer| seen.insert(offer.link.clone()))
            .collect()
    }

    fn remove_fuzzy(offers: Vec<JobOffer>) -> Vec<JobOffer> {
        let titles: Vec<HashSet<String>> = offers.iter().map(|o| tokenize(&o.title)).collect();
        let companies: Vec<Option<HashSet<String>>> = offers
            .iter()
            .map(|o| o.company_name().map(tokenize))
            .collect();

        let mut duplicate = vec![false; offers.len()];
        for i in 0..offers.len() {
            if duplicate[i] {
                continue;
            }
            for j in (i + 1)..offers.len() {
                if duplicate[j] {
                    continue;
                }
                if is_similar(&titles[i], &titles[j], &companies[i], &companies[j]) {
                    log::debug!(
                        "Fuzzy duplicate: '{}' ({}) matches '{}' ({})",
                        offers[j].title,
                        offers[j].link,
                        offers[i].title,
                        offers[i].link
                    );
                    duplicate[j] = true;
                }
            }
        }

        offers
            .into_iter()
            .zip(duplicate)
            .filter_map(|(offer, dup)| (!dup).then_some(offer))
            .collect()
    }
}

fn is_similar(
    title_a: &HashSet<String>,
    title_b: &HashSet<String>,
    company_a: &Option<HashSet<String>>,
    company_b: &Option<HashSet<String>>,
) -> bool {
    if jaccard(title_a, title_b) <= TITLE_THRESHOLD {
        return false;
    }
    match (company_a, company_b) {
        (Some(a), Some(b)) => jaccard(a, b) > COMPANY_THRESHOLD,
        _ => true,
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Jaccard similarity of the lowercase whitespace-token sets of two strings.
///
/// Returns 0.0 when both strings have no tokens.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    jaccard(&tokenize(a), &tokenize(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobSource;
    use chrono::Utc;

    fn offer(link: &str, title: &str, company: Option<&str>) -> JobOffer {
        JobOffer {
            link: link.to_string(),
            title: title.to_string(),
            company: company.map(String::from),
            location: None,
            source: JobSource::NoFluffJobs,
            salary: None,
            years_experience: None,
            skills: Vec::new(),
            posted_date: None,
            expiration_date: None,
            raw_text_snapshot: None,
            ingested_at: Utc::now(),
        }
    }

    fn links(offers: &[JobOffer]) -> Vec<&str> {
        offers.iter().map(|o| o.link.as_str()).collect()
    }

    #[test]
    fn test_same_link_keeps_first() {
        let detector = DuplicateDetector::new();
        let result = detector.remove_duplicates(vec![
            offer("https://example.com/job1", "Software Engineer", None),
            offer("https://example.com/job1", "Senior Software Engineer", None),
            offer("https://example.com/job2", "Backend Developer", None),
        ]);

        assert_eq!(links(&result), vec!["https://example.com/job1", "https://example.com/job2"]);
        assert_eq!(result[0].title, "Software Engineer");
    }

    #[test]
    fn test_different_titles_survive() {
        let detector = DuplicateDetector::new();
        let result = detector.remove_duplicates(vec![
            offer("https://example.com/job1", "Software Engineer", None),
            offer("https://example.com/job2", "Data Scientist", None),
            offer("https://example.com/job3", "Product Manager", None),
        ]);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_case_insensitive_title_is_fuzzy_duplicate() {
        let detector = DuplicateDetector::new();
        let result = detector.remove_duplicates(vec![
            offer("a", "Senior Backend Engineer", Some("Acme")),
            offer("b", "senior backend engineer", Some("Acme")),
        ]);
        assert_eq!(links(&result), vec!["a"]);

        let result = detector.remove_duplicates(vec![
            offer("a", "Senior Backend Engineer", None),
            offer("b", "senior backend engineer", None),
        ]);
        assert_eq!(links(&result), vec!["a"]);
    }

    #[test]
    fn test_same_title_different_company_survives() {
        let detector = DuplicateDetector::new();
        let result = detector.remove_duplicates(vec![
            offer("a", "Rust Developer", Some("Acme")),
            offer("b", "Rust Developer", Some("Globex")),
        ]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_missing_company_on_one_side_matches() {
        let detector = DuplicateDetector::new();
        let result = detector.remove_duplicates(vec![
            offer("a", "Rust Developer", Some("Acme")),
            offer("b", "Rust Developer", Some("")),
            offer("c", "Rust Developer", None),
        ]);
        assert_eq!(links(&result), vec!["a"]);
    }

    #[test]
    fn test_blank_company_is_not_missing() {
        let detector = DuplicateDetector::new();
        let result = detector.remove_duplicates(vec![
            offer("a", "Rust Developer", Some("Acme")),
            offer("b", "Rust Developer", Some("   ")),
        ]);
        assert_eq!(links(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_threshold_is_strict() {
        // 4 of 5 tokens shared: similarity is exactly 0.8, not above it
        let detector = DuplicateDetector::new();
        let result = detector.remove_duplicates(vec![
            offer("a", "senior rust backend platform engineer", None),
            offer("b", "senior rust backend platform", None),
        ]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_marked_offer_does_not_mark_others() {
        // b is dropped as a copy of a; c only resembles b, so it stays
        let detector = DuplicateDetector::new();
        let result = detector.remove_duplicates(vec![
            offer("a", "one two three four five six", None),
            offer("b", "one two three four five six seven", None),
            offer("c", "two three four five six seven eight", None),
        ]);
        assert_eq!(links(&result), vec!["a", "c"]);
    }

    #[test]
    fn test_idempotent() {
        let detector = DuplicateDetector::new();
        let input = vec![
            offer("a", "Senior Backend Engineer", Some("Acme")),
            offer("a", "Whatever", None),
            offer("b", "senior backend engineer", None),
            offer("c", "Frontend Engineer", Some("Acme")),
            offer("d", "Frontend  engineer", Some("ACME")),
            offer("e", "DevOps", None),
        ];

        let once = detector.remove_duplicates(input);
        let twice = detector.remove_duplicates(once.clone());
        assert_eq!(once, twice);
        assert_eq!(links(&once), vec!["a", "c", "e"]);
    }

    #[test]
    fn test_jaccard_similarity() {
        assert_eq!(jaccard_similarity("Rust Dev", "rust dev"), 1.0);
        assert_eq!(jaccard_similarity("", "   "), 0.0);
        assert_eq!(jaccard_similarity("a b", "b c"), 1.0 / 3.0);
    }

    #[test]
    fn test_jaccard_symmetry() {
        let pairs = [
            ("Senior Rust Engineer", "Rust Engineer"),
            ("Data   Scientist", "data analyst scientist"),
            ("", "Engineer"),
        ];
        for (a, b) in pairs {
            assert_eq!(jaccard_similarity(a, b), jaccard_similarity(b, a));
        }
    }
}
