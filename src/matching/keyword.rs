use regex::Regex;

use crate::errors::{FeederError, FeederResult};

/// Decides whether a piece of free text describes a relevant posting.
pub trait KeywordPredicate {
    fn is_match(&self, text: &str) -> bool;

    /// Title first, then the description when one is present.
    fn matches_entry(&self, title: &str, description: Option<&str>) -> bool {
        self.is_match(title) || description.is_some_and(|d| self.is_match(d))
    }
}

impl<F> KeywordPredicate for F
where
    F: Fn(&str) -> bool,
{
    fn is_match(&self, text: &str) -> bool {
        self(text)
    }
}

const REMOTE_TERMS: &[&str] = &["remote", "telecommute", "work from home"];

const SENIORITY_TERMS: &[&str] = &["junior", "entry-level", "graduate", "associate", "trainee"];

const ROLE_TERMS: &[&str] = &[
    "data scientist",
    "data engineer",
    "quantitative developer",
    "quant developer",
    "quantitative analyst",
    "quant analyst",
];

const PYTHON_ROLE_TERMS: &[&str] = &[
    "data scientist",
    "data engineer",
    "quantitative developer",
    "quant developer",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleVariant {
    /// remote … [seniority] … role
    RemoteFirst,
    /// seniority … role … remote
    SeniorityFirst,
    /// role … seniority … remote
    RoleFirst,
    /// python … [seniority] … data/quant developer role
    Python,
}

impl RuleVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleVariant::RemoteFirst => "remote-first",
            RuleVariant::SeniorityFirst => "seniority-first",
            RuleVariant::RoleFirst => "role-first",
            RuleVariant::Python => "python",
        }
    }
}

impl std::fmt::Display for RuleVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The job profile filter: remote data science / data engineering / quant
/// roles, preferably junior. Each rule is an ordered co-occurrence test,
/// case-insensitive, with arbitrary text (including line breaks) between
/// terms.
pub struct JobProfilePredicate {
    rules: Vec<(RuleVariant, Regex)>,
}

impl JobProfilePredicate {
    pub fn new() -> FeederResult<Self> {
        let remote = alternation(REMOTE_TERMS);
        let seniority = alternation(SENIORITY_TERMS);
        let role = alternation(ROLE_TERMS);
        let python_role = alternation(PYTHON_ROLE_TERMS);

        let rules = [
            (
                RuleVariant::RemoteFirst,
                format!("{}.*(?:{})?.*{}", remote, seniority, role),
            ),
            (
                RuleVariant::SeniorityFirst,
                format!("{}.*{}.*{}", seniority, role, remote),
            ),
            (
                RuleVariant::RoleFirst,
                format!("{}.*{}.*{}", role, seniority, remote),
            ),
            (
                RuleVariant::Python,
                format!("python.*(?:{})?.*{}", seniority, python_role),
            ),
        ];

        let rules = rules
            .into_iter()
            .map(|(variant, pattern)| Ok((variant, compile(&pattern)?)))
            .collect::<FeederResult<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// First rule variant that accepts `text`, in declaration order.
    pub fn matched_rule(&self, text: &str) -> Option<RuleVariant> {
        self.rules
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(variant, _)| *variant)
    }
}

impl KeywordPredicate for JobProfilePredicate {
    fn is_match(&self, text: &str) -> bool {
        self.matched_rule(text).is_some()
    }
}

/// `(?:a|b c)` with spaces widened to any whitespace run and hyphens made an
/// optional single separator, so "entry-level", "entry level" and
/// "entrylevel" are the same term.
fn alternation(terms: &[&str]) -> String {
    let alternatives: Vec<String> = terms
        .iter()
        .map(|term| {
            term.split(' ')
                .map(|word| {
                    word.split('-')
                        .map(regex::escape)
                        .collect::<Vec<_>>()
                        .join(r"[-\s]?")
                })
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();

    format!("(?:{})", alternatives.join("|"))
}

fn compile(pattern: &str) -> FeederResult<Regex> {
    Regex::new(&format!("(?is){}", pattern))
        .map_err(|e| FeederError::Config(format!("keyword pattern: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predicate() -> JobProfilePredicate {
        JobProfilePredicate::new().unwrap()
    }

    #[test]
    fn test_remote_junior_data_scientist() {
        assert_eq!(
            predicate().matched_rule("Remote Junior Data Scientist"),
            Some(RuleVariant::RemoteFirst)
        );
    }

    #[test]
    fn test_senior_backend_engineer_rejected() {
        assert!(!predicate().is_match("Senior Backend Engineer"));
    }

    #[test]
    fn test_quant_developer_trainee_remote_is_role_first() {
        assert_eq!(
            predicate().matched_rule("Quant Developer Trainee, Remote"),
            Some(RuleVariant::RoleFirst)
        );
    }

    #[test]
    fn test_seniority_first() {
        assert_eq!(
            predicate().matched_rule("Graduate Quantitative Analyst (100% remote)"),
            Some(RuleVariant::SeniorityFirst)
        );
    }

    #[test]
    fn test_remote_first_without_seniority() {
        assert_eq!(
            predicate().matched_rule("Work From Home - Senior Data Engineer"),
            Some(RuleVariant::RemoteFirst)
        );
    }

    #[test]
    fn test_python_variant() {
        assert_eq!(
            predicate().matched_rule("Python Developer wanted: junior data engineer"),
            Some(RuleVariant::Python)
        );
    }

    #[test]
    fn test_python_variant_excludes_analyst_roles() {
        assert!(!predicate().is_match("Python quant analyst"));
    }

    #[test]
    fn test_order_matters() {
        // role then remote, but no seniority term between them
        assert!(!predicate().is_match("Data Scientist, Remote"));
        // seniority without any remote term
        assert!(!predicate().is_match("Junior Data Scientist in Berlin"));
    }

    #[test]
    fn test_entry_level_separators() {
        let p = predicate();
        assert!(p.is_match("Entry-Level Data Engineer, remote"));
        assert!(p.is_match("Entry Level Data Engineer, remote"));
        assert!(p.is_match("Entrylevel Data Engineer, remote"));
        // the separator is a hyphen or whitespace, not any character
        assert!(!p.is_match("Entry8level Data Engineer, remote"));
    }

    #[test]
    fn test_gaps_span_lines() {
        let text = "We are hiring a junior\nData Scientist.\nThis position is fully remote.";
        assert_eq!(predicate().matched_rule(text), Some(RuleVariant::SeniorityFirst));
    }

    #[test]
    fn test_multiword_terms_tolerate_extra_whitespace() {
        assert!(predicate().is_match("REMOTE  data\n scientist"));
    }

    #[test]
    fn test_matches_entry_falls_back_to_description() {
        let p = predicate();
        assert!(p.matches_entry(
            "Data Team Opening",
            Some("Remote position for a junior data engineer")
        ));
        assert!(!p.matches_entry("Data Team Opening", None));
    }

    #[test]
    fn test_closure_predicate() {
        let contains_rust = |text: &str| text.to_lowercase().contains("rust");
        assert!(contains_rust.matches_entry("Backend", Some("Rust and Tokio")));
        assert!(!contains_rust.matches_entry("Backend", Some("Go")));
    }
}
