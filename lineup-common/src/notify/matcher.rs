//! Notification matcher
//!
//! A [`NotificationRule`] names a breed called to the table for one category
//! and show. A submission satisfies the rule when its category and show are
//! equal to the rule's and its breed list contains the rule's breed. All
//! comparisons are exact string equality.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Breed call to watch for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationRule {
    pub breed: String,
    pub category: String,
    pub show: String,
}

impl NotificationRule {
    pub fn new(breed: impl Into<String>, category: impl Into<String>, show: impl Into<String>) -> Self {
        Self {
            breed: breed.into(),
            category: category.into(),
            show: show.into(),
        }
    }

    /// Category match, show match and breed containment
    pub fn matches(&self, entry: &SubmissionEntry) -> bool {
        entry.category == self.category
            && entry.show == self.show
            && entry.breeds.iter().any(|b| *b == self.breed)
    }
}

/// Submission read model: one exhibitor's breeds for one category and show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionEntry {
    /// Lowest submission row id in the group
    pub submission_id: i64,
    pub exhibitor_id: String,
    pub category: String,
    pub show: String,
    pub breeds: Vec<String>,
}

/// Matcher context: the rule list and an optional exhibitor restriction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherConfig {
    pub rules: Vec<NotificationRule>,
    /// Only consider this exhibitor's submissions
    pub exhibitor_filter: Option<String>,
}

impl MatcherConfig {
    pub fn new(rules: Vec<NotificationRule>) -> Self {
        Self {
            rules,
            exhibitor_filter: None,
        }
    }

    pub fn with_exhibitor(mut self, exhibitor_id: Option<String>) -> Self {
        self.exhibitor_filter = exhibitor_id.filter(|id| !id.is_empty());
        self
    }

    /// Rules used when the config file names none
    pub fn default_rules() -> Vec<NotificationRule> {
        vec![
            NotificationRule::new("Holland Lop", "Youth", "A"),
            NotificationRule::new("Netherland Dwarf", "Youth", "A"),
        ]
    }

    fn admits(&self, entry: &SubmissionEntry) -> bool {
        match &self.exhibitor_filter {
            Some(id) => entry.exhibitor_id == *id,
            None => true,
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self::new(Self::default_rules())
    }
}

/// A rule satisfied by one exhibitor's submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub rule: NotificationRule,
    pub submission_id: i64,
    pub exhibitor_id: String,
}

/// Every (rule, exhibitor) pair satisfied by the current submissions
///
/// Results follow rule order, then submission order. Each exhibitor appears at
/// most once per rule even if the same breed was submitted twice.
pub fn find_matches(config: &MatcherConfig, submissions: &[SubmissionEntry]) -> Vec<RuleMatch> {
    let mut matches = Vec::new();

    for rule in &config.rules {
        let mut seen = HashSet::new();
        for entry in submissions {
            if !config.admits(entry) || !rule.matches(entry) {
                continue;
            }
            if seen.insert(entry.exhibitor_id.as_str()) {
                matches.push(RuleMatch {
                    rule: rule.clone(),
                    submission_id: entry.submission_id,
                    exhibitor_id: entry.exhibitor_id.clone(),
                });
            }
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, exhibitor: &str, category: &str, show: &str, breeds: &[&str]) -> SubmissionEntry {
        SubmissionEntry {
            submission_id: id,
            exhibitor_id: exhibitor.to_string(),
            category: category.to_string(),
            show: show.to_string(),
            breeds: breeds.iter().map(|b| b.to_string()).collect(),
        }
    }

    #[test]
    fn holland_lop_youth_a_matches_once() {
        let config = MatcherConfig::new(vec![NotificationRule::new("Holland Lop", "Youth", "A")]);
        let submissions = vec![entry(1, "ex-1", "Youth", "A", &["Holland Lop"])];

        let matches = find_matches(&config, &submissions);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].exhibitor_id, "ex-1");
        assert_eq!(matches[0].rule.breed, "Holland Lop");
    }

    #[test]
    fn empty_submission_set_matches_nothing() {
        let config = MatcherConfig::default();
        assert!(find_matches(&config, &[]).is_empty());
    }

    #[test]
    fn category_and_show_must_be_equal() {
        let rule = NotificationRule::new("Holland Lop", "Youth", "A");
        assert!(!rule.matches(&entry(1, "ex", "Open", "A", &["Holland Lop"])));
        assert!(!rule.matches(&entry(1, "ex", "Youth", "B", &["Holland Lop"])));
        // Display label is not the show code
        assert!(!rule.matches(&entry(1, "ex", "Youth", "Show A", &["Holland Lop"])));
    }

    #[test]
    fn breed_containment_is_element_equality() {
        let rule = NotificationRule::new("Lop", "Youth", "A");
        assert!(!rule.matches(&entry(1, "ex", "Youth", "A", &["Holland Lop", "Mini Lop"])));

        let rule = NotificationRule::new("Mini Lop", "Youth", "A");
        assert!(rule.matches(&entry(1, "ex", "Youth", "A", &["Holland Lop", "Mini Lop"])));
    }

    #[test]
    fn each_exhibitor_reported_once_per_rule() {
        let config = MatcherConfig::new(vec![NotificationRule::new("Holland Lop", "Youth", "A")]);
        let submissions = vec![
            entry(1, "ex-1", "Youth", "A", &["Holland Lop"]),
            entry(2, "ex-2", "Youth", "A", &["Holland Lop", "Rex"]),
            entry(3, "ex-1", "Youth", "A", &["Holland Lop"]),
        ];

        let matches = find_matches(&config, &submissions);
        let exhibitors: Vec<_> = matches.iter().map(|m| m.exhibitor_id.as_str()).collect();
        assert_eq!(exhibitors, vec!["ex-1", "ex-2"]);
    }

    #[test]
    fn exhibitor_filter_restricts_matches() {
        let config = MatcherConfig::default().with_exhibitor(Some("ex-2".to_string()));
        let submissions = vec![
            entry(1, "ex-1", "Youth", "A", &["Holland Lop"]),
            entry(2, "ex-2", "Youth", "A", &["Netherland Dwarf"]),
        ];

        let matches = find_matches(&config, &submissions);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].exhibitor_id, "ex-2");
        assert_eq!(matches[0].rule.breed, "Netherland Dwarf");
    }

    #[test]
    fn empty_exhibitor_filter_means_everyone() {
        let config = MatcherConfig::default().with_exhibitor(Some(String::new()));
        assert!(config.exhibitor_filter.is_none());
    }

    #[test]
    fn matches_follow_rule_order() {
        let config = MatcherConfig::default();
        let submissions = vec![entry(1, "ex-1", "Youth", "A", &["Netherland Dwarf", "Holland Lop"])];

        let breeds: Vec<_> = find_matches(&config, &submissions)
            .into_iter()
            .map(|m| m.rule.breed)
            .collect();
        assert_eq!(breeds, vec!["Holland Lop", "Netherland Dwarf"]);
    }
}
