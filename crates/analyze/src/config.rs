//! Analysis configuration: which passes run, and which rule anchors
//! reachability.
//!
//! Configuration is plain data handed to [`crate::analyze_with`]. It
//! deserializes from the same shape in TOML or JSON:
//!
//! ```toml
//! passes = ["undefined-rule", "unreachable-rule"]
//! start-rule = "expression"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One analyzer pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PassKind {
    UndefinedRule,
    DuplicateRule,
    UnreachableRule,
    Recursion,
    AmbiguousPrefix,
    RedundantParentheses,
    SimplifiableRepetition,
}

impl PassKind {
    pub const ALL: [PassKind; 7] = [
        PassKind::UndefinedRule,
        PassKind::DuplicateRule,
        PassKind::UnreachableRule,
        PassKind::Recursion,
        PassKind::AmbiguousPrefix,
        PassKind::RedundantParentheses,
        PassKind::SimplifiableRepetition,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PassKind::UndefinedRule => "undefined-rule",
            PassKind::DuplicateRule => "duplicate-rule",
            PassKind::UnreachableRule => "unreachable-rule",
            PassKind::Recursion => "recursion",
            PassKind::AmbiguousPrefix => "ambiguous-prefix",
            PassKind::RedundantParentheses => "redundant-parentheses",
            PassKind::SimplifiableRepetition => "simplifiable-repetition",
        }
    }

    /// Parse a comma-separated selection such as `"recursion, undefined-rule"`.
    pub fn parse_list(list: &str) -> Result<BTreeSet<PassKind>, ConfigError> {
        let passes = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<Result<BTreeSet<_>, _>>()?;
        if passes.is_empty() {
            return Err(ConfigError::EmptySelection);
        }
        Ok(passes)
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PassKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PassKind::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ConfigError::UnknownPass(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "unknown analysis pass `{0}` (expected one of: undefined-rule, duplicate-rule, \
         unreachable-rule, recursion, ambiguous-prefix, redundant-parentheses, \
         simplifiable-repetition)"
    )]
    UnknownPass(String),

    #[error("pass selection is empty")]
    EmptySelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct AnalysisConfig {
    pub passes: BTreeSet<PassKind>,
    /// Rule that anchors reachability. The first rule in source order is
    /// used when this is unset or names no rule.
    pub start_rule: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            passes: PassKind::ALL.into_iter().collect(),
            start_rule: None,
        }
    }
}

impl AnalysisConfig {
    /// Run exactly `passes`.
    pub fn only(passes: impl IntoIterator<Item = PassKind>) -> Self {
        AnalysisConfig {
            passes: passes.into_iter().collect(),
            start_rule: None,
        }
    }

    pub fn with_start_rule(mut self, name: impl Into<String>) -> Self {
        self.start_rule = Some(name.into());
        self
    }

    pub fn runs(&self, pass: PassKind) -> bool {
        self.passes.contains(&pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for pass in PassKind::ALL {
            assert_eq!(pass.name().parse::<PassKind>(), Ok(pass));
        }
    }

    #[test]
    fn unknown_pass_is_rejected() {
        let err = "cycles".parse::<PassKind>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownPass("cycles".to_string()));
        assert!(err.to_string().starts_with("unknown analysis pass `cycles`"));
    }

    #[test]
    fn parse_list_trims_and_dedups() {
        let passes = PassKind::parse_list(" recursion,undefined-rule , recursion,").unwrap();
        assert_eq!(
            passes.into_iter().collect::<Vec<_>>(),
            vec![PassKind::UndefinedRule, PassKind::Recursion]
        );
    }

    #[test]
    fn parse_list_rejects_empty_selection() {
        assert_eq!(PassKind::parse_list(" , "), Err(ConfigError::EmptySelection));
    }

    #[test]
    fn default_runs_every_pass() {
        let config = AnalysisConfig::default();
        assert!(PassKind::ALL.iter().all(|&p| config.runs(p)));
        assert_eq!(config.start_rule, None);
    }

    #[test]
    fn deserializes_kebab_case_json() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"{ "passes": ["ambiguous-prefix"], "start-rule": "expr" }"#,
        )
        .unwrap();
        assert_eq!(
            config,
            AnalysisConfig::only([PassKind::AmbiguousPrefix]).with_start_rule("expr")
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<AnalysisConfig>(r#"{ "pases": [] }"#).is_err());
    }
}
