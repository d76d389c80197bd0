//! Prioritized whole-word rule chain.
//!
//! Rules are tried top to bottom. The first rule whose pattern occurs as a
//! whole word redirects every occurrence of that pattern in the line; no later
//! rule is consulted for the same line.

use regex::{Captures, Regex};

use crate::defaults::RuleConfig;
use crate::error::{Error, Result};

/// A compiled (pattern, replacement) pair.
#[derive(Debug, Clone)]
pub struct Rule {
    replacement: String,
    matcher: Regex,
}

/// Position and replacement of the first rule that fired on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub rule_index: usize,
    pub rewritten: String,
}

impl Rule {
    /// Compile a whole-word rule.
    ///
    /// The pattern must be a plain identifier. A match is rejected when it is
    /// glued to identifier characters on either side, or when it directly
    /// follows `.` or `:` (member access, or a call that is already qualified).
    /// Qualified call sites such as `obj.dict(x)` or `m:list()` are never
    /// rewritten, which keeps a second run from re-qualifying `utils.dict`.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        if !is_identifier(pattern) {
            return Err(Error::config_invalid_value(
                "rules.pattern",
                Some(pattern.to_string()),
                "Pattern must be a non-empty identifier ([A-Za-z_][A-Za-z0-9_]*)",
            ));
        }

        let source = format!(r"(^|[^\w.:]){}\b", regex::escape(pattern));
        let matcher = Regex::new(&source).map_err(|e| {
            Error::config_invalid_value("rules.pattern", Some(pattern.to_string()), e.to_string())
        })?;

        Ok(Self {
            replacement: replacement.to_string(),
            matcher,
        })
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.matcher.is_match(line)
    }

    /// Replace every whole-word occurrence, keeping the boundary character.
    pub fn apply(&self, line: &str) -> String {
        self.matcher
            .replace_all(line, |caps: &Captures| {
                format!("{}{}", &caps[1], self.replacement)
            })
            .into_owned()
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Immutable ordered list of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    rules: Vec<Rule>,
}

impl RuleChain {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Compile a chain from (pattern, replacement) pairs, preserving order.
    pub fn from_pairs<P, R>(pairs: &[(P, R)]) -> Result<Self>
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        let rules = pairs
            .iter()
            .map(|(p, r)| Rule::new(p.as_ref(), r.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    pub fn from_config(rules: &[RuleConfig]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|r| Rule::new(&r.pattern, &r.replacement))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite `line` with the first rule that matches, or `None`.
    pub fn first_match(&self, line: &str) -> Option<RuleMatch> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.is_match(line))
            .map(|(rule_index, rule)| RuleMatch {
                rule_index,
                rewritten: rule.apply(line),
            })
    }
}
