//! Transition labels.
//!
//! A [`Rule`] is one atomic guard on an edge: either a single input symbol
//! or the reserved epsilon symbol. A [`RuleSet`] is the ordered,
//! duplicate-free collection of rules carried by one transition.

use super::guard::{Guard, Step};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Reserved symbol meaning "consume no input" (U+025B).
pub const EPSILON: char = '\u{025B}';

/// Separator used when rendering a rule set for display.
const DISPLAY_SEPARATOR: &str = ", ";

/// Characters that delimit rules or records and so can never be a symbol.
pub const RESERVED_SYMBOLS: [char; 4] = [' ', ',', '\r', '\n'];

/// A single transition guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// Matches exactly this input symbol
    Symbol(char),

    /// Traversable without consuming input
    Epsilon,
}

impl Rule {
    /// Build a rule from its persisted character.
    ///
    /// [`EPSILON`] maps to [`Rule::Epsilon`]; every other character is a
    /// symbol rule.
    pub fn from_char(c: char) -> Self {
        if c == EPSILON {
            Rule::Epsilon
        } else {
            Rule::Symbol(c)
        }
    }

    /// The character this rule is persisted and displayed as.
    pub fn as_char(&self) -> char {
        match self {
            Rule::Symbol(c) => *c,
            Rule::Epsilon => EPSILON,
        }
    }

    /// Check if this is the epsilon rule.
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Rule::Epsilon)
    }

    /// Check whether this rule's character is a separator or line break.
    pub fn is_reserved(&self) -> bool {
        RESERVED_SYMBOLS.contains(&self.as_char())
    }
}

/// Epsilon always stays put, whatever the next symbol is. A literal
/// U+025B in the input is therefore never consumed, and an epsilon
/// self-loop is never traversed (the engine skips it outright).
impl Guard for Rule {
    fn step(&self, next: Option<char>) -> Step {
        match self {
            Rule::Epsilon => Step::Stay,
            Rule::Symbol(c) if next == Some(*c) => Step::Consume,
            Rule::Symbol(_) => Step::Blocked,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Ordered set of rules, duplicates collapsed, first occurrence wins.
///
/// Reserved characters ([`RESERVED_SYMBOLS`]) are never admitted, on any
/// construction path including deserialization.
///
/// # Example
///
/// ```rust
/// use nfakit::core::RuleSet;
///
/// let rules = RuleSet::from_text("a, b,c a");
/// assert_eq!(rules.render(), "a, b, c");
/// assert_eq!(rules.to_compact(), "abc");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Rule>", into = "Vec<Rule>")]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Parse free-form text into a rule set.
    ///
    /// Separators (`", "`, spaces, commas) and line breaks are dropped and
    /// every remaining character becomes one rule. This never fails:
    /// malformed input simply yields whatever characters survive.
    pub fn from_text(text: &str) -> Self {
        text.replace(DISPLAY_SEPARATOR, "")
            .chars()
            .map(Rule::from_char)
            .collect()
    }

    /// Add a rule, returning `false` if it was already present or is reserved.
    pub fn insert(&mut self, rule: Rule) -> bool {
        if rule.is_reserved() || self.rules.contains(&rule) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// Check if `rule` is in the set.
    pub fn contains(&self, rule: &Rule) -> bool {
        self.rules.contains(rule)
    }

    pub fn has_epsilon(&self) -> bool {
        self.rules.iter().any(Rule::is_epsilon)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate rules in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Human-readable form: symbols joined by `", "`.
    pub fn render(&self) -> String {
        self.rules
            .iter()
            .map(|r| r.as_char().to_string())
            .collect::<Vec<_>>()
            .join(DISPLAY_SEPARATOR)
    }

    /// Persisted form: symbols concatenated with no separators.
    pub fn to_compact(&self) -> String {
        self.rules.iter().map(Rule::as_char).collect()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for RuleSet {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_text(s))
    }
}

impl Extend<Rule> for RuleSet {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        for rule in iter {
            self.insert(rule);
        }
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        rules.into_iter().collect()
    }
}

impl From<RuleSet> for Vec<Rule> {
    fn from(set: RuleSet) -> Self {
        set.rules
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
