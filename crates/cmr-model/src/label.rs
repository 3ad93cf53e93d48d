use std::fmt;

use serde::{Deserialize, Serialize};

/// A class label produced by a fitted classifier.
///
/// Classifiers are fitted on binary targets, so in practice the value is 0 or
/// 1, but the label is whatever the artifact lists in its `classes`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClassLabel(i64);

impl ClassLabel {
    pub const NEGATIVE: Self = Self(0);
    pub const POSITIVE: Self = Self(1);

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Only label 1 counts as a positive finding.
    pub fn is_positive(self) -> bool {
        self.0 == 1
    }

    /// Text shown on the results page.
    pub fn answer(self) -> &'static str {
        if self.is_positive() { "Yes" } else { "No" }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Conditions each model family predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Prediabetes,
    Hypertension,
}

impl Condition {
    pub const ALL: [Condition; 2] = [Condition::Prediabetes, Condition::Hypertension];

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Prediabetes => "prediabetes",
            Condition::Hypertension => "hypertension",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Condition::Prediabetes => "Prediabetes",
            Condition::Hypertension => "Hypertension",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_renders_as_yes() {
        assert_eq!(ClassLabel::POSITIVE.answer(), "Yes");
        assert_eq!(ClassLabel::NEGATIVE.answer(), "No");
        assert_eq!(ClassLabel::new(2).answer(), "No");
        assert_eq!(ClassLabel::new(-1).answer(), "No");
    }
}
