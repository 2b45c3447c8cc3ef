//! Rhyme-scheme patterns and their syllable constraints.
//!
//! A pattern such as `"AABBA"` assigns a label to every line of the poem; lines that
//! share a label must rhyme. Each label used in the pattern maps to the set of syllable
//! counts its lines may have.

use crate::constants::MAX_SYLLABLE_COUNT;
use crate::{PoemError, PoemResult};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// A rhyme-scheme pattern plus per-label syllable constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternSpec {
    pattern: String,
    constraints: BTreeMap<char, BTreeSet<u32>>,
}

/// What one label needs from the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelRequirement {
    pub label: char,
    /// Number of pattern positions carrying this label.
    pub line_count: usize,
    pub syllable_counts: BTreeSet<u32>,
}

impl PatternSpec {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            constraints: BTreeMap::new(),
        }
    }

    /// Sets the acceptable syllable counts for `label`, replacing any previous set.
    pub fn with_syllables(mut self, label: char, counts: impl IntoIterator<Item = u32>) -> Self {
        self.constraints.insert(label, counts.into_iter().collect());
        self
    }

    /// Applies a parsed constraint, replacing any previous set for its label.
    pub fn with_constraint(self, constraint: LabelConstraint) -> Self {
        self.with_syllables(constraint.label, constraint.syllable_counts)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of lines a poem built from this pattern has.
    pub fn len(&self) -> usize {
        self.pattern.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = char> + '_ {
        self.pattern.chars()
    }

    pub fn syllables_for(&self, label: char) -> Option<&BTreeSet<u32>> {
        self.constraints.get(&label)
    }

    /// Validates the pattern and returns one requirement per distinct label, in order of
    /// first appearance.
    ///
    /// # Errors
    ///
    /// - `PoemError::EmptyPattern` if the pattern has no labels
    /// - `PoemError::MissingConstraint` if a used label has no constraint entry
    /// - `PoemError::EmptyConstraint` if a used label's constraint set is empty
    pub fn requirements(&self) -> PoemResult<Vec<LabelRequirement>> {
        if self.pattern.is_empty() {
            return Err(PoemError::EmptyPattern);
        }

        let mut requirements: Vec<LabelRequirement> = Vec::new();
        for label in self.pattern.chars() {
            if let Some(existing) = requirements.iter_mut().find(|r| r.label == label) {
                existing.line_count += 1;
                continue;
            }

            let syllable_counts = self
                .constraints
                .get(&label)
                .ok_or(PoemError::MissingConstraint(label))?;
            if syllable_counts.is_empty() {
                return Err(PoemError::EmptyConstraint(label));
            }

            requirements.push(LabelRequirement {
                label,
                line_count: 1,
                syllable_counts: syllable_counts.clone(),
            });
        }

        Ok(requirements)
    }
}

/// A `LABEL=COUNTS` constraint as written on the command line.
///
/// Counts are comma separated and may include inclusive ranges: `A=7,8`, `B=5-7`,
/// `C=4,6-8`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelConstraint {
    pub label: char,
    pub syllable_counts: BTreeSet<u32>,
}

impl FromStr for LabelConstraint {
    type Err = PoemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, counts) = s.split_once('=').ok_or_else(|| {
            PoemError::InvalidInput(format!("constraint '{s}' must look like LABEL=COUNTS"))
        })?;

        let mut chars = label.trim().chars();
        let label = match (chars.next(), chars.next()) {
            (Some(label), None) => label,
            _ => {
                return Err(PoemError::InvalidInput(format!(
                    "constraint label '{label}' must be a single character"
                )))
            }
        };

        Ok(Self {
            label,
            syllable_counts: parse_syllable_counts(counts)?,
        })
    }
}

/// Parses `"7,8"` or `"5-7"` style syllable lists.
///
/// Counts above [`MAX_SYLLABLE_COUNT`] are rejected.
pub fn parse_syllable_counts(s: &str) -> PoemResult<BTreeSet<u32>> {
    fn number(part: &str) -> PoemResult<u32> {
        let count: u32 = part.trim().parse().map_err(|_| {
            PoemError::InvalidInput(format!("'{}' is not a syllable count", part.trim()))
        })?;
        if count > MAX_SYLLABLE_COUNT {
            return Err(PoemError::InvalidInput(format!(
                "syllable count {count} exceeds {MAX_SYLLABLE_COUNT}"
            )));
        }
        Ok(count)
    }

    let mut counts = BTreeSet::new();
    for part in s.split(',').filter(|p| !p.trim().is_empty()) {
        match part.split_once('-') {
            Some((low, high)) => {
                let (low, high) = (number(low)?, number(high)?);
                if low > high {
                    return Err(PoemError::InvalidInput(format!(
                        "syllable range '{}' is reversed",
                        part.trim()
                    )));
                }
                counts.extend(low..=high);
            }
            None => {
                counts.insert(number(part)?);
            }
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements_count_labels_in_first_appearance_order() {
        let spec = PatternSpec::new("ABBAC")
            .with_syllables('A', [7, 8])
            .with_syllables('B', [5])
            .with_syllables('C', [3])
            .with_syllables('Z', Vec::<u32>::new());

        let requirements = spec.requirements().unwrap();

        assert_eq!(requirements.len(), 3);
        assert_eq!(requirements[0].label, 'A');
        assert_eq!(requirements[0].line_count, 2);
        assert_eq!(requirements[0].syllable_counts, BTreeSet::from([7, 8]));
        assert_eq!(requirements[1].label, 'B');
        assert_eq!(requirements[1].line_count, 2);
        assert_eq!(requirements[2].label, 'C');
        assert_eq!(requirements[2].line_count, 1);
        assert_eq!(spec.len(), 5);
    }

    #[test]
    fn test_empty_pattern() {
        let spec = PatternSpec::new("").with_syllables('A', [7]);
        assert!(matches!(spec.requirements(), Err(PoemError::EmptyPattern)));
    }

    #[test]
    fn test_missing_constraint() {
        let spec = PatternSpec::new("AAB").with_syllables('A', [7]);
        assert!(matches!(
            spec.requirements(),
            Err(PoemError::MissingConstraint('B'))
        ));
    }

    #[test]
    fn test_empty_constraint() {
        let spec = PatternSpec::new("AB")
            .with_syllables('A', [7])
            .with_syllables('B', Vec::<u32>::new());
        assert!(matches!(
            spec.requirements(),
            Err(PoemError::EmptyConstraint('B'))
        ));
    }

    #[test]
    fn test_parse_label_constraint() {
        let constraint: LabelConstraint = "A=7,8".parse().unwrap();
        assert_eq!(constraint.label, 'A');
        assert_eq!(constraint.syllable_counts, BTreeSet::from([7, 8]));

        let constraint: LabelConstraint = " B = 4, 6-8 ".parse().unwrap();
        assert_eq!(constraint.label, 'B');
        assert_eq!(constraint.syllable_counts, BTreeSet::from([4, 6, 7, 8]));
    }

    #[test]
    fn test_parse_label_constraint_errors() {
        assert!("A7".parse::<LabelConstraint>().is_err());
        assert!("AB=7".parse::<LabelConstraint>().is_err());
        assert!("=7".parse::<LabelConstraint>().is_err());
        assert!("A=seven".parse::<LabelConstraint>().is_err());
        assert!("A=8-7".parse::<LabelConstraint>().is_err());
    }

    #[test]
    fn test_parse_rejects_oversized_counts() {
        assert!(parse_syllable_counts("0-4000000000").is_err());
        assert!(parse_syllable_counts("7,1001").is_err());

        let counts = parse_syllable_counts("0-1000").unwrap();
        assert_eq!(counts.len(), 1001);
    }

    #[test]
    fn test_parse_empty_count_list_is_empty_set() {
        let constraint: LabelConstraint = "A=".parse().unwrap();
        assert!(constraint.syllable_counts.is_empty());

        let spec = PatternSpec::new("A").with_constraint(constraint);
        assert!(matches!(
            spec.requirements(),
            Err(PoemError::EmptyConstraint('A'))
        ));
    }
}
