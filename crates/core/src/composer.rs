//! Constraint-driven poem composition.
//!
//! Composition runs in four phases:
//!
//! 1. **Validate** the pattern and its constraints, before touching the store.
//! 2. **Qualify**: for each label find every rhyme key with enough stored lines at
//!    the label's syllable counts to fill all of the label's positions.
//! 3. **Assign** one qualifying rhyme key to each label, uniformly at random and
//!    independently per label. Two labels may end up with the same key.
//! 4. **Sample and assemble**: draw exactly as many lines as the label needs from its
//!    rhyme group, then walk the pattern left to right taking one unused line per
//!    position.
//!
//! Sampling is per label, so the same stored line can land in two labels' pools when
//! their rhyme keys and syllable counts overlap. This is rare on a large store and is
//! not corrected.

use crate::analysis::Line;
use crate::pattern::PatternSpec;
use crate::poem::Poem;
use crate::repository::LineRepository;
use crate::{PoemError, PoemResult};
use rand::seq::IteratorRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Builds poems from the lines held in a [`LineRepository`].
#[derive(Clone, Copy)]
pub struct PoemComposer<'r> {
    repository: &'r LineRepository,
}

impl<'r> PoemComposer<'r> {
    pub fn new(repository: &'r LineRepository) -> Self {
        Self { repository }
    }

    /// Composes one poem following `pattern`.
    ///
    /// # Errors
    ///
    /// - `PoemError::EmptyPattern`, `PoemError::MissingConstraint` or
    ///   `PoemError::EmptyConstraint` for an invalid pattern
    /// - `PoemError::ResourceExhausted(label)` when no rhyme group is large enough for
    ///   `label`; no lines are sampled in that case
    /// - `PoemError::Database` and sampling errors from the repository
    pub fn compose(
        &self,
        pattern: &PatternSpec,
        title: &str,
        author: &str,
        rng: &mut impl Rng,
    ) -> PoemResult<Poem> {
        let requirements = pattern.requirements()?;

        let mut qualifying = Vec::with_capacity(requirements.len());
        for requirement in &requirements {
            let keys = self
                .repository
                .qualifying_rhyme_groups(&requirement.syllable_counts, requirement.line_count)?;
            if keys.is_empty() {
                tracing::debug!(
                    "no rhyme group with {} lines at syllables {:?} for label '{}'",
                    requirement.line_count,
                    requirement.syllable_counts,
                    requirement.label
                );
                return Err(PoemError::ResourceExhausted(requirement.label));
            }
            qualifying.push(keys);
        }

        let mut assigned = Vec::with_capacity(requirements.len());
        for (requirement, keys) in requirements.iter().zip(&qualifying) {
            let key = keys
                .iter()
                .choose(rng)
                .ok_or(PoemError::ResourceExhausted(requirement.label))?;
            tracing::debug!(
                "label '{}' assigned rhyme '{}' from {} candidates",
                requirement.label,
                key,
                keys.len()
            );
            assigned.push(key.as_str());
        }

        let mut pools: BTreeMap<char, Vec<Line>> = BTreeMap::new();
        for (requirement, key) in requirements.iter().zip(assigned) {
            let pool = self.repository.sample_lines(
                &requirement.syllable_counts,
                key,
                requirement.line_count,
                rng,
            )?;
            pools.insert(requirement.label, pool);
        }

        let mut lines = Vec::with_capacity(pattern.len());
        for label in pattern.labels() {
            let line = pools
                .get_mut(&label)
                .and_then(Vec::pop)
                .ok_or(PoemError::ResourceExhausted(label))?;
            lines.push(line);
        }

        Ok(Poem::new(lines, title, author))
    }
}
