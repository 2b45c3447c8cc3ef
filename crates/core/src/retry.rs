//! Retrying composition until no line rhymes with itself.
//!
//! A rhyme group can contain several lines ending in the very same word, and a poem
//! that "rhymes" `down` with `down` is a poor one. [`compose_distinct`] composes up to
//! a fixed number of times and keeps the first poem whose final words are pairwise
//! distinct, falling back to the last attempt.

use crate::composer::PoemComposer;
use crate::pattern::PatternSpec;
use crate::poem::Poem;
use crate::PoemResult;
use rand::Rng;

/// Composes up to `max_attempts` poems and returns the first one whose lines all end in
/// different words, or the last attempt if none does.
///
/// A `max_attempts` of zero is treated as one attempt.
///
/// # Errors
///
/// Any composition error is returned immediately without further attempts. Validation
/// and resource exhaustion depend only on the pattern and the store, so retrying could
/// not change the outcome.
pub fn compose_distinct(
    composer: &PoemComposer<'_>,
    pattern: &PatternSpec,
    title: &str,
    author: &str,
    max_attempts: usize,
    rng: &mut impl Rng,
) -> PoemResult<Poem> {
    let attempts = max_attempts.max(1);

    let mut attempt = 1;
    loop {
        let poem = composer.compose(pattern, title, author, rng)?;
        if poem.has_distinct_final_words() {
            tracing::debug!("distinct final words after {attempt} attempt(s)");
            return Ok(poem);
        }
        if attempt == attempts {
            tracing::warn!(
                "no poem with distinct final words after {attempts} attempt(s), keeping the last one"
            );
            return Ok(poem);
        }
        tracing::debug!("attempt {attempt} repeats a final word: {:?}", poem.final_words());
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::LineRepository;
    use crate::test_support::repository_with;
    use crate::PoemError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Two "down" lines and one "brown" line: a two-line poem has distinct final words
    /// only when "brown" is drawn.
    fn repeated_word_repository() -> LineRepository {
        repository_with(&["a cat sat down", "the cat sat down", "a hat to brown"])
    }

    fn couplet() -> PatternSpec {
        PatternSpec::new("AA").with_syllables('A', [4])
    }

    #[test]
    fn test_returns_distinct_poem_when_one_is_found() {
        let repository = repeated_word_repository();
        let composer = PoemComposer::new(&repository);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let poem =
                compose_distinct(&composer, &couplet(), "t", "a", 50, &mut rng).unwrap();
            assert_eq!(poem.lines().len(), 2);
            assert!(poem.has_distinct_final_words());
            assert!(poem.final_words().contains(&"brown"));
        }
    }

    #[test]
    fn test_falls_back_to_last_attempt() {
        let repository = repository_with(&["a cat sat down", "the cat sat down"]);
        let composer = PoemComposer::new(&repository);
        let mut rng = StdRng::seed_from_u64(3);

        let poem = compose_distinct(&composer, &couplet(), "t", "a", 4, &mut rng).unwrap();

        assert_eq!(poem.lines().len(), 2);
        assert_eq!(poem.final_words(), ["down", "down"]);
    }

    #[test]
    fn test_matches_first_distinct_attempt() {
        let repository = repeated_word_repository();
        let composer = PoemComposer::new(&repository);
        let pattern = couplet();

        for seed in 0..20 {
            // Replay the attempts by hand with an identically seeded generator.
            let mut replay = StdRng::seed_from_u64(seed);
            let mut expected = None;
            for _ in 0..5 {
                let poem = composer.compose(&pattern, "t", "a", &mut replay).unwrap();
                let distinct = poem.has_distinct_final_words();
                expected = Some(poem);
                if distinct {
                    break;
                }
            }

            let mut rng = StdRng::seed_from_u64(seed);
            let poem = compose_distinct(&composer, &pattern, "t", "a", 5, &mut rng).unwrap();
            assert_eq!(Some(poem), expected);
        }
    }

    #[test]
    fn test_zero_attempts_still_composes_once() {
        let repository = repeated_word_repository();
        let composer = PoemComposer::new(&repository);
        let mut rng = StdRng::seed_from_u64(8);

        let poem = compose_distinct(&composer, &couplet(), "t", "a", 0, &mut rng).unwrap();
        assert_eq!(poem.lines().len(), 2);
    }

    #[test]
    fn test_structural_errors_propagate() {
        let repository = repeated_word_repository();
        let composer = PoemComposer::new(&repository);
        let mut rng = StdRng::seed_from_u64(8);

        let pattern = PatternSpec::new("AAAA").with_syllables('A', [4]);
        let result = compose_distinct(&composer, &pattern, "t", "a", 5, &mut rng);
        assert!(matches!(result, Err(PoemError::ResourceExhausted('A'))));

        let result = compose_distinct(&composer, &PatternSpec::new(""), "t", "a", 5, &mut rng);
        assert!(matches!(result, Err(PoemError::EmptyPattern)));
    }
}
