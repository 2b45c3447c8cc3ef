//! Composed poems and their plain-text rendering.

use crate::analysis::Line;
use std::fmt;

/// An ordered set of lines with a title and author.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poem {
    pub title: String,
    pub author: String,
    lines: Vec<Line>,
}

impl Poem {
    pub fn new(lines: Vec<Line>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            lines,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Last word of every line, in order.
    pub fn final_words(&self) -> Vec<&str> {
        self.lines.iter().filter_map(Line::last_word).collect()
    }

    /// Whether no two lines end in the same word.
    pub fn has_distinct_final_words(&self) -> bool {
        let words = self.final_words();
        let mut seen = std::collections::HashSet::with_capacity(words.len());
        words.len() == self.lines.len() && words.into_iter().all(|word| seen.insert(word))
    }
}

impl fmt::Display for Poem {
    /// ```text
    /// Title
    /// _____
    ///
    /// first line
    /// second line
    /// _____
    ///
    /// -- Author
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let underline = "_".repeat(self.title.chars().count());

        writeln!(f, "{}", self.title)?;
        writeln!(f, "{underline}")?;
        writeln!(f)?;
        for line in &self.lines {
            writeln!(f, "{}", line.content())?;
        }
        writeln!(f, "{underline}")?;
        writeln!(f)?;
        write!(f, "-- {}", self.author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::test_support::test_dictionary;

    fn poem(texts: &[&str]) -> Poem {
        let dictionary = test_dictionary();
        let lines = texts
            .iter()
            .map(|text| analyze(text, dictionary.as_ref()))
            .collect();
        Poem::new(lines, "Town", "Chris")
    }

    #[test]
    fn test_display() {
        let poem = poem(&["a cat sat down", "a hat to brown"]);
        assert_eq!(
            poem.to_string(),
            "Town\n____\n\na cat sat down\na hat to brown\n____\n\n-- Chris"
        );
    }

    #[test]
    fn test_final_words() {
        let poem = poem(&["a cat sat down", "the wind blew fast", "down"]);
        assert_eq!(poem.final_words(), ["down", "fast", "down"]);
        assert!(!poem.has_distinct_final_words());
    }

    #[test]
    fn test_distinct_final_words() {
        let poem = poem(&["a cat sat down", "a hat to brown", "the cat to town"]);
        assert!(poem.has_distinct_final_words());
    }
}
