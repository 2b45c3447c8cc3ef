//! Reading text fragments out of caption files.
//!
//! Fragments are blocks separated by blank lines. SubRip (`.srt`) cue numbers and
//! `00:00:01,000 --> 00:00:02,500` timing lines are dropped, as are inline tags such as
//! `<i>`, so a subtitle file and a plain text file with one fragment per paragraph
//! both work.

use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

/// Reads every fragment in `path`. Files that are not UTF-8 are decoded as Latin-1,
/// which is what most older subtitle files use.
pub fn read_fragments(path: &Path) -> io::Result<Vec<String>> {
    let bytes = fs::read(path)?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| char::from(b)).collect(),
    };
    Ok(parse_fragments(&text))
}

pub fn parse_fragments(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim().trim_start_matches('\u{feff}');
        if line.is_empty() {
            flush(&mut current, &mut fragments);
            continue;
        }
        if is_cue_number(line) || line.contains("-->") {
            continue;
        }
        let stripped = strip_tags(line);
        let stripped = stripped.trim();
        if !stripped.is_empty() {
            current.push(stripped.to_string());
        }
    }
    flush(&mut current, &mut fragments);

    fragments
}

fn flush(current: &mut Vec<String>, fragments: &mut Vec<String>) {
    if !current.is_empty() {
        fragments.push(current.join("\n"));
        current.clear();
    }
}

fn is_cue_number(line: &str) -> bool {
    line.bytes().all(|b| b.is_ascii_digit())
}

/// Removes closed `<i>`, `</font>` and `{\an8}` style spans. A lone `<` or `{` is text.
fn strip_tags(line: &str) -> std::borrow::Cow<'_, str> {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| {
        Regex::new(r"<[^<>\s][^<>]*>|\{[^{}]*\}").expect("valid caption tag regex")
    });
    tag.replace_all(line, "")
}
