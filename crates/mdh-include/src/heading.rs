//! ATX heading recognition and GitHub-style anchors.

use std::sync::LazyLock;

use regex::Regex;

/// Characters dropped from a title before hyphenation.
static REMOVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[#()\[\]{}.?+*`"']+"#).unwrap());

/// Runs of non-word characters (ASCII word set) collapsed to one hyphen.
static HYPHEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_]+").unwrap());

/// Deepest heading level markdown allows.
const MAX_LEVEL: usize = 6;

/// A markdown heading line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level (1-6).
    pub level: u8,
    /// Title text after the hash marks.
    pub title: String,
}

impl Heading {
    /// Parse a line as an ATX heading.
    ///
    /// Returns `None` for lines indented four or more spaces (code block),
    /// lines whose hash marks are not followed by a space, and levels
    /// above six. A trailing line terminator is ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use mdh_include::Heading;
    ///
    /// let heading = Heading::parse("  ## Getting Started\n").unwrap();
    /// assert_eq!(heading.level, 2);
    /// assert_eq!(heading.title, "Getting Started");
    ///
    /// assert!(Heading::parse("    # Indented").is_none());
    /// assert!(Heading::parse("####### Too deep").is_none());
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.starts_with("    ") {
            return None;
        }
        let stripped = line.trim_start_matches(' ');
        let (hashes, title) = stripped.split_once(' ')?;
        if hashes.is_empty() || !hashes.chars().all(|c| c == '#') || hashes.len() > MAX_LEVEL {
            return None;
        }
        Some(Self {
            level: u8::try_from(hashes.len()).ok()?,
            title: title.trim_start().to_owned(),
        })
    }

    /// Fragment anchor for this heading.
    #[must_use]
    pub fn anchor(&self) -> String {
        slugify(&self.title)
    }

    /// Markdown link to this heading: `[Title](#title)`.
    #[must_use]
    pub fn link(&self) -> String {
        format!("[{}](#{})", self.title, self.anchor())
    }
}

/// Convert a heading title to a GitHub-style anchor.
///
/// Strips `#()[]{}.?+*` and quote characters, replaces each run of
/// remaining non-word characters with a single hyphen, and lowercases.
///
/// # Example
///
/// ```
/// use mdh_include::slugify;
///
/// assert_eq!(slugify("What's New (v2.0)?"), "whats-new-v20");
/// ```
#[must_use]
pub fn slugify(title: &str) -> String {
    let removed = REMOVE_PATTERN.replace_all(title, "");
    HYPHEN_PATTERN
        .replace_all(&removed, "-")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        for level in 1..=6u8 {
            let line = format!("{} Title", "#".repeat(level.into()));
            let heading = Heading::parse(&line).unwrap();
            assert_eq!(heading.level, level);
            assert_eq!(heading.title, "Title");
        }
    }

    #[test]
    fn test_parse_rejects_level_seven() {
        assert!(Heading::parse("####### Title").is_none());
    }

    #[test]
    fn test_parse_allows_three_leading_spaces() {
        let heading = Heading::parse("   # Title").unwrap();
        assert_eq!(heading.level, 1);
    }

    #[test]
    fn test_parse_rejects_four_leading_spaces() {
        assert!(Heading::parse("    # Title").is_none());
    }

    #[test]
    fn test_parse_requires_space_after_hashes() {
        assert!(Heading::parse("#Title").is_none());
        assert!(Heading::parse("##x y").is_none());
        assert!(Heading::parse("plain text").is_none());
    }

    #[test]
    fn test_parse_strips_line_terminator() {
        let heading = Heading::parse("## Title\r\n").unwrap();
        assert_eq!(heading.title, "Title");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Use `include` (recursively)"), "use-include-recursively");
        assert_eq!(slugify("Q&A: Part 1"), "q-a-part-1");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        let once = slugify("Foo. Bar? [Baz]");
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn test_slugify_drops_stripped_punctuation() {
        let slug = slugify(r#"a#b(c)d[e]f{g}h.i?j+k*l`m"n'o"#);
        assert!(!slug.contains(|c| "#()[]{}.?+*`\"'".contains(c)));
        assert_eq!(slug, "abcdefghijklmno");
    }

    #[test]
    fn test_link() {
        let heading = Heading::parse("## Getting Started").unwrap();
        assert_eq!(heading.link(), "[Getting Started](#getting-started)");
    }
}
