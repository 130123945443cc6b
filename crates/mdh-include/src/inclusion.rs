//! Include directive syntax and inclusion records.
//!
//! A directive occupies a whole line: `@[treatment](path)`.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static DIRECTIVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@\[([^\[]+)\]\((.*?)\)$").unwrap());

/// A directive line split into its treatment token and argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Treatment token between the brackets (e.g. `:markdown`, `ruby`).
    pub token: &'a str,
    /// Argument between the parentheses: a path, TOC title or pattern.
    pub argument: &'a str,
    /// The directive text without its line terminator.
    pub text: &'a str,
}

impl<'a> Directive<'a> {
    /// Parse a line as a directive.
    ///
    /// The whole line (ignoring its terminator) must match; text before or
    /// after the directive disqualifies it.
    ///
    /// # Example
    ///
    /// ```
    /// use mdh_include::Directive;
    ///
    /// let directive = Directive::parse("@[:markdown](parts/intro.md)\n").unwrap();
    /// assert_eq!(directive.token, ":markdown");
    /// assert_eq!(directive.argument, "parts/intro.md");
    ///
    /// assert!(Directive::parse("See @[:markdown](parts/intro.md)").is_none());
    /// ```
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let text = strip_line_ending(line);
        let caps = DIRECTIVE_PATTERN.captures(text)?;
        Some(Self {
            token: caps.get(1)?.as_str(),
            argument: caps.get(2)?.as_str(),
            text,
        })
    }
}

/// How an included file is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Treatment {
    /// Inline markdown, expanded recursively. `deprecated_alias` is set for `:verbatim`.
    Markdown { deprecated_alias: bool },
    /// Whole file wrapped in one HTML comment.
    Comment,
    /// Whole file wrapped in `<pre>`.
    Pre,
    /// Fenced code block without a language.
    CodeBlock,
    /// Fenced code block labeled with the token as its language.
    Language(String),
    /// Page table of contents placeholder.
    PageToc,
    /// Page navigation link pattern.
    PageNav,
}

impl Treatment {
    /// Classify a directive token. Unrecognized tokens become [`Treatment::Language`].
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            ":markdown" => Self::Markdown {
                deprecated_alias: false,
            },
            ":verbatim" => Self::Markdown {
                deprecated_alias: true,
            },
            ":comment" => Self::Comment,
            ":pre" => Self::Pre,
            ":code_block" => Self::CodeBlock,
            ":page_toc" => Self::PageToc,
            ":page_nav" => Self::PageNav,
            other => Self::Language(other.to_owned()),
        }
    }

    /// Name used in the generated BEGIN/END comments.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Markdown { .. } => "markdown",
            Self::Comment => "comment",
            Self::Pre => "pre",
            Self::CodeBlock => "code_block",
            Self::Language(language) => language,
            Self::PageToc => "page_toc",
            Self::PageNav => "page_nav",
        }
    }

    /// Whether this treatment expands its target recursively.
    #[must_use]
    pub fn is_markdown(&self) -> bool {
        matches!(self, Self::Markdown { .. })
    }
}

/// One directive occurrence and its resolved target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionRecord {
    includer: PathBuf,
    line_number: usize,
    description: String,
    cited: String,
    includee: PathBuf,
    treatment: Treatment,
}

impl InclusionRecord {
    /// Create a record for `directive`, found at 1-based `line_number` of `includer`.
    ///
    /// The cited path is resolved against the includer's directory and made
    /// absolute without touching the file system.
    #[must_use]
    pub fn new(includer: &Path, line_number: usize, directive: &Directive<'_>) -> Self {
        let base = includer.parent().unwrap_or(Path::new(""));
        Self {
            includer: includer.to_path_buf(),
            line_number,
            description: directive.text.to_owned(),
            cited: directive.argument.to_owned(),
            includee: absolute_path(&base.join(directive.argument)),
            treatment: Treatment::from_token(directive.token),
        }
    }

    /// File containing the directive.
    #[must_use]
    pub fn includer(&self) -> &Path {
        &self.includer
    }

    /// 1-based line number of the directive in the includer.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Raw directive text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Target path as written in the directive.
    #[must_use]
    pub fn cited(&self) -> &str {
        &self.cited
    }

    /// Absolute target path.
    #[must_use]
    pub fn includee(&self) -> &Path {
        &self.includee
    }

    /// Rendering treatment.
    #[must_use]
    pub fn treatment(&self) -> &Treatment {
        &self.treatment
    }

    /// Title line of a `:page_toc` directive.
    #[must_use]
    pub fn page_toc_title(&self) -> Option<&str> {
        (self.treatment == Treatment::PageToc).then_some(self.cited.as_str())
    }

    /// Target path with symlinks resolved, or `None` if it does not exist.
    #[must_use]
    pub fn canonical_includee(&self) -> Option<PathBuf> {
        self.includee.canonicalize().ok()
    }
}

/// Strip a trailing `\n` or `\r\n`.
pub(crate) fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Make `path` absolute against the working directory and fold `.`/`..` lexically.
pub(crate) fn absolute_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
