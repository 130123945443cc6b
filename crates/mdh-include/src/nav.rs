//! Prev/next navigation tables for a sequence of pages.
//!
//! A `:page_nav` directive supplies a pattern. Lines after it that match the
//! pattern and end in a markdown link name the pages, in order. Each page file
//! gets a table linking to its neighbours inserted at the top and bottom.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::error::IncludeError;
use crate::heading::Heading;
use crate::inclusion::strip_line_ending;

static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[]+)\]\(([^)]+)\)$").unwrap());

/// Extensions of files whose first heading is used as the page title.
/// A table as written by [`nav_table`].
const NAV_TABLE: &str = r#"<table>\n(?:  <tr>\n    <th>(?:Prev|Next)</th>\n    <td><a href="[^"\n]*">[^\n]*</a></td>\n  </tr>\n){1,2}</table>\n"#;

static LEADING_NAV_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\A{NAV_TABLE}\n?")).unwrap());

static TRAILING_NAV_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\n{NAV_TABLE}\z")).unwrap());

const DOCUMENT_EXTENSIONS: &[&str] = &["md", "markdown"];

/// A neighbouring page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sibling {
    /// Link path as written in the navigation line.
    pub path: String,
    /// Title of the neighbour, if it has one.
    pub title: Option<String>,
}

/// One page in the navigation sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Link path as written in the navigation line.
    pub path: String,
    /// First heading of the page, for markdown pages.
    pub title: Option<String>,
    /// Previous page, absent for the first page.
    pub prev: Option<Sibling>,
    /// Next page, absent for the last page.
    pub next: Option<Sibling>,
}

/// Generates navigation tables for the pages linked from a document.
pub struct PageNavGenerator {
    pattern: Regex,
    base_dir: PathBuf,
}

impl PageNavGenerator {
    /// Create a generator for `pattern`. Link paths resolve against `base_dir`.
    pub fn new(pattern: &str, base_dir: impl Into<PathBuf>) -> Result<Self, IncludeError> {
        let pattern = Regex::new(pattern).map_err(|source| IncludeError::InvalidNavPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Self {
            pattern,
            base_dir: base_dir.into(),
        })
    }

    /// Collect pages from `lines` in order, reading each markdown page's title.
    pub fn collect_pages<'a, I>(&self, lines: I) -> Result<Vec<PageInfo>, IncludeError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut pages: Vec<PageInfo> = Vec::new();
        for line in lines {
            let line = strip_line_ending(line);
            if !self.pattern.is_match(line) {
                continue;
            }
            let Some(caps) = LINK_PATTERN.captures(line) else {
                continue;
            };
            let path = link_path(&caps[2]);
            let title = if is_document(&path) {
                self.read_title(&path)?
            } else {
                None
            };
            pages.push(PageInfo {
                path,
                title,
                prev: None,
                next: None,
            });
        }

        let siblings: Vec<Sibling> = pages
            .iter()
            .map(|page| Sibling {
                path: page.path.clone(),
                title: page.title.clone(),
            })
            .collect();
        for (i, page) in pages.iter_mut().enumerate() {
            page.prev = i.checked_sub(1).map(|j| siblings[j].clone());
            page.next = siblings.get(i + 1).cloned();
        }
        Ok(pages)
    }

    /// Collect pages from `lines` and rewrite each page file with its table.
    ///
    /// A page without neighbours is left untouched. Tables written by an
    /// earlier run are replaced rather than duplicated.
    pub fn generate<'a, I>(&self, lines: I) -> Result<Vec<PageInfo>, IncludeError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let pages = self.collect_pages(lines)?;
        for page in &pages {
            if page.prev.is_none() && page.next.is_none() {
                continue;
            }
            let path = self.base_dir.join(&page.path);
            let content = read_page(&path)?;
            let table = nav_table(page);
            let body = strip_nav_tables(&content);
            std::fs::write(&path, format!("{table}\n{body}\n{table}"))
                .map_err(|source| IncludeError::UnwritableOutput {
                    path: path.clone(),
                    source,
                })?;
            tracing::info!(page = %path.display(), "Wrote navigation table");
        }
        Ok(pages)
    }

    fn read_title(&self, path: &str) -> Result<Option<String>, IncludeError> {
        let content = read_page(&self.base_dir.join(path))?;
        Ok(content
            .lines()
            .find_map(Heading::parse)
            .map(|heading| heading.title))
    }
}

fn read_page(path: &Path) -> Result<String, IncludeError> {
    std::fs::read_to_string(path).map_err(|source| IncludeError::UnreadableInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Path part of a link target: query and fragment dropped, percent-decoded.
fn link_path(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    percent_decode_str(&url[..end])
        .decode_utf8_lossy()
        .into_owned()
}

fn is_document(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
}

/// Directory part of the longest common prefix of two paths.
fn common_dir<'a>(a: &'a str, b: &str) -> &'a str {
    let prefix_len = a
        .char_indices()
        .zip(b.chars())
        .take_while(|((_, x), y)| x == y)
        .last()
        .map_or(0, |((i, c), _)| i + c.len_utf8());
    let prefix = &a[..prefix_len];
    prefix.rfind('/').map_or("", |i| &prefix[..i])
}

/// Link from page `from` to page `to`: their common directory replaced by `..`.
///
/// # Example
///
/// ```
/// use mdh_include::relative_link;
///
/// assert_eq!(relative_link("pages/one.md", "pages/two.md"), "../two.md");
/// assert_eq!(relative_link("a/x/one.md", "a/y/two.md"), "../y/two.md");
/// ```
#[must_use]
pub fn relative_link(from: &str, to: &str) -> String {
    let common = common_dir(from, to);
    if common.is_empty() {
        format!("../{to}")
    } else {
        format!("..{}", &to[common.len()..])
    }
}

/// HTML table with a Prev row, a Next row, or both.
#[must_use]
pub fn nav_table(page: &PageInfo) -> String {
    let mut table = String::from("<table>\n");
    for (label, sibling) in [("Prev", &page.prev), ("Next", &page.next)] {
        if let Some(sibling) = sibling {
            let _ = write!(
                table,
                "  <tr>\n    <th>{label}</th>\n    <td><a href=\"{}\">{}</a></td>\n  </tr>\n",
                relative_link(&page.path, &sibling.path),
                sibling.title.as_deref().unwrap_or_default()
            );
        }
    }
    table.push_str("</table>\n");
    table
}

/// Remove navigation tables previously inserted at the top and bottom.
///
/// Only tables in exactly the shape [`nav_table`] writes are removed.
fn strip_nav_tables(content: &str) -> &str {
    let start = LEADING_NAV_TABLE.find(content).map_or(0, |m| m.end());
    let body = &content[start..];
    TRAILING_NAV_TABLE
        .find(body)
        .map_or(body, |m| &body[..m.start()])
}
