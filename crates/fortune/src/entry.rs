//! Splitting a record into its quotation and attribution.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Indentation placed before the attribution dash when rendering.
const ATTRIBUTION_INDENT: &str = "        ";

/// Matches an attribution line: optional indentation, an em dash-like bar
/// (`―`) or `--`, then the author.
pub(crate) fn attribution_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*(?:―|--)[ \t]*(?P<attribution>.*)$")
            .expect("attribution pattern is valid")
    })
}

/// Removes one trailing line ending (`\n` or `\r\n`).
fn chomp(text: &str) -> &str {
    text.strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(text)
}

/// A single fortune: the quotation and, optionally, who said it.
///
/// ```rust
/// use fortune::Fortune;
///
/// let f = Fortune::parse("I hate quotations.\n        ― Ralph Waldo Emerson\n");
/// assert_eq!(f.content, "I hate quotations.");
/// assert_eq!(f.attribution.as_deref(), Some("Ralph Waldo Emerson"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fortune {
    /// Quotation text, attribution line removed, trailing whitespace trimmed.
    pub content: String,
    /// Author, if the record has an attribution line.
    pub attribution: Option<String>,
}

impl Fortune {
    pub fn new(content: impl Into<String>, attribution: Option<String>) -> Self {
        Self {
            content: content.into(),
            attribution,
        }
    }

    /// Parses raw record text.
    ///
    /// The first line that starts (after optional indentation) with `―` or
    /// `--` is taken as the attribution and removed from the content. An
    /// attribution line with nothing after the dash yields no attribution.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = chomp(text);
        let Some(caps) = attribution_re().captures(text) else {
            return Self::new(text.trim_end(), None);
        };

        // Group 0 always exists for a successful match.
        let (start, end) = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));
        let content = format!("{}{}", &text[..start], &text[end..]);
        let attribution = caps
            .name("attribution")
            .map(|m| m.as_str().trim_end().to_string())
            .filter(|a| !a.is_empty());

        Self::new(content.trim_end(), attribution)
    }
}

/// Renders the fortune surrounded by blank lines, with the attribution
/// indented under the quotation. An empty fortune renders as nothing.
impl fmt::Display for Fortune {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.content.is_empty() {
            return Ok(());
        }
        match &self.attribution {
            Some(author) => write!(
                f,
                "\n{}\n{}― {}\n\n",
                self.content, ATTRIBUTION_INDENT, author
            ),
            None => write!(f, "\n{}\n\n", self.content),
        }
    }
}
