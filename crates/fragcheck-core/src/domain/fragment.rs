//! Generator configuration fragments.
//!
//! A fragment is the python configuration snippet attached to a request. All
//! checks work on its text with comment lines removed, counting matching lines
//! the way `grep -c` would.

use std::sync::LazyLock;

use regex::Regex;

static COMMENT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^ *#.*\n?").expect("comment regex is valid"));

static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("integer regex is valid"));

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"'([^']*)'|"([^"]*)""#).expect("quote regex is valid"));

/// A downloaded fragment with comment lines stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    text: String,
    raw_len: usize,
}

impl Fragment {
    pub fn parse(raw: &str) -> Self {
        Self {
            text: COMMENT_LINE.replace_all(raw, "").into_owned(),
            raw_len: raw.len(),
        }
    }

    /// Whether the service returned no fragment at all.
    pub const fn is_empty(&self) -> bool {
        self.raw_len == 0
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines_containing<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.text.lines().filter(move |line| line.contains(needle))
    }

    /// Number of lines containing `needle`.
    pub fn count_lines(&self, needle: &str) -> usize {
        self.lines_containing(needle).count()
    }

    /// Number of lines containing `needle`, ignoring ASCII case.
    pub fn count_lines_ci(&self, needle: &str) -> usize {
        let needle = needle.to_ascii_lowercase();
        self.text
            .lines()
            .filter(|line| line.to_ascii_lowercase().contains(&needle))
            .count()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    /// First integer on the first line mentioning `key`.
    pub fn integer_after(&self, key: &str) -> Option<u32> {
        let line = self.lines_containing(key).next()?;
        FIRST_INTEGER
            .find(line)
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Gridpack path referenced by the external LHE producer.
    ///
    /// Takes the first quoted string on the first `/cvmfs` line that is not an
    /// `#args` line.
    pub fn gridpack_path(&self) -> Option<String> {
        let line = self
            .text
            .lines()
            .find(|line| line.contains("/cvmfs") && !line.contains("#args"))?;
        QUOTED.captures(line).and_then(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string())
        })
    }

    /// Whether the fragment runs over a parameter scan (SLHA or printf-style gridpack names).
    pub fn is_parameter_scan(&self) -> bool {
        self.contains("slha") || self.contains("%i") || self.contains("%s")
    }
}
