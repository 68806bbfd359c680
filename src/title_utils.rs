use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;

/// Title utilities for LaTeX sources
///
/// This module finds the `pdftitle` entry of a `\hypersetup` block and
/// turns titles into job names the compiler accepts.

/// Default pattern for the title field; group 1 is the value
pub const DEFAULT_TITLE_PATTERN: &str = r"pdftitle\s*=\s*\{([^}]*)\}";

/// latexmk refuses job names longer than this
pub const MAX_JOB_NAME_LEN: usize = 100;

// @const: Compiled default title regex
static TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_TITLE_PATTERN).unwrap()
});

/// Extract the title from LaTeX source text using the default pattern
pub fn extract_title(text: &str) -> Option<String> {
    capture_title(&TITLE_REGEX, text)
}

fn capture_title(regex: &Regex, text: &str) -> Option<String> {
    let captures = regex.captures(text)?;
    let title = captures.get(1)?.as_str().trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Title extractor with a configurable pattern
#[derive(Debug, Clone)]
pub struct TitleExtractor {
    regex: Regex,
}

impl TitleExtractor {
    /// Compile a pattern; it must contain at least one capture group
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .with_context(|| format!("Invalid title pattern: {}", pattern))?;
        if regex.captures_len() < 2 {
            return Err(anyhow!("Title pattern has no capture group: {}", pattern));
        }
        Ok(Self { regex })
    }

    /// Return the first trimmed, non-empty match in `text`
    pub fn extract(&self, text: &str) -> Option<String> {
        capture_title(&self.regex, text)
    }

    /// Read a source file and extract its title
    pub fn extract_from_file<P: AsRef<Path>>(&self, path: P) -> Result<Option<String>> {
        let text = read_source_text(path)?;
        Ok(self.extract(&text))
    }
}

impl Default for TitleExtractor {
    fn default() -> Self {
        Self { regex: TITLE_REGEX.clone() }
    }
}

/// Read a file as text, replacing invalid UTF-8 sequences instead of failing
pub fn read_source_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Compiler-safe identifier derived from a title
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobName(String);

impl JobName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // @returns: File name of a job output with the given extension
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension.trim_start_matches('.'))
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JobName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_job_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Sanitize a title into a job name
///
/// Each run of characters outside `[A-Za-z0-9._-]` becomes one `_`, and the
/// result is cut to `max_len` characters.
pub fn sanitize_job_name(title: &str, max_len: usize) -> JobName {
    let mut name = String::with_capacity(title.len().min(max_len));
    let mut in_replacement = false;

    for c in title.chars() {
        if is_job_name_char(c) {
            name.push(c);
            in_replacement = false;
        } else if !in_replacement {
            name.push('_');
            in_replacement = true;
        }
    }

    // Only ASCII survives, so byte truncation is safe
    name.truncate(max_len);
    JobName(name)
}

/// Whether a title can be used directly as a file name inside the output directory
pub fn is_publishable_title(title: &str) -> bool {
    !title.is_empty()
        && title != "."
        && title != ".."
        && !title.contains(['/', '\\', '\0'])
}
