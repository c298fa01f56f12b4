//! Ignore-pattern matching (§6): `.kilnignore` is a line-oriented file
//! supporting `#` comments, `dir/` directory-prefix matches, exact path
//! matches, `*` wildcard segments, and bare prefixes matched as
//! directories. Built-in prefixes are always ignored regardless of the
//! ignore file's contents.
//!
//! Per the open design question on glob semantics (§9 #3), this keeps the
//! source behavior: `*` is rewritten to a naive `.*` regex segment rather
//! than implementing true glob semantics (`**`, character classes). See
//! DESIGN.md for the recorded decision.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::utils::path::META_DIR;

const BUILTIN_IGNORED_PREFIXES: &[&str] = &[META_DIR, "target", ".idea", ".mvn"];

pub struct IgnoreSet {
    patterns: Vec<Pattern>,
}

struct Pattern {
    regex: Regex,
}

impl IgnoreSet {
    /// Loads `.kilnignore` from the working tree root, if present.
    pub fn load(workdir: &Path) -> IgnoreSet {
        let mut patterns = Vec::new();
        if let Ok(text) = fs::read_to_string(crate::utils::path::ignore_file(workdir)) {
            for line in text.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some(p) = compile_pattern(line) {
                    patterns.push(p);
                }
            }
        }
        IgnoreSet { patterns }
    }

    /// Returns `true` if `rel` (a repo-relative, forward-slash path) is
    /// ignored by a built-in prefix or a loaded `.kilnignore` pattern.
    pub fn is_ignored(&self, rel: &str) -> bool {
        if BUILTIN_IGNORED_PREFIXES
            .iter()
            .any(|p| rel == *p || rel.starts_with(&format!("{p}/")))
        {
            return true;
        }
        self.patterns.iter().any(|p| p.matches(rel))
    }
}

impl Pattern {
    fn matches(&self, rel: &str) -> bool {
        self.regex.is_match(rel)
    }
}

/// Rewrites a `.kilnignore` line into an anchored regex. `*` becomes `.*`;
/// all other regex metacharacters are escaped literally.
fn wildcard_to_regex(glob: &str) -> String {
    let mut out = String::from("^");
    for ch in glob.chars() {
        if ch == '*' {
            out.push_str(".*");
        } else {
            out.push_str(&regex::escape(&ch.to_string()));
        }
    }
    out.push('$');
    out
}

fn compile_pattern(line: &str) -> Option<Pattern> {
    if let Some(dir) = line.strip_suffix('/') {
        let inner = wildcard_to_regex(dir);
        // Matches the directory itself or anything nested under it.
        let nested = format!("^{}/.*$", &inner[1..inner.len() - 1]);
        let combined = format!("{}|{}", inner, nested);
        return Regex::new(&combined).ok().map(|regex| Pattern { regex });
    }
    if !line.contains('/') {
        // Bare prefix: matches an exact path component, or the same name
        // used as a directory anywhere in the tree.
        let exact = wildcard_to_regex(line);
        let as_dir = format!("^(.*/)?{}(/.*)?$", regex::escape(line).replace("\\*", ".*"));
        let combined = format!("{}|{}", exact, as_dir);
        return Regex::new(&combined).ok().map(|regex| Pattern { regex });
    }
    Regex::new(&wildcard_to_regex(line))
        .ok()
        .map(|regex| Pattern { regex })
}
