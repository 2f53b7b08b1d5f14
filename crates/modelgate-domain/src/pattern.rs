//! Wildcard pattern matching with a per-engine memo of compiled matchers.
//!
//! `*` matches any substring (including the empty one and `/`). Everything else is literal.
//! Matching is anchored at both ends and case-insensitive.

use globset::{GlobBuilder, GlobMatcher};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

pub const WILDCARD: char = '*';

#[derive(Debug)]
enum Matcher {
    Exact(String),
    Glob(GlobMatcher),
}

#[derive(Debug)]
pub struct Pattern {
    text: String,
    matcher: Matcher,
}

impl Pattern {
    pub fn compile(text: &str) -> Self {
        let exact = Matcher::Exact(text.to_lowercase());
        if !text.contains(WILDCARD) {
            return Self {
                text: text.to_string(),
                matcher: exact,
            };
        }

        // Escape every literal run so glob metacharacters (`?`, `[`, `{`) stay literal, and
        // collapse runs of `*` since globset reserves `**` for path components. Both sides are
        // lowercased up front: globset folds ASCII case only.
        let glob = text
            .to_lowercase()
            .split(WILDCARD)
            .map(globset::escape)
            .collect::<Vec<_>>()
            .join("*");
        let glob = collapse_wildcards(&glob);

        let matcher = GlobBuilder::new(&glob)
            .case_insensitive(true)
            .literal_separator(false)
            .backslash_escape(false)
            .build()
            .map(|g| Matcher::Glob(g.compile_matcher()))
            .unwrap_or(exact);

        Self {
            text: text.to_string(),
            matcher,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_match(&self, value: &str) -> bool {
        match &self.matcher {
            Matcher::Exact(lower) => value.to_lowercase() == *lower,
            Matcher::Glob(glob) => glob.is_match(value.to_lowercase()),
        }
    }
}

fn collapse_wildcards(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len());
    for c in glob.chars() {
        if c == WILDCARD && out.ends_with(WILDCARD) {
            continue;
        }
        out.push(c);
    }
    out
}

/// Pattern text → compiled matcher. Owned by one engine; safe to share across threads.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: RwLock<HashMap<String, Arc<Pattern>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, text: &str) -> Arc<Pattern> {
        if let Some(pattern) = self
            .compiled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(text)
        {
            return Arc::clone(pattern);
        }

        let mut compiled = self
            .compiled
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            compiled
                .entry(text.to_string())
                .or_insert_with(|| Arc::new(Pattern::compile(text))),
        )
    }

    pub fn matches(&self, pattern: &str, value: &str) -> bool {
        self.get(pattern).is_match(value)
    }

    /// First `(pattern, value)` pair that matches, scanning patterns in order.
    pub fn first_match<'p, 'v>(
        &self,
        patterns: &'p [String],
        values: &'v [String],
    ) -> Option<(&'p str, &'v str)> {
        patterns.iter().find_map(|pattern| {
            let compiled = self.get(pattern);
            values
                .iter()
                .find(|v| compiled.is_match(v))
                .map(|v| (pattern.as_str(), v.as_str()))
        })
    }

    /// Number of distinct patterns compiled so far.
    pub fn len(&self) -> usize {
        self.compiled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
