//! Glob matching over forward-slash delimited strings.
//!
//! `*` and `?` never cross a `/`, `**` as a whole segment spans any number
//! of segments, and `[...]` classes work as in shell globbing but never
//! match `/`. Matching is case-sensitive and anchored at both ends.
//!
//! An invalid pattern never matches. It does not stop the other patterns in
//! a set from being tried.

use globset::{Glob, GlobBuilder, GlobMatcher};

const SEPARATOR: char = '/';

fn compile(pattern: &str) -> Option<GlobMatcher> {
    let Some(pattern) = confine_classes(pattern) else {
        tracing::trace!(pattern, "character class can only match a separator");
        return None;
    };
    let built: Result<Glob, _> = GlobBuilder::new(&pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .build();
    match built {
        Ok(glob) => Some(glob.compile_matcher()),
        Err(err) => {
            tracing::trace!(pattern = %pattern, error = %err, "ignoring invalid glob pattern");
            None
        }
    }
}

/// Rewrite every `[...]` class so it cannot consume a `/`. Returns `None`
/// when a class would be left with nothing to match.
///
/// Unclosed classes are copied through untouched for the glob parser to
/// reject.
fn confine_classes(pattern: &str) -> Option<String> {
    if !pattern.contains('[') {
        return Some(pattern.to_string());
    }

    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 2);
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                out.extend(chars.get(i..i + 2).unwrap_or(&chars[i..]));
                i += 2;
            }
            '[' => match CharClass::parse(&chars[i..]) {
                Some((class, len)) => {
                    out.push_str(&class.confined()?);
                    i += len;
                }
                None => {
                    out.extend(&chars[i..]);
                    break;
                }
            },
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    Some(out)
}

/// A parsed bracket expression.
struct CharClass {
    negated: bool,
    ranges: Vec<(char, char)>,
    source: String,
}

impl CharClass {
    /// Parse a class starting at `chars[0] == '['`, returning it with the
    /// number of chars consumed.
    fn parse(chars: &[char]) -> Option<(Self, usize)> {
        let mut i = 1;
        let negated = matches!(chars.get(i), Some('!' | '^'));
        if negated {
            i += 1;
        }

        let mut ranges = Vec::new();
        let mut first = true;
        loop {
            let c = *chars.get(i)?;
            if c == ']' && !first {
                break;
            }
            first = false;
            match (chars.get(i + 1), chars.get(i + 2)) {
                (Some('-'), Some(&end)) if end != ']' => {
                    ranges.push((c, end));
                    i += 3;
                }
                _ => {
                    ranges.push((c, c));
                    i += 1;
                }
            }
        }

        let len = i + 1;
        let source = chars[..len].iter().collect();
        Some((
            Self {
                negated,
                ranges,
                source,
            },
            len,
        ))
    }

    fn confined(&self) -> Option<String> {
        let awkward = |c: char| matches!(c, ']' | '-' | '!' | '^');
        if self
            .ranges
            .iter()
            .any(|&(lo, hi)| lo > hi || (lo != hi && (awkward(lo) || awkward(hi))))
        {
            return Some(self.source.clone());
        }

        if self.negated {
            let mut ranges = self.ranges.clone();
            ranges.push((SEPARATOR, SEPARATOR));
            return render(&ranges, true).or_else(|| Some(self.source.clone()));
        }

        let mut ranges = Vec::with_capacity(self.ranges.len() + 1);
        for &(lo, hi) in &self.ranges {
            if !(lo..=hi).contains(&SEPARATOR) {
                ranges.push((lo, hi));
                continue;
            }
            if lo < SEPARATOR {
                ranges.push((lo, '.'));
            }
            if hi > SEPARATOR {
                ranges.push(('0', hi));
            }
        }
        match ranges.as_slice() {
            [] => None,
            [(lo, hi)] if lo == hi => Some(format!("\\{}", lo)),
            _ => render(&ranges, false).or_else(|| Some(self.source.clone())),
        }
    }
}

/// Emit a bracket expression with `]` first and `-` last so both stay
/// literal. Gives up when a `!` or `^` would have to open a positive class.
fn render(ranges: &[(char, char)], negated: bool) -> Option<String> {
    let mut front = Vec::new();
    let mut middle = Vec::new();
    let mut back = Vec::new();
    for &(lo, hi) in ranges {
        match (lo, hi) {
            (']', ']') => front.push((lo, hi)),
            ('-', '-') => back.push((lo, hi)),
            _ => middle.push((lo, hi)),
        }
    }
    if !negated && front.is_empty() {
        if let Some(pos) = middle.iter().position(|&(lo, _)| !matches!(lo, '!' | '^')) {
            middle.swap(0, pos);
        } else {
            return None;
        }
    }

    let mut out = String::from(if negated { "[!" } else { "[" });
    for (lo, hi) in front.into_iter().chain(middle).chain(back) {
        out.push(lo);
        if lo != hi {
            out.push('-');
            out.push(hi);
        }
    }
    out.push(']');
    Some(out)
}

/// Match a single pattern against a candidate.
pub fn matches_pattern(pattern: &str, candidate: &str) -> bool {
    compile(pattern).is_some_and(|m| m.is_match(candidate))
}

/// True if any pattern matches. An empty list matches nothing; callers
/// decide what "no patterns" means at their site.
pub fn matches_any<S: AsRef<str>>(patterns: &[S], candidate: &str) -> bool {
    patterns
        .iter()
        .any(|p| matches_pattern(p.as_ref(), candidate))
}

/// A list of patterns compiled once and matched many times.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    matchers: Vec<GlobMatcher>,
    declared: usize,
}

impl PatternSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let matchers = patterns
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| !p.is_empty())
            .filter_map(compile)
            .collect();
        Self {
            matchers,
            declared: patterns.len(),
        }
    }

    /// Whether the source list was empty. A list of only invalid patterns
    /// is not empty; it simply never matches.
    pub fn is_empty(&self) -> bool {
        self.declared == 0
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches_pattern("main", "main"));
        assert!(!matches_pattern("main", "develop"));
        assert!(!matches_pattern("main", "Main"));
    }

    #[test]
    fn test_match_is_anchored() {
        assert!(!matches_pattern("main", "not-main"));
        assert!(!matches_pattern("src/*.rs", "src/lib.rs.bak"));
    }

    #[test]
    fn test_single_star_stops_at_separator() {
        assert!(matches_pattern("feature/*", "feature/foo"));
        assert!(!matches_pattern("feature/*", "feature/foo/bar"));
        assert!(matches_pattern("v*", "v1.2.3"));
    }

    #[test]
    fn test_double_star_spans_segments() {
        assert!(matches_pattern("src/**", "src/a/b/c"));
        assert!(matches_pattern("release/**", "release/v1/hotfix"));
        assert!(matches_pattern("**/*.md", "docs/guide/intro.md"));
        assert!(matches_pattern("**/*.md", "README.md"));
        assert!(!matches_pattern("release/**", "main"));
    }

    #[test]
    fn test_question_mark_and_classes() {
        assert!(matches_pattern("v?", "v1"));
        assert!(!matches_pattern("v?", "v10"));
        assert!(!matches_pattern("a?b", "a/b"));
        assert!(matches_pattern("v[0-9].*", "v2.0"));
        assert!(!matches_pattern("v[0-9].*", "vx.0"));
        assert!(matches_pattern("[!d]*", "src"));
    }

    #[test]
    fn test_classes_never_match_separator() {
        assert!(!matches_pattern("a[/]b", "a/b"));
        assert!(!matches_pattern("[!a]", "/"));
        assert!(matches_pattern("[!a]", "b"));
        assert!(!matches_pattern("src[!x]lib.rs", "src/lib.rs"));
        assert!(!matches_pattern("**/a[/]b", "x/a/b"));

        // Ranges spanning `/` keep their other members.
        assert!(!matches_pattern("[+-0]", "/"));
        assert!(matches_pattern("[+-0]", "+"));
        assert!(matches_pattern("[+-0]", "."));
        assert!(matches_pattern("[+-0]", "0"));

        assert!(matches_pattern("[/x]y", "xy"));
        assert!(matches_pattern("[]a]", "]"));
        assert!(matches_pattern("[/!]", "!"));
        assert!(matches_pattern("v[0-9]*/[a-z]*", "v1/beta"));
    }

    #[test]
    fn test_invalid_pattern_never_matches() {
        assert!(!matches_pattern("[", "["));
        assert!(!matches_pattern("src/[a-", "src/a"));
        assert!(matches_any(&["[", "main"], "main"));
    }

    #[test]
    fn test_matches_any_empty_is_false() {
        let empty: [&str; 0] = [];
        assert!(!matches_any(&empty, "main"));
    }

    #[test]
    fn test_pattern_set() {
        let set = PatternSet::new(&["docs/**", "[", "*.md"]);
        assert!(!set.is_empty());
        assert!(set.is_match("docs/readme.md"));
        assert!(set.is_match("CHANGELOG.md"));
        assert!(!set.is_match("src/main.rs"));

        let invalid_only = PatternSet::new(&["["]);
        assert!(!invalid_only.is_empty());
        assert!(!invalid_only.is_match("["));

        let none: PatternSet = PatternSet::new::<&str>(&[]);
        assert!(none.is_empty());
        assert!(!none.is_match("anything"));
    }
}
