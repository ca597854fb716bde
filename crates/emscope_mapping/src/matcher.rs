//! Name-pattern matching over the flat catalog.
//!
//! Patterns are anchored, case-insensitive regexes evaluated in the order
//! supplied. Ordering is a tie-break contract: with `unique` the first
//! pattern that produces any candidates wins outright.

use emscope_protocol::{Target, TargetType};
use regex::{Regex, RegexBuilder};

/// Compile a full-match pattern: case-insensitive and anchored at both ends.
///
/// Invalid patterns compile to `None`; callers build patterns from escaped
/// catalog names, so this only trips on a malformed hand-written template.
pub fn full_match(pattern: &str) -> Option<Regex> {
    let anchored = format!("^(?:{})$", pattern);
    match RegexBuilder::new(&anchored).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::warn!(pattern, %err, "skipping unparseable name pattern");
            None
        }
    }
}

/// Compile a list of full-match patterns, dropping any that fail to parse.
pub fn compile_patterns(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| full_match(pattern))
        .collect()
}

/// Find catalog entries of `type_name` whose name fully matches one of the
/// ordered `patterns`.
///
/// With `unique`, the first pattern with a non-empty candidate set decides
/// the result. Otherwise all candidate sets are concatenated; duplicates
/// across overlapping patterns are tolerated here and collapsed later by the
/// accumulator.
pub fn find_matching<'a>(
    catalog: &'a [Target],
    patterns: &[Regex],
    type_name: &TargetType,
    unique: bool,
) -> Vec<&'a Target> {
    let mut results = Vec::new();
    for regex in patterns {
        let matches: Vec<&Target> = catalog
            .iter()
            .filter(|t| t.type_name == *type_name && regex.is_match(&t.name))
            .collect();
        if !matches.is_empty() {
            results.extend(matches);
            if unique {
                break;
            }
        }
    }
    results
}

/// Exact case-insensitive name+type lookup.
pub fn find_by_name<'a>(
    catalog: &'a [Target],
    name: &str,
    type_name: &TargetType,
) -> Option<&'a Target> {
    catalog
        .iter()
        .find(|t| t.type_name == *type_name && t.name.eq_ignore_ascii_case(name))
}
