//! Thread-local compilation cache for attribute regex patterns.
//!
//! Selector files tend to repeat the same `/pattern/` across many attribute
//! tests, and the CLI reloads selectors once per input. Compiled regexes are
//! cached per thread, keyed by flags and source.
//! Cache is capped at 256 entries; it is cleared wholesale when full.

use regex::{Regex, RegexBuilder};
use std::cell::RefCell;
use std::collections::HashMap;

const MAX_CACHE_ENTRIES: usize = 256;

thread_local! {
    // Key is "<flags>/<source>" so `/a/i` and `/a/` never collide.
    static REGEX_CACHE: RefCell<HashMap<String, Regex>> =
        RefCell::new(HashMap::new());
}

/// Get a compiled regex from cache, or compile and cache it.
///
/// Recognised flags: `i` (case-insensitive), `m` (multi-line), `s` (dot
/// matches newline). `g`, `u` and `y` have no effect on a boolean test and
/// are accepted and ignored. Any other flag is an error.
pub fn get_or_compile_regex(source: &str, flags: &str) -> Result<Regex, String> {
    let cache_key = format!("{flags}/{source}");

    REGEX_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();

        if let Some(re) = cache.get(&cache_key) {
            return Ok(re.clone());
        }

        if cache.len() >= MAX_CACHE_ENTRIES {
            cache.clear();
        }

        let mut builder = RegexBuilder::new(source);
        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'g' | 'u' | 'y' => {}
                other => return Err(format!("unsupported flag '{other}'")),
            }
        }
        let compiled = builder.build().map_err(|e| e.to_string())?;
        cache.insert(cache_key, compiled.clone());
        Ok(compiled)
    })
}

/// Clear the regex cache (mainly for testing).
pub fn clear_cache() {
    REGEX_CACHE.with(|cache| {
        cache.borrow_mut().clear();
    });
}

/// Number of cached patterns on this thread.
pub fn cache_size() -> usize {
    REGEX_CACHE.with(|cache| cache.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_once_per_key() {
        clear_cache();
        let a = get_or_compile_regex("^foo", "").unwrap();
        let _ = get_or_compile_regex("^foo", "").unwrap();
        assert_eq!(cache_size(), 1);
        assert!(a.is_match("foobar"));

        let _ = get_or_compile_regex("^foo", "i").unwrap();
        assert_eq!(cache_size(), 2);
    }

    #[test]
    fn case_insensitive_flag() {
        let re = get_or_compile_regex("^foo$", "i").unwrap();
        assert!(re.is_match("FOO"));
    }

    #[test]
    fn rejects_unknown_flags_and_bad_patterns() {
        assert!(get_or_compile_regex("a", "x").is_err());
        assert!(get_or_compile_regex("(", "").is_err());
    }
}
