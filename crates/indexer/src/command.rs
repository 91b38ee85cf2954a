//! Command-line normalization and memoization
//!
//! Collapses raw compiler invocations that differ only in their per-source
//! tokens (`-c <source>`, `-o <object>`, and the executable path) into one
//! canonical flag string. Normalization tokenizes with shell word-splitting
//! rules, so quoted arguments survive intact.
//!
//! Many records in a compilation database share the same raw command string;
//! the tokenization only runs once per distinct raw string and the result is
//! memoized for the rest of the run.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use ndk_compdb_core::NormalizeOptions;
use shlex::Shlex;
use tracing::warn;

/// Memoizing normalizer for raw compiler command lines.
///
/// The cache is keyed by the raw command string and is unbounded for the
/// lifetime of one indexing run; a fresh interner is created per run.
#[derive(Debug, Default)]
pub struct CommandInterner {
    options: NormalizeOptions,
    cache: HashMap<String, String>,
}

impl CommandInterner {
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            options,
            cache: HashMap::new(),
        }
    }

    /// Return the normalized form of `raw`, computing and caching it on the
    /// first encounter of this exact raw string.
    pub fn normalized(&mut self, raw: &str) -> &str {
        let options = &self.options;
        match self.cache.entry(raw.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let normalized = normalize_command(entry.key(), options);
                entry.insert(normalized)
            }
        }
    }

    /// Number of distinct raw command strings seen so far
    pub fn distinct_raw_commands(&self) -> usize {
        self.cache.len()
    }
}

/// Normalize one raw command line: drop the executable token, then drop the
/// first occurrence of each configured flag together with its argument token,
/// preserving the order of everything else.
pub fn normalize_command(raw: &str, options: &NormalizeOptions) -> String {
    let mut tokens = tokenize(raw);
    if tokens.is_empty() {
        return String::new();
    }

    // Token 0 is the tool executable path.
    tokens.remove(0);

    for flag in &options.strip_flags {
        if let Some(pos) = tokens.iter().position(|t| t == flag) {
            tokens.remove(pos);
            // The argument that followed the flag, when there is one.
            if pos < tokens.len() {
                tokens.remove(pos);
            }
        }
    }

    tokens.join(" ")
}

/// Shell-style word splitting with quote awareness.
///
/// A malformed command line (unterminated quote) is not fatal to the run;
/// it falls back to plain whitespace splitting.
fn tokenize(raw: &str) -> Vec<String> {
    let mut lexer = Shlex::new(raw);
    let tokens: Vec<String> = lexer.by_ref().collect();
    if lexer.had_error {
        warn!("failed to tokenize command line, using whitespace splitting: {raw}");
        return raw.split_whitespace().map(str::to_string).collect();
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> String {
        normalize_command(raw, &NormalizeOptions::default())
    }

    #[test]
    fn test_strips_executable_and_per_source_flags() {
        assert_eq!(normalize("/usr/bin/clang -c foo.c -o foo.o -Wall"), "-Wall");
    }

    #[test]
    fn test_remaining_flag_order_preserved() {
        assert_eq!(
            normalize("/usr/bin/clang -O2 -c a.c -DALPHA -o a.o -DBETA"),
            "-O2 -DALPHA -DBETA"
        );
    }

    #[test]
    fn test_absent_flags_leave_command_untouched() {
        assert_eq!(normalize("/usr/bin/as -Wall"), "-Wall");
    }

    #[test]
    fn test_empty_command_normalizes_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_executable_only_command() {
        assert_eq!(normalize("/usr/bin/clang"), "");
    }

    #[test]
    fn test_trailing_flag_without_argument() {
        // `-o` at the end has no argument token to remove.
        assert_eq!(normalize("/usr/bin/clang -Wall -o"), "-Wall");
    }

    #[test]
    fn test_quoted_arguments_survive() {
        let raw = r#"/opt/ndk/clang -c a.c -o a.o -DNAME="my app" -I/inc"#;
        assert_eq!(normalize(raw), "-DNAME=my app -I/inc");
    }

    #[test]
    fn test_only_first_occurrence_stripped() {
        assert_eq!(
            normalize("/usr/bin/clang -c a.c -c b.c -O1"),
            "-c b.c -O1"
        );
    }

    #[test]
    fn test_unterminated_quote_falls_back_to_whitespace() {
        assert_eq!(normalize("/usr/bin/clang -DX=\"oops -O2"), "-DX=\"oops -O2");
    }

    #[test]
    fn test_custom_strip_flags() {
        let options = NormalizeOptions {
            strip_flags: vec!["-c".into(), "-o".into(), "-MF".into()],
        };
        assert_eq!(
            normalize_command("cc -c a.c -o a.o -MF a.d -g", &options),
            "-g"
        );
    }

    #[test]
    fn test_interner_memoizes_by_raw_string() {
        let mut interner = CommandInterner::new(NormalizeOptions::default());

        assert_eq!(interner.normalized("cc -c a.c -o a.o -O2"), "-O2");
        assert_eq!(interner.normalized("cc -c a.c -o a.o -O2"), "-O2");
        assert_eq!(interner.distinct_raw_commands(), 1);

        // A different raw string with the same normalized form is a separate
        // cache entry; collapsing happens later in the string table.
        assert_eq!(interner.normalized("cc -c b.c -o b.o -O2"), "-O2");
        assert_eq!(interner.distinct_raw_commands(), 2);
    }
}
