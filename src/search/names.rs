//! Candidate file-name patterns for a logical library name.

/// Expand a logical library name into file-name patterns, highest priority first.
///
/// Every extension yields a bare form before any `lib`-prefixed form. With
/// `exact == false` a wildcard is placed between name and extension so that
/// version-suffixed files (`libfoo-1.2.so`) still match; exact patterns are
/// used for toolset/arch-qualified names where a wildcard would over-match.
pub fn expand(name: &str, extensions: &[String], exact: bool) -> Vec<String> {
    let glob = if exact { "" } else { "*" };

    let mut patterns = Vec::with_capacity(extensions.len() * 2);
    for ext in extensions {
        patterns.push(format!("{}{}{}", name, glob, ext));
    }
    for ext in extensions {
        patterns.push(format!("lib{}{}{}", name, glob, ext));
    }
    patterns
}

/// Whether a pattern must be expanded against the filesystem.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}
