//! CLI argument normalization.

/// Normalize a filter-list argument into a clean id set.
///
/// Accepts any mix of comma and whitespace separation across repeated flag
/// values (`--agents "claude, cursor"` or `--agents claude --agents cursor`).
/// Entries are trimmed, lowercased, and de-duplicated preserving first-seen
/// order; validation against the registry happens downstream.
pub fn parse_filter_list(raw: &[String]) -> Vec<String> {
    let mut seen = Vec::new();

    for value in raw {
        for entry in value.split(|c: char| c == ',' || c.is_whitespace()) {
            let entry = entry.trim().to_lowercase();
            if !entry.is_empty() && !seen.contains(&entry) {
                seen.push(entry);
            }
        }
    }

    seen
}
