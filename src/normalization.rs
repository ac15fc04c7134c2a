/// Characters users type to group account digits, ignored everywhere.
const SEPARATORS: &[char] = &[' ', '.'];

/// Removes every space and dot from `raw`. All other characters are kept as-is,
/// so anything that is not a digit or an uppercase letter is left for the caller
/// to reject.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| !SEPARATORS.contains(c)).collect()
}
