/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length in characters, which is what every ratio in this crate is measured in.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
