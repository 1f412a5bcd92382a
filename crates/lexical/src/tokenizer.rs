//! Word-boundary tokenization shared by indexing and querying.

/// Split `text` into lowercase tokens on Unicode word boundaries, dropping
/// tokens shorter than two bytes. A "word" is a maximal run of alphanumeric
/// characters; anything else (punctuation, whitespace) is a boundary.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            push_if_long_enough(&mut tokens, std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        push_if_long_enough(&mut tokens, current);
    }
    tokens
}

fn push_if_long_enough(tokens: &mut Vec<String>, token: String) {
    if token.len() >= 2 {
        tokens.push(token);
    }
}

/// Tokenize `text` and collapse to the unique set, preserving first-seen
/// order. Used where only term presence (not frequency) matters.
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = rustc_hash::FxHashSet::default();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
