/// Minimum length, in characters, of an emitted token.
pub const MIN_TOKEN_LEN: usize = 2;

/// Split text into lowercase ASCII alphanumeric runs of at least two characters.
///
/// Any other character, including every non-ASCII character, acts as a
/// delimiter. Tokens come back in occurrence order and are not deduplicated.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            current.push(c.to_ascii_lowercase());
        } else {
            flush(&mut current, &mut tokens);
        }
    }
    flush(&mut current, &mut tokens);
    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if current.len() >= MIN_TOKEN_LEN {
        tokens.push(std::mem::take(current));
    } else {
        current.clear();
    }
}
