/// Counts the tokens of `first` that also occur somewhere in `second`.
///
/// Both descriptors are lowercased and split on runs of whitespace and hyphens. A token
/// repeated in `first` is counted once per occurrence, so the result is not symmetric.
/// An empty descriptor on either side yields 0.
pub fn style_similarity(first: &str, second: &str) -> usize {
    if first.is_empty() || second.is_empty() {
        return 0;
    }

    let first = first.to_lowercase();
    let second = second.to_lowercase();
    let haystack: Vec<&str> = tokens(&second).collect();

    tokens(&first)
        .filter(|token| haystack.contains(token))
        .count()
}

fn tokens(descriptor: &str) -> impl Iterator<Item = &str> {
    descriptor
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|token| !token.is_empty())
}
