fn normalize_token(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut curr = Vec::with_capacity(prev.len());
        curr.push(i + 1);
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr.push((prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost));
        }
        prev = curr;
    }
    prev[b_chars.len()]
}

/// 0 for an exact match, 1 for containment, otherwise edit distance.
fn score(input: &str, candidate: &str) -> Option<usize> {
    let candidate = normalize_token(candidate);
    if input.is_empty() || candidate.is_empty() {
        return None;
    }
    if input == candidate {
        return Some(0);
    }
    if input.contains(&candidate) || candidate.contains(input) {
        return Some(1);
    }
    Some(levenshtein(input, &candidate))
}

fn max_allowed_distance(normalized_len: usize) -> usize {
    match normalized_len {
        0 => 0,
        1..=4 => 1,
        5..=8 => 2,
        len => ((len as f32) * 0.35).floor().max(3.0) as usize,
    }
}

/// Closest candidates to `input`, best first.
pub fn suggest(input: &str, candidates: &[String], limit: usize) -> Vec<String> {
    let normalized = normalize_token(input);
    if normalized.is_empty() {
        return Vec::new();
    }
    let allowed = max_allowed_distance(normalized.len());
    let mut scored: Vec<(&String, usize)> = candidates
        .iter()
        .filter_map(|candidate| score(&normalized, candidate).map(|s| (candidate, s)))
        .filter(|(_, s)| *s <= allowed)
        .collect();
    scored.sort_by(|a, b| {
        a.1.cmp(&b.1)
            .then_with(|| a.0.len().cmp(&b.0.len()))
            .then_with(|| a.0.cmp(b.0))
    });
    let mut out: Vec<String> = Vec::new();
    for (candidate, _) in scored {
        if !out.contains(candidate) {
            out.push(candidate.clone());
        }
        if out.len() >= limit.max(1) {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::suggest;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn close_typos_are_suggested_first() {
        let candidates = names(&["oracle", "reviewer", "planner"]);
        assert_eq!(suggest("orcale", &candidates, 3), vec!["oracle"]);
        assert_eq!(suggest("review", &candidates, 3), vec!["reviewer"]);
    }

    #[test]
    fn unrelated_input_yields_nothing() {
        let candidates = names(&["oracle", "reviewer"]);
        assert!(suggest("kubernetes", &candidates, 3).is_empty());
        assert!(suggest("", &candidates, 3).is_empty());
    }
}
