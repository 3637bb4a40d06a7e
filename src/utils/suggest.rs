/// Lowercased alphanumeric form, so `send-message`, `sendMessage` and
/// `send_message` all compare equal.
fn fold_identifier(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ca != cb);
            row[j + 1] = (above + 1).min(row[j] + 1).min(substitution);
            diagonal = above;
        }
    }
    row[b.len()]
}

fn tolerance(folded_input: &str) -> usize {
    match folded_input.len() {
        0 => 0,
        1..=4 => 1,
        5..=8 => 2,
        n => ((n as f32) * 0.35).floor().max(3.0) as usize,
    }
}

/// Candidates close to `input`, best first.
pub fn suggest(input: &str, candidates: &[&str], limit: usize) -> Vec<String> {
    let folded = fold_identifier(input);
    if folded.is_empty() || candidates.is_empty() {
        return Vec::new();
    }
    let allowed = tolerance(&folded);

    let mut scored: Vec<(&str, usize)> = candidates
        .iter()
        .filter_map(|candidate| {
            let other = fold_identifier(candidate);
            if other.is_empty() {
                return None;
            }
            let score = if other == folded {
                0
            } else if other.contains(&folded) || folded.contains(&other) {
                1
            } else {
                edit_distance(&folded, &other)
            };
            (score <= allowed).then_some((*candidate, score))
        })
        .collect();

    scored.sort_by(|a, b| {
        a.1.cmp(&b.1)
            .then_with(|| a.0.len().cmp(&b.0.len()))
            .then_with(|| a.0.cmp(b.0))
    });
    scored.dedup_by(|a, b| a.0 == b.0);
    scored
        .into_iter()
        .take(limit.max(1))
        .map(|(candidate, _)| candidate.to_string())
        .collect()
}
