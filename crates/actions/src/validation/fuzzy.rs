//! Fuzzy string matching for "did you mean" suggestions.

/// Closest candidate by case-insensitive edit distance.
///
/// Ties go to the earliest candidate. Nothing is suggested when more than
/// half of the longer name would have to change.
pub(crate) fn fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let needle = input.to_lowercase();
    let (name, distance) = candidates
        .iter()
        .map(|&name| (name, levenshtein(&needle, &name.to_lowercase())))
        .min_by_key(|&(_, distance)| distance)?;
    (distance <= input.len().max(name.len()) / 2).then_some(name)
}

/// Edit distance over chars, keeping only one previous row.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitute = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Operator;

    #[test]
    fn levenshtein_basic() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("gte", "gte"), 0);
    }

    #[test]
    fn suggests_close_operator_names() {
        assert_eq!(fuzzy_match("lenght_gt", Operator::KNOWN), Some("len_gt"));
        assert_eq!(fuzzy_match("GTE", Operator::KNOWN), Some("gte"));
        assert_eq!(
            fuzzy_match("gte_positive_threshold", Operator::KNOWN),
            Some("gte_pos_threshold")
        );
    }

    #[test]
    fn rejects_distant_names() {
        assert_eq!(fuzzy_match("zzzzzzzzzzzzz", Operator::KNOWN), None);
    }
}
