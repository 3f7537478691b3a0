use std::collections::HashSet;

/// Lowercase and trim every tag, drop empties, keep the first occurrence of
/// each.  Order is otherwise preserved.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(tags.len());
    tags.iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_case_whitespace_and_empty() {
        assert_eq!(
            normalize_tags(&["Work", " work ", "URGENT", ""]),
            vec!["work", "urgent"]
        );
    }

    #[test]
    fn order_of_first_occurrence_wins() {
        assert_eq!(normalize_tags(&["b", "A", "B", "a", "c"]), vec!["b", "a", "c"]);
    }

    #[test]
    fn nothing_in_nothing_out() {
        assert!(normalize_tags::<&str>(&[]).is_empty());
        assert!(normalize_tags(&["   ", "\t"]).is_empty());
    }
}
