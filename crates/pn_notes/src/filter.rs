use crate::tags::normalize_tags;

/// Which notes [`NoteService::list_filtered`](crate::NoteService::list_filtered)
/// returns.  The default keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// `Some(true)` keeps only encrypted notes, `Some(false)` only plain ones.
    pub encrypted: Option<bool>,
    /// Keep notes carrying at least one of these tags.  Empty keeps all.
    pub tags: Vec<String>,
}

impl ListFilter {
    pub fn encrypted(encrypted: Option<bool>) -> Self {
        Self {
            encrypted,
            tags: Vec::new(),
        }
    }

    /// Restrict to notes with any of `tags`, normalized the way stored tags are.
    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = normalize_tags(tags);
        self
    }

    pub(crate) fn keeps_tags(&self, wanted: &[String], note_tags: &[String]) -> bool {
        wanted.is_empty() || note_tags.iter().any(|tag| wanted.contains(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn with_tags_normalizes() {
        let filter = ListFilter::default().with_tags(&[" Work", "work", "", "HOME"]);
        assert_eq!(filter.tags, vec!["work", "home"]);
        assert_eq!(filter.encrypted, None);
    }

    #[test]
    fn any_selected_tag_matches() {
        let filter = ListFilter::default();
        let wanted = tags(&["a", "b"]);
        assert!(filter.keeps_tags(&wanted, &tags(&["b", "z"])));
        assert!(!filter.keeps_tags(&wanted, &tags(&["z"])));
        assert!(!filter.keeps_tags(&wanted, &[]));
        assert!(filter.keeps_tags(&[], &[]));
    }
}
