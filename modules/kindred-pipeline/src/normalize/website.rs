use kindred_common::types::{CleanedWebsite, RawRecord};

use super::non_empty;

/// Websites and generic links get no field extraction — just the page
/// title and trimmed body text.
pub fn clean_website(record: &RawRecord) -> CleanedWebsite {
    CleanedWebsite {
        title: record.title.as_deref().and_then(non_empty),
        content: record.text.as_deref().and_then(non_empty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_title_and_trimmed_content() {
        let record = RawRecord {
            url: "https://ada.dev".into(),
            title: Some("Ada's notebook".into()),
            author: None,
            text: Some("  Essays on computation.\n\n".into()),
        };
        let cleaned = clean_website(&record);
        assert_eq!(cleaned.title.as_deref(), Some("Ada's notebook"));
        assert_eq!(cleaned.content.as_deref(), Some("Essays on computation."));
    }

    #[test]
    fn empty_record_yields_empty_cleaned() {
        let record = RawRecord::default();
        assert!(clean_website(&record).is_empty());
    }
}
