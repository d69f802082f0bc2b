use crate::error::PipelineError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("valid table selector"));

/// A class value has to be one token; `class="a b"` carries two classes.
pub fn check_class(class: &str) -> Result<(), PipelineError> {
    if class.is_empty() || class.chars().any(char::is_whitespace) {
        return Err(PipelineError::Config(format!(
            "table class `{class}` must be a single class name"
        )));
    }
    Ok(())
}

/// First `<table>` in document order whose class list contains `class`.
/// There is no fallback search.
pub fn locate_table<'a>(doc: &'a Html, class: &str) -> Result<ElementRef<'a>, PipelineError> {
    check_class(class)?;
    let table = doc
        .select(&TABLE)
        .find(|t| t.value().classes().any(|c| c == class))
        .ok_or_else(|| PipelineError::TableNotFound {
            class: class.to_string(),
        })?;
    debug!(class, "located table");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_matching_table() -> anyhow::Result<()> {
        let doc = Html::parse_document(
            r#"<table class="infobox"><tr><td>skip</td></tr></table>
               <table class="wikitable sortable" id="first"><tr><td>a</td></tr></table>
               <table class="wikitable" id="second"><tr><td>b</td></tr></table>"#,
        );
        let table = locate_table(&doc, "wikitable")?;
        assert_eq!(table.value().attr("id"), Some("first"));
        Ok(())
    }

    #[test]
    fn missing_table_is_fatal() {
        let doc = Html::parse_document("<div class=\"wikitable\">not a table</div>");
        let err = locate_table(&doc, "wikitable").unwrap_err();
        assert!(matches!(err, PipelineError::TableNotFound { .. }));
    }

    #[test]
    fn class_match_is_exact_token() {
        let doc = Html::parse_document(r#"<table class="wikitable-like"><tr><td>x</td></tr></table>"#);
        let err = locate_table(&doc, "wikitable").unwrap_err();
        assert!(matches!(err, PipelineError::TableNotFound { .. }));
    }

    #[test]
    fn multi_word_class_never_matches_nested_table() {
        let doc = Html::parse_document(
            r#"<table class="wiki"><tr><td>
                 <table><tr><td>inner</td></tr></table>
               </td></tr></table>"#,
        );
        let err = locate_table(&doc, "wiki table").unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        assert!(matches!(locate_table(&doc, ""), Err(PipelineError::Config(_))));
    }
}
