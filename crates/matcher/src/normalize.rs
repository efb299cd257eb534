use regex::Regex;
use std::sync::LazyLock;

/// Anything shaped like an HTML tag: `<` ... `>`
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Characters that are neither word characters nor whitespace
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Canonical form of a feature text before embedding
///
/// Lowercases, drops HTML tags, drops punctuation and trims. Never fails;
/// the result may be empty.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_tags = HTML_TAG.replace_all(&lowered, "");
    let without_punct = PUNCTUATION.replace_all(&without_tags, "");
    without_punct.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_trim() {
        assert_eq!(normalize("  Lead Scoring  "), "lead scoring");
    }

    #[test]
    fn test_strips_html_tags() {
        assert_eq!(normalize("<b>Invoice</b> tracking<br/>"), "invoice tracking");
        assert_eq!(normalize("<p class=\"x\">Pipeline view</p>"), "pipeline view");
    }

    #[test]
    fn test_strips_punctuation_keeps_word_chars() {
        assert_eq!(normalize("Multi-currency, e-invoicing & VAT!"), "multicurrency einvoicing  vat");
        assert_eq!(normalize("snake_case stays"), "snake_case stays");
        assert_eq!(normalize("Café CRM: 24/7"), "café crm 247");
    }

    #[test]
    fn test_unclosed_bracket_is_punctuation() {
        assert_eq!(normalize("a < b"), "a  b");
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("<div></div>"), "");
        assert_eq!(normalize("!!! ..."), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "Plain text",
            "  <h1>Title</h1> -- Sub: title!  ",
            "ÜBER fast <<nested>> tags>",
            "tabs\tand\nnewlines.",
            "emoji 🚀 support",
            "<a href='x'>link</a>, (parens) [brackets] {braces}",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }
}
