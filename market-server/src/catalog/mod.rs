//! Catalog browsing helpers
//!
//! Category filtering for the storefront uses a keyword heuristic: a product
//! matches when its free-text category shares a keyword (or substring) with
//! the query. This is intentionally looser than the exact-equality matching
//! the reconciliation engine uses against batch categories — the two rules
//! serve different purposes and are kept separate.

use crate::db::models::Product;

/// Keyword match between a product category label and a browse query
///
/// Case-insensitive. Matches on whole-label containment either way, or on
/// any shared whitespace-separated keyword.
pub fn category_matches_keywords(category: &str, query: &str) -> bool {
    let category = category.trim().to_lowercase();
    let query = query.trim().to_lowercase();
    if category.is_empty() || query.is_empty() {
        return false;
    }

    if category.contains(&query) || query.contains(&category) {
        return true;
    }

    query
        .split_whitespace()
        .any(|keyword| category.split_whitespace().any(|word| word == keyword))
}

/// Filter a product list down to those matching a browse query
pub fn filter_by_category<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| category_matches_keywords(&p.category, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_label_matches() {
        assert!(category_matches_keywords("Cakes", "Cakes"));
        assert!(category_matches_keywords("cakes", "CAKES"));
    }

    #[test]
    fn test_substring_matches_both_directions() {
        assert!(category_matches_keywords("Birthday Cakes", "cake"));
        assert!(category_matches_keywords("Cake", "birthday cakes"));
    }

    #[test]
    fn test_shared_keyword_matches() {
        assert!(category_matches_keywords("Sourdough Bread", "Bread Rolls"));
    }

    #[test]
    fn test_unrelated_labels_do_not_match() {
        assert!(!category_matches_keywords("Cakes", "Bread"));
        assert!(!category_matches_keywords("Tarts", "Cookies"));
    }

    #[test]
    fn test_empty_inputs_do_not_match() {
        assert!(!category_matches_keywords("", "Cakes"));
        assert!(!category_matches_keywords("Cakes", ""));
        assert!(!category_matches_keywords("  ", "  "));
    }
}
