// 🔎 Candidate Filter - keep only cafe-like venues
// Category tag AND name keyword must both match.

use crate::venue::Venue;

/// Default category tag the provider uses for cafes
pub const CAFE_CATEGORY: &str = "cafe";

/// Default name keywords (matched case-insensitively)
pub const CAFE_KEYWORDS: [&str; 3] = ["cafe", "coffee", "kafe"];

// ============================================================================
// CAFE FILTER
// ============================================================================

#[derive(Debug, Clone)]
pub struct CafeFilter {
    /// Tag that must appear in the venue's categories (exact match)
    pub category: String,

    /// At least one must appear in the lowercased display name
    pub keywords: Vec<String>,
}

impl CafeFilter {
    pub fn new(category: &str, keywords: &[&str]) -> Self {
        CafeFilter {
            category: category.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Check a single venue; missing categories or name never match
    pub fn matches(&self, venue: &Venue) -> bool {
        let (Some(categories), Some(name)) = (&venue.categories, &venue.display_name) else {
            return false;
        };

        if !categories.iter().any(|c| c == &self.category) {
            return false;
        }

        let name_lower = name.to_lowercase();
        self.keywords.iter().any(|k| name_lower.contains(k.as_str()))
    }

    /// Stable filter: survivors keep their original relative order
    pub fn apply(&self, venues: &[Venue]) -> Vec<Venue> {
        let kept: Vec<Venue> = venues.iter().filter(|v| self.matches(v)).cloned().collect();

        tracing::debug!(
            input = venues.len(),
            kept = kept.len(),
            category = %self.category,
            "Filtered candidate venues"
        );

        kept
    }
}

impl Default for CafeFilter {
    fn default() -> Self {
        CafeFilter::new(CAFE_CATEGORY, &CAFE_KEYWORDS)
    }
}

/// Filter with the default cafe heuristic
pub fn filter_cafe_like(venues: &[Venue]) -> Vec<Venue> {
    CafeFilter::default().apply(venues)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn venue(id: &str, name: &str, categories: &[&str]) -> Venue {
        Venue::new(id, name, categories, None)
    }

    #[test]
    fn test_requires_category_and_keyword() {
        let venues = vec![
            venue("1", "Cafe Nero", &["cafe", "food"]),
            venue("2", "Coffee Lab", &["restaurant"]),     // wrong category
            venue("3", "Simit Sarayı", &["cafe"]),          // no keyword
            venue("4", "Mavi KAFE", &["cafe"]),
        ];

        let kept = filter_cafe_like(&venues);
        let ids: Vec<&str> = kept.iter().map(|v| v.identity.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let filter = CafeFilter::default();
        assert!(filter.matches(&venue("1", "STARBUCKS COFFEE", &["cafe"])));
        assert!(filter.matches(&venue("2", "kafeterya", &["cafe"])));
        assert!(!filter.matches(&venue("3", "Tea House", &["cafe"])));
    }

    #[test]
    fn test_category_match_is_exact() {
        let filter = CafeFilter::default();
        assert!(!filter.matches(&venue("1", "Cafe Uno", &["Cafe"])));
        assert!(!filter.matches(&venue("2", "Cafe Uno", &["cafeteria"])));
    }

    #[test]
    fn test_missing_fields_are_dropped() {
        let mut no_name = venue("1", "Cafe", &["cafe"]);
        no_name.display_name = None;

        let mut no_categories = venue("2", "Cafe", &["cafe"]);
        no_categories.categories = None;

        assert!(filter_cafe_like(&[no_name, no_categories]).is_empty());
    }

    #[test]
    fn test_preserves_order_and_duplicates() {
        let venues = vec![
            venue("B", "Coffee B", &["cafe"]),
            venue("A", "Cafe A", &["cafe"]),
            venue("B", "Coffee B", &["cafe"]),
        ];

        let kept = filter_cafe_like(&venues);
        let ids: Vec<&str> = kept.iter().map(|v| v.identity.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "B"]);
    }

    #[test]
    fn test_custom_filter() {
        let filter = CafeFilter::new("bakery", &["Pastane", "bakery"]);
        assert!(filter.matches(&venue("1", "Köşe PASTANESİ", &["bakery"])));
        assert!(filter.matches(&venue("2", "Corner Bakery", &["bakery"])));
        assert!(!filter.matches(&venue("3", "Corner Bakery", &["cafe"])));
    }
}
