use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::id::ProductId;

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Internal product code (SKU).
    pub code: Option<String>,
    /// Product line.
    pub line: Option<String>,
    pub category: Option<String>,
    /// Presentation, e.g. "Caixa 12un".
    pub presentation: Option<String>,
    pub packaging: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive match of `term` against name, category and line.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        let contains = |field: Option<&str>| {
            field
                .map(|v| v.to_lowercase().contains(&term))
                .unwrap_or(false)
        };
        contains(Some(&self.name)) || contains(self.category.as_deref()) || contains(self.line.as_deref())
    }
}

/// Request to register a product. Only `name` is required; `active`
/// defaults to true.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub code: Option<String>,
    pub line: Option<String>,
    pub category: Option<String>,
    pub presentation: Option<String>,
    pub packaging: Option<String>,
    pub active: Option<bool>,
}

/// Partial update of a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub line: Option<String>,
    pub category: Option<String>,
    pub presentation: Option<String>,
    pub packaging: Option<String>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, category: Option<&str>, line: Option<&str>) -> Product {
        Product {
            id: ProductId::new(),
            name: name.to_string(),
            code: None,
            line: line.map(String::from),
            category: category.map(String::from),
            presentation: None,
            packaging: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_search_matches_any_field() {
        let p = product("Biscoito Maria", Some("Biscoitos"), Some("Tradicional"));
        assert!(p.matches_search("maria"));
        assert!(p.matches_search("BISCOITOS"));
        assert!(p.matches_search("tradi"));
        assert!(!p.matches_search("chocolate"));
    }

    #[test]
    fn test_search_ignores_missing_fields() {
        let p = product("Farinha", None, None);
        assert!(!p.matches_search("linha"));
    }
}
