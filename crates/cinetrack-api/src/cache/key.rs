//! Cache categories and deterministic cache keys.

use std::fmt;

/// Resource category; selects the TTL applied to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Movie details.
    Movie,
    /// Series details.
    Series,
    /// Season details.
    Season,
    /// Person details.
    Person,
    /// Cast lists and person combined credits.
    Credits,
    /// Review pages.
    Reviews,
    /// Genre discovery pages.
    Discover,
    /// Search result pages.
    Search,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Movie,
        Self::Series,
        Self::Season,
        Self::Person,
        Self::Credits,
        Self::Reviews,
        Self::Discover,
        Self::Search,
    ];

    /// Key prefix for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Season => "season",
            Self::Person => "person",
            Self::Credits => "credits",
            Self::Reviews => "reviews",
            Self::Discover => "discover",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic cache key: `<category>:<part>[:<part>...]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::module_name_repetitions)]
pub struct CacheKey {
    /// Category that owns the key.
    category: Category,
    /// Rendered key.
    key: String,
}

impl CacheKey {
    /// Builds a key from a category and ordered parts.
    pub fn new<I, P>(category: Category, parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: fmt::Display,
    {
        let mut key = String::from(category.as_str());
        for part in parts {
            key.push(':');
            key.push_str(&part.to_string());
        }
        Self { category, key }
    }

    /// Builds a key for a paginated resource; `page` is always the last part.
    pub fn paged<I, P>(category: Category, parts: I, page: u32) -> Self
    where
        I: IntoIterator<Item = P>,
        P: fmt::Display,
    {
        let mut key = Self::new(category, parts);
        key.key.push_str(":page:");
        key.key.push_str(&page.to_string());
        key
    }

    /// Category that owns the key.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Rendered key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Normalizes a free-text query for use as a key part.
///
/// Lowercases, collapses whitespace runs to one space, and form-encodes so
/// that the result contains no `:`.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    let collapsed = query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    url::form_urlencoded::byte_serialize(collapsed.as_bytes()).collect()
}
