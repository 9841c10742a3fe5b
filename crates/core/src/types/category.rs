//! Menu categories.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a category label is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// A menu category.
///
/// Labels are the Indonesian names stored in the `products.category` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Mie,
    Wonton,
    Dimsum,
    Minuman,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Self; 4] = [Self::Mie, Self::Wonton, Self::Dimsum, Self::Minuman];

    /// The stored label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mie => "Mie",
            Self::Wonton => "Wonton",
            Self::Dimsum => "Dimsum",
            Self::Minuman => "Minuman",
        }
    }

    /// Whether dishes in this category come with a spice level choice.
    #[must_use]
    pub const fn has_spice_levels(self) -> bool {
        matches!(self, Self::Mie | Self::Wonton)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CategoryError(s.to_string()))
    }
}

/// Category selector on the menu page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Every category ("Semua").
    #[default]
    All,
    /// A single category.
    Only(Category),
}

impl CategoryFilter {
    /// Label shown for the "all" chip.
    pub const ALL_LABEL: &'static str = "Semua";

    /// Chip order on the menu page: "Semua" followed by each category.
    #[must_use]
    pub fn chips() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(Category::ALL.into_iter().map(Self::Only))
            .collect()
    }

    /// Whether a product in `category` passes this filter.
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL_LABEL),
            Self::Only(c) => c.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(Self::ALL_LABEL) {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!("Mie".parse::<Category>().unwrap(), Category::Mie);
        assert_eq!("minuman".parse::<Category>().unwrap(), Category::Minuman);
        assert!("Pizza".parse::<Category>().is_err());
    }

    #[test]
    fn test_filter_parse_and_match() {
        let all: CategoryFilter = "Semua".parse().unwrap();
        assert_eq!(all, CategoryFilter::All);
        assert!(all.matches(Category::Dimsum));

        let mie: CategoryFilter = "Mie".parse().unwrap();
        assert!(mie.matches(Category::Mie));
        assert!(!mie.matches(Category::Wonton));
    }

    #[test]
    fn test_chips_order() {
        let labels: Vec<String> = CategoryFilter::chips().iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["Semua", "Mie", "Wonton", "Dimsum", "Minuman"]);
    }

    #[test]
    fn test_spice_levels_only_for_noodles_and_wonton() {
        assert!(Category::Mie.has_spice_levels());
        assert!(Category::Wonton.has_spice_levels());
        assert!(!Category::Dimsum.has_spice_levels());
        assert!(!Category::Minuman.has_spice_levels());
    }
}
