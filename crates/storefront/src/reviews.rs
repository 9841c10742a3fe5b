//! Customer reviews and rating aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mamiejago_core::{Rating, ReviewId};

/// Longest accepted reviewer name.
pub const MAX_NAME_LENGTH: usize = 80;
/// Longest accepted review comment.
pub const MAX_COMMENT_LENGTH: usize = 1000;

/// A row of the `reviews` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub customer_name: String,
    pub rating: Rating,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Avatar letter: the first character of the name, uppercased.
    #[must_use]
    pub fn initial(&self) -> String {
        initial(&self.customer_name)
    }
}

/// First character of `name`, uppercased; `"?"` for a blank name.
#[must_use]
pub fn initial(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect())
}

/// Validation failures for a new review.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("name is required")]
    MissingName,

    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },

    #[error("comment must be at most {max} characters")]
    CommentTooLong { max: usize },
}

/// A review submitted from the storefront. New reviews wait for moderation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewDraft {
    pub customer_name: String,
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ReviewDraft {
    /// Trim and check the fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ReviewError`] for a blank or overlong name, or an overlong
    /// comment.
    pub fn new(
        customer_name: &str,
        rating: Rating,
        comment: Option<&str>,
    ) -> Result<Self, ReviewError> {
        let customer_name = customer_name.trim();
        if customer_name.is_empty() {
            return Err(ReviewError::MissingName);
        }
        if customer_name.chars().count() > MAX_NAME_LENGTH {
            return Err(ReviewError::NameTooLong {
                max: MAX_NAME_LENGTH,
            });
        }

        let comment = comment.map(str::trim).filter(|c| !c.is_empty());
        if comment.is_some_and(|c| c.chars().count() > MAX_COMMENT_LENGTH) {
            return Err(ReviewError::CommentTooLong {
                max: MAX_COMMENT_LENGTH,
            });
        }

        Ok(Self {
            customer_name: customer_name.to_string(),
            rating,
            comment: comment.map(str::to_string),
        })
    }
}

/// Aggregate of a set of reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSummary {
    pub count: usize,
    /// Mean star rating, `None` when there are no reviews.
    pub average: Option<f64>,
    /// Number of reviews per star, index 0 is one star.
    pub distribution: [usize; 5],
}

impl RatingSummary {
    /// Summarize every review given.
    #[must_use]
    pub fn from_reviews<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> Self {
        let mut distribution = [0_usize; 5];
        let mut count = 0_usize;
        let mut stars_total = 0_u64;

        for review in reviews {
            let stars = review.rating.stars();
            if let Some(bucket) = distribution.get_mut(usize::from(stars) - 1) {
                *bucket += 1;
            }
            count += 1;
            stars_total += u64::from(stars);
        }

        #[allow(clippy::cast_precision_loss)] // review counts stay far below 2^52
        let average = (count > 0).then(|| stars_total as f64 / count as f64);

        Self {
            count,
            average,
            distribution,
        }
    }

    /// Summarize only the approved reviews, which is what the public feed
    /// shows.
    #[must_use]
    pub fn approved(reviews: &[Review]) -> Self {
        Self::from_reviews(reviews.iter().filter(|r| r.is_approved))
    }

    /// Average rounded to one decimal for display, e.g. `"4.6"`.
    #[must_use]
    pub fn average_label(&self) -> String {
        self.average
            .map_or_else(|| "-".to_string(), |avg| format!("{avg:.1}"))
    }
}

/// Approved reviews, newest first.
#[must_use]
pub fn public_feed(reviews: &[Review]) -> Vec<&Review> {
    let mut feed: Vec<&Review> = reviews.iter().filter(|r| r.is_approved).collect();
    feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    feed
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn review(id: &str, stars: i64, approved: bool, day: u32) -> Review {
        Review {
            id: ReviewId::new(id),
            customer_name: format!("Customer {id}"),
            rating: Rating::new(stars).unwrap(),
            comment: None,
            is_approved: approved,
            created_at: Utc.with_ymd_and_hms(2025, 2, day, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = RatingSummary::from_reviews(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average, None);
        assert_eq!(summary.average_label(), "-");
    }

    #[test]
    fn test_summary_average_and_distribution() {
        let reviews = [
            review("r1", 5, true, 10),
            review("r2", 4, true, 8),
            review("r3", 5, true, 5),
            review("r4", 4, true, 1),
            review("r5", 5, true, 2),
        ];
        let summary = RatingSummary::from_reviews(&reviews);

        assert_eq!(summary.count, 5);
        assert!((summary.average.unwrap() - 4.6).abs() < 1e-9);
        assert_eq!(summary.distribution, [0, 0, 0, 2, 3]);
        assert_eq!(summary.average_label(), "4.6");
    }

    #[test]
    fn test_approved_summary_ignores_pending() {
        let reviews = [review("r1", 5, true, 1), review("r2", 1, false, 2)];
        let summary = RatingSummary::approved(&reviews);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.average, Some(5.0));
    }

    #[test]
    fn test_public_feed_newest_first() {
        let reviews = [
            review("old", 4, true, 1),
            review("hidden", 5, false, 20),
            review("new", 5, true, 15),
        ];
        let ids: Vec<&str> = public_feed(&reviews).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["new", "old"]);
    }

    #[test]
    fn test_draft_validation() {
        let five = Rating::new(5).unwrap();
        assert_eq!(
            ReviewDraft::new("   ", five, None),
            Err(ReviewError::MissingName)
        );
        assert!(matches!(
            ReviewDraft::new(&"x".repeat(81), five, None),
            Err(ReviewError::NameTooLong { .. })
        ));
        assert!(matches!(
            ReviewDraft::new("Budi", five, Some(&"y".repeat(1001))),
            Err(ReviewError::CommentTooLong { .. })
        ));

        let draft = ReviewDraft::new(" Budi S. ", five, Some("  ")).unwrap();
        assert_eq!(draft.customer_name, "Budi S.");
        assert_eq!(draft.comment, None);
    }

    #[test]
    fn test_draft_serializes_without_empty_comment() {
        let draft = ReviewDraft::new("Citra", Rating::new(4).unwrap(), None).unwrap();
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({"customer_name": "Citra", "rating": 4})
        );
    }

    #[test]
    fn test_initial() {
        assert_eq!(initial("aisyah"), "A");
        assert_eq!(initial("  "), "?");
        assert_eq!(review("r1", 5, true, 1).initial(), "C");
    }
}
