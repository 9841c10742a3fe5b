//! Review moderation.

use serde::Serialize;
use serde::de::IgnoredAny;
use tracing::{info, instrument};

use mamiejago_core::{ReviewFilter, ReviewId};
use mamiejago_storefront::backend::Query;
use mamiejago_storefront::reviews::Review;

use crate::AdminConsole;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct ApprovalPatch {
    is_approved: bool,
}

/// Toast shown after flipping a review's approval.
#[must_use]
pub const fn toggle_message(was_approved: bool) -> &'static str {
    if was_approved {
        "Review dibatalkan"
    } else {
        "Review disetujui"
    }
}

impl AdminConsole {
    /// Reviews matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_reviews(&self, filter: ReviewFilter) -> Result<Vec<Review>> {
        Ok(self.backend().list_reviews(filter).await?)
    }

    /// Approve a pending review or withdraw an approved one.
    ///
    /// Returns the new approval state.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, review), fields(review_id = %review.id))]
    pub async fn toggle_review(&self, review: &Review) -> Result<bool> {
        let is_approved = !review.is_approved;
        let _: Vec<IgnoredAny> = self
            .backend()
            .update(
                &Query::table("reviews").eq("id", &review.id),
                &ApprovalPatch { is_approved },
            )
            .await?;
        info!(is_approved, "{}", toggle_message(review.is_approved));
        Ok(is_approved)
    }

    /// Delete a review.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(review_id = %id))]
    pub async fn delete_review(&self, id: &ReviewId) -> Result<()> {
        self.backend()
            .delete(&Query::table("reviews").eq("id", id))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_message() {
        assert_eq!(toggle_message(false), "Review disetujui");
        assert_eq!(toggle_message(true), "Review dibatalkan");
    }

    #[test]
    fn test_approval_patch() {
        assert_eq!(
            serde_json::to_value(ApprovalPatch { is_approved: true }).ok(),
            Some(serde_json::json!({"is_approved": true}))
        );
    }
}
