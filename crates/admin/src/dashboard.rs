//! Dashboard counters.

use tracing::instrument;

use mamiejago_storefront::backend::Query;

use crate::AdminConsole;
use crate::error::Result;

/// Row counts shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub products: u64,
    pub banners: u64,
    pub reviews: u64,
    pub pending_reviews: u64,
}

impl DashboardStats {
    /// Card label and value, in display order.
    #[must_use]
    pub const fn cards(&self) -> [(&'static str, u64); 4] {
        [
            ("Total Produk", self.products),
            ("Banner Aktif", self.banners),
            ("Total Review", self.reviews),
            ("Review Pending", self.pending_reviews),
        ]
    }
}

impl AdminConsole {
    /// Load the four dashboard counters concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if any count request fails.
    #[instrument(skip(self), fields(admin = %self.admin().id))]
    pub async fn dashboard(&self) -> Result<DashboardStats> {
        let backend = self.backend();
        let products = Query::table("products").select("id");
        let banners = Query::table("banners").select("id");
        let reviews = Query::table("reviews").select("id");
        let pending = Query::table("reviews")
            .select("id")
            .eq("is_approved", false);

        let (products, banners, reviews, pending_reviews) = tokio::try_join!(
            backend.count(&products),
            backend.count(&banners),
            backend.count(&reviews),
            backend.count(&pending),
        )?;

        Ok(DashboardStats {
            products,
            banners,
            reviews,
            pending_reviews,
        })
    }
}
