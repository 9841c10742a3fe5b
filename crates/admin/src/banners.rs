//! Home page banner management.

use serde::Serialize;
use serde::de::IgnoredAny;
use tracing::{info, instrument};

use mamiejago_core::BannerId;
use mamiejago_storefront::backend::Query;
use mamiejago_storefront::catalog::Banner;

use crate::AdminConsole;
use crate::error::{AdminError, Result};

/// Banner form contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerDraft {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub sort_order: i32,
}

impl BannerDraft {
    #[must_use]
    pub fn from_banner(banner: &Banner) -> Self {
        Self {
            title: banner.title.clone(),
            subtitle: banner.subtitle.clone(),
            image_url: banner.image_url.clone(),
            sort_order: banner.sort_order,
        }
    }

    /// Trim fields; a blank subtitle becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::MissingTitle` or `AdminError::MissingImage`.
    pub fn validate(self) -> Result<Self> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AdminError::MissingTitle);
        }
        let image_url = self.image_url.trim().to_string();
        if image_url.is_empty() {
            return Err(AdminError::MissingImage);
        }

        Ok(Self {
            title,
            subtitle: self
                .subtitle
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            image_url,
            sort_order: self.sort_order,
        })
    }
}

#[derive(Debug, Serialize)]
struct ActivePatch {
    is_active: bool,
}

impl AdminConsole {
    /// Every banner, hidden ones included, in slider order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_banners(&self) -> Result<Vec<Banner>> {
        Ok(self
            .backend()
            .select(&Query::table("banners").select("*").order("sort_order", true))
            .await?)
    }

    /// Create a banner, or update `existing`.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `AdminError::NotFound` when `existing` is
    /// gone, or a backend error.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn save_banner(
        &self,
        draft: BannerDraft,
        existing: Option<&BannerId>,
    ) -> Result<Banner> {
        let draft = draft.validate()?;
        let backend = self.backend();

        let rows: Vec<Banner> = match existing {
            Some(id) => {
                backend
                    .update(&Query::table("banners").eq("id", id), &draft)
                    .await?
            }
            None => backend.insert("banners", &draft).await?,
        };
        let banner = rows.into_iter().next().ok_or_else(|| {
            AdminError::NotFound(existing.map_or_else(
                || "inserted banner".to_string(),
                |id| format!("banner {id}"),
            ))
        })?;

        backend.invalidate_catalog().await;
        info!(banner_id = %banner.id, created = existing.is_none(), "Banner saved");
        Ok(banner)
    }

    /// Flip a banner between shown and hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, banner), fields(banner_id = %banner.id))]
    pub async fn toggle_banner(&self, banner: &Banner) -> Result<()> {
        let _: Vec<IgnoredAny> = self
            .backend()
            .update(
                &Query::table("banners").eq("id", &banner.id),
                &ActivePatch {
                    is_active: !banner.is_active,
                },
            )
            .await?;
        self.backend().invalidate_catalog().await;
        Ok(())
    }

    /// Delete a banner.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(banner_id = %id))]
    pub async fn delete_banner(&self, id: &BannerId) -> Result<()> {
        self.backend()
            .delete(&Query::table("banners").eq("id", id))
            .await?;
        self.backend().invalidate_catalog().await;
        Ok(())
    }
}
