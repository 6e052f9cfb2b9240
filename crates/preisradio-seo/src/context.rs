use chrono::{Days, NaiveDate, Utc};
use preisradio_core::{RetailerInfo, RetailerLookup, SiteConfig};

/// Number of days an offer's `priceValidUntil` lies in the future.
pub const PRICE_VALIDITY_DAYS: u64 = 30;

/// Everything a generator needs besides the product data itself.
#[derive(Clone, Copy)]
pub struct SeoContext<'a> {
    pub site: &'a SiteConfig,
    pub retailers: &'a dyn RetailerLookup,
    pub today: NaiveDate,
}

impl<'a> SeoContext<'a> {
    /// Context dated to the current UTC day.
    #[must_use]
    pub fn new(site: &'a SiteConfig, retailers: &'a dyn RetailerLookup) -> Self {
        Self::with_today(site, retailers, Utc::now().date_naive())
    }

    #[must_use]
    pub fn with_today(
        site: &'a SiteConfig,
        retailers: &'a dyn RetailerLookup,
        today: NaiveDate,
    ) -> Self {
        Self {
            site,
            retailers,
            today,
        }
    }

    /// `YYYY-MM-DD`, thirty days after `today`.
    #[must_use]
    pub fn price_valid_until(&self) -> String {
        self.today
            .checked_add_days(Days::new(PRICE_VALIDITY_DAYS))
            .unwrap_or(self.today)
            .format("%Y-%m-%d")
            .to_string()
    }

    /// Retailer info for an optional retailer id; `None` maps to the placeholder.
    #[must_use]
    pub fn retailer(&self, id: Option<&str>) -> RetailerInfo {
        self.retailers.retailer_info(id.unwrap_or_default())
    }
}

impl std::fmt::Debug for SeoContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeoContext")
            .field("site", &self.site)
            .field("today", &self.today)
            .finish_non_exhaustive()
    }
}
