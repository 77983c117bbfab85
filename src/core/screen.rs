use tracing::debug;

use super::engine::analyze_many;
use super::types::{AnalysisResult, Assumptions, Property};

#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: i64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: String,
    pub home_type: String,
    pub days_on_market: u32,
    pub property: Property,
}

/// Listing filter. Every `None` criterion matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub status: Option<String>,
    pub home_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_beds: Option<u32>,
    pub min_deal_score: Option<u8>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing, analysis: &AnalysisResult) -> bool {
        if let Some(status) = &self.status {
            if listing.status != *status {
                return false;
            }
        }
        if let Some(home_type) = &self.home_type {
            if listing.home_type != *home_type {
                return false;
            }
        }
        let price = listing.property.price;
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }
        if self.min_beds.is_some_and(|min| listing.property.beds < min) {
            return false;
        }
        if self
            .min_deal_score
            .is_some_and(|min| analysis.deal_score < min)
        {
            return false;
        }
        true
    }
}

/// Per-listing value used to color the map and rank results.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum HeatmapMetric {
    #[default]
    DealScore,
    CashOnCash,
    CapRate,
    DaysOnMarket,
    PricePerSqft,
    MonthlyCashFlow,
}

impl HeatmapMetric {
    /// Ratios are reported in percent points.
    pub fn value(self, listing: &Listing, analysis: &AnalysisResult) -> f64 {
        match self {
            HeatmapMetric::DealScore => f64::from(analysis.deal_score),
            HeatmapMetric::CashOnCash => analysis.cash_on_cash * 100.0,
            HeatmapMetric::CapRate => analysis.cap_rate * 100.0,
            HeatmapMetric::DaysOnMarket => f64::from(listing.days_on_market),
            HeatmapMetric::PricePerSqft => listing.property.price_per_sqft(),
            HeatmapMetric::MonthlyCashFlow => analysis.monthly_cash_flow,
        }
    }

    pub fn higher_is_better(self) -> bool {
        !matches!(
            self,
            HeatmapMetric::DaysOnMarket | HeatmapMetric::PricePerSqft
        )
    }
}

#[derive(Debug, Clone)]
pub struct ScreenedListing {
    pub listing: Listing,
    pub analysis: AnalysisResult,
    pub metric_value: f64,
}

/// Analyzes the listings under one set of assumptions, drops those the filter
/// rejects and ranks the rest best-first by `metric`. Ties keep input order.
pub fn screen_listings(
    listings: Vec<Listing>,
    assumptions: &Assumptions,
    filter: &ListingFilter,
    metric: HeatmapMetric,
) -> Vec<ScreenedListing> {
    let properties: Vec<Property> = listings.iter().map(|l| l.property.clone()).collect();
    let analyses = analyze_many(&properties, assumptions);
    let total = listings.len();

    let mut screened: Vec<ScreenedListing> = listings
        .into_iter()
        .zip(analyses)
        .filter(|(listing, analysis)| filter.matches(listing, analysis))
        .map(|(listing, analysis)| {
            let metric_value = metric.value(&listing, &analysis);
            ScreenedListing {
                listing,
                analysis,
                metric_value,
            }
        })
        .collect();

    let higher_is_better = metric.higher_is_better();
    screened.sort_by(|a, b| {
        let ord = a.metric_value.total_cmp(&b.metric_value);
        if higher_is_better { ord.reverse() } else { ord }
    });

    debug!(
        total,
        kept = screened.len(),
        ?metric,
        "screened listings"
    );
    screened
}
