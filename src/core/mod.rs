mod engine;
mod rent;
mod scoring;
mod screen;
mod types;

pub use engine::{
    analyze, analyze_as_of, analyze_many, monthly_expenses, monthly_payment, return_metrics,
};
pub use rent::{current_year, estimate_rent, estimate_rent_as_of};
pub use scoring::{MAX_DEAL_SCORE, deal_score};
pub use screen::{HeatmapMetric, Listing, ListingFilter, ScreenedListing, screen_listings};
pub use types::{
    AnalysisResult, Assumptions, DealRating, Dscr, ExpenseBreakdown, Property, RentSource,
    ReturnMetrics,
};
