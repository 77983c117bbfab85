use serde::Serialize;

/// Physical and fiscal facts about a single listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub price: f64,
    pub sqft: f64,
    pub beds: u32,
    pub baths: f64,
    pub year_built: i32,
    /// Annual property tax estimate.
    pub estimated_taxes: f64,
    /// Monthly HOA dues.
    pub hoa: f64,
    pub units: u32,
    /// Externally sourced monthly rent estimate, if the listing carries one.
    pub estimated_monthly_rent: Option<f64>,
}

impl Property {
    pub fn price_per_sqft(&self) -> f64 {
        if self.sqft > 0.0 {
            self.price / self.sqft
        } else {
            0.0
        }
    }
}

/// User-adjustable financing and operating assumptions. Fractions, not percents.
#[derive(Debug, Clone, PartialEq)]
pub struct Assumptions {
    pub down_payment_percent: f64,
    pub interest_rate: f64,
    pub loan_term_years: u32,
    pub closing_cost_percent: f64,
    pub rehab_budget: f64,
    pub vacancy_rate: f64,
    pub maintenance_percent: f64,
    pub capex_percent: f64,
    pub management_percent: f64,
    pub insurance_rate: f64,
    pub estimated_rent: Option<f64>,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            down_payment_percent: 0.25,
            interest_rate: 0.07,
            loan_term_years: 30,
            closing_cost_percent: 0.03,
            rehab_budget: 0.0,
            vacancy_rate: 0.08,
            maintenance_percent: 0.01,
            capex_percent: 0.01,
            management_percent: 0.10,
            insurance_rate: 0.005,
            estimated_rent: None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RentSource {
    Override,
    Listing,
    Estimated,
}

/// Debt service coverage. `NoDebt` is a sentinel for an all-cash purchase and
/// compares above every finite ratio.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Dscr {
    Ratio(f64),
    NoDebt,
}

impl Dscr {
    /// `NoDebt` clears every threshold, negative NOI included: there is no
    /// debt service left uncovered.
    pub fn at_least(self, threshold: f64) -> bool {
        match self {
            Dscr::Ratio(ratio) => ratio >= threshold,
            Dscr::NoDebt => true,
        }
    }

    pub fn ratio(self) -> Option<f64> {
        match self {
            Dscr::Ratio(ratio) => Some(ratio),
            Dscr::NoDebt => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum DealRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl DealRating {
    pub fn from_score(score: u8) -> Self {
        match score {
            70.. => DealRating::Excellent,
            50..=69 => DealRating::Good,
            30..=49 => DealRating::Fair,
            _ => DealRating::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DealRating::Excellent => "Excellent",
            DealRating::Good => "Good",
            DealRating::Fair => "Fair",
            DealRating::Poor => "Poor",
        }
    }

    /// Map marker color for the tier.
    pub fn color(self) -> &'static str {
        match self {
            DealRating::Excellent => "#22c55e",
            DealRating::Good => "#eab308",
            DealRating::Fair => "#f97316",
            DealRating::Poor => "#ef4444",
        }
    }
}

/// Monthly operating expenses, itemized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBreakdown {
    pub taxes: f64,
    pub insurance: f64,
    pub hoa: f64,
    pub maintenance: f64,
    pub capex: f64,
    pub management: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnMetrics {
    pub effective_gross_income: f64,
    #[serde(rename = "monthlyNOI")]
    pub monthly_noi: f64,
    #[serde(rename = "annualNOI")]
    pub annual_noi: f64,
    pub monthly_cash_flow: f64,
    pub annual_cash_flow: f64,
    pub cap_rate: f64,
    pub cash_on_cash: f64,
    pub dscr: Dscr,
    pub break_even_occupancy: f64,
    pub one_percent_rule: f64,
    pub passes_one_percent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub down_payment: f64,
    pub loan_amount: f64,
    pub closing_costs: f64,
    pub total_cash_invested: f64,
    pub monthly_mortgage: f64,

    pub monthly_rent: f64,
    pub rent_source: RentSource,
    pub effective_gross_income: f64,

    pub expenses: ExpenseBreakdown,

    #[serde(rename = "monthlyNOI")]
    pub monthly_noi: f64,
    #[serde(rename = "annualNOI")]
    pub annual_noi: f64,
    pub monthly_cash_flow: f64,
    pub annual_cash_flow: f64,
    pub cap_rate: f64,
    pub cash_on_cash: f64,
    pub dscr: Dscr,
    pub break_even_occupancy: f64,
    pub one_percent_rule: f64,
    pub passes_one_percent: bool,
    pub deal_score: u8,
    pub deal_rating: DealRating,
}
