//! Wire payloads and validation for property and assumption records.
//!
//! The analysis engine assumes well-formed input; everything that reaches it
//! from the outside passes through [`validate_property`] and
//! [`validate_assumptions`] first.

use serde::Deserialize;
use thiserror::Error;

use crate::core::{Assumptions, HeatmapMetric, Listing, ListingFilter, Property};

pub const MAX_LOAN_TERM_YEARS: u32 = 50;
pub const MIN_YEAR_BUILT: i32 = 0;
pub const MAX_YEAR_BUILT: i32 = 3000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be a finite number >= 0")]
    NotNonNegative { field: &'static str },
    #[error("{field} must be between 0 and 1")]
    FractionOutOfRange { field: &'static str },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
    #[error("{field} must be >= 1")]
    ZeroCount { field: &'static str },
}

fn non_negative(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InputError::NotNonNegative { field })
    }
}

fn fraction(field: &'static str, value: f64) -> Result<(), InputError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(InputError::FractionOutOfRange { field })
    }
}

pub fn validate_year_built(year_built: i32) -> Result<(), InputError> {
    if (MIN_YEAR_BUILT..=MAX_YEAR_BUILT).contains(&year_built) {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field: "yearBuilt",
            min: i64::from(MIN_YEAR_BUILT),
            max: i64::from(MAX_YEAR_BUILT),
        })
    }
}

pub fn validate_property(property: &Property) -> Result<(), InputError> {
    non_negative("price", property.price)?;
    non_negative("sqft", property.sqft)?;
    non_negative("baths", property.baths)?;
    validate_year_built(property.year_built)?;
    non_negative("estimatedTaxes", property.estimated_taxes)?;
    non_negative("hoa", property.hoa)?;
    if property.units == 0 {
        return Err(InputError::ZeroCount { field: "units" });
    }
    if let Some(rent) = property.estimated_monthly_rent {
        non_negative("estimatedMonthlyRent", rent)?;
    }
    Ok(())
}

pub fn validate_assumptions(assumptions: &Assumptions) -> Result<(), InputError> {
    for (field, value) in [
        ("downPaymentPercent", assumptions.down_payment_percent),
        ("interestRate", assumptions.interest_rate),
        ("closingCostPercent", assumptions.closing_cost_percent),
        ("vacancyRate", assumptions.vacancy_rate),
        ("maintenancePercent", assumptions.maintenance_percent),
        ("capexPercent", assumptions.capex_percent),
        ("managementPercent", assumptions.management_percent),
        ("insuranceRate", assumptions.insurance_rate),
    ] {
        fraction(field, value)?;
    }

    if !(1..=MAX_LOAN_TERM_YEARS).contains(&assumptions.loan_term_years) {
        return Err(InputError::OutOfRange {
            field: "loanTermYears",
            min: 1,
            max: i64::from(MAX_LOAN_TERM_YEARS),
        });
    }

    non_negative("rehabBudget", assumptions.rehab_budget)?;
    if let Some(rent) = assumptions.estimated_rent {
        non_negative("estimatedRent", rent)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PropertyPayload {
    price: f64,
    #[serde(alias = "square_foot", alias = "squareFoot")]
    sqft: f64,
    #[serde(alias = "bed")]
    beds: u32,
    #[serde(alias = "bath")]
    baths: f64,
    #[serde(alias = "year_built")]
    year_built: i32,
    #[serde(default, alias = "estimated_taxes")]
    estimated_taxes: f64,
    #[serde(default)]
    hoa: f64,
    #[serde(default, alias = "number_of_units")]
    units: Option<u32>,
    #[serde(default, alias = "estimated_monthly_rent")]
    estimated_monthly_rent: Option<f64>,
}

impl PropertyPayload {
    pub(crate) fn into_property(self) -> Result<Property, InputError> {
        let property = Property {
            price: self.price,
            sqft: self.sqft,
            beds: self.beds,
            baths: self.baths,
            year_built: self.year_built,
            estimated_taxes: self.estimated_taxes,
            hoa: self.hoa,
            units: self.units.unwrap_or(1),
            estimated_monthly_rent: self.estimated_monthly_rent,
        };
        validate_property(&property)?;
        Ok(property)
    }
}

/// Partially specified assumptions; missing fields take the engine defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct AssumptionsPayload {
    #[serde(alias = "down_payment_percent")]
    down_payment_percent: Option<f64>,
    #[serde(alias = "interest_rate")]
    interest_rate: Option<f64>,
    #[serde(alias = "loan_term_years")]
    loan_term_years: Option<u32>,
    #[serde(alias = "closing_cost_percent")]
    closing_cost_percent: Option<f64>,
    #[serde(alias = "rehab_budget")]
    rehab_budget: Option<f64>,
    #[serde(alias = "vacancy_rate")]
    vacancy_rate: Option<f64>,
    #[serde(alias = "maintenance_percent")]
    maintenance_percent: Option<f64>,
    #[serde(alias = "capex_percent")]
    capex_percent: Option<f64>,
    #[serde(alias = "management_percent")]
    management_percent: Option<f64>,
    #[serde(alias = "insurance_rate")]
    insurance_rate: Option<f64>,
    #[serde(alias = "estimated_rent")]
    estimated_rent: Option<f64>,
}

impl AssumptionsPayload {
    pub(crate) fn into_assumptions(self) -> Result<Assumptions, InputError> {
        let mut assumptions = Assumptions::default();

        if let Some(v) = self.down_payment_percent {
            assumptions.down_payment_percent = v;
        }
        if let Some(v) = self.interest_rate {
            assumptions.interest_rate = v;
        }
        if let Some(v) = self.loan_term_years {
            assumptions.loan_term_years = v;
        }
        if let Some(v) = self.closing_cost_percent {
            assumptions.closing_cost_percent = v;
        }
        if let Some(v) = self.rehab_budget {
            assumptions.rehab_budget = v;
        }
        if let Some(v) = self.vacancy_rate {
            assumptions.vacancy_rate = v;
        }
        if let Some(v) = self.maintenance_percent {
            assumptions.maintenance_percent = v;
        }
        if let Some(v) = self.capex_percent {
            assumptions.capex_percent = v;
        }
        if let Some(v) = self.management_percent {
            assumptions.management_percent = v;
        }
        if let Some(v) = self.insurance_rate {
            assumptions.insurance_rate = v;
        }
        assumptions.estimated_rent = self.estimated_rent;

        validate_assumptions(&assumptions)?;
        Ok(assumptions)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListingPayload {
    id: i64,
    #[serde(default)]
    address: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    zip: String,
    latitude: f64,
    longitude: f64,
    #[serde(default = "default_status")]
    status: String,
    #[serde(default, alias = "home_type")]
    home_type: String,
    #[serde(default, alias = "days_on_market")]
    days_on_market: u32,
    #[serde(flatten)]
    property: PropertyPayload,
}

fn default_status() -> String {
    "For Sale".to_string()
}

impl ListingPayload {
    pub(crate) fn into_listing(self) -> Result<Listing, InputError> {
        Ok(Listing {
            id: self.id,
            address: self.address,
            city: self.city,
            state: self.state,
            zip: self.zip,
            latitude: self.latitude,
            longitude: self.longitude,
            status: self.status,
            home_type: self.home_type,
            days_on_market: self.days_on_market,
            property: self.property.into_property()?,
        })
    }
}

/// Filter criteria as sent by the browsing UI. "All" and "Any" mean no constraint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct FilterPayload {
    status: Option<String>,
    #[serde(alias = "home_type")]
    home_type: Option<String>,
    #[serde(alias = "priceMin", alias = "min_price")]
    min_price: Option<f64>,
    #[serde(alias = "priceMax", alias = "max_price")]
    max_price: Option<f64>,
    #[serde(alias = "bedsMin", alias = "min_beds")]
    min_beds: Option<u32>,
    #[serde(alias = "dealScoreMin", alias = "min_deal_score")]
    min_deal_score: Option<u8>,
}

fn unless_all(value: Option<String>) -> Option<String> {
    value.filter(|v| v != "All" && v != "Any")
}

impl From<FilterPayload> for ListingFilter {
    fn from(value: FilterPayload) -> Self {
        ListingFilter {
            status: unless_all(value.status),
            home_type: unless_all(value.home_type),
            min_price: value.min_price,
            max_price: value.max_price,
            min_beds: value.min_beds,
            min_deal_score: value.min_deal_score,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum ApiHeatmapMetric {
    #[serde(alias = "deal-score", alias = "deal_score")]
    DealScore,
    #[serde(alias = "cash-on-cash", alias = "cash_on_cash")]
    CashOnCash,
    #[serde(alias = "cap-rate", alias = "cap_rate")]
    CapRate,
    #[serde(alias = "days-on-market", alias = "days_on_market")]
    DaysOnMarket,
    #[serde(alias = "price-per-sqft", alias = "price_per_sqft")]
    PricePerSqft,
    #[serde(alias = "monthly-cash-flow", alias = "cash-flow", alias = "monthly_cash_flow")]
    MonthlyCashFlow,
}

impl From<ApiHeatmapMetric> for HeatmapMetric {
    fn from(value: ApiHeatmapMetric) -> Self {
        match value {
            ApiHeatmapMetric::DealScore => HeatmapMetric::DealScore,
            ApiHeatmapMetric::CashOnCash => HeatmapMetric::CashOnCash,
            ApiHeatmapMetric::CapRate => HeatmapMetric::CapRate,
            ApiHeatmapMetric::DaysOnMarket => HeatmapMetric::DaysOnMarket,
            ApiHeatmapMetric::PricePerSqft => HeatmapMetric::PricePerSqft,
            ApiHeatmapMetric::MonthlyCashFlow => HeatmapMetric::MonthlyCashFlow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_property() -> Property {
        Property {
            price: 250_000.0,
            sqft: 1_400.0,
            beds: 3,
            baths: 2.0,
            year_built: 1985,
            estimated_taxes: 4_800.0,
            hoa: 0.0,
            units: 1,
            estimated_monthly_rent: None,
        }
    }

    #[test]
    fn default_assumptions_are_valid() {
        assert_eq!(validate_assumptions(&Assumptions::default()), Ok(()));
    }

    #[test]
    fn empty_payload_yields_defaults() {
        let assumptions = serde_json::from_str::<AssumptionsPayload>("{}")
            .expect("empty object parses")
            .into_assumptions()
            .expect("defaults validate");
        assert_eq!(assumptions, Assumptions::default());
    }

    #[test]
    fn partial_payload_overrides_only_given_fields() {
        let json = r#"{ "interestRate": 0.065, "loan_term_years": 15, "estimatedRent": 2100 }"#;
        let assumptions = serde_json::from_str::<AssumptionsPayload>(json)
            .expect("payload parses")
            .into_assumptions()
            .expect("payload validates");

        assert_eq!(assumptions.interest_rate, 0.065);
        assert_eq!(assumptions.loan_term_years, 15);
        assert_eq!(assumptions.estimated_rent, Some(2_100.0));
        assert_eq!(assumptions.vacancy_rate, Assumptions::default().vacancy_rate);
    }

    #[test]
    fn rejects_fraction_above_one() {
        let assumptions = Assumptions {
            vacancy_rate: 8.0,
            ..Assumptions::default()
        };
        let err = validate_assumptions(&assumptions).expect_err("percent passed as fraction");
        assert_eq!(err, InputError::FractionOutOfRange { field: "vacancyRate" });
        assert_eq!(err.to_string(), "vacancyRate must be between 0 and 1");
    }

    #[test]
    fn rejects_zero_loan_term() {
        let assumptions = Assumptions {
            loan_term_years: 0,
            ..Assumptions::default()
        };
        let err = validate_assumptions(&assumptions).expect_err("zero term");
        assert!(err.to_string().contains("loanTermYears"));
    }

    #[test]
    fn rejects_negative_price_and_nan_area() {
        let property = Property {
            price: -1.0,
            ..sample_property()
        };
        let err = validate_property(&property).expect_err("negative price");
        assert_eq!(err, InputError::NotNonNegative { field: "price" });

        let property = Property {
            sqft: f64::NAN,
            ..sample_property()
        };
        let err = validate_property(&property).expect_err("nan area");
        assert_eq!(err, InputError::NotNonNegative { field: "sqft" });
    }

    #[test]
    fn rejects_build_year_outside_calendar_range() {
        let property = Property {
            year_built: i32::MIN,
            ..sample_property()
        };
        let err = validate_property(&property).expect_err("absurd build year");
        assert_eq!(
            err,
            InputError::OutOfRange {
                field: "yearBuilt",
                min: 0,
                max: 3000,
            }
        );
        assert_eq!(err.to_string(), "yearBuilt must be between 0 and 3000");
        assert!(validate_year_built(MAX_YEAR_BUILT + 1).is_err());
        assert_eq!(validate_year_built(MIN_YEAR_BUILT), Ok(()));
    }

    #[test]
    fn zero_price_is_accepted() {
        let property = Property {
            price: 0.0,
            ..sample_property()
        };
        assert_eq!(validate_property(&property), Ok(()));
    }

    #[test]
    fn rejects_zero_units() {
        let property = Property {
            units: 0,
            ..sample_property()
        };
        assert_eq!(
            validate_property(&property),
            Err(InputError::ZeroCount { field: "units" })
        );
    }

    #[test]
    fn property_payload_accepts_database_column_names() {
        let json = r#"{
          "price": 199000,
          "square_foot": 1250,
          "bed": 3,
          "bath": 1.5,
          "year_built": 1972,
          "estimated_taxes": 3900,
          "number_of_units": 2
        }"#;
        let property = serde_json::from_str::<PropertyPayload>(json)
            .expect("payload parses")
            .into_property()
            .expect("payload validates");
        assert_eq!(property.sqft, 1_250.0);
        assert_eq!(property.beds, 3);
        assert_eq!(property.baths, 1.5);
        assert_eq!(property.units, 2);
        assert_eq!(property.hoa, 0.0);
        assert_eq!(property.estimated_monthly_rent, None);
    }

    #[test]
    fn filter_payload_treats_all_and_any_as_unset() {
        let json = r#"{ "status": "All", "homeType": "Condo", "bedsMin": 2, "dealScoreMin": 50 }"#;
        let filter: ListingFilter = serde_json::from_str::<FilterPayload>(json)
            .expect("filter parses")
            .into();
        assert_eq!(filter.status, None);
        assert_eq!(filter.home_type.as_deref(), Some("Condo"));
        assert_eq!(filter.min_beds, Some(2));
        assert_eq!(filter.min_deal_score, Some(50));
    }

    #[test]
    fn metric_accepts_camel_and_kebab_names() {
        let camel: ApiHeatmapMetric = serde_json::from_str(r#""monthlyCashFlow""#).expect("camel");
        let kebab: ApiHeatmapMetric = serde_json::from_str(r#""cash-flow""#).expect("kebab");
        assert_eq!(camel, ApiHeatmapMetric::MonthlyCashFlow);
        assert_eq!(kebab, ApiHeatmapMetric::MonthlyCashFlow);
        assert_eq!(
            HeatmapMetric::from(ApiHeatmapMetric::PricePerSqft),
            HeatmapMetric::PricePerSqft
        );
    }
}
