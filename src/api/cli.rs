use std::net::IpAddr;

use clap::{Args, Parser, Subcommand};

use super::input::{InputError, validate_assumptions, validate_property};
use crate::core::{AnalysisResult, Assumptions, Property, analyze, analyze_as_of};

#[derive(Parser, Debug)]
#[command(
    name = "deal-finder",
    version,
    about = "Rental property deal analysis: mortgage, cash flow, return ratios and deal score"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the analysis HTTP API
    Serve(ServeArgs),
    /// Analyze a single property and print the result as JSON
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,
    #[arg(long, default_value_t = 8000)]
    pub port: u16,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub property: PropertyArgs,
    #[command(flatten)]
    pub assumptions: AssumptionArgs,
    #[arg(
        long,
        help = "Year to measure building age from for the rent heuristic; defaults to this year"
    )]
    pub as_of_year: Option<i32>,
    #[arg(long, help = "Pretty-print the JSON result")]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PropertyArgs {
    #[arg(long, help = "Purchase price")]
    pub price: f64,
    #[arg(long, help = "Living area in square feet")]
    pub sqft: f64,
    #[arg(long)]
    pub beds: u32,
    #[arg(long, help = "Bathrooms; half baths as .5")]
    pub baths: f64,
    #[arg(long)]
    pub year_built: i32,
    #[arg(long, default_value_t = 0.0, help = "Annual property tax estimate")]
    pub taxes: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly HOA dues")]
    pub hoa: f64,
    #[arg(long, default_value_t = 1, help = "Rentable units in the building")]
    pub units: u32,
    #[arg(long, help = "Monthly rent estimate carried by the listing")]
    pub listing_rent: Option<f64>,
}

impl From<PropertyArgs> for Property {
    fn from(value: PropertyArgs) -> Self {
        Property {
            price: value.price,
            sqft: value.sqft,
            beds: value.beds,
            baths: value.baths,
            year_built: value.year_built,
            estimated_taxes: value.taxes,
            hoa: value.hoa,
            units: value.units,
            estimated_monthly_rent: value.listing_rent,
        }
    }
}

/// Assumption flags. Rates are given in percent.
#[derive(Args, Debug, Clone)]
pub struct AssumptionArgs {
    #[arg(long, default_value_t = 25.0, help = "Down payment in percent of price")]
    pub down_payment: f64,
    #[arg(long, default_value_t = 7.0, help = "Annual mortgage interest rate in percent")]
    pub interest_rate: f64,
    #[arg(long, default_value_t = 30)]
    pub loan_term_years: u32,
    #[arg(long, default_value_t = 3.0, help = "Closing costs in percent of price")]
    pub closing_costs: f64,
    #[arg(long, default_value_t = 0.0, help = "One-time rehab budget")]
    pub rehab_budget: f64,
    #[arg(long, default_value_t = 8.0, help = "Vacancy in percent of rent")]
    pub vacancy: f64,
    #[arg(
        long,
        default_value_t = 1.0,
        help = "Annual maintenance in percent of price"
    )]
    pub maintenance: f64,
    #[arg(
        long,
        default_value_t = 1.0,
        help = "Annual capital expenditure reserve in percent of price"
    )]
    pub capex: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Property management fee in percent of rent"
    )]
    pub management: f64,
    #[arg(long, default_value_t = 0.5, help = "Annual insurance in percent of price")]
    pub insurance: f64,
    #[arg(long, help = "Monthly rent to use instead of any estimate")]
    pub rent: Option<f64>,
}

impl From<AssumptionArgs> for Assumptions {
    fn from(value: AssumptionArgs) -> Self {
        Assumptions {
            down_payment_percent: value.down_payment / 100.0,
            interest_rate: value.interest_rate / 100.0,
            loan_term_years: value.loan_term_years,
            closing_cost_percent: value.closing_costs / 100.0,
            rehab_budget: value.rehab_budget,
            vacancy_rate: value.vacancy / 100.0,
            maintenance_percent: value.maintenance / 100.0,
            capex_percent: value.capex / 100.0,
            management_percent: value.management / 100.0,
            insurance_rate: value.insurance / 100.0,
            estimated_rent: value.rent,
        }
    }
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<AnalysisResult, InputError> {
    let property = Property::from(args.property);
    let assumptions = Assumptions::from(args.assumptions);
    validate_property(&property)?;
    validate_assumptions(&assumptions)?;

    Ok(match args.as_of_year {
        Some(year) => analyze_as_of(&property, &assumptions, year),
        None => analyze(&property, &assumptions),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    fn analyze_args(cli: Cli) -> AnalyzeArgs {
        match cli.command {
            Command::Analyze(args) => args,
            other => panic!("expected analyze, got {other:?}"),
        }
    }

    #[test]
    fn assumption_defaults_match_engine_defaults() {
        let cli = parse(&[
            "deal-finder", "analyze", "--price", "300000", "--sqft", "1800", "--beds", "3",
            "--baths", "2", "--year-built", "1998",
        ]);
        let args = analyze_args(cli);
        assert_eq!(Assumptions::from(args.assumptions), Assumptions::default());
    }

    #[test]
    fn percent_flags_are_converted_to_fractions() {
        let cli = parse(&[
            "deal-finder", "analyze", "--price", "300000", "--sqft", "1800", "--beds", "3",
            "--baths", "2", "--year-built", "1998", "--interest-rate", "6.5", "--vacancy", "5",
            "--rent", "2500",
        ]);
        let assumptions = Assumptions::from(analyze_args(cli).assumptions);
        assert!((assumptions.interest_rate - 0.065).abs() < 1e-12);
        assert!((assumptions.vacancy_rate - 0.05).abs() < 1e-12);
        assert_eq!(assumptions.estimated_rent, Some(2_500.0));
    }

    #[test]
    fn run_analyze_reports_validation_errors() {
        let cli = parse(&[
            "deal-finder", "analyze", "--price", "300000", "--sqft", "1800", "--beds", "3",
            "--baths", "2", "--year-built", "1998", "--down-payment", "120",
        ]);
        let err = run_analyze(analyze_args(cli)).expect_err("down payment above 100%");
        assert_eq!(
            err,
            InputError::FractionOutOfRange {
                field: "downPaymentPercent"
            }
        );
    }

    #[test]
    fn run_analyze_rejects_absurd_build_year() {
        let cli = parse(&[
            "deal-finder", "analyze", "--price", "300000", "--sqft", "1800", "--beds", "3",
            "--baths", "2", "--year-built=-2147483648",
        ]);
        let err = run_analyze(analyze_args(cli)).expect_err("build year out of range");
        assert!(err.to_string().starts_with("yearBuilt must be between"));
    }

    #[test]
    fn run_analyze_pins_rent_year() {
        let cli = parse(&[
            "deal-finder", "analyze", "--price", "300000", "--sqft", "1800", "--beds", "3",
            "--baths", "2", "--year-built", "1998", "--as-of-year", "2024",
        ]);
        let result = run_analyze(analyze_args(cli)).expect("valid input");
        assert_eq!(result.monthly_rent, 2_310.0);
    }

    #[test]
    fn serve_defaults() {
        let cli = parse(&["deal-finder", "serve"]);
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, 8000);
                assert_eq!(args.host, IpAddr::from([0, 0, 0, 0]));
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }
}
