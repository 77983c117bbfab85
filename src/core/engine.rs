use rayon::prelude::*;

use super::rent::{current_year, estimate_rent_as_of};
use super::scoring::deal_score;
use super::types::{
    AnalysisResult, Assumptions, DealRating, Dscr, ExpenseBreakdown, Property, RentSource,
    ReturnMetrics,
};

const MONTHS_PER_YEAR: f64 = 12.0;
const ONE_PERCENT_RULE: f64 = 0.01;

#[derive(Debug, Clone, Copy)]
struct LoanTerms {
    down_payment: f64,
    loan_amount: f64,
    closing_costs: f64,
    total_cash_invested: f64,
    monthly_payment: f64,
}

impl LoanTerms {
    fn new(price: f64, assumptions: &Assumptions) -> Self {
        let down_payment = price * assumptions.down_payment_percent;
        let loan_amount = price - down_payment;
        let closing_costs = price * assumptions.closing_cost_percent;
        Self {
            down_payment,
            loan_amount,
            closing_costs,
            total_cash_invested: down_payment + closing_costs + assumptions.rehab_budget,
            monthly_payment: monthly_payment(
                loan_amount,
                assumptions.interest_rate,
                assumptions.loan_term_years,
            ),
        }
    }
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Level monthly payment (principal and interest) on a fixed-rate loan.
pub fn monthly_payment(principal: f64, annual_rate: f64, term_years: u32) -> f64 {
    let num_payments = term_years.saturating_mul(12);
    if num_payments == 0 {
        return 0.0;
    }
    let n = f64::from(num_payments);
    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    if monthly_rate == 0.0 {
        return principal / n;
    }

    let growth = (1.0 + monthly_rate).powi(i32::try_from(num_payments).unwrap_or(i32::MAX));
    if growth - 1.0 <= 0.0 {
        // Rate too small to move (1 + r)^n off 1.0 in f64.
        return principal / n;
    }
    principal * (monthly_rate * growth) / (growth - 1.0)
}

pub fn monthly_expenses(
    property: &Property,
    assumptions: &Assumptions,
    monthly_rent: f64,
) -> ExpenseBreakdown {
    let taxes = property.estimated_taxes / MONTHS_PER_YEAR;
    let insurance = property.price * assumptions.insurance_rate / MONTHS_PER_YEAR;
    let hoa = property.hoa;
    let maintenance = property.price * assumptions.maintenance_percent / MONTHS_PER_YEAR;
    let capex = property.price * assumptions.capex_percent / MONTHS_PER_YEAR;
    let management = monthly_rent * assumptions.management_percent;

    ExpenseBreakdown {
        taxes,
        insurance,
        hoa,
        maintenance,
        capex,
        management,
        total: taxes + insurance + hoa + maintenance + capex + management,
    }
}

/// Income, cash flow and return ratios. Every zero denominator yields 0 except
/// DSCR, which reports [`Dscr::NoDebt`] when there is no debt service.
pub fn return_metrics(
    price: f64,
    monthly_rent: f64,
    expenses: &ExpenseBreakdown,
    monthly_debt_service: f64,
    vacancy_rate: f64,
    total_cash_invested: f64,
) -> ReturnMetrics {
    let effective_gross_income = monthly_rent * (1.0 - vacancy_rate);
    let monthly_noi = effective_gross_income - expenses.total;
    let annual_noi = monthly_noi * MONTHS_PER_YEAR;
    let monthly_cash_flow = monthly_noi - monthly_debt_service;
    let annual_cash_flow = monthly_cash_flow * MONTHS_PER_YEAR;

    let annual_debt_service = monthly_debt_service * MONTHS_PER_YEAR;
    let dscr = if annual_debt_service == 0.0 {
        Dscr::NoDebt
    } else {
        Dscr::Ratio(annual_noi / annual_debt_service)
    };

    let one_percent_rule = ratio_or_zero(monthly_rent, price);

    ReturnMetrics {
        effective_gross_income,
        monthly_noi,
        annual_noi,
        monthly_cash_flow,
        annual_cash_flow,
        cap_rate: ratio_or_zero(annual_noi, price),
        cash_on_cash: ratio_or_zero(annual_cash_flow, total_cash_invested),
        dscr,
        break_even_occupancy: ratio_or_zero(expenses.total + monthly_debt_service, monthly_rent),
        one_percent_rule,
        passes_one_percent: one_percent_rule >= ONE_PERCENT_RULE,
    }
}

fn resolve_rent(
    property: &Property,
    assumptions: &Assumptions,
    as_of_year: i32,
) -> (f64, RentSource) {
    if let Some(rent) = assumptions.estimated_rent.filter(|rent| *rent > 0.0) {
        return (rent, RentSource::Override);
    }
    if let Some(rent) = property.estimated_monthly_rent.filter(|rent| *rent > 0.0) {
        return (rent, RentSource::Listing);
    }
    let per_unit = estimate_rent_as_of(
        property.sqft,
        property.beds,
        property.baths,
        property.year_built,
        as_of_year,
    );
    (per_unit * f64::from(property.units.max(1)), RentSource::Estimated)
}

pub fn analyze(property: &Property, assumptions: &Assumptions) -> AnalysisResult {
    analyze_as_of(property, assumptions, current_year())
}

/// Full deal analysis with any heuristic rent estimate aged against `as_of_year`.
pub fn analyze_as_of(
    property: &Property,
    assumptions: &Assumptions,
    as_of_year: i32,
) -> AnalysisResult {
    let loan = LoanTerms::new(property.price, assumptions);
    let (monthly_rent, rent_source) = resolve_rent(property, assumptions, as_of_year);
    let expenses = monthly_expenses(property, assumptions, monthly_rent);
    let returns = return_metrics(
        property.price,
        monthly_rent,
        &expenses,
        loan.monthly_payment,
        assumptions.vacancy_rate,
        loan.total_cash_invested,
    );
    let score = deal_score(
        returns.cash_on_cash,
        returns.cap_rate,
        returns.dscr,
        returns.passes_one_percent,
        returns.one_percent_rule,
        returns.monthly_cash_flow,
    );

    AnalysisResult {
        down_payment: loan.down_payment,
        loan_amount: loan.loan_amount,
        closing_costs: loan.closing_costs,
        total_cash_invested: loan.total_cash_invested,
        monthly_mortgage: loan.monthly_payment,
        monthly_rent,
        rent_source,
        effective_gross_income: returns.effective_gross_income,
        expenses,
        monthly_noi: returns.monthly_noi,
        annual_noi: returns.annual_noi,
        monthly_cash_flow: returns.monthly_cash_flow,
        annual_cash_flow: returns.annual_cash_flow,
        cap_rate: returns.cap_rate,
        cash_on_cash: returns.cash_on_cash,
        dscr: returns.dscr,
        break_even_occupancy: returns.break_even_occupancy,
        one_percent_rule: returns.one_percent_rule,
        passes_one_percent: returns.passes_one_percent,
        deal_score: score,
        deal_rating: DealRating::from_score(score),
    }
}

/// Analyzes every property under the same assumptions, in parallel. Output
/// order matches input order.
pub fn analyze_many(properties: &[Property], assumptions: &Assumptions) -> Vec<AnalysisResult> {
    let as_of_year = current_year();
    properties
        .par_iter()
        .map(|property| analyze_as_of(property, assumptions, as_of_year))
        .collect()
}
