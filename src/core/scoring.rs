use super::types::Dscr;

/// Score bands, highest first. Only the first matching band of each metric counts.
const CASH_ON_CASH_BANDS: [(f64, u8); 3] = [(0.12, 30), (0.08, 20), (0.05, 10)];
const CAP_RATE_BANDS: [(f64, u8); 3] = [(0.08, 25), (0.06, 15), (0.04, 5)];
const DSCR_BANDS: [(f64, u8); 3] = [(1.5, 20), (1.25, 15), (1.0, 5)];
const ONE_PERCENT_PASS_POINTS: u8 = 15;
const NEAR_ONE_PERCENT_RATIO: f64 = 0.008;
const NEAR_ONE_PERCENT_POINTS: u8 = 8;
const CASH_FLOW_BANDS: [(f64, u8); 2] = [(300.0, 10), (200.0, 5)];

pub const MAX_DEAL_SCORE: u8 = 100;

fn band_points(value: f64, bands: &[(f64, u8)]) -> u8 {
    bands
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map_or(0, |(_, points)| *points)
}

/// Composite 0..=100 deal score from the return metrics.
pub fn deal_score(
    cash_on_cash: f64,
    cap_rate: f64,
    dscr: Dscr,
    passes_one_percent: bool,
    one_percent_rule: f64,
    monthly_cash_flow: f64,
) -> u8 {
    let dscr_points = DSCR_BANDS
        .iter()
        .find(|(threshold, _)| dscr.at_least(*threshold))
        .map_or(0, |(_, points)| *points);

    let one_percent_points = if passes_one_percent {
        ONE_PERCENT_PASS_POINTS
    } else if one_percent_rule >= NEAR_ONE_PERCENT_RATIO {
        NEAR_ONE_PERCENT_POINTS
    } else {
        0
    };

    band_points(cash_on_cash, &CASH_ON_CASH_BANDS)
        + band_points(cap_rate, &CAP_RATE_BANDS)
        + dscr_points
        + one_percent_points
        + band_points(monthly_cash_flow, &CASH_FLOW_BANDS)
}
