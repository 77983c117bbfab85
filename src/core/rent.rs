use chrono::{Datelike, Local};

const BASE_RENT_PER_SQFT: f64 = 1.2;
const NEW_BUILD_MAX_AGE: i32 = 10;
const MID_AGE_MAX_AGE: i32 = 30;
const NEW_BUILD_FACTOR: f64 = 1.15;
const MID_AGE_FACTOR: f64 = 1.0;
const OLD_BUILD_FACTOR: f64 = 0.9;
const BEDROOM_PREMIUM: f64 = 100.0;
const BATHROOM_PREMIUM: f64 = 50.0;

pub fn current_year() -> i32 {
    Local::now().year()
}

/// Heuristic monthly rent for a single unit, priced against this calendar year.
pub fn estimate_rent(sqft: f64, beds: u32, baths: f64, year_built: i32) -> f64 {
    estimate_rent_as_of(sqft, beds, baths, year_built, current_year())
}

/// Heuristic monthly rent for a single unit with the building age measured
/// from `as_of_year`.
///
/// Rate per square foot is scaled by building age, then adjusted by a flat
/// premium (or discount) per bedroom away from two and per bathroom away from
/// one. The result is rounded to whole currency units and floored at zero.
pub fn estimate_rent_as_of(
    sqft: f64,
    beds: u32,
    baths: f64,
    year_built: i32,
    as_of_year: i32,
) -> f64 {
    let age = as_of_year.saturating_sub(year_built);
    let age_factor = if age < NEW_BUILD_MAX_AGE {
        NEW_BUILD_FACTOR
    } else if age < MID_AGE_MAX_AGE {
        MID_AGE_FACTOR
    } else {
        OLD_BUILD_FACTOR
    };

    let mut rent = sqft * BASE_RENT_PER_SQFT * age_factor;
    rent += (f64::from(beds) - 2.0) * BEDROOM_PREMIUM;
    rent += (baths - 1.0) * BATHROOM_PREMIUM;

    rent.round().max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    #[test]
    fn new_build_gets_age_premium() {
        // 1500 * 1.2 * 1.15 + 1 * 100 + 1 * 50
        assert_eq!(estimate_rent_as_of(1500.0, 3, 2.0, 2020, 2024), 2220.0);
    }

    #[test]
    fn mid_age_uses_base_rate() {
        assert_eq!(estimate_rent_as_of(1000.0, 2, 1.0, 2004, 2024), 1200.0);
    }

    #[test]
    fn age_bands_switch_at_ten_and_thirty_years() {
        assert_eq!(estimate_rent_as_of(1000.0, 2, 1.0, 2015, 2024), 1380.0);
        assert_eq!(estimate_rent_as_of(1000.0, 2, 1.0, 2014, 2024), 1200.0);
        assert_eq!(estimate_rent_as_of(1000.0, 2, 1.0, 1995, 2024), 1200.0);
        assert_eq!(estimate_rent_as_of(1000.0, 2, 1.0, 1994, 2024), 1080.0);
    }

    #[test]
    fn small_units_are_discounted_below_two_beds() {
        // 600 * 1.2 * 0.9 - 100 = 548
        assert_eq!(estimate_rent_as_of(600.0, 1, 1.0, 1960, 2024), 548.0);
    }

    #[test]
    fn half_baths_contribute_half_premium() {
        assert_eq!(estimate_rent_as_of(1000.0, 2, 2.5, 2004, 2024), 1275.0);
    }

    #[test]
    fn current_year_estimate_matches_pinned_year() {
        assert_eq!(
            estimate_rent(1000.0, 2, 1.0, 1900),
            estimate_rent_as_of(1000.0, 2, 1.0, 1900, current_year())
        );
    }

    #[test]
    fn extreme_build_years_saturate_age() {
        assert_eq!(estimate_rent_as_of(1000.0, 2, 1.0, i32::MIN, 2024), 1080.0);
        assert_eq!(estimate_rent_as_of(1000.0, 2, 1.0, i32::MAX, i32::MIN), 1380.0);
    }

    #[test]
    fn studio_with_tiny_area_floors_at_zero() {
        assert_eq!(estimate_rent_as_of(10.0, 0, 0.0, 1900, 2024), 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_estimate_is_whole_and_non_negative(
            sqft in 0u32..8_000,
            beds in 0u32..8,
            half_baths in 0u32..12,
            year_built in 1880i32..2030,
        ) {
            let rent = estimate_rent_as_of(sqft as f64, beds, half_baths as f64 / 2.0, year_built, 2024);
            prop_assert!(rent >= 0.0);
            prop_assert_eq!(rent, rent.round());
        }

        #[test]
        fn prop_more_area_never_lowers_rent(
            sqft in 0u32..8_000,
            extra in 1u32..2_000,
            beds in 0u32..8,
            year_built in 1880i32..2030,
        ) {
            let base = estimate_rent_as_of(sqft as f64, beds, 1.0, year_built, 2024);
            let bigger = estimate_rent_as_of((sqft + extra) as f64, beds, 1.0, year_built, 2024);
            prop_assert!(bigger >= base);
        }
    }
}
