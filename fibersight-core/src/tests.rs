//! Unit coverage for identifiers, tiers, and percentile normalisation.
#![expect(
    clippy::expect_used,
    clippy::float_cmp,
    reason = "tests should fail fast and assert exact rank fractions"
)]

use rstest::rstest;

use crate::{
    CountyId, Direction, Geoid, GeoidError, RuralityCode, Tier, percentile_fractions,
    percentile_scores,
};

#[rstest]
fn geoid_derives_county_prefix() {
    let geoid = Geoid::new("48453001100").expect("valid geoid");
    assert_eq!(geoid.county().as_str(), "48453");
    assert_eq!(geoid.to_string(), "48453001100");
}

#[rstest]
#[case("4845300110")]
#[case("484530011000")]
#[case("")]
fn geoid_rejects_wrong_length(#[case] value: &str) {
    let error = Geoid::new(value).expect_err("length should be rejected");
    assert!(matches!(error, GeoidError::InvalidLength { .. }));
}

#[rstest]
fn geoid_rejects_non_digits() {
    let error = Geoid::new("4845300110X").expect_err("letters should be rejected");
    assert!(matches!(error, GeoidError::NonDigit { .. }));
}

#[rstest]
fn county_id_zero_pads_short_fips() {
    let county = CountyId::new("1001").expect("valid fips");
    assert_eq!(county.as_str(), "01001");
}

#[rstest]
fn county_id_rejects_non_numeric() {
    assert!(CountyId::new("12a45").is_err());
}

#[rstest]
#[case(1)]
#[case(9)]
fn rurality_code_accepts_scale(#[case] code: u8) {
    assert_eq!(RuralityCode::new(code).expect("in range").get(), code);
}

#[rstest]
#[case(0)]
#[case(10)]
fn rurality_code_rejects_out_of_scale(#[case] code: u8) {
    assert!(RuralityCode::new(code).is_err());
}

#[rstest]
#[case(0.0, Tier::Low)]
#[case(30.0, Tier::Low)]
#[case(30.000_001, Tier::BelowAverage)]
#[case(50.0, Tier::BelowAverage)]
#[case(50.000_001, Tier::Moderate)]
#[case(65.0, Tier::Moderate)]
#[case(65.000_001, Tier::High)]
#[case(80.0, Tier::High)]
#[case(80.000_001, Tier::VeryHigh)]
#[case(100.0, Tier::VeryHigh)]
fn tier_cut_points_are_right_inclusive(#[case] score: f64, #[case] expected: Tier) {
    assert_eq!(Tier::from_score(score), expected);
}

#[rstest]
fn tier_labels_match_display() {
    assert_eq!(Tier::BelowAverage.to_string(), "Below Average");
    assert_eq!(Tier::VeryHigh.label(), "Very High");
}

#[rstest]
fn percentiles_span_distinct_values() {
    let column = [Some(5.0), Some(1.0), Some(3.0), Some(4.0)];
    let scores = percentile_scores(&column, Direction::HigherIsBetter);
    assert_eq!(scores, vec![100.0, 25.0, 50.0, 75.0]);
}

#[rstest]
fn percentiles_invert_exactly() {
    let column = [Some(5.0), Some(1.0), None, Some(4.0)];
    let ascending = percentile_scores(&column, Direction::HigherIsBetter);
    let descending = percentile_scores(&column, Direction::LowerIsBetter);
    for (asc, desc) in ascending.iter().zip(descending.iter()) {
        assert!((asc + desc - 100.0).abs() < 1e-9);
    }
}

#[rstest]
fn tied_values_share_average_rank() {
    let column = [Some(2.0), Some(2.0), Some(1.0), Some(3.0)];
    let fractions = percentile_fractions(&column);
    // Ranks 2 and 3 average to 2.5 of 4.
    assert_eq!(fractions, vec![0.625, 0.625, 0.25, 1.0]);
}

#[rstest]
fn missing_values_sort_below_every_real_value() {
    let column = [None, Some(-10.0), None, Some(4.0)];
    let fractions = percentile_fractions(&column);
    // The two missing cells tie at ranks 1 and 2 (average 1.5 of 4).
    assert_eq!(fractions, vec![0.375, 0.75, 0.375, 1.0]);
}

#[rstest]
fn non_finite_values_are_treated_as_missing() {
    let column = [Some(f64::NAN), Some(1.0)];
    let fractions = percentile_fractions(&column);
    assert_eq!(fractions, vec![0.5, 1.0]);
}

#[rstest]
fn empty_column_yields_empty_scores() {
    assert!(percentile_scores(&[], Direction::HigherIsBetter).is_empty());
}
