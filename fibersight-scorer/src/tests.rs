//! Unit coverage for metrics, engines, and composite aggregation.
#![expect(
    clippy::expect_used,
    clippy::float_cmp,
    reason = "tests should fail fast and assert exact derived values"
)]

use rstest::rstest;

use fibersight_core::{Geoid, RuralityCode, SubScores, Tier, TractRecord};

use crate::composite::blend_composite;
use crate::engines::{
    build_feasibility, demand_signal, density_bucket, income_component, rurality_score,
};
use crate::{ScoreError, derive_metrics, score_tracts};

fn record(raw_geoid: &str) -> TractRecord {
    let geoid = Geoid::new(raw_geoid).expect("valid geoid");
    let county = geoid.county();
    TractRecord {
        geoid,
        county,
        state: "AL".to_owned(),
        county_name: "Autauga County".to_owned(),
        total_population: 1_000.0,
        hh_total: 400.0,
        hh_broadband_any: 200.0,
        hh_cellular_only: 40.0,
        hh_cable_fiber_dsl: 150.0,
        hh_no_internet: 80.0,
        median_hh_income: Some(45_000.0),
        edu_total_25plus: 700.0,
        edu_bachelors: 100.0,
        edu_masters: 50.0,
        edu_professional: 10.0,
        edu_doctorate: 5.0,
        emp_civilian_labor: 500.0,
        emp_unemployed: 25.0,
        race_total: 1_000.0,
        race_nh_white: 600.0,
        comp_total_hh: 400.0,
        comp_no_computer: 30.0,
        total_bsls: 500.0,
        unserved_bsls: 50.0,
        underserved_bsls: 100.0,
        served_bsls: 350.0,
        unserved_bsls_copper: 20.0,
        underserved_bsls_copper: 40.0,
        served_bsls_copper: 120.0,
        unserved_bsls_cable: 15.0,
        underserved_bsls_cable: 25.0,
        served_bsls_cable: 200.0,
        unserved_bsls_fiber: 30.0,
        underserved_bsls_fiber: 10.0,
        served_bsls_fiber: 100.0,
        unserved_bsls_ltfw: 5.0,
        underserved_bsls_ltfw: 10.0,
        served_bsls_ltfw: 30.0,
        unique_providers: 3.0,
        unique_providers_copper: 2.0,
        unique_providers_cable: 1.0,
        unique_providers_fiber: 1.0,
        unique_providers_ltfw: 1.0,
        rurality: Some(RuralityCode::new(4).expect("valid code")),
        county_population: Some(50_000.0),
    }
}

#[rstest]
fn metrics_compute_supply_and_demand_ratios() {
    let metrics = derive_metrics(&record("01001020100"));
    assert_eq!(metrics.pct_unserved, Some(10.0));
    assert_eq!(metrics.pct_unserved_underserved, Some(30.0));
    assert_eq!(metrics.pct_no_fiber, Some(80.0));
    assert_eq!(metrics.pct_copper_served, Some(24.0));
    assert!(metrics.has_fiber);
    assert_eq!(metrics.pct_no_internet, Some(20.0));
    assert_eq!(metrics.pct_served, Some(70.0));
    // 70% of locations served against 50% of households subscribed.
    assert_eq!(metrics.adoption_gap, Some(20.0));
    assert_eq!(metrics.unemployment_rate, Some(5.0));
    assert_eq!(metrics.pct_minority, Some(40.0));
    assert_eq!(metrics.hh_per_bsl, Some(0.8));
}

#[rstest]
fn metrics_guard_zero_denominators() {
    let mut tract = record("01001020100");
    tract.edu_total_25plus = 0.0;
    tract.emp_civilian_labor = 0.0;
    tract.race_total = 0.0;
    tract.comp_total_hh = 0.0;
    let metrics = derive_metrics(&tract);
    assert_eq!(metrics.pct_bachelors_plus, None);
    assert_eq!(metrics.unemployment_rate, None);
    assert_eq!(metrics.pct_minority, None);
    assert_eq!(metrics.pct_no_computer, None);
}

#[rstest]
fn metrics_pass_anomalous_ratios_unclamped() {
    let mut tract = record("01001020100");
    tract.unserved_bsls = 600.0;
    let metrics = derive_metrics(&tract);
    assert_eq!(metrics.pct_unserved, Some(120.0));
}

#[rstest]
fn adoption_gap_may_be_negative() {
    let mut tract = record("01001020100");
    tract.hh_broadband_any = 380.0;
    let metrics = derive_metrics(&tract);
    // 70% of locations served against 95% of households subscribed.
    assert_eq!(metrics.adoption_gap, Some(-25.0));
}

#[rstest]
fn negative_adoption_gap_is_clipped_before_ranking() {
    let mut oversubscribed = record("01001020100");
    // 70% of locations served against 80% of households subscribed.
    oversubscribed.hh_broadband_any = 320.0;
    let mut saturated = record("01001020200");
    // 70% served against exactly 70% subscribed.
    saturated.hh_broadband_any = 280.0;

    let records = vec![oversubscribed, saturated];
    let metrics: Vec<_> = records.iter().map(derive_metrics).collect();
    assert_eq!(metrics.first().and_then(|m| m.adoption_gap), Some(-10.0));
    assert_eq!(metrics.get(1).and_then(|m| m.adoption_gap), Some(0.0));

    // Both gaps clip to zero and no other demand column differs, so the
    // two tracts tie on the demand signal.
    let scores = demand_signal(&records, &metrics);
    assert_eq!(scores.first(), scores.get(1));
}

#[rstest]
fn no_fiber_providers_means_no_fiber() {
    let mut tract = record("01001020100");
    tract.unique_providers_fiber = 0.0;
    assert!(!derive_metrics(&tract).has_fiber);
}

#[rstest]
#[case(1, 20.0)]
#[case(2, 35.0)]
#[case(3, 55.0)]
#[case(4, 85.0)]
#[case(5, 75.0)]
#[case(6, 90.0)]
#[case(7, 70.0)]
#[case(8, 60.0)]
#[case(9, 40.0)]
fn rurality_sweet_spot_lookup(#[case] code: u8, #[case] expected: f64) {
    let code = RuralityCode::new(code).expect("valid code");
    assert_eq!(rurality_score(Some(code)), expected);
}

#[rstest]
fn unmapped_rurality_scores_neutral() {
    assert_eq!(rurality_score(None), 50.0);
}

#[rstest]
#[case(0.05, 20.0)]
#[case(0.1, 50.0)]
#[case(0.299, 50.0)]
#[case(0.3, 85.0)]
#[case(0.699, 85.0)]
#[case(0.7, 60.0)]
#[case(0.9, 30.0)]
#[case(1.0, 30.0)]
fn density_buckets_prefer_moderate_markets(#[case] fraction: f64, #[case] expected: f64) {
    assert_eq!(density_bucket(fraction), expected);
}

#[rstest]
fn missing_income_is_imputed_with_the_population_median() {
    let mut low = record("01001020100");
    low.median_hh_income = Some(20_000.0);
    let mut high = record("01001020200");
    high.median_hh_income = Some(28_000.0);
    let mut absent = record("01001020300");
    absent.median_hh_income = None;

    let scores = income_component(&[low, high, absent]);

    // The absent income is filled with the median of 20k and 28k (24k),
    // ranking it between the two; every filled income sits below the
    // affordability threshold, so all three percentiles are halved.
    let expected = [100.0 / 6.0, 50.0, 100.0 / 3.0];
    for (score, want) in scores.iter().zip(expected) {
        assert!((score - want).abs() < 1e-9, "got {score}, want {want}");
    }
}

#[rstest]
fn low_income_penalty_halves_the_income_component() {
    let mut poor = record("01001020100");
    poor.median_hh_income = Some(20_000.0);
    let mut rich = record("01001020200");
    rich.median_hh_income = Some(80_000.0);

    // The builder keeps every non-income column identical, so the demand
    // difference is exactly the weighted income component.
    let records = vec![poor, rich];
    let metrics: Vec<_> = records.iter().map(derive_metrics).collect();
    let scores = demand_signal(&records, &metrics);

    let poor_score = scores.first().copied().expect("poor tract score");
    let rich_score = scores.get(1).copied().expect("rich tract score");
    // Income percentiles are 50 and 100; the poor tract's is halved to 25.
    let expected_difference = 0.30 * (100.0 - 25.0);
    assert!((rich_score - poor_score - expected_difference).abs() < 1e-9);
}

#[rstest]
fn feasibility_blends_rurality_density_and_competition() {
    let mut metro = record("01001020100");
    metro.rurality = Some(RuralityCode::new(1).expect("valid code"));
    let mut town = record("01003010200");
    town.rurality = Some(RuralityCode::new(6).expect("valid code"));
    town.total_bsls = 600.0;
    town.unique_providers = 1.0;

    let records = vec![metro, town];
    let scores = build_feasibility(&records);
    let metro_score = scores.first().copied().expect("metro score");
    let town_score = scores.get(1).copied().expect("town score");
    assert!(town_score > metro_score);
}

#[rstest]
fn composite_is_a_fixed_linear_blend() {
    let scores = SubScores {
        supply_gap: 80.0,
        demand_signal: 60.0,
        funding_tailwind: 40.0,
        build_feasibility: 20.0,
    };
    let expected = 0.40 * 80.0 + 0.30 * 60.0 + 0.15 * 40.0 + 0.15 * 20.0;
    assert!((blend_composite(&scores) - expected).abs() < 1e-12);
}

#[rstest]
fn empty_population_is_rejected() {
    assert_eq!(score_tracts(Vec::new()), Err(ScoreError::NoTracts));
}

#[rstest]
fn scoring_orders_ranks_and_bounds_scores() {
    let a = record("01001020100");
    let mut b = record("01003010200");
    b.total_bsls = 900.0;
    b.unique_providers_fiber = 2.0;
    b.median_hh_income = Some(60_000.0);
    let mut c = record("01005010300");
    c.total_bsls = 250.0;
    c.unique_providers_fiber = 0.0;
    c.unserved_bsls = 125.0;
    c.rurality = Some(RuralityCode::new(9).expect("valid code"));

    let outcome = score_tracts(vec![a, b, c]).expect("scoring succeeds");
    assert_eq!(outcome.tracts.len(), 3);

    let mut previous_score = f64::INFINITY;
    let mut previous_rank = 0;
    for tract in &outcome.tracts {
        for value in [
            tract.scores.supply_gap,
            tract.scores.demand_signal,
            tract.scores.funding_tailwind,
            tract.scores.build_feasibility,
            tract.opportunity_score,
        ] {
            assert!((0.0..=100.0).contains(&value));
        }
        let expected = blend_composite(&tract.scores);
        assert!((tract.opportunity_score - expected).abs() < 1e-9);
        assert!(tract.opportunity_score <= previous_score);
        assert!(tract.opportunity_rank >= previous_rank);
        previous_score = tract.opportunity_score;
        previous_rank = tract.opportunity_rank;
    }

    // Identical inputs must reproduce the output exactly.
    let first = outcome.tracts.clone();
    let again = score_tracts(first.iter().map(|tract| tract.record.clone()).collect())
        .expect("second run succeeds");
    assert_eq!(first, again.tracts);
}

#[rstest]
fn tied_composites_share_a_dense_rank() {
    // Two tracts identical in every column tie on every percentile.
    let a = record("01001020100");
    let b = record("01003010200");
    let mut c = record("01005010300");
    c.total_bsls = 800.0;
    c.unique_providers = 6.0;

    let outcome = score_tracts(vec![a, b, c]).expect("scoring succeeds");
    let ranks: Vec<u32> = outcome
        .tracts
        .iter()
        .map(|tract| tract.opportunity_rank)
        .collect();
    let tied = ranks.iter().filter(|&&rank| rank == 1).count();
    assert_eq!(tied, 2, "identical tracts should share rank 1");
    assert!(ranks.contains(&2), "next distinct score takes rank 2");

    // Ties in the output order are broken by ascending GEOID.
    let first_geoid = outcome
        .tracts
        .first()
        .map(|tract| tract.record.geoid.to_string())
        .expect("first tract");
    assert_eq!(first_geoid, "01001020100");
}

#[rstest]
fn county_rollup_groups_and_averages() {
    let a = record("01001020100");
    let mut b = record("01001020200");
    b.median_hh_income = None;
    b.total_bsls = 600.0;
    let mut c = record("01003010300");
    c.county_name = "Baldwin County".to_owned();

    let outcome = score_tracts(vec![a, b, c]).expect("scoring succeeds");
    assert_eq!(outcome.counties.len(), 2);

    let autauga = outcome
        .counties
        .iter()
        .find(|county| county.county.as_str() == "01001")
        .expect("autauga rollup");
    assert_eq!(autauga.tract_count, 2);
    assert_eq!(autauga.total_bsls, 1_100.0);
    // Only one of the two tracts reports an income.
    assert_eq!(autauga.mean_income, Some(45_000.0));
    assert!(autauga.max_score >= autauga.mean_score);

    let mut previous = f64::INFINITY;
    for county in &outcome.counties {
        assert!(county.mean_score <= previous);
        previous = county.mean_score;
    }
}

#[rstest]
fn tiers_follow_each_composite() {
    let a = record("01001020100");
    let mut b = record("01003010200");
    b.total_bsls = 900.0;
    let outcome = score_tracts(vec![a, b]).expect("scoring succeeds");
    for tract in &outcome.tracts {
        assert_eq!(
            tract.opportunity_tier,
            Tier::from_score(tract.opportunity_score)
        );
    }
}
