use approx::assert_abs_diff_eq;
use mortgage_switch::comparison::compare;
use mortgage_switch::input::{load_scenario, OptionKind, PrepaymentMethod, ScenarioInput};
use mortgage_switch::rates::load_curves;
use mortgage_switch::request::{evaluate, RequestError};
use mortgage_switch::ScenarioRunner;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("sample_data").join(name)
}

fn sample_input() -> ScenarioInput {
    load_scenario(&fixture("sample_input.json")).unwrap()
}

/// Full pipeline: JSON file -> typed input -> both ledgers -> summary.
#[test]
fn sample_scenario_end_to_end() {
    let input = sample_input();
    assert_eq!(input.horizon_months, 60);
    assert_eq!(input.prepayment_plan.len(), 1);

    let result = compare(&input).unwrap();
    let summary = &result.summary;

    assert!(summary.stay_total_cash_out_aed > 0.0);
    assert!(summary.switch_total_cash_out_aed > 0.0);
    assert_eq!(result.cashflows_for(OptionKind::Stay).count(), 60);
    assert_eq!(result.cashflows_for(OptionKind::Switch).count(), 60);

    // 21,490 new-bank estimates + 1,100 exit letters + 10,000 capped penalty
    assert_abs_diff_eq!(result.upfront_fees_applied.switch, 32_590.0, epsilon = 1e-6);
    assert_eq!(result.upfront_fees_applied.stay, 0.0);

    assert_eq!(
        summary.recommendation == OptionKind::Switch,
        summary.switch_total_cash_out_aed < summary.stay_total_cash_out_aed
    );
    assert!(summary.assumptions_note.contains("Early settlement penalty"));

    // Upfront fees stay out of the running monthly totals
    assert_eq!(summary.break_even_month, Some(1));
}

#[test]
fn sample_reduce_emi_prepayment_charged_same_month() {
    let mut input = sample_input();
    input.prepayment_plan[0].month = 23;
    input.prepayment_plan[0].method = PrepaymentMethod::ReduceEmi;

    let result = compare(&input).unwrap();
    let rows: Vec<_> = result.cashflows_for(OptionKind::Switch).collect();
    // Months 23 and 24 share the payment re-levelled after the prepayment
    assert_eq!(rows[22].emi, rows[23].emi);
    assert!(rows[22].emi < rows[21].emi);
}

#[test]
fn sample_prepayment_lands_in_month_24() {
    let result = compare(&sample_input()).unwrap();
    for option in [OptionKind::Stay, OptionKind::Switch] {
        let rows: Vec<_> = result.cashflows_for(option).collect();
        assert_abs_diff_eq!(rows[23].prepayment, 50_000.0, epsilon = 1e-9);
        assert!(rows.iter().filter(|r| r.prepayment > 0.0).count() == 1);
        assert!(rows[23].principal_remaining < rows[22].principal_remaining - 50_000.0);
    }
}

#[test]
fn sample_annual_fee_charged_each_year() {
    let result = compare(&sample_input()).unwrap();
    let charged: Vec<u32> = result
        .cashflows_for(OptionKind::Stay)
        .filter(|r| r.fees > 0.0)
        .map(|r| r.month)
        .collect();
    assert_eq!(charged, vec![1, 13, 25, 37, 49]);
}

#[test]
fn switch_rate_reverts_after_fixed_period() {
    let result = compare(&sample_input()).unwrap();
    let rows: Vec<_> = result.cashflows_for(OptionKind::Switch).collect();
    assert_abs_diff_eq!(rows[35].annual_rate, 0.0399, epsilon = 1e-12);
    // Month 37 reads EIBOR_3M month 1 (5.30%) plus 150 bps
    assert_abs_diff_eq!(rows[36].annual_rate, 0.068, epsilon = 1e-12);
}

#[test]
fn request_boundary_accepts_sample_file() {
    let text = std::fs::read_to_string(fixture("sample_input.json")).unwrap();
    let body: serde_json::Value = serde_json::from_str(&text).unwrap();

    let direct = compare(&sample_input()).unwrap();
    let via_request = evaluate(serde_json::json!({ "payload": body })).unwrap();
    assert_eq!(direct, via_request);
}

#[test]
fn request_boundary_rejects_empty_body() {
    let err = evaluate(serde_json::json!({})).unwrap_err();
    match err {
        RequestError::MissingFields(fields) => assert_eq!(fields.len(), 6),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn runner_covers_sample_scenarios() {
    let runner = ScenarioRunner::new(sample_input());
    let results = runner.run_all().unwrap();
    assert_eq!(results.keys().map(String::as_str).collect::<Vec<_>>(), vec!["base", "rising"]);
    assert!(
        results["rising"].summary.stay_total_cash_out_aed
            > results["base"].summary.stay_total_cash_out_aed
    );
}

#[test]
fn csv_curves_replace_a_scenario() {
    let mut input = sample_input();
    let curves = load_curves(&fixture("eibor_base.csv")).unwrap();
    assert_eq!(curves.curve("EIBOR_1M").map(|c| c.len()), Some(6));
    input.rate_scenarios.insert("csv".to_string(), curves);

    let result = ScenarioRunner::new(input).run("csv").unwrap();
    assert_eq!(result.summary.scenario, "csv");
    let first = result.cashflows_for(OptionKind::Stay).next().unwrap();
    assert_abs_diff_eq!(first.annual_rate, 0.072, epsilon = 1e-12);
}
