//! Mortgage Switch CLI
//!
//! Command-line interface for running stay-versus-switch comparisons

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mortgage_switch::{
    input::load_scenario,
    rates::load_curves,
    ComparisonResult, OptionKind, ScenarioRunner,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "mortgage-switch", version, about = "Compare staying with a mortgage lender against refinancing")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare both options under one rate scenario
    Compare {
        /// Scenario JSON file
        input: PathBuf,

        /// Rate scenario to use
        #[arg(long, default_value = "base")]
        scenario: String,

        /// CSV of index curves replacing the chosen scenario's curves
        #[arg(long)]
        curves: Option<PathBuf>,

        /// Write the combined monthly ledger to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the full comparison result to this JSON file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Ledger months to print per option
        #[arg(long, default_value_t = 12)]
        rows: usize,
    },
    /// Compare under every named rate scenario
    Scenarios {
        /// Scenario JSON file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Compare { input, scenario, curves, csv, json, rows } => {
            run_compare(&input, &scenario, curves.as_deref(), csv.as_deref(), json.as_deref(), rows)
        }
        Command::Scenarios { input } => run_scenarios(&input),
    }
}

fn run_compare(
    input_path: &Path,
    scenario: &str,
    curves: Option<&Path>,
    csv_path: Option<&Path>,
    json_path: Option<&Path>,
    rows: usize,
) -> Result<()> {
    let mut input = load_scenario(input_path)
        .with_context(|| format!("loading scenario {}", input_path.display()))?;

    if let Some(path) = curves {
        let loaded = load_curves(path).with_context(|| format!("loading curves {}", path.display()))?;
        input.rate_scenarios.insert(scenario.to_string(), loaded);
    }

    println!("Mortgage Switch Comparison");
    println!("==========================\n");
    println!("Principal: AED {:.2}", input.principal_aed);
    println!("Tenure: {} months, horizon: {} months", input.tenure_months, input.horizon_months);
    println!("Stay:   {}", input.current_terms.bank);
    println!("Switch: {}", input.new_offer.bank);
    println!();

    let runner = ScenarioRunner::new(input);
    let result = runner.run(scenario)?;

    print_ledger(&result, OptionKind::Stay, rows);
    print_ledger(&result, OptionKind::Switch, rows);
    print_summary(&result);

    if let Some(path) = csv_path {
        write_ledger_csv(&result, path)?;
        println!("\nMonthly ledger written to: {}", path.display());
    }

    if let Some(path) = json_path {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &result)?;
        println!("Full result written to: {}", path.display());
    }

    Ok(())
}

fn run_scenarios(input_path: &Path) -> Result<()> {
    let input = load_scenario(input_path)
        .with_context(|| format!("loading scenario {}", input_path.display()))?;
    let runner = ScenarioRunner::new(input);
    let results = runner.run_all()?;

    println!("{:<16} {:>16} {:>16} {:>14} {:>11} {:>8}",
        "Scenario", "Stay (AED)", "Switch (AED)", "Savings", "Break-even", "Choice");
    println!("{}", "-".repeat(86));
    for (name, result) in &results {
        let s = &result.summary;
        println!("{:<16} {:>16.2} {:>16.2} {:>14.2} {:>11} {:>8}",
            name,
            s.stay_total_cash_out_aed,
            s.switch_total_cash_out_aed,
            s.savings_aed,
            s.break_even_month.map_or_else(|| "-".to_string(), |m| m.to_string()),
            s.recommendation,
        );
    }

    Ok(())
}

fn print_ledger(result: &ComparisonResult, option: OptionKind, rows: usize) {
    let records: Vec<_> = result.cashflows_for(option).collect();

    println!("{} ledger ({} months):", option, records.len());
    println!("{:>5} {:>8} {:>12} {:>12} {:>12} {:>10} {:>10} {:>14}",
        "Month", "Rate", "EMI", "Interest", "Principal", "Fees", "Insurance", "Remaining");
    println!("{}", "-".repeat(90));

    for row in records.iter().take(rows) {
        println!("{:>5} {:>7.3}% {:>12.2} {:>12.2} {:>12.2} {:>10.2} {:>10.2} {:>14.2}",
            row.month,
            row.annual_rate * 100.0,
            row.emi,
            row.interest,
            row.principal_paid,
            row.fees,
            row.insurance,
            row.principal_remaining,
        );
    }

    if records.len() > rows {
        println!("... ({} more months)", records.len() - rows);
    }
    println!();
}

fn print_summary(result: &ComparisonResult) {
    println!("Summary ({} scenario):", result.summary.scenario);
    for option in [OptionKind::Stay, OptionKind::Switch] {
        let s = result.option_totals.get(option);
        println!("  {}:", option);
        println!("    Upfront fees:    AED {:.2}", s.upfront_fees);
        println!("    Payments:        AED {:.2} (interest {:.2})", s.total_payments, s.total_interest);
        println!("    Recurring fees:  AED {:.2}", s.total_recurring_fees);
        println!("    Insurance:       AED {:.2}", s.total_insurance);
        println!("    Total cash out:  AED {:.2}", s.total_cash_out);
        println!("    Balance at end:  AED {:.2}", s.final_balance);
    }

    let summary = &result.summary;
    println!("  Savings from switching: AED {:.2}", summary.savings_aed);
    match summary.break_even_month {
        Some(month) => println!("  Break-even month: {}", month),
        None => println!("  Break-even month: not reached within horizon"),
    }
    println!("  Recommendation: {}", summary.recommendation);
    println!("  {}", summary.assumptions_note);
}

fn write_ledger_csv(result: &ComparisonResult, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in &result.monthly_cashflows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
