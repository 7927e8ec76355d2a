//! ROI Model CLI
//!
//! Command-line interface for running the ROI model and exporting the
//! timeline

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use roi_model::assumptions::load_assumptions;
use roi_model::report::format_currency;
use roi_model::{AssumptionChange, AssumptionField, Driver, ModelSession, ModelVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "roi_model", version, about = "AI roleplay ROI model")]
struct Cli {
    /// Model variant
    #[arg(long, value_enum, default_value_t = ModelVariant::AssumptionDriven)]
    variant: ModelVariant,

    /// CSV file of `field,value` assumption rows, applied before any flag
    #[arg(long)]
    assumptions: Option<PathBuf>,

    // Assumptions
    #[arg(long)]
    num_reps: Option<u32>,
    #[arg(long)]
    avg_ramp_months: Option<u32>,
    #[arg(long)]
    ramp_time_reduction_pct: Option<u32>,
    #[arg(long)]
    avg_deal_cycle_days: Option<u32>,
    #[arg(long)]
    deal_cycle_reduction_pct: Option<u32>,
    #[arg(long)]
    current_win_rate_pct: Option<u32>,
    #[arg(long)]
    win_rate_improvement_pts: Option<u32>,
    #[arg(long)]
    rep_productivity_hours: Option<u32>,
    #[arg(long)]
    manager_coaching_hours: Option<u32>,

    // Annual driver values
    #[arg(long)]
    ramp_time: Option<u64>,
    #[arg(long)]
    win_rate: Option<u64>,
    #[arg(long)]
    deal_size: Option<u64>,
    #[arg(long)]
    productivity: Option<u64>,
    #[arg(long)]
    turnover: Option<u64>,
    #[arg(long)]
    manager_efficiency: Option<u64>,

    /// One-time implementation cost
    #[arg(long)]
    implementation_cost: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the monthly timeline to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl Cli {
    fn assumption_changes(&self) -> Vec<AssumptionChange> {
        let flags = [
            (AssumptionField::NumReps, self.num_reps),
            (AssumptionField::AvgRampMonths, self.avg_ramp_months),
            (AssumptionField::RampTimeReductionPct, self.ramp_time_reduction_pct),
            (AssumptionField::AvgDealCycleDays, self.avg_deal_cycle_days),
            (AssumptionField::DealCycleReductionPct, self.deal_cycle_reduction_pct),
            (AssumptionField::CurrentWinRatePct, self.current_win_rate_pct),
            (AssumptionField::WinRateImprovementPts, self.win_rate_improvement_pts),
            (AssumptionField::RepProductivityHours, self.rep_productivity_hours),
            (AssumptionField::ManagerCoachingHours, self.manager_coaching_hours),
        ];
        flags
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| AssumptionChange::new(field, v)))
            .collect()
    }

    fn driver_values(&self) -> Vec<(Driver, u64)> {
        let flags = [
            (Driver::RampTime, self.ramp_time),
            (Driver::WinRate, self.win_rate),
            (Driver::DealSize, self.deal_size),
            (Driver::Productivity, self.productivity),
            (Driver::Turnover, self.turnover),
            (Driver::ManagerEfficiency, self.manager_efficiency),
        ];
        flags
            .into_iter()
            .filter_map(|(driver, value)| value.map(|v| (driver, v)))
            .collect()
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut session = ModelSession::new(cli.variant);

    if let Some(path) = &cli.assumptions {
        let loaded = load_assumptions(path)
            .with_context(|| format!("failed to load assumptions from {}", path.display()))?;
        session.apply_loaded(&loaded).context("failed to apply assumption file")?;
    }

    for change in cli.assumption_changes() {
        session
            .apply(change)
            .with_context(|| format!("failed to apply {}", change.field().key()))?;
    }

    for (driver, value) in cli.driver_values() {
        session
            .set_driver(driver, value)
            .with_context(|| format!("failed to set {}", driver.key()))?;
    }

    if let Some(cost) = cli.implementation_cost {
        session.set_implementation_cost(cost);
    }

    let report = session.report();

    if let Some(path) = &cli.csv {
        let file = File::create(path)
            .with_context(|| format!("unable to create {}", path.display()))?;
        report.write_timeline_csv(file)?;
        log::info!("Timeline written to {}", path.display());
    }

    match cli.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Table => print_table(&report),
    }

    Ok(())
}

fn print_table(report: &roi_model::RoiReport) {
    println!("AI Roleplay ROI Model");
    println!("=====================\n");

    if let Some(set) = &report.assumptions {
        println!("Assumptions:");
        for field in AssumptionField::ALL {
            println!("  {:<42} {:>8}", field.label(), set.get(field));
        }
        println!();
    }

    println!("Value Drivers (Annual):");
    for share in &report.driver_breakdown {
        println!(
            "  {:<24} {:>14} {:>6.1}%",
            share.label,
            format_currency(share.value as f64),
            share.share_pct
        );
    }
    println!("  {:<24} {:>14}", "Implementation Cost", format_currency(report.implementation_cost as f64));
    println!();

    println!("{:>5} {:>14} {:>16}", "Month", "Monthly Value", "Cumulative ROI");
    println!("{}", "-".repeat(37));
    for entry in report.timeline.entries() {
        let marker = if report.summary.breakeven_month == Some(entry.month) {
            "  <- breakeven"
        } else {
            ""
        };
        println!(
            "{:>5} {:>14} {:>16}{}",
            entry.month,
            format_currency(entry.monthly_value),
            format_currency(entry.cumulative_roi),
            marker
        );
    }

    println!("\nSummary:");
    println!("  Total Annual Value:  {}", report.display.total_annual_value);
    println!("  Net ROI:             {}", report.display.net_roi);
    println!("  Net ROI (2 Years):   {}", report.display.two_year_net);
    println!("  ROI Percentage:      {}", report.display.roi_percentage);
    println!("  Breakeven Point:     {}", report.display.breakeven);
}
