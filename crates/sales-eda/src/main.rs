//! CLI entry point for the sales dataset EDA.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use sales_eda::{
    AnalysisConfig, CategoricalAnalysis, ColumnConverter, DatasetOverview, EdaReport,
    InsightsReport, NullClassification, NullSummary, NumericDescription, OutlierHandler,
    OutlierReport, ReportGenerator, ReportSection,
};
use std::path::Path;
use tracing::{debug, error, info};

/// CLI-compatible report selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliReport {
    /// Sample rows, column info, null rates, duplicates and value counts
    Overview,
    /// Null count and percentage of every column
    Nulls,
    /// Columns with nulls split by the null threshold
    NullClasses,
    /// IQR outlier counts of the numeric columns
    Outliers,
    /// Distribution of the text columns
    Categorical,
    /// Summary statistics of the numeric columns
    Describe,
    /// Chart data: monthly sales, group totals, shipping, correlations
    Insights,
    /// Every report above
    All,
}

impl CliReport {
    fn sections(self) -> &'static [ReportSection] {
        match self {
            CliReport::Overview => &[ReportSection::Overview],
            CliReport::Nulls => &[ReportSection::Nulls],
            CliReport::NullClasses => &[ReportSection::NullClasses],
            CliReport::Outliers => &[ReportSection::Outliers],
            CliReport::Categorical => &[ReportSection::Categorical],
            CliReport::Describe => &[ReportSection::Describe],
            CliReport::Insights => &[ReportSection::Insights],
            CliReport::All => &ReportSection::ALL,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory data analysis for sales datasets",
    long_about = "Null, outlier and categorical reports for a sales CSV, with optional\n\
                  IQR clipping of selected columns.\n\n\
                  EXAMPLES:\n  \
                  # All reports\n  \
                  sales-eda -i data.csv\n\n  \
                  # Only the null reports, 5% threshold\n  \
                  sales-eda -i data.csv --report nulls --report null-classes --threshold 5\n\n  \
                  # Clip Sales and Profit and write the adjusted CSV\n  \
                  sales-eda -i data.csv --report outliers --clip Sales --clip Profit\n\n  \
                  # Machine-readable output\n  \
                  sales-eda -i data.csv --json | jq .outliers"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: String,

    /// Output directory for the clipped dataset and the JSON report
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Reports to run (repeatable); defaults to all
    #[arg(long = "report", value_enum)]
    reports: Vec<CliReport>,

    /// Skip date and numeric type conversion
    #[arg(long)]
    no_convert: bool,

    /// Null percentage above which a column counts as high-null
    #[arg(long)]
    threshold: Option<f64>,

    /// IQR multiplier for the outlier fences
    #[arg(long)]
    iqr_multiplier: Option<f64>,

    /// JSON file with an analysis configuration
    ///
    /// --threshold and --iqr-multiplier override the values it contains
    #[arg(long)]
    config: Option<String>,

    /// Clip this column to its IQR fences (repeatable)
    ///
    /// The adjusted dataset is written as <input_name>_clipped.csv
    #[arg(long)]
    clip: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable reports
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write the JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_eda_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = load_config(&args)?;

    info!("Loading dataset from: {}", args.input);
    let mut data = load_csv_with_fallbacks(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let conversion_steps = if args.no_convert {
        Vec::new()
    } else {
        ColumnConverter::convert(&mut data, &config)?
    };

    let sections = requested_sections(&args.reports);
    let mut report = ReportGenerator::build_report(&args.input, &data, &config, &sections)?;
    report.conversion_steps = conversion_steps;

    let input_stem = extract_file_stem(&args.input);
    let generator = ReportGenerator::new(&args.output);

    if !args.clip.is_empty() {
        let handler = OutlierHandler::from_config(&config);
        report.clipped = handler.clip(&mut data, &args.clip)?;

        let output_path = generator.write_csv(&mut data, &format!("{}_clipped", input_stem))?;
        report.output_file = Some(output_path.display().to_string());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let report_path = generator.write_report_to_file(&report, &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_report(&report, &sections);

    Ok(())
}

/// Build the analysis configuration from `--config` and the override flags.
fn load_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match args.config {
        Some(ref path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read config file {}", path))?;
            serde_json::from_str::<AnalysisConfig>(&content)
                .with_context(|| format!("Invalid config file {}", path))?
        }
        None => AnalysisConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        config.null_threshold = threshold;
    }
    if let Some(multiplier) = args.iqr_multiplier {
        config.iqr_multiplier = multiplier;
    }

    config.validate()?;
    debug!("Using configuration: {:?}", config);
    Ok(config)
}

/// Expand the `--report` flags into sections, in order, without repeats.
fn requested_sections(reports: &[CliReport]) -> Vec<ReportSection> {
    if reports.is_empty() {
        return ReportSection::ALL.to_vec();
    }

    let mut sections = Vec::new();
    for section in reports.iter().flat_map(|r| r.sections()) {
        if !sections.contains(section) {
            sections.push(*section);
        }
    }
    sections
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

// ============================================================================
// Human-readable Output
// ============================================================================
//
// These functions use `println!` intentionally: the reports are the primary
// output of the CLI and must be visible regardless of the log level.

fn print_report(report: &EdaReport, sections: &[ReportSection]) {
    println!();
    println!("{}", "=".repeat(80));
    println!(
        "SALES EDA: {} ({} rows x {} columns)",
        report.input_file, report.rows, report.columns
    );
    println!("{}", "=".repeat(80));

    if !report.conversion_steps.is_empty() {
        println!();
        println!("Type Conversion:");
        for step in &report.conversion_steps {
            println!("  - {}", step);
        }
    }

    for section in sections {
        println!();
        println!("{}", section.display_name().to_uppercase());
        println!("{}", "-".repeat(40));

        match section {
            ReportSection::Overview => {
                if let Some(ref overview) = report.overview {
                    print_overview(overview);
                }
            }
            ReportSection::Nulls => {
                if let Some(ref nulls) = report.nulls {
                    print_nulls(nulls);
                }
            }
            ReportSection::NullClasses => {
                if let Some(ref classes) = report.null_classification {
                    print_null_classes(classes);
                }
            }
            ReportSection::Outliers => {
                if let Some(ref outliers) = report.outliers {
                    print_outliers(outliers);
                }
            }
            ReportSection::Categorical => {
                if let Some(ref categorical) = report.categorical {
                    print_categorical(categorical);
                }
            }
            ReportSection::Describe => {
                if let Some(ref describe) = report.describe {
                    print_describe(describe);
                }
            }
            ReportSection::Insights => {
                if let Some(ref insights) = report.insights {
                    print_insights(insights);
                }
            }
        }
    }

    if !report.clipped.is_empty() {
        println!();
        println!("OUTLIER CLIPPING");
        println!("{}", "-".repeat(40));
        for clip in &report.clipped {
            match clip.bounds {
                Some(bounds) => println!(
                    "  {:<20} [{:.2}, {:.2}]  {} raised, {} lowered",
                    truncate_str(&clip.column, 19),
                    bounds.lower,
                    bounds.upper,
                    clip.clipped_low,
                    clip.clipped_high
                ),
                None => println!("  {:<20} no values", truncate_str(&clip.column, 19)),
            }
        }
        if let Some(ref output_file) = report.output_file {
            println!("  Adjusted dataset: {}", output_file);
        }
    }

    println!();
    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save the JSON report");
    println!("{}", "=".repeat(80));
}

fn print_overview(overview: &DatasetOverview) {
    println!("  Rows: {}", overview.rows);
    println!("  Columns: {}", overview.columns);
    println!("  Duplicate rows: {}", overview.duplicate_count);
    println!();

    println!("  Sample:");
    for row in &overview.sample {
        println!("    {}", row.join(" | "));
    }
    println!();

    println!(
        "  {:<20} {:<12} {:<10} {:<10}",
        "Column", "Type", "Non-null", "Missing %"
    );
    println!("  {}", "-".repeat(56));
    for (info, nulls) in overview.column_info.iter().zip(&overview.null_percentages) {
        println!(
            "  {:<20} {:<12} {:<10} {:<10.2}",
            truncate_str(&info.name, 19),
            truncate_str(&info.dtype, 11),
            info.non_null_count,
            nulls.null_percentage
        );
    }

    for counts in &overview.value_counts {
        println!();
        println!("  {}:", counts.column);
        for vc in counts.counts.iter().take(10) {
            println!("    {:<30} {}", truncate_str(&vc.value, 29), vc.count);
        }
        if counts.counts.len() > 10 {
            println!("    ... and {} more values", counts.counts.len() - 10);
        }
    }
}

fn print_nulls(nulls: &NullSummary) {
    println!("  {:<20} {:<10} {:<10}", "Column", "Nulls", "Null %");
    println!("  {}", "-".repeat(42));
    for (column, count, pct) in nulls.iter() {
        println!("  {:<20} {:<10} {:<10.2}", truncate_str(column, 19), count, pct);
    }
}

fn print_null_classes(classes: &NullClassification) {
    if classes.columns.is_empty() {
        println!("  No columns with nulls");
        return;
    }

    println!(
        "  {:<20} {:<12} {:<10} {:<10}",
        "Column", "Type", "Nulls", "Null %"
    );
    println!("  {}", "-".repeat(54));
    for info in &classes.columns {
        println!(
            "  {:<20} {:<12} {:<10} {:<10.2}",
            truncate_str(&info.column, 19),
            truncate_str(&info.dtype, 11),
            info.null_count,
            info.null_percentage
        );
    }
    println!();
    println!("  Above {}%: {:?}", classes.threshold, classes.high);
    println!("  At or below {}%: {:?}", classes.threshold, classes.low);
}

fn print_outliers(outliers: &OutlierReport) {
    if outliers.columns.is_empty() {
        println!("  No numeric columns");
        return;
    }

    println!(
        "  {:<20} {:<10} {:<10} {:<24}",
        "Column", "Outliers", "% Rows", "Fences"
    );
    println!("  {}", "-".repeat(66));
    for col in &outliers.columns {
        let fences = col
            .bounds
            .map(|b| format!("[{:.2}, {:.2}]", b.lower, b.upper))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<20} {:<10} {:<10.2} {:<24}",
            truncate_str(&col.column, 19),
            col.count,
            col.percentage,
            fences
        );
    }
}

fn print_categorical(analysis: &CategoricalAnalysis) {
    let profiles = match analysis {
        CategoricalAnalysis::NoCategoricalColumns => {
            println!("  No categorical columns");
            return;
        }
        CategoricalAnalysis::Profiled(profiles) => profiles,
    };

    for profile in profiles {
        let desc = &profile.description;
        println!(
            "  {} ({} unique; count {}, top {}, freq {})",
            profile.column,
            profile.unique_count,
            desc.count,
            desc.top.as_deref().unwrap_or("-"),
            desc.freq
        );
        for vp in profile.proportions.iter().take(10) {
            println!("    {:<30} {:.4}", truncate_str(&vp.value, 29), vp.proportion);
        }
        if profile.proportions.len() > 10 {
            println!("    ... and {} more values", profile.proportions.len() - 10);
        }
    }
}

fn print_describe(descriptions: &[NumericDescription]) {
    if descriptions.is_empty() {
        println!("  No numeric columns");
        return;
    }

    println!(
        "  {:<16} {:>7} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11}",
        "Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for d in descriptions {
        println!(
            "  {:<16} {:>7} {:>11.2} {:>11.2} {:>11.2} {:>11.2} {:>11.2} {:>11.2} {:>11.2}",
            truncate_str(&d.column, 15),
            d.count,
            d.mean,
            d.std,
            d.min,
            d.q1,
            d.median,
            d.q3,
            d.max
        );
    }
}

fn print_insights(insights: &InsightsReport) {
    if !insights.monthly_sales.is_empty() {
        println!("  Monthly sales:");
        for month in &insights.monthly_sales {
            println!("    {}  {:.2}", month.month, month.total);
        }
    }

    let groups = [
        ("Sales by category", &insights.sales_by_category),
        ("Sales by sub-category", &insights.sales_by_sub_category),
        ("Profit by market", &insights.profit_by_market),
        ("Delivery days by market", &insights.shipping_time_by_market),
    ];
    for (title, totals) in groups {
        if totals.is_empty() {
            continue;
        }
        println!("  {}:", title);
        for total in totals {
            println!("    {:<30} {:.2}", truncate_str(&total.group, 29), total.value);
        }
    }

    if !insights.market_segments.is_empty() {
        println!("  Market / segment means (sales, profit):");
        for stats in &insights.market_segments {
            println!(
                "    {:<14} {:<16} {:>10.2} {:>10.2}",
                truncate_str(&stats.market, 13),
                truncate_str(&stats.segment, 15),
                stats.mean_sales,
                stats.mean_profit
            );
        }
    }

    if !insights.shipping_efficiency.is_empty() {
        println!("  Shipping efficiency (days, cost, profit):");
        for stats in &insights.shipping_efficiency {
            println!(
                "    {:<16} {:>8.2} {:>10.2} {:>10.2}",
                truncate_str(&stats.ship_mode, 15),
                stats.avg_delivery_days,
                stats.avg_shipping_cost,
                stats.avg_profit
            );
        }
    }

    for trend in &insights.trends {
        println!(
            "  Trend {} vs {}: slope {:.4}, intercept {:.4}, r {:.3} ({} points)",
            trend.y, trend.x, trend.slope, trend.intercept, trend.r, trend.points
        );
    }

    if let Some(ref matrix) = insights.correlations {
        println!("  Correlations:");
        for (name, row) in matrix.columns.iter().zip(&matrix.values) {
            let cells: Vec<String> = row.iter().map(|v| format!("{:>6.2}", v)).collect();
            println!("    {:<16} {}", truncate_str(name, 15), cells.join(" "));
        }
    }

    for skipped in &insights.skipped {
        println!("  ! skipped {}", skipped);
    }
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Load CSV with multiple fallback strategies
fn load_csv_with_fallbacks(path: &str) -> Result<DataFrame> {
    use std::path::PathBuf;

    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: Without quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Loading without quotes failed: {}", e);
        }
    }

    // Strategy 3: Pre-clean content
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cleaned = clean_csv_content(&content);
            let cursor = std::io::Cursor::new(cleaned);

            CsvReadOptions::default()
                .with_infer_schema_length(Some(100))
                .with_has_header(true)
                .into_reader_with_file_handle(cursor)
                .finish()
                .map_err(|e| e.into())
        }
        Err(e) => {
            error!("Could not read file: {}", e);
            Err(e.into())
        }
    }
}

/// Clean CSV content
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
