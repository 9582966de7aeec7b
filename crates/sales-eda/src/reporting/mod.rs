//! Report assembly and output.
//!
//! [`ReportGenerator::build_report`] runs the requested [`ReportSection`]s
//! and collects them into one [`EdaReport`], suitable for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use sales_eda::{AnalysisConfig, ReportGenerator, ReportSection};
//!
//! let report = ReportGenerator::build_report(
//!     "data/sales.csv",
//!     &df,
//!     &AnalysisConfig::default(),
//!     &ReportSection::ALL,
//! )?;
//!
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new("outputs");
//! generator.write_report_to_file(&report, "sales")?;
//! ```

mod generator;

pub use generator::{EdaReport, InsightsReport, ReportGenerator, ReportSection, TREND_PAIRS};
