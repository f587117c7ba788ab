//! Monthly reports exported to the external document and chart services.
//!
//! The formatters turn ledger queries into plain tables and chart
//! options, the [ReportClient] submits them, and the endpoints glue
//! the two together.

mod chart;
mod client;
mod endpoints;
mod formatter;

pub use chart::{ChartSpec, synthesize_chart};
pub use client::{ReportClient, ReportConfig};
pub use endpoints::{chart_report_endpoint, detail_report_endpoint, summary_report_endpoint};
pub use formatter::{ReportTable, synthesize_detail, synthesize_summary};
