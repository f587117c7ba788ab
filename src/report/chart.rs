//! Builds the expense pie chart of a month.
use charming::{
    Chart,
    component::{Legend, Title},
    element::{Color, Orient, Tooltip, Trigger},
    series::Pie,
};
use rusqlite::Connection;
use rust_decimal::prelude::ToPrimitive;

use crate::{Amount, Error, ledger::category_breakdown, month::YearMonth};

/// The slice colours, assigned to categories in order and reused once exhausted.
pub const PALETTE: [&str; 8] = [
    "#2563eb", "#dc2626", "#16a34a", "#f59e0b", "#9333ea", "#0891b2", "#db2777", "#65a30d",
];

/// One slice of the expense chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    /// The category name.
    pub label: String,
    /// The total spent in the category.
    pub value: Amount,
    /// The total formatted as currency, e.g. "1.250,50 €".
    pub value_label: String,
    /// The slice colour as a hex string.
    pub color: &'static str,
}

/// A chart of expenses per category, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    /// The name of the image to create.
    pub filename: String,
    /// The chart title.
    pub title: String,
    /// The month name and year, e.g. "febbraio 2026".
    pub subtitle: String,
    /// One point per category, largest first.
    pub points: Vec<ChartPoint>,
}

impl ChartSpec {
    /// Render the chart as an ECharts option.
    pub fn to_echarts(&self) -> Chart {
        let labels: Vec<String> = self
            .points
            .iter()
            .map(|point| format!("{}: {}", point.label, point.value_label))
            .collect();

        let data: Vec<(f64, &str)> = self
            .points
            .iter()
            .zip(&labels)
            .map(|(point, label)| {
                (
                    point.value.to_decimal().to_f64().unwrap_or_default(),
                    label.as_str(),
                )
            })
            .collect();

        Chart::new()
            .title(
                Title::new()
                    .text(self.title.as_str())
                    .subtext(self.subtitle.as_str())
                    .left("center"),
            )
            .tooltip(Tooltip::new().trigger(Trigger::Item))
            .legend(Legend::new().orient(Orient::Vertical).left("left").top("15%"))
            .color(
                self.points
                    .iter()
                    .map(|point| Color::from(point.color))
                    .collect(),
            )
            .series(
                Pie::new()
                    .name(self.title.as_str())
                    .radius("55%")
                    .data(data),
            )
    }
}

/// The expense breakdown of `month` as a chart.
///
/// # Errors
/// Returns [Error::NoDataForPeriod] if nothing was spent in the month, or an
/// [Error::SqlError] if the query fails.
pub fn synthesize_chart(month: YearMonth, connection: &Connection) -> Result<ChartSpec, Error> {
    let breakdown = category_breakdown(month, connection)?;

    if breakdown.is_empty() {
        return Err(Error::NoDataForPeriod(month.to_string()));
    }

    let points = breakdown
        .into_iter()
        .enumerate()
        .map(|(i, category)| ChartPoint {
            value_label: category.total.format_euro(),
            label: category.category_name,
            value: category.total,
            color: PALETTE[i % PALETTE.len()],
        })
        .collect();

    Ok(ChartSpec {
        filename: format!("Grafico Spese {month}"),
        title: "Spese per categoria".to_owned(),
        subtitle: format!("{} {}", month.italian_name(), month.year()),
        points,
    })
}
