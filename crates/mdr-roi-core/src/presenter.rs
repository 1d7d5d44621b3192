//! Presentation model for the results panel: six labeled rows, three
//! proportional bars and the fixed explanatory notes.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculator::CalculationResult;
use crate::format::{format_currency, format_one_decimal};
use crate::types::Percent;

/// Freed-capacity bar is drawn against this many FTEs.
pub const FREED_FTE_CEILING: Decimal = dec!(10);

/// Breach-lifecycle reduction credited to AI and automation.
pub const EXPOSURE_REDUCTION_DAYS: u32 = 108;

pub const VENDOR_NAME: &str = "WatchGuard";

const TEXT_BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    BuildCost,
    MdrCost,
    Savings,
    Roi,
    FreedCapacity,
    ExposureReduction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub kind: RowKind,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    /// Fill width, 0-100
    pub percent: Percent,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub rows: Vec<ResultRow>,
    pub bars: Vec<Bar>,
    pub notes: Vec<String>,
}

pub fn present(result: &CalculationResult) -> Presentation {
    let freed = format!("{} FTEs", format_one_decimal(result.freed_ftes));
    let row = |kind, label: &str, value: String| ResultRow {
        kind,
        label: label.to_string(),
        value,
    };

    let rows = vec![
        row(
            RowKind::BuildCost,
            "Build your own SOC",
            format_currency(result.total_in_house),
        ),
        row(
            RowKind::MdrCost,
            &format!("{VENDOR_NAME} MDR"),
            format_currency(result.total_mdr),
        ),
        row(
            RowKind::Savings,
            "Annual savings",
            format_currency(result.annual_savings),
        ),
        row(
            RowKind::Roi,
            "ROI",
            format!("{}%", format_one_decimal(result.roi_percent)),
        ),
        row(RowKind::FreedCapacity, "Freed SOC capacity", freed.clone()),
        row(
            RowKind::ExposureReduction,
            "Reduced exposure time",
            format!("{EXPOSURE_REDUCTION_DAYS} days"),
        ),
    ];

    let (in_house_pct, mdr_pct) = cost_bar_widths(result.total_in_house, result.total_mdr);
    let bars = vec![
        Bar {
            label: "Build your own SOC".into(),
            percent: in_house_pct,
            value: format_currency(result.total_in_house),
        },
        Bar {
            label: format!("{VENDOR_NAME} MDR"),
            percent: mdr_pct,
            value: format_currency(result.total_mdr),
        },
        Bar {
            label: "Freed SOC capacity".into(),
            percent: freed_bar_width(result.freed_ftes),
            value: freed,
        },
    ];

    Presentation {
        rows,
        bars,
        notes: notes(),
    }
}

/// Both cost bars relative to the larger total. Zero when both are zero.
pub fn cost_bar_widths(total_in_house: Decimal, total_mdr: Decimal) -> (Percent, Percent) {
    let max_cost = total_in_house.max(total_mdr);
    if max_cost <= Decimal::ZERO {
        return (Decimal::ZERO, Decimal::ZERO);
    }
    let hundred = dec!(100);
    (
        (total_in_house / max_cost * hundred).max(Decimal::ZERO),
        (total_mdr / max_cost * hundred).max(Decimal::ZERO),
    )
}

pub fn freed_bar_width(freed_ftes: Decimal) -> Percent {
    (freed_ftes / FREED_FTE_CEILING)
        .min(Decimal::ONE)
        .max(Decimal::ZERO)
        * dec!(100)
}

fn notes() -> Vec<String> {
    vec![
        format!(
            "Savings estimate includes reduction in breach lifecycle of {EXPOSURE_REDUCTION_DAYS} \
             days and $1.76M in breach cost avoided thanks to AI and automation."
        ),
        "*Build your own SOC cost assumes five full-time analysts, automation, threat \
         intelligence and SIEM/EDR licensing costs.*"
            .into(),
        "*MDR pricing is estimated at $15-25 per endpoint per month depending on service level \
         and may vary; SOC cost is based on building an advanced SOC in-house.*"
            .into(),
    ]
}

impl Presentation {
    /// Terminal rendition: aligned rows, block bars, then the notes.
    pub fn render_text(&self) -> String {
        let label_width = self
            .rows
            .iter()
            .map(|r| r.label.len())
            .chain(self.bars.iter().map(|b| b.label.len()))
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&format!("{:<label_width$}  {}\n", row.label, row.value));
        }
        out.push('\n');
        for bar in &self.bars {
            let filled = (bar.percent / dec!(100) * Decimal::from(TEXT_BAR_WIDTH))
                .round()
                .to_usize()
                .unwrap_or(0)
                .min(TEXT_BAR_WIDTH);
            out.push_str(&format!(
                "{:<label_width$}  {}{}  {}\n",
                bar.label,
                "█".repeat(filled),
                "░".repeat(TEXT_BAR_WIDTH - filled),
                bar.value
            ));
        }
        out.push('\n');
        for note in &self.notes {
            out.push_str(note);
            out.push('\n');
        }
        out
    }
}
