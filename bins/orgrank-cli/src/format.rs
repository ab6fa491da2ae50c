//! Text rendering for reports, metrics, and directory search.
//!
//! Engine results are full-precision `f64`. Rounding to cents happens here
//! and nowhere else.

use std::cmp::Reverse;
use std::fmt::Write as _;

use clap::ValueEnum;
use ordered_float::OrderedFloat;
use orgrank_core::{
    MetricsMap, MiningRate, Node, NodeId, NodeMetrics, Rank, RewardEntry, RewardReport, Tree,
};
use serde::Serialize;

/// Row order of the reward table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum RewardSort {
    /// Root first, then level by level.
    #[default]
    Level,
    /// Highest total first.
    Total,
}

/// Format `value` with thousands separators and two decimals: `1,234.50`.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}

/// `0.8% (preset)` or `1.1% (custom)`.
pub fn rate_label(rate: MiningRate) -> String {
    let kind = if rate.is_preset() { "preset" } else { "custom" };
    format!("{rate} ({kind})")
}

fn rank_label(rank: Option<Rank>) -> String {
    rank.map_or_else(|| "-".to_string(), |r| r.to_string())
}

/// Report entries in the requested order.
pub fn sorted_entries(report: &RewardReport, sort: RewardSort) -> Vec<&RewardEntry> {
    let mut entries: Vec<&RewardEntry> = report.entries.iter().collect();
    if sort == RewardSort::Total {
        entries.sort_by_key(|entry| Reverse(OrderedFloat(entry.total)));
    }
    entries
}

/// Reward table followed by the grand total.
pub fn render_rewards(report: &RewardReport, sort: RewardSort) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:<12} {:>5} {:>4} {:>14} {:>14} {:>14} {:>14}",
        "NAME", "RECOMMENDER", "LEVEL", "RANK", "MINING", "REFERRAL", "COMMUNITY", "TOTAL"
    );
    for entry in sorted_entries(report, sort) {
        let _ = writeln!(
            out,
            "{:<20} {:<12} {:>5} {:>4} {:>14} {:>14} {:>14} {:>14}",
            entry.name,
            entry.recommender,
            entry.level,
            rank_label(entry.rank),
            format_currency(entry.mining),
            format_currency(entry.referral),
            format_currency(entry.community),
            format_currency(entry.total),
        );
    }
    let _ = writeln!(out, "\nGrand total: {}", format_currency(report.grand_total));
    out
}

/// One node's metrics alongside its identity, for listing and JSON output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRow<'a> {
    pub id: &'a NodeId,
    pub name: &'a str,
    #[serde(flatten)]
    pub metrics: &'a NodeMetrics,
}

/// Metrics rows ordered by level, then id. Unreached nodes are left out.
pub fn metrics_rows<'a>(tree: &'a Tree, metrics: &'a MetricsMap) -> Vec<MetricsRow<'a>> {
    let mut rows: Vec<MetricsRow<'a>> = tree
        .iter()
        .filter_map(|node| {
            metrics.get(&node.id).map(|m| MetricsRow {
                id: &node.id,
                name: &node.name,
                metrics: m,
            })
        })
        .collect();
    rows.sort_by_key(|row| row.metrics.level);
    rows
}

pub fn render_metrics(rows: &[MetricsRow<'_>]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:>5} {:>16} {:>16} {:>4} {:>8}",
        "NAME", "LEVEL", "DESCENDANTS", "WITH SELF", "RANK", "BEST"
    );
    for row in rows {
        let m = row.metrics;
        let best = Rank::from_level(m.max_rank_in_subtree);
        let _ = writeln!(
            out,
            "{:<20} {:>5} {:>16} {:>16} {:>4} {:>8}",
            row.name,
            m.level,
            format_currency(m.children_total_value),
            format_currency(m.total_with_self),
            rank_label(m.rank),
            rank_label(best),
        );
    }
    out
}

pub fn render_search(nodes: &[&Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        let _ = writeln!(
            out,
            "{:<20} {:<12} {:>14}  {}",
            node.name,
            node.recommender,
            format_currency(node.own_value()),
            node.id
        );
    }
    let _ = writeln!(out, "{} member(s)", nodes.len());
    out
}
