// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Formats and prints report summaries to the console.

use comfy_table::{Attribute, Cell, Table};

use super::{Report, Verdict};

/// Summarize the report to the console.
///
/// Prints the platform and policy, dependency statistics, and any unwanted dependencies.
pub fn summarize_report(report: &Report<'_>) {
    println!("Artifact directory: {}", report.artifact_directory);
    println!("Total artifacts: {}\n", report.artifacts.len());

    println!("{}\n", platform_table(report));
    println!("{}\n", dependency_table(report));

    if !report.unwanted.is_empty() {
        println!("{}", unwanted_table(report));
        println!(
            "\nTotal: {} unwanted dependency(ies)",
            report.unwanted.len()
        );
    }
}

/// Create a table with the default preset styling.
fn default_table_preset() -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL_CONDENSED)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    table
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

/// Create a table describing the platform and the policy resolved for it.
fn platform_table(report: &Report) -> Table {
    let platform = report.platform;
    let rules = if report.rules.is_empty() {
        "-".to_string()
    } else {
        report.rules.join(", ")
    };

    let mut table = default_table_preset();
    table
        .set_header(header(&["Platform", "Value"]))
        .add_row(vec![Cell::new("OS family"), Cell::new(platform.os_family())])
        .add_row(vec![
            Cell::new("Distribution"),
            Cell::new(platform.distribution()),
        ])
        .add_row(vec![
            Cell::new("Architecture"),
            Cell::new(platform.architecture()),
        ])
        .add_row(vec![
            Cell::new("Word size"),
            Cell::new(platform.word_size()),
        ])
        .add_row(vec![Cell::new("Policy rules"), Cell::new(rules)])
        .add_row(vec![
            Cell::new("Allowed patterns"),
            Cell::new(report.allowed_patterns),
        ]);
    table
}

/// Create a table showing dependency verdict statistics.
fn dependency_table(report: &Report) -> Table {
    let allowed = report
        .dependencies
        .iter()
        .filter(|result| matches!(result.verdict, Verdict::Allowed { .. }))
        .count();

    let mut table = default_table_preset();
    table
        .set_header(header(&["Dependency Status", "Count"]))
        .add_row(vec![Cell::new("Allowed"), Cell::new(allowed)])
        .add_row(vec![Cell::new("Unwanted"), Cell::new(report.unwanted.len())])
        .add_row(vec![
            Cell::new("Total").add_attribute(Attribute::Bold),
            Cell::new(report.dependencies.len()).add_attribute(Attribute::Bold),
        ]);
    if let Some(reason) = &report.no_data {
        table.add_row(vec![Cell::new("No data"), Cell::new(reason)]);
    }
    table
}

/// Create a table listing the unwanted dependencies in first-seen order.
fn unwanted_table(report: &Report) -> Table {
    let mut table = default_table_preset();
    table.set_header(header(&["Unwanted Dependency"]));
    for dependency in &report.unwanted {
        table.add_row(vec![Cell::new(dependency)]);
    }
    table
}
