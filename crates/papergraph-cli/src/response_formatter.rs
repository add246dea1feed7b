//! Console output for the demos

use owo_colors::OwoColorize;
use papergraph_core::{NodeRecord, PaperMetadata, RelationshipRecord};
use serde_json::Value;

pub fn print_banner(title: &str) {
    println!();
    println!("{}", format!("=== {title} ===").bold().cyan());
}

pub fn print_step(message: &str) {
    println!("{} {}", "->".blue(), message);
}

pub fn print_success(message: &str) {
    println!("{} {}", "ok".green(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "!!".yellow(), message);
}

/// Render a JSON value the way it reads in a table cell
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// One line per row, `column: value` pairs in the given column order
pub fn format_rows(rows: &[Value], columns: &[&str]) -> Vec<String> {
    rows.iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    let value = row.get(*column).unwrap_or(&Value::Null);
                    format!("{column}: {}", format_value(value))
                })
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect()
}

pub fn print_rows(heading: &str, rows: &[Value], columns: &[&str]) {
    println!("{}", heading.bold());
    if rows.is_empty() {
        println!("  (no results)");
        return;
    }
    for line in format_rows(rows, columns) {
        println!("  {line}");
    }
}

pub fn format_node(node: &NodeRecord) -> String {
    let props = node
        .properties
        .iter()
        .map(|(k, v)| format!("{k}={}", format_value(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(":{} {{{props}}}", node.labels.join(":"))
}

pub fn print_node(node: &NodeRecord) {
    println!("  {}", format_node(node));
}

pub fn print_relationship(from: &str, rel: &RelationshipRecord, to: &str) {
    let props = rel
        .properties
        .iter()
        .map(|(k, v)| format!("{k}={}", format_value(v)))
        .collect::<Vec<_>>()
        .join(", ");
    if props.is_empty() {
        println!("  ({from})-[:{}]->({to})", rel.rel_type);
    } else {
        println!("  ({from})-[:{} {{{props}}}]->({to})", rel.rel_type);
    }
}

pub fn print_paper(paper: &PaperMetadata) {
    println!(
        "  {}",
        paper.title.as_deref().unwrap_or("<untitled>").bold()
    );
    let authors = paper.author_names();
    if !authors.is_empty() {
        println!("    authors: {}", authors.join(", "));
    }
    if let Some(year) = paper.year {
        println!("    year: {year}");
    }
    if let Some(doi) = &paper.doi {
        println!("    doi: {doi}");
    }
    if !paper.references.is_empty() {
        println!(
            "    references: {} shown of {}",
            paper.references.len(),
            paper.reference_count
        );
    }
    let missing = paper.missing_fields();
    if !missing.is_empty() {
        println!("    {}", format!("missing: {}", missing.join(", ")).dimmed());
    }
}
