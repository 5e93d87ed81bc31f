use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use qrcode::{render::svg, QrCode};
use rust_decimal::Decimal;
use tracing::warn;

use crate::entities::job_card::{JobCardPart, JobCardTask, Model as JobCard};

/// Placeholder shown for absent optional fields. The display contract is a
/// fixed placeholder, never an empty string.
const NOT_AVAILABLE: &str = "N/A";
const NONE_REPORTED: &str = "None reported";
const NONE_REQUESTED: &str = "None requested";

pub const NO_TASKS_ROW: &str = r#"<tr><td colspan="4">No tasks specified</td></tr>"#;
pub const NO_PARTS_ROW: &str = r#"<tr><td colspan="5">No parts specified</td></tr>"#;

/// Flatten a job card into the fixed token map consumed by the renderer.
///
/// Every recognized token is always present; list tokens are pre-rendered
/// `<tr>` fragments.
pub fn resolve_tokens(card: &JobCard, public_base_url: &str) -> BTreeMap<&'static str, String> {
    let mut tokens = BTreeMap::new();

    tokens.insert("jobCardNo", card.job_card_no.clone());
    tokens.insert("vehicleName", card.vehicle_name.clone());
    tokens.insert("vehicleIdentifier", card.vehicle_identifier.clone());
    tokens.insert("driverName", optional(card.driver_name.as_deref(), NOT_AVAILABLE));
    tokens.insert(
        "mechanicName",
        optional(card.mechanic_name.as_deref(), NOT_AVAILABLE),
    );
    tokens.insert(
        "odometer",
        card.odometer
            .map(|km| format!("{} km", km))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    );
    tokens.insert("status", card.status.to_string());
    tokens.insert("createdDate", format_date(card.created_at));
    tokens.insert(
        "reportedIssues",
        optional(card.reported_issues.as_deref(), NONE_REPORTED),
    );
    tokens.insert(
        "requestedWork",
        optional(card.requested_work.as_deref(), NONE_REQUESTED),
    );
    tokens.insert("tasks", render_task_rows(&card.tasks.0));
    tokens.insert("parts", render_part_rows(&card.parts.0));
    tokens.insert("totalCost", format_money(card.total_cost));
    tokens.insert("qrCode", render_qr(card, public_base_url));

    tokens
}

fn optional(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => placeholder.to_string(),
    }
}

/// Two decimal places with a currency prefix, e.g. `$0.00`.
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%B %d, %Y").to_string()
}

/// Rows for the tasks table: description / status / hours / notes.
pub fn render_task_rows(tasks: &[JobCardTask]) -> String {
    if tasks.is_empty() {
        return NO_TASKS_ROW.to_string();
    }

    tasks
        .iter()
        .map(|task| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{:.1}</td><td>{}</td></tr>",
                escape_html(&task.description),
                task.status,
                task.hours,
                escape_html(task.notes.as_deref().unwrap_or(NOT_AVAILABLE)),
            )
        })
        .collect()
}

/// Rows for the parts table: name / part no / quantity / unit cost / line total.
pub fn render_part_rows(parts: &[JobCardPart]) -> String {
    if parts.is_empty() {
        return NO_PARTS_ROW.to_string();
    }

    parts
        .iter()
        .map(|part| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&part.name),
                escape_html(&part.part_number),
                part.quantity,
                format_money(part.unit_cost),
                format_money(part.line_total()),
            )
        })
        .collect()
}

/// Inline SVG QR image encoding the card's public access URL, so the printed
/// card scans back to the by-token lookup route.
fn render_qr(card: &JobCard, public_base_url: &str) -> String {
    let url = format!("{}/api/job-cards/by-token/{}", public_base_url, card.qr_token);
    match QrCode::new(url.as_bytes()) {
        Ok(code) => code
            .render::<svg::Color<'_>>()
            .min_dimensions(120, 120)
            .build(),
        Err(err) => {
            warn!(job_card = %card.job_card_no, %err, "QR encoding failed, falling back to plain URL");
            escape_html(&url)
        }
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
