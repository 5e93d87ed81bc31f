use std::collections::BTreeMap;

/// Token names a template body may reference.
pub const RECOGNIZED_TOKENS: &[&str] = &[
    "jobCardNo",
    "vehicleName",
    "vehicleIdentifier",
    "driverName",
    "mechanicName",
    "odometer",
    "status",
    "createdDate",
    "reportedIssues",
    "requestedWork",
    "tasks",
    "parts",
    "totalCost",
    "qrCode",
];

/// Marker text unique to the built-in fallback template.
pub const FALLBACK_MARKER: &str = "Generated by FleetDesk";

/// Built-in template used when no explicit template id is given and no
/// default-active template exists.
pub const FALLBACK_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  body { font-family: Helvetica, Arial, sans-serif; font-size: 12px; color: #1a1a1a; }
  h1 { font-size: 20px; margin-bottom: 2px; }
  .meta { color: #555; margin-bottom: 16px; }
  table { width: 100%; border-collapse: collapse; margin: 8px 0 16px; }
  th, td { border: 1px solid #ccc; padding: 4px 6px; text-align: left; }
  th { background: #f2f2f2; }
  .total { font-size: 14px; font-weight: bold; text-align: right; }
  .qr { float: right; width: 120px; }
  footer { margin-top: 24px; font-size: 10px; color: #888; }
</style>
</head>
<body>
  <div class="qr">{{qrCode}}</div>
  <h1>Job Card {{jobCardNo}}</h1>
  <div class="meta">{{status}} &middot; Created {{createdDate}}</div>

  <table>
    <tr><th>Vehicle</th><td>{{vehicleName}}</td><th>Plate / Trailer No</th><td>{{vehicleIdentifier}}</td></tr>
    <tr><th>Driver</th><td>{{driverName}}</td><th>Mechanic</th><td>{{mechanicName}}</td></tr>
    <tr><th>Odometer</th><td colspan="3">{{odometer}}</td></tr>
  </table>

  <h3>Reported Issues</h3>
  <p>{{reportedIssues}}</p>

  <h3>Requested Work</h3>
  <p>{{requestedWork}}</p>

  <h3>Tasks</h3>
  <table>
    <thead><tr><th>Description</th><th>Status</th><th>Hours</th><th>Notes</th></tr></thead>
    <tbody>{{tasks}}</tbody>
  </table>

  <h3>Parts</h3>
  <table>
    <thead><tr><th>Part</th><th>Part No</th><th>Qty</th><th>Unit Cost</th><th>Total</th></tr></thead>
    <tbody>{{parts}}</tbody>
  </table>

  <p class="total">Total Cost: {{totalCost}}</p>

  <footer>Generated by FleetDesk</footer>
</body>
</html>
"#;

/// Substitute every occurrence of each `{{token}}` literal in `template`.
///
/// Replacement is global per token and tokens are applied one after another.
/// A resolved value that itself contains a later token's literal text will be
/// substituted again by that later pass; callers must not rely on values
/// being treated as opaque. This matches the behavior of the chained global
/// replaces this pipeline descends from.
pub fn substitute(template: &str, tokens: &BTreeMap<&'static str, String>) -> String {
    let mut out = template.to_string();
    for (name, value) in tokens {
        let literal = format!("{{{{{}}}}}", name);
        if out.contains(&literal) {
            out = out.replace(&literal, value);
        }
    }
    out
}
