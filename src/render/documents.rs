use serde_json::Value;

use crate::entities::document::{DocumentType, Model as Document};
use crate::render::tokens::escape_html;

/// Render a document's content to an HTML fragment according to its type.
///
/// Editor-state shapes are not validated anywhere; every lookup here is
/// defensive and a missing field degrades to empty output rather than an
/// error.
pub fn render_document_as_html(doc: &Document) -> String {
    match doc.doc_type {
        DocumentType::Text => render_text(doc),
        DocumentType::Table => render_table(doc),
        DocumentType::Excel => render_excel(doc),
        DocumentType::Pdf => render_file_embed(doc),
        DocumentType::Image => render_image(doc),
    }
}

/// Wrap a rendered fragment in a printable page shell.
pub fn document_page_shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  body {{ font-family: Helvetica, Arial, sans-serif; font-size: 12px; color: #1a1a1a; }}
  h1 {{ font-size: 18px; }}
  table {{ border-collapse: collapse; width: 100%; margin: 8px 0; }}
  th, td {{ border: 1px solid #ccc; padding: 4px 6px; text-align: left; }}
  th {{ background: #f2f2f2; }}
  caption {{ text-align: left; font-weight: bold; padding: 4px 0; }}
  img, embed {{ max-width: 100%; }}
</style>
<title>{title}</title>
</head>
<body>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        body = body,
    )
}

fn state<'a>(doc: &'a Document) -> Option<&'a Value> {
    doc.editor_state.as_ref()
}

fn render_text(doc: &Document) -> String {
    // Text documents store rich-text HTML under `content`.
    let content = state(doc)
        .and_then(|s| s.get("content"))
        .and_then(Value::as_str)
        .unwrap_or("");
    format!(r#"<div class="document-text">{}</div>"#, content)
}

fn render_table(doc: &Document) -> String {
    let columns = state(doc)
        .and_then(|s| s.get("columns"))
        .and_then(Value::as_array);
    let rows = state(doc)
        .and_then(|s| s.get("rows"))
        .and_then(Value::as_array);
    table_fragment(None, columns, rows)
}

fn render_excel(doc: &Document) -> String {
    let sheets = state(doc)
        .and_then(|s| s.get("sheets"))
        .and_then(Value::as_array);

    let Some(sheets) = sheets else {
        return table_fragment(None, None, None);
    };

    sheets
        .iter()
        .map(|sheet| {
            let name = sheet.get("name").and_then(Value::as_str);
            let columns = sheet.get("columns").and_then(Value::as_array);
            let rows = sheet.get("rows").and_then(Value::as_array);
            table_fragment(name, columns, rows)
        })
        .collect()
}

fn table_fragment(
    caption: Option<&str>,
    columns: Option<&Vec<Value>>,
    rows: Option<&Vec<Value>>,
) -> String {
    let mut out = String::from("<table>");

    if let Some(caption) = caption {
        out.push_str(&format!("<caption>{}</caption>", escape_html(caption)));
    }

    out.push_str("<thead><tr>");
    if let Some(columns) = columns {
        for col in columns {
            out.push_str(&format!("<th>{}</th>", escape_html(cell_text(col).as_ref())));
        }
    }
    out.push_str("</tr></thead><tbody>");

    if let Some(rows) = rows {
        for row in rows {
            out.push_str("<tr>");
            if let Some(cells) = row.as_array() {
                for cell in cells {
                    out.push_str(&format!("<td>{}</td>", escape_html(cell_text(cell).as_ref())));
                }
            }
            out.push_str("</tr>");
        }
    }
    out.push_str("</tbody></table>");
    out
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn render_file_embed(doc: &Document) -> String {
    match doc.file_url.as_deref() {
        Some(url) => format!(
            r#"<embed src="{}" type="application/pdf" width="100%" height="800px" />"#,
            escape_html(url)
        ),
        None => String::new(),
    }
}

fn render_image(doc: &Document) -> String {
    match doc.file_url.as_deref() {
        Some(url) => format!(
            r#"<img src="{}" alt="{}" />"#,
            escape_html(url),
            escape_html(&doc.title)
        ),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn doc(doc_type: DocumentType, editor_state: Option<Value>, file_url: Option<&str>) -> Document {
        Document {
            id: Uuid::new_v4(),
            title: "Service schedule".to_string(),
            doc_type,
            editor_state,
            file_url: file_url.map(str::to_string),
            version: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn table_with_header_only_renders_no_data_rows() {
        let d = doc(
            DocumentType::Table,
            Some(json!({ "columns": ["Name"], "rows": [] })),
            None,
        );
        let html = render_document_as_html(&d);
        assert_eq!(html.matches("<th>").count(), 1);
        assert_eq!(html.matches("<td>").count(), 0);
        assert!(html.contains("<th>Name</th>"));
    }

    #[test]
    fn table_rows_render_cells() {
        let d = doc(
            DocumentType::Table,
            Some(json!({
                "columns": ["Truck", "Mileage"],
                "rows": [["KBX 204T", 120450], ["KCA 881P", 98012]]
            })),
            None,
        );
        let html = render_document_as_html(&d);
        assert_eq!(html.matches("<tr>").count(), 3); // header + 2 data rows
        assert!(html.contains("<td>KBX 204T</td>"));
        assert!(html.contains("<td>120450</td>"));
    }

    #[test]
    fn malformed_editor_state_degrades_to_empty_output() {
        let d = doc(DocumentType::Table, Some(json!({ "wrong": true })), None);
        let html = render_document_as_html(&d);
        assert!(html.starts_with("<table>"));
        assert!(!html.contains("<th>"));

        let d = doc(DocumentType::Text, None, None);
        assert_eq!(render_document_as_html(&d), r#"<div class="document-text"></div>"#);
    }

    #[test]
    fn excel_renders_one_table_per_sheet() {
        let d = doc(
            DocumentType::Excel,
            Some(json!({
                "sheets": [
                    { "name": "Q1", "columns": ["Truck"], "rows": [["KBX 204T"]] },
                    { "name": "Q2", "columns": ["Truck"], "rows": [] }
                ]
            })),
            None,
        );
        let html = render_document_as_html(&d);
        assert_eq!(html.matches("<table>").count(), 2);
        assert!(html.contains("<caption>Q1</caption>"));
    }

    #[test]
    fn image_and_pdf_variants_use_file_url() {
        let d = doc(DocumentType::Image, None, Some("https://files.example/1.png"));
        assert!(render_document_as_html(&d).contains(r#"<img src="https://files.example/1.png""#));

        let d = doc(DocumentType::Pdf, None, Some("https://files.example/1.pdf"));
        assert!(render_document_as_html(&d).contains("<embed"));

        let d = doc(DocumentType::Image, None, None);
        assert_eq!(render_document_as_html(&d), "");
    }
}
