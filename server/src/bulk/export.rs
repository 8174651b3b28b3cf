//! CSV export of application records.

use std::fmt::Write;

use natioid_common::ApplicationRecord;

const HEADER: &str =
    "id,tracking_code,applicant_name,application_type,document_type,status,submitted_at";

/// Render `records` as CSV, one row per record, in the given order.
pub fn to_csv(records: &[ApplicationRecord]) -> String {
    let mut out = String::with_capacity(HEADER.len() + records.len() * 96);
    out.push_str(HEADER);
    out.push('\n');

    for r in records {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            r.id,
            escape(&r.tracking_code),
            escape(&r.applicant_name),
            r.application_type,
            r.document_type,
            r.status,
            r.submitted_at.to_rfc3339(),
        );
    }
    out
}

/// Quote a field if it contains a delimiter, quote or line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
