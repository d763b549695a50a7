//! Report Renderers
//!
//! Printable HTML, plain text, and pre-filled share links.

use crate::core::Outcome;
use crate::report::ReportDocument;

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Pass => "PASS",
        Outcome::Fail => "FAIL",
        Outcome::Pending => "PENDING",
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Minimal RFC 3986 percent-encoding for the share-link query strings.
fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(*byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

impl ReportDocument {
    /// Self-contained printable HTML page.
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<title>Verification report</title>\n<style>\n");
        html.push_str(
            "body{font-family:sans-serif;margin:2em;color:#111}\
             h1{margin-bottom:0}\
             table{border-collapse:collapse;width:100%;margin:1em 0}\
             th,td{border:1px solid #ccc;padding:6px 10px;text-align:left;font-size:13px}\
             th{background:#f2f2f2;text-transform:uppercase;font-size:11px}\
             .pass{color:#15803d;font-weight:bold}\
             .fail{color:#b91c1c;font-weight:bold}\
             .pending{color:#64748b}\n",
        );
        html.push_str("</style>\n</head>\n<body>\n");

        html.push_str("<h1>Verification report</h1>\n");
        if let Some(client) = &self.client_name {
            html.push_str(&format!("<p>Client: <strong>{}</strong></p>\n", escape_html(client)));
        }
        html.push_str(&format!(
            "<p>Ref {} &middot; {}</p>\n",
            escape_html(&self.reference),
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));

        html.push_str("<h2>01. Residual-current protection</h2>\n<table>\n");
        html.push_str("<tr><th>Device</th><th>Sensitivity</th><th>Trip time (x1)</th><th>Verdict</th></tr>\n");
        for row in &self.rcd_rows {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{} mA</td><td>{} ms</td><td class=\"{}\">{}</td></tr>\n",
                escape_html(&row.label),
                escape_html(&row.sensitivity_ma),
                escape_html(if row.trip_time_ms.is_empty() { "--" } else { &row.trip_time_ms }),
                css_class(row.outcome),
                outcome_label(row.outcome)
            ));
        }
        html.push_str("</table>\n");

        html.push_str("<h2>02. Insulation resistance</h2>\n<table>\n");
        html.push_str("<tr><th>Point</th><th>Voltage</th><th>Value</th><th>Verdict</th></tr>\n");
        if self.insulation_rows.is_empty() {
            html.push_str("<tr><td colspan=\"4\">No insulation readings recorded</td></tr>\n");
        }
        for row in &self.insulation_rows {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{} V</td><td>{}</td><td class=\"{}\">{}</td></tr>\n",
                escape_html(&row.point),
                row.voltage,
                escape_html(&row.value),
                css_class(row.outcome),
                outcome_label(row.outcome)
            ));
        }
        html.push_str("</table>\n");

        html.push_str("<h2>03. Line and loop impedance</h2>\n<table>\n");
        html.push_str("<tr><th>Circuit</th><th>Z line (&Omega;)</th><th>Z loop (&Omega;)</th><th>Verdict</th></tr>\n");
        for row in &self.impedance_rows {
            html.push_str(&format!(
                "<tr><td>{} ({})</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td></tr>\n",
                escape_html(&row.label),
                escape_html(&row.detail),
                escape_html(&row.line_ohms),
                escape_html(&row.loop_ohms),
                css_class(row.outcome),
                outcome_label(row.outcome)
            ));
        }
        html.push_str("</table>\n</body>\n</html>\n");
        html
    }

    /// Plain-text rendering for terminals and message bodies.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("VERIFICATION REPORT\n");
        if let Some(client) = &self.client_name {
            out.push_str(&format!("Client: {client}\n"));
        }
        out.push_str(&format!(
            "Ref {} - {}\n\n",
            self.reference,
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));

        out.push_str("01. RESIDUAL-CURRENT PROTECTION\n");
        for row in &self.rcd_rows {
            out.push_str(&format!(
                "  {} | {} mA | {} ms | {}\n",
                row.label,
                row.sensitivity_ma,
                if row.trip_time_ms.is_empty() { "--" } else { &row.trip_time_ms },
                outcome_label(row.outcome)
            ));
        }

        out.push_str("\n02. INSULATION RESISTANCE\n");
        if self.insulation_rows.is_empty() {
            out.push_str("  no readings recorded\n");
        }
        for row in &self.insulation_rows {
            out.push_str(&format!(
                "  {} | {} V | {} | {}\n",
                row.point,
                row.voltage,
                row.value,
                outcome_label(row.outcome)
            ));
        }

        out.push_str("\n03. LINE AND LOOP IMPEDANCE\n");
        for row in &self.impedance_rows {
            out.push_str(&format!(
                "  {} ({}) | Z line {} | Z loop {} | {}\n",
                row.label,
                row.detail,
                row.line_ohms,
                row.loop_ohms,
                outcome_label(row.outcome)
            ));
        }
        out
    }

    /// `mailto:` link with the text report pre-filled.
    pub fn mailto_link(&self, recipient: &str) -> String {
        let subject = match &self.client_name {
            Some(client) => format!("Verification report - {client}"),
            None => "Verification report".to_string(),
        };
        format!(
            "mailto:{}?subject={}&body={}",
            recipient,
            percent_encode(&subject),
            percent_encode(&self.render_text())
        )
    }

    /// WhatsApp share link with the text report pre-filled.
    pub fn whatsapp_link(&self) -> String {
        format!("https://wa.me/?text={}", percent_encode(&self.render_text()))
    }
}

fn css_class(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Pass => "pass",
        Outcome::Fail => "fail",
        Outcome::Pending => "pending",
    }
}
