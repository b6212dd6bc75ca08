// =============================================================================
// HTML Dashboard
// =============================================================================
//
// Renders one snapshot as a static page: a two-column grid of colored cards
// (symbol + signal label), the indicator listing underneath, and a refresh
// button posting to `/refresh`. No scripts; every refresh is a full reload.
// =============================================================================

use std::fmt::Write;

use crate::app_state::DashboardSnapshot;
use crate::report::PairReport;

const PAGE_TITLE: &str = "FX Signal Board";

const STYLE: &str = "\
body { font-family: sans-serif; background: #111; color: #eee; margin: 2rem; }
.grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 1rem; }
.card { padding: 20px; border-radius: 10px; text-align: center; color: #000; }
.card h3 { margin: 0 0 0.5rem 0; }
.card p { margin: 0; font-size: 1.2rem; font-weight: bold; }
.listing { margin-top: 2rem; font-family: monospace; }
.meta { color: #888; font-size: 0.8rem; }
button { margin-top: 1.5rem; padding: 0.5rem 1.5rem; font-size: 1rem; }";

/// Minimal escaping for text and double-quoted attribute values.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn render_card(out: &mut String, report: &PairReport) {
    let _ = write!(
        out,
        "<div class=\"card\" style=\"background-color: {}\"><h3>{}</h3><p>{}</p></div>",
        escape_html(&report.color),
        escape_html(&report.symbol),
        escape_html(&report.label),
    );
}

/// Full dashboard page for `snapshot`.
pub fn render_dashboard(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::with_capacity(4096);

    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{PAGE_TITLE}</title>\
         <style>{STYLE}</style></head><body><h1>📊 {PAGE_TITLE}</h1>"
    );

    out.push_str("<div class=\"grid\">");
    for report in &snapshot.reports {
        render_card(&mut out, report);
    }
    out.push_str("</div>");

    let lines = snapshot.indicator_lines();
    out.push_str("<div class=\"listing\"><h2>Indicators</h2>");
    if lines.is_empty() {
        out.push_str("<p>No indicator values available.</p>");
    } else {
        out.push_str("<ul>");
        for line in &lines {
            let _ = write!(out, "<li>{}</li>", escape_html(&line.to_string()));
        }
        out.push_str("</ul>");
    }
    out.push_str("</div>");

    let _ = write!(
        out,
        "<form method=\"post\" action=\"/refresh\"><button type=\"submit\">🔄 Refresh</button></form>\
         <p class=\"meta\">Updated {} (pass {}, version {})</p></body></html>",
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        escape_html(&snapshot.pass_id),
        snapshot.state_version,
    );

    out
}
