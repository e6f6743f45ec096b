use crate::reporting::model::Finding;
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

// ==============================
// BOX CONFIGURATION
// ==============================

const BOX_WIDTH: usize = 70;
const INNER_WIDTH: usize = BOX_WIDTH - 2;

fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn top_border() -> String {
    format!("╔{}╗", "═".repeat(INNER_WIDTH))
}

fn middle_border() -> String {
    format!("╠{}╣", "═".repeat(INNER_WIDTH))
}

fn bottom_border() -> String {
    format!("╚{}╝", "═".repeat(INNER_WIDTH))
}

/// Left-aligned box line
fn box_line(content: &str) -> String {
    let safe_content = format!(" {} ", content);
    let width = visual_width(&safe_content);

    let padding = INNER_WIDTH.saturating_sub(width);
    format!("║{}{}║", safe_content, " ".repeat(padding))
}

fn box_line_centered(content: &str) -> String {
    let safe_content = format!(" {} ", content);
    let width = visual_width(&safe_content);

    if width >= INNER_WIDTH {
        return box_line(content);
    }

    let remaining = INNER_WIDTH - width;
    let left = remaining / 2;
    let right = remaining - left;

    format!(
        "║{}{}{}║",
        " ".repeat(left),
        safe_content,
        " ".repeat(right)
    )
}

// ==============================
// REPORT RENDERING
// ==============================

/// Summary box followed by every finding grouped under its target URL
pub fn render_string(findings: &[Finding]) -> String {
    let mut out = String::new();

    let reflected = findings
        .iter()
        .filter(|f| matches!(f, Finding::ReflectedParameter { .. }))
        .count();
    let confirmed = findings
        .iter()
        .filter(|f| matches!(f, Finding::UnfilteredChars { .. }))
        .count();
    let filtered = findings
        .iter()
        .filter(|f| matches!(f, Finding::ReflectedButFiltered { .. }))
        .count();
    let errors = findings.iter().filter(|f| f.is_error()).count();

    let _ = writeln!(out, "{}", top_border());
    let _ = writeln!(out, "{}", box_line_centered("OSMOS SCAN SUMMARY"));
    let _ = writeln!(out, "{}", middle_border());
    let _ = writeln!(out, "{}", box_line(&format!("Reflected parameters:  {}", reflected)));
    let _ = writeln!(out, "{}", box_line(&format!("Marker confirmed:      {}", confirmed)));
    if filtered > 0 {
        let _ = writeln!(out, "{}", box_line(&format!("Reflected but filtered: {}", filtered)));
    }
    if errors > 0 {
        let _ = writeln!(out, "{}", box_line(&format!("Probe failures:        {}", errors)));
    }
    let _ = writeln!(out, "{}", bottom_border());

    let mut urls: Vec<&str> = Vec::new();
    for f in findings {
        if !urls.contains(&f.url()) {
            urls.push(f.url());
        }
    }

    for url in urls {
        let _ = writeln!(out, "\nURL: {}", url);
        for f in findings.iter().filter(|f| f.url() == url) {
            if let (Finding::UnfilteredChars { .. }, Some(param)) = (f, f.param()) {
                let _ = writeln!(out, "[*] Parameter: {}", param);
            }
            for line in f.console_lines() {
                let _ = writeln!(out, "{}", line);
            }
        }
    }

    out
}
