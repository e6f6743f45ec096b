use crate::reporting::model::Finding;
use serde::Serialize;

#[derive(Serialize)]
struct Report<'a> {
    scan_metadata: ScanMetadata,
    summary: Summary,
    findings: &'a [Finding],
}

#[derive(Serialize)]
struct ScanMetadata {
    tool: String,
    version: String,
    scan_date: String,
    report_format: String,
}

#[derive(Serialize)]
struct Summary {
    total_findings: usize,
    reflected_parameters: usize,
    confirmed_parameters: usize,
    filtered_parameters: usize,
    unreflected_targets: usize,
    probe_failures: usize,
}

pub fn render(findings: &[Finding]) -> anyhow::Result<String> {
    let summary = Summary {
        total_findings: findings.len(),
        reflected_parameters: findings.iter().filter(|f| matches!(f, Finding::ReflectedParameter { .. })).count(),
        confirmed_parameters: findings.iter().filter(|f| matches!(f, Finding::UnfilteredChars { .. })).count(),
        filtered_parameters: findings.iter().filter(|f| matches!(f, Finding::ReflectedButFiltered { .. })).count(),
        unreflected_targets: findings.iter().filter(|f| matches!(f, Finding::NoReflection { .. })).count(),
        probe_failures: findings.iter().filter(|f| f.is_error()).count(),
    };

    let report = Report {
        scan_metadata: ScanMetadata {
            tool: "OSMOS".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            scan_date: chrono::Utc::now().to_rfc3339(),
            report_format: "application/json".to_string(),
        },
        summary,
        findings,
    };

    let json = serde_json::to_string_pretty(&report)?;
    Ok(json)
}
