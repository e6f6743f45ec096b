use clap::Parser;
use std::path::PathBuf;

/// OSMOS – reflected parameter and unfiltered character probe
#[derive(Parser, Debug)]
#[command(
    name = "osmos",
    version,
    about = "OSMOS – reflected parameter and unfiltered character probe",
    long_about = r#"
OSMOS checks which query parameters of a URL are reflected in the response
and which special characters survive the round trip unfiltered.

  • Stage 1: Reflection (parameter values found verbatim in an HTML body)
  • Stage 2: Marker confirmation (an injected token must reflect too)
  • Stage 3: Special characters (" ' < > $ | ( ) ` : ; { } probed one by one)

Redirects and non-HTML responses are never inspected. TLS certificates are
not verified.
"#,
    after_help = r#"EXAMPLES:
  osmos -u "https://example.com/search?q=test"
  osmos -u "https://a.example/?id=1" -u "https://b.example/?name=x" -c 20
  osmos -l targets.txt --format json -o results.json
  osmos -u "https://example.com/?q=1" --random-marker --report-filtered
"#
)]
pub struct Cli {
    /// Target URL including its query string (repeatable)
    #[arg(short, long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// File with one target URL per line
    #[arg(short, long, value_name = "FILE")]
    pub list: Option<PathBuf>,

    /// Raw HTTP request file (not supported yet)
    #[arg(short, long, value_name = "FILE")]
    pub request: Option<String>,

    // ═══════════════════════════════════════════════════════════════════
    // PERFORMANCE
    // ═══════════════════════════════════════════════════════════════════

    /// Workers per pipeline stage
    #[arg(short, long, default_value = "40", help_heading = "PERFORMANCE")]
    pub concurrency: usize,

    /// End-to-end deadline for a single request, in seconds
    #[arg(long, default_value = "60", help_heading = "PERFORMANCE")]
    pub timeout: u64,

    /// Connection establishment timeout, in seconds
    #[arg(long = "connect-timeout", default_value = "30", help_heading = "PERFORMANCE")]
    pub connect_timeout: u64,

    // ═══════════════════════════════════════════════════════════════════
    // DETECTION
    // ═══════════════════════════════════════════════════════════════════

    /// Custom User-Agent header
    #[arg(long = "user-agent", help_heading = "DETECTION")]
    pub user_agent: Option<String>,

    /// Marker used to confirm reflections
    #[arg(long, help_heading = "DETECTION", conflicts_with = "random_marker")]
    pub marker: Option<String>,

    /// Generate a fresh random marker for this run
    #[arg(long = "random-marker", help_heading = "DETECTION")]
    pub random_marker: bool,

    /// Report reflected parameters that fail marker confirmation
    #[arg(long = "report-filtered", help_heading = "DETECTION")]
    pub report_filtered: bool,

    // ═══════════════════════════════════════════════════════════════════
    // OUTPUT
    // ═══════════════════════════════════════════════════════════════════

    /// Report format
    #[arg(
        long,
        default_value = "text",
        value_parser = ["text", "json"],
        help_heading = "OUTPUT"
    )]
    pub format: String,

    /// Write the report to a file
    #[arg(short, long, help_heading = "OUTPUT")]
    pub output: Option<String>,

    /// Verbose logging
    #[arg(short, long, help_heading = "OUTPUT")]
    pub verbose: bool,

    /// Only print findings
    #[arg(short, long, help_heading = "OUTPUT", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Do not print the banner
    #[arg(long = "no-banner", help_heading = "OUTPUT")]
    pub no_banner: bool,
}
