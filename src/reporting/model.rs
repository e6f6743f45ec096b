use serde::Serialize;
use std::fmt;

/// One result emitted by the scan pipeline
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// No query parameter of the target came back in the page
    NoReflection { url: String },
    /// The parameter value appears verbatim in the response body
    ReflectedParameter { url: String, param: String },
    /// Naive reflection that did not echo the marker (reported only on request)
    ReflectedButFiltered { url: String, param: String },
    /// Marker-confirmed parameter and the special characters that survived
    UnfilteredChars {
        url: String,
        param: String,
        chars: Vec<String>,
    },
    /// An item was dropped because its probe failed
    ProbeFailed {
        url: String,
        param: Option<String>,
        error: String,
    },
}

impl Finding {
    pub fn url(&self) -> &str {
        match self {
            Finding::NoReflection { url }
            | Finding::ReflectedParameter { url, .. }
            | Finding::ReflectedButFiltered { url, .. }
            | Finding::UnfilteredChars { url, .. }
            | Finding::ProbeFailed { url, .. } => url,
        }
    }

    pub fn param(&self) -> Option<&str> {
        match self {
            Finding::NoReflection { .. } => None,
            Finding::ReflectedParameter { param, .. }
            | Finding::ReflectedButFiltered { param, .. }
            | Finding::UnfilteredChars { param, .. } => Some(param),
            Finding::ProbeFailed { param, .. } => param.as_deref(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Finding::ProbeFailed { .. })
    }

    /// Console lines for this finding, without trailing newlines
    pub fn console_lines(&self) -> Vec<String> {
        match self {
            Finding::NoReflection { .. } => vec!["[*] No Reflection Detected".to_string()],
            Finding::ReflectedParameter { param, .. } => vec![
                format!("[*] Reflected Parameter: {}", param),
                "[*] Unfiltered: Alphabets".to_string(),
                "[*] Unfiltered: Numbers".to_string(),
            ],
            Finding::ReflectedButFiltered { param, .. } => {
                vec![format!("[*] Reflected But Filtered: {}", param)]
            }
            Finding::UnfilteredChars { chars, .. } => {
                vec![format!("[*] Unfiltered: Special Chars {:?}", chars)]
            }
            Finding::ProbeFailed { url, param, error } => match param {
                Some(p) => vec![format!("[!] Probe failed for {} param {}: {}", url, p, error)],
                None => vec![format!("[!] Probe failed for {}: {}", url, error)],
            },
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.console_lines().join("\n"))
    }
}
