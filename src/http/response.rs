use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are stored lowercased
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub elapsed_ms: u128,
}

impl HttpResponse {
    /// Get body as UTF-8 string (lossy conversion)
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
    }

    /// A missing Content-Type counts as HTML; otherwise it must mention "html".
    /// A value that is not visible ASCII is never HTML.
    pub fn is_html(&self) -> bool {
        match self.content_type() {
            Some(ct) if !is_visible_ascii(ct) => false,
            Some(ct) if !ct.is_empty() => ct.to_ascii_lowercase().contains("html"),
            _ => true,
        }
    }
}

fn is_visible_ascii(s: &str) -> bool {
    s.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content_type: Option<&str>) -> HttpResponse {
        let mut headers = HashMap::new();
        if let Some(ct) = content_type {
            headers.insert("content-type".to_string(), ct.to_string());
        }
        HttpResponse {
            status,
            headers,
            body: b"<p>hi</p>".to_vec(),
            elapsed_ms: 0,
        }
    }

    #[test]
    fn test_redirect_classes() {
        assert!(response(301, None).is_redirect());
        assert!(response(308, None).is_redirect());
        assert!(!response(200, None).is_redirect());
        assert!(!response(404, None).is_redirect());
    }

    #[test]
    fn test_html_detection_is_case_insensitive() {
        assert!(response(200, Some("text/html; charset=utf-8")).is_html());
        assert!(response(200, Some("TEXT/HTML")).is_html());
        assert!(response(200, Some("application/xhtml+xml")).is_html());
        assert!(!response(200, Some("application/json")).is_html());
    }

    #[test]
    fn test_missing_content_type_is_html() {
        assert!(response(200, None).is_html());
        assert!(response(200, Some("")).is_html());
    }

    #[test]
    fn test_undecodable_content_type_is_not_html() {
        assert!(!response(200, Some("text/html\u{fffd}")).is_html());
        assert!(!response(200, Some("t\u{e9}xt/html")).is_html());
    }

    #[test]
    fn test_body_text_lossy() {
        let mut r = response(200, None);
        r.body = vec![b'a', 0xff, b'b'];
        assert_eq!(r.body_text(), "a\u{fffd}b");
    }
}
