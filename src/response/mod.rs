//! Normalization of raw replies into typed outcomes.
//!
//! The service reports through three channels at once: `szlahu_*` response
//! headers, an XML or plain body, and for PDF downloads the raw bytes
//! themselves. This module runs the shared prechecks and hands the rest to
//! the per-document resolvers in [`outcome`].

mod outcome;

pub use outcome::*;

use std::collections::BTreeMap;

use crate::core::AgentError;
use crate::transport::HttpResponse;

/// Rejects replies no resolver can work with. Order matters: an explicit
/// maintenance signal wins over any shape complaint.
pub fn precheck(response: &HttpResponse) -> Result<(), AgentError> {
    if response.header("szlahu_down").is_some() {
        return Err(AgentError::ServiceUnavailable);
    }
    if response.headers.is_empty() {
        return Err(AgentError::MalformedResponse);
    }
    if response.body.is_empty() && !has_agent_headers(response) {
        return Err(AgentError::EmptyResponse);
    }
    Ok(())
}

/// Lowercased name-to-value map of the reply headers. Later duplicates win,
/// matching how the service emits them.
pub fn headers_map(response: &HttpResponse) -> BTreeMap<String, String> {
    response
        .headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
        .collect()
}

fn has_agent_headers(response: &HttpResponse) -> bool {
    response
        .headers
        .iter()
        .any(|(name, _)| name.to_ascii_lowercase().starts_with("szlahu_"))
}

fn is_pdf(headers: &BTreeMap<String, String>) -> bool {
    if let Some(ct) = headers.get("content-type") {
        if ct.contains("application/pdf") {
            return true;
        }
    }
    headers
        .get("content-disposition")
        .is_some_and(|cd| cd.contains("pdf"))
}

/// Minimal percent-decoding for header values the service URL-encodes
/// (buyer account URL, error messages).
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                out.push(hex_value(bytes[i + 1]) << 4 | hex_value(bytes[i + 2]));
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(headers: &[(&str, &str)], body: &[u8]) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_vec(),
        }
    }

    #[test]
    fn maintenance_header_beats_everything() {
        let response = reply(&[("szlahu_down", "true")], b"");
        assert!(matches!(
            precheck(&response),
            Err(AgentError::ServiceUnavailable)
        ));
    }

    #[test]
    fn headerless_reply_is_malformed() {
        let response = reply(&[], b"<xml/>");
        assert!(matches!(
            precheck(&response),
            Err(AgentError::MalformedResponse)
        ));
    }

    #[test]
    fn bodyless_reply_without_agent_headers_is_empty() {
        let response = reply(&[("content-type", "text/html")], b"");
        assert!(matches!(precheck(&response), Err(AgentError::EmptyResponse)));
    }

    #[test]
    fn percent_decoding_handles_encoded_url() {
        assert_eq!(
            percent_decode("https%3A%2F%2Fexample.com%2Ffiok"),
            "https://example.com/fiok"
        );
        assert_eq!(percent_decode("hib%C3%A1s+k%C3%A9r%C3%A9s"), "hibás kérés");
    }

    #[test]
    fn malformed_percent_sequences_pass_through() {
        assert_eq!(percent_decode("%aérror"), "%aérror");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz%2F"), "%zz/");
        assert_eq!(percent_decode("%2"), "%2");
    }
}
