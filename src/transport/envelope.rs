//! Multipart framing of a serialized request document.
//!
//! Every call ships the XML as one form part whose name doubles as its
//! filename, plus up to [`ATTACHMENT_LIMIT`] file parts named
//! `attachfile1` .. `attachfile5`.

use std::path::Path;
use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use crate::core::AgentError;
use crate::schema::WireSchema;

/// Hard ceiling on attachments per request, enforced before any bytes are
/// framed.
pub const ATTACHMENT_LIMIT: usize = 5;

const CRLF: &str = "\r\n";

/// A file to attach to an invoice request.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Reads the file eagerly so a missing path fails at attach time, not
    /// mid-framing.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AgentError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|_| AgentError::AttachmentNotFound {
            path: path.display().to_string(),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { file_name, bytes })
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Frames the document and attachments into a ready-to-send request.
///
/// Duplicate attachment file names are skipped with a warning rather than
/// rejected; the attachment count is checked against [`ATTACHMENT_LIMIT`]
/// before anything else.
pub fn frame(
    schema: &WireSchema,
    xml: &str,
    attachments: &[Attachment],
    api_url: &str,
    custom_headers: &[(String, String)],
    session_token: Option<&str>,
    timeout: Duration,
) -> Result<super::HttpRequest, AgentError> {
    if attachments.len() > ATTACHMENT_LIMIT {
        return Err(AgentError::AttachmentLimitExceeded {
            count: attachments.len(),
        });
    }

    let boundary = Uuid::new_v4().simple().to_string();
    let mut body = Vec::new();

    push_part_header(
        &mut body,
        &boundary,
        schema.part_name,
        schema.part_name,
        Some("text/xml"),
    );
    body.extend_from_slice(xml.as_bytes());
    body.extend_from_slice(CRLF.as_bytes());

    let mut seen: Vec<&str> = Vec::new();
    let mut index = 0usize;
    for attachment in attachments {
        if seen.contains(&attachment.file_name.as_str()) {
            warn!(file = %attachment.file_name, "duplicate attachment skipped");
            continue;
        }
        seen.push(&attachment.file_name);
        index += 1;
        let part_name = format!("attachfile{index}");
        push_part_header(&mut body, &boundary, &part_name, &attachment.file_name, None);
        body.extend_from_slice(&attachment.bytes);
        body.extend_from_slice(CRLF.as_bytes());
    }

    body.extend_from_slice(format!("--{boundary}--{CRLF}").as_bytes());

    let mut headers = vec![
        (
            "Content-Type".to_string(),
            format!("multipart/form-data; boundary={boundary}"),
        ),
        ("charset".to_string(), "utf-8".to_string()),
        (
            "API".to_string(),
            format!("SzamlaAgent/{}", env!("CARGO_PKG_VERSION")),
        ),
    ];
    headers.extend(custom_headers.iter().cloned());
    if let Some(token) = session_token {
        headers.push((
            "Cookie".to_string(),
            format!("{}={token}", crate::session::SESSION_COOKIE_NAME),
        ));
    }

    Ok(super::HttpRequest {
        url: api_url.to_string(),
        headers,
        body,
        timeout,
    })
}

fn push_part_header(
    body: &mut Vec<u8>,
    boundary: &str,
    name: &str,
    file_name: &str,
    content_type: Option<&str>,
) {
    body.extend_from_slice(format!("--{boundary}{CRLF}").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"{CRLF}")
            .as_bytes(),
    );
    if let Some(content_type) = content_type {
        body.extend_from_slice(format!("Content-Type: {content_type}{CRLF}").as_bytes());
    }
    body.extend_from_slice(CRLF.as_bytes());
}
