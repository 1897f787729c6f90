//! Typed outcomes per document family.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;

use crate::core::AgentError;
use crate::schema::ResponseEncoding;
use crate::transport::HttpResponse;

use super::{headers_map, is_pdf, percent_decode};

/// Error code the service emits when the invoice was created but the
/// notification mail could not be sent. Such a reply still counts as
/// success.
pub const NOTIFICATION_SEND_FAILED: &str = "56";

/// Common read surface over all outcome types.
pub trait Outcome {
    fn is_success(&self) -> bool;
    fn error_code(&self) -> Option<&str>;
    fn error_message(&self) -> Option<&str>;
    /// Invoice or receipt number, where the operation yields one.
    fn document_number(&self) -> Option<&str>;
    /// Decoded PDF content, where the reply carried one.
    fn pdf_bytes(&self) -> Result<Option<Vec<u8>>, AgentError>;
    fn to_xml_string(&self) -> Option<&str>;
    fn to_json(&self) -> Result<String, AgentError>;
}

fn decode_pdf(pdf_base64: Option<&str>) -> Result<Option<Vec<u8>>, AgentError> {
    match pdf_base64 {
        None => Ok(None),
        Some(encoded) => BASE64
            .decode(encoded.trim())
            .map(Some)
            .map_err(|_| AgentError::MalformedResponse),
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, AgentError> {
    serde_json::to_string(value).map_err(|e| AgentError::Json(e.to_string()))
}

/// Result of the invoice family of operations, including proforma creation
/// and the data/PDF queries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceOutcome {
    pub invoice_number: Option<String>,
    pub invoice_id: Option<String>,
    pub buyer_account_url: Option<String>,
    pub outstanding_amount: Option<String>,
    pub net_total: Option<String>,
    pub gross_total: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub pdf_base64: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub raw_xml: Option<String>,
}

impl InvoiceOutcome {
    /// True when the only reported failure is the mail notification.
    pub fn has_notification_error(&self) -> bool {
        self.error_code.as_deref() == Some(NOTIFICATION_SEND_FAILED)
    }

    fn has_error(&self) -> bool {
        let flagged = self.error_code.is_some() || self.error_message.is_some();
        flagged && !(self.invoice_number.is_some() && self.has_notification_error())
    }
}

impl Outcome for InvoiceOutcome {
    fn is_success(&self) -> bool {
        !self.has_error()
    }

    fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn document_number(&self) -> Option<&str> {
        self.invoice_number.as_deref()
    }

    fn pdf_bytes(&self) -> Result<Option<Vec<u8>>, AgentError> {
        decode_pdf(self.pdf_base64.as_deref())
    }

    fn to_xml_string(&self) -> Option<&str> {
        self.raw_xml.as_deref()
    }

    fn to_json(&self) -> Result<String, AgentError> {
        encode_json(self)
    }
}

/// Result of the receipt operations. Receipts report exclusively through
/// the XML body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReceiptOutcome {
    pub receipt_number: Option<String>,
    pub success: bool,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub pdf_base64: Option<String>,
    pub raw_xml: Option<String>,
}

impl Outcome for ReceiptOutcome {
    fn is_success(&self) -> bool {
        self.success && self.error_code.is_none()
    }

    fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn document_number(&self) -> Option<&str> {
        self.receipt_number.as_deref()
    }

    fn pdf_bytes(&self) -> Result<Option<Vec<u8>>, AgentError> {
        decode_pdf(self.pdf_base64.as_deref())
    }

    fn to_xml_string(&self) -> Option<&str> {
        self.raw_xml.as_deref()
    }

    fn to_json(&self) -> Result<String, AgentError> {
        encode_json(self)
    }
}

/// Result of a proforma deletion, which reports through headers only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProformaDeletionOutcome {
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl Outcome for ProformaDeletionOutcome {
    fn is_success(&self) -> bool {
        self.error_code.is_none() && self.error_message.is_none()
    }

    fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn document_number(&self) -> Option<&str> {
        None
    }

    fn pdf_bytes(&self) -> Result<Option<Vec<u8>>, AgentError> {
        Ok(None)
    }

    fn to_xml_string(&self) -> Option<&str> {
        None
    }

    fn to_json(&self) -> Result<String, AgentError> {
        encode_json(self)
    }
}

/// Result of a taxpayer lookup against the tax authority gateway.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaxPayerOutcome {
    pub func_code: Option<String>,
    pub error_code: Option<String>,
    pub message: Option<String>,
    pub taxpayer_valid: Option<bool>,
    pub request_id: Option<String>,
    pub timestamp: Option<String>,
    pub request_version: Option<String>,
    pub raw_xml: Option<String>,
}

impl Outcome for TaxPayerOutcome {
    fn is_success(&self) -> bool {
        self.error_code.is_none() && self.func_code.as_deref() != Some("ERROR")
    }

    fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    fn error_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn document_number(&self) -> Option<&str> {
        None
    }

    fn pdf_bytes(&self) -> Result<Option<Vec<u8>>, AgentError> {
        Ok(None)
    }

    fn to_xml_string(&self) -> Option<&str> {
        self.raw_xml.as_deref()
    }

    fn to_json(&self) -> Result<String, AgentError> {
        encode_json(self)
    }
}

/// Collects text content by local element name, ignoring namespaces and
/// nesting. The reply schemas never repeat a name with different meaning,
/// so a flat scan is enough.
fn scan_elements(xml: &str, wanted: &[&str]) -> Option<BTreeMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut found = BTreeMap::new();
    let mut current: Option<String> = None;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                current = wanted.contains(&local.as_str()).then_some(local);
            }
            Ok(Event::Text(e)) => {
                if let Some(name) = current.take() {
                    let text = e.unescape().ok()?.into_owned();
                    if !text.trim().is_empty() {
                        found.entry(name).or_insert(text);
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(name) = current.take() {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    found.entry(name).or_insert(text);
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(_) => return None,
        }
    }
    Some(found)
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

/// Builds an [`InvoiceOutcome`] from an individual reply. Header fields are
/// authoritative; an XML body refines whatever the headers left blank.
pub fn resolve_invoice(
    encoding: ResponseEncoding,
    response: &HttpResponse,
) -> Result<InvoiceOutcome, AgentError> {
    let headers = headers_map(response);
    if encoding == ResponseEncoding::Text && !headers.keys().any(|k| k.starts_with("szlahu_")) {
        return Err(AgentError::MalformedResponse);
    }

    let mut outcome = InvoiceOutcome {
        invoice_number: headers.get("szlahu_szamlaszam").cloned(),
        invoice_id: headers.get("szlahu_id").cloned(),
        buyer_account_url: headers
            .get("szlahu_vevoifiokurl")
            .map(|v| percent_decode(v)),
        outstanding_amount: headers.get("szlahu_kintlevoseg").cloned(),
        net_total: headers.get("szlahu_nettovegosszeg").cloned(),
        gross_total: headers.get("szlahu_bruttovegosszeg").cloned(),
        error_code: headers.get("szlahu_error_code").cloned(),
        error_message: headers.get("szlahu_error").map(|v| percent_decode(v)),
        headers,
        ..Default::default()
    };

    if is_pdf(&outcome.headers) || response.body.starts_with(b"%PDF") {
        outcome.pdf_base64 = Some(BASE64.encode(&response.body));
        return Ok(outcome);
    }

    if encoding != ResponseEncoding::Text && !response.body.is_empty() {
        let body = String::from_utf8_lossy(&response.body).into_owned();
        if let Some(fields) = scan_elements(
            &body,
            &[
                "sikeres",
                "hibakod",
                "hibauzenet",
                "szamlaszam",
                "szamlanetto",
                "szamlabrutto",
                "kintlevoseg",
                "vevoifiokurl",
                "pdf",
            ],
        ) {
            if outcome.invoice_number.is_none() {
                outcome.invoice_number = non_empty(fields.get("szamlaszam"));
            }
            if outcome.error_code.is_none() {
                outcome.error_code = non_empty(fields.get("hibakod"));
            }
            if outcome.error_message.is_none() {
                outcome.error_message = non_empty(fields.get("hibauzenet"));
            }
            if outcome.net_total.is_none() {
                outcome.net_total = non_empty(fields.get("szamlanetto"));
            }
            if outcome.gross_total.is_none() {
                outcome.gross_total = non_empty(fields.get("szamlabrutto"));
            }
            if outcome.outstanding_amount.is_none() {
                outcome.outstanding_amount = non_empty(fields.get("kintlevoseg"));
            }
            if outcome.buyer_account_url.is_none() {
                outcome.buyer_account_url = non_empty(fields.get("vevoifiokurl"));
            }
            outcome.pdf_base64 = non_empty(fields.get("pdf"));
        }
        outcome.raw_xml = Some(body);
    }

    Ok(outcome)
}

/// Builds a [`ReceiptOutcome`] from the XML body every receipt operation
/// returns.
pub fn resolve_receipt(response: &HttpResponse) -> Result<ReceiptOutcome, AgentError> {
    let body = String::from_utf8_lossy(&response.body).into_owned();
    let fields = scan_elements(
        &body,
        &["nyugtaszam", "sikeres", "hibakod", "hibauzenet", "nyugtaPdf"],
    )
    .ok_or(AgentError::MalformedResponse)?;

    Ok(ReceiptOutcome {
        receipt_number: non_empty(fields.get("nyugtaszam")),
        success: fields.get("sikeres").map(|v| v.trim()) == Some("true"),
        error_code: non_empty(fields.get("hibakod")),
        error_message: non_empty(fields.get("hibauzenet")),
        pdf_base64: non_empty(fields.get("nyugtaPdf")),
        raw_xml: Some(body),
    })
}

/// Builds a [`ProformaDeletionOutcome`] from the reply headers.
pub fn resolve_proforma_deletion(
    response: &HttpResponse,
) -> Result<ProformaDeletionOutcome, AgentError> {
    let headers = headers_map(response);
    Ok(ProformaDeletionOutcome {
        error_code: headers.get("szlahu_error_code").cloned(),
        error_message: headers.get("szlahu_error").map(|v| percent_decode(v)),
        headers,
    })
}

/// Builds a [`TaxPayerOutcome`] from the gateway's namespaced XML. If the
/// body cannot be parsed at all the raw bytes are still surfaced.
pub fn resolve_taxpayer(response: &HttpResponse) -> Result<TaxPayerOutcome, AgentError> {
    let body = String::from_utf8_lossy(&response.body).into_owned();
    let mut outcome = TaxPayerOutcome {
        raw_xml: Some(body.clone()),
        ..Default::default()
    };

    let Some(fields) = scan_elements(
        &body,
        &[
            "funcCode",
            "errorCode",
            "message",
            "taxpayerValidity",
            "requestId",
            "timestamp",
            "requestVersion",
        ],
    ) else {
        return Ok(outcome);
    };

    outcome.func_code = non_empty(fields.get("funcCode"));
    outcome.error_code = non_empty(fields.get("errorCode"));
    outcome.message = non_empty(fields.get("message"));
    outcome.taxpayer_valid = fields.get("taxpayerValidity").map(|v| v.trim() == "true");
    outcome.request_id = non_empty(fields.get("requestId"));
    outcome.timestamp = non_empty(fields.get("timestamp"));
    outcome.request_version = non_empty(fields.get("requestVersion"));
    Ok(outcome)
}
