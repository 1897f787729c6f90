use std::sync::Mutex;

use szamla_agent::client::{Agent, AgentConfig};
use szamla_agent::core::AgentError;
use szamla_agent::document::{
    Buyer, CreditNote, EmailSend, Invoice, InvoiceHeader, Item, Receipt, ReceiptHeader, Settings,
};
use szamla_agent::session::SessionBackend;
use szamla_agent::transport::{Attachment, HttpRequest, HttpResponse, HttpTransport};

/// Records every request and replays a scripted sequence of responses.
struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<Vec<HttpResponse>>,
}

impl MockTransport {
    fn new(responses: Vec<HttpResponse>) -> Self {
        let mut responses = responses;
        responses.reverse();
        Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(responses),
        }
    }

    fn single(response: HttpResponse) -> Self {
        Self::new(vec![response])
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, AgentError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| AgentError::Transport("no scripted response left".into()))
    }
}

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

fn invoice() -> Invoice {
    let mut header = InvoiceHeader::invoice();
    header.payment_method = "átutalás".into();
    header.currency = "HUF".into();
    header.language = "hu".into();
    Invoice {
        header,
        buyer: Buyer::new("Kovács Bt.", "2030", "Érd", "Tárnoki út 23."),
        items: vec![Item::new("Eladó tétel", 1.0, "db", 10000.0, "27")],
        ..Invoice::default()
    }
}

fn agent_over(responses: Vec<HttpResponse>) -> (Agent, std::sync::Arc<MockTransport>) {
    let transport = std::sync::Arc::new(MockTransport::new(responses));
    let config = AgentConfig {
        session_backend: SessionBackend::Disabled,
        ..AgentConfig::default()
    };
    let agent = Agent::with_transport(
        Settings::with_api_key("agent-key-123"),
        config,
        Box::new(ArcTransport(transport.clone())),
    );
    (agent, transport)
}

/// Lets the test keep a handle on the transport the agent owns.
struct ArcTransport(std::sync::Arc<MockTransport>);

impl HttpTransport for ArcTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, AgentError> {
        self.0.send(request)
    }
}

// --- Invoice creation ---

#[test]
fn generate_invoice_returns_the_header_fields() {
    let (agent, transport) = agent_over(vec![reply(
        &[
            ("szlahu_szamlaszam", "E-2026-123"),
            ("szlahu_id", "4242"),
            ("szlahu_nettovegosszeg", "10000"),
            ("szlahu_bruttovegosszeg", "12700"),
            ("szlahu_vevoifiokurl", "https%3A%2F%2Fexample.com%2Ffiok"),
        ],
        b"ok",
    )]);

    let outcome = agent.generate_invoice(&invoice()).unwrap();
    assert_eq!(outcome.invoice_number.as_deref(), Some("E-2026-123"));
    assert_eq!(outcome.gross_total.as_deref(), Some("12700"));
    assert_eq!(
        outcome.buyer_account_url.as_deref(),
        Some("https://example.com/fiok")
    );

    let requests = transport.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"action-xmlagentxmlfile\""));
    assert!(body.contains("<xmlszamla xmlns="));
    assert!(
        requests[0]
            .header("content-type")
            .unwrap()
            .starts_with("multipart/form-data; boundary=")
    );
}

#[test]
fn remote_error_surfaces_code_and_message() {
    let (agent, _) = agent_over(vec![reply(
        &[
            ("szlahu_error_code", "3"),
            ("szlahu_error", "hib%C3%A1s+agent+kulcs"),
        ],
        b"",
    )]);

    match agent.generate_invoice(&invoice()) {
        Err(AgentError::RemoteOperationFailed { code, message }) => {
            assert_eq!(code, "3");
            assert_eq!(message, "hibás agent kulcs");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn notification_send_failure_still_succeeds() {
    let (agent, _) = agent_over(vec![reply(
        &[
            ("szlahu_szamlaszam", "E-2026-124"),
            ("szlahu_error_code", "56"),
            ("szlahu_error", "ertesites sikertelen"),
        ],
        b"",
    )]);

    let outcome = agent.generate_invoice(&invoice()).unwrap();
    assert!(outcome.has_notification_error());
    assert_eq!(outcome.invoice_number.as_deref(), Some("E-2026-124"));
}

#[test]
fn maintenance_header_maps_to_service_unavailable() {
    let (agent, _) = agent_over(vec![reply(
        &[("szlahu_down", "Rendszerkarbantartas")],
        b"",
    )]);
    assert!(matches!(
        agent.generate_invoice(&invoice()),
        Err(AgentError::ServiceUnavailable)
    ));
}

#[test]
fn six_attachments_are_rejected_before_sending() {
    let (agent, transport) = agent_over(vec![]);
    let mut doc = invoice();
    for i in 0..6 {
        doc.attachments
            .push(Attachment::from_bytes(format!("file{i}.pdf"), vec![0u8; 4]));
    }
    assert!(matches!(
        agent.generate_invoice(&doc),
        Err(AgentError::AttachmentLimitExceeded { count: 6 })
    ));
    assert!(transport.requests.lock().unwrap().is_empty());
}

#[test]
fn attachments_frame_as_numbered_file_parts() {
    let (agent, transport) = agent_over(vec![reply(&[("szlahu_szamlaszam", "E-2026-5")], b"")]);
    let mut doc = invoice();
    doc.attachments
        .push(Attachment::from_bytes("szerzodes.pdf", b"%PDF-1.4".to_vec()));
    agent.generate_invoice(&doc).unwrap();

    let requests = transport.requests.lock().unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"attachfile1\"; filename=\"szerzodes.pdf\""));
}

// --- Payments, queries, deletion ---

#[test]
fn pay_invoice_sends_inline_payments() {
    let (agent, transport) = agent_over(vec![reply(&[("szlahu_szamlaszam", "E-2026-9")], b"")]);
    let notes = vec![
        CreditNote::new("átutalás", 5000.0),
        CreditNote::new("készpénz", 7700.0),
    ];
    agent.pay_invoice("E-2026-9", &notes, true).unwrap();

    let requests = transport.requests.lock().unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"action-szamla_agent_kifiz\""));
    assert!(body.contains("<additiv><![CDATA[true]]></additiv>"));
    assert_eq!(body.matches("<kifizetes>").count(), 2);
    assert!(!body.contains("<kifizetesek>"));
}

#[test]
fn invoice_pdf_download_decodes_the_body() {
    let (agent, _) = agent_over(vec![reply(
        &[
            ("szlahu_szamlaszam", "E-2026-9"),
            ("content-type", "application/pdf"),
        ],
        b"%PDF-1.7 tartalom",
    )]);
    let outcome = agent.get_invoice_pdf("E-2026-9", "").unwrap();
    use szamla_agent::Outcome as _;
    assert_eq!(
        outcome.pdf_bytes().unwrap().unwrap(),
        b"%PDF-1.7 tartalom"
    );
}

#[test]
fn proforma_deletion_reports_header_errors() {
    let (agent, _) = agent_over(vec![reply(
        &[
            ("szlahu_error_code", "339"),
            ("szlahu_error", "nincs ilyen dijbekero"),
        ],
        b"x",
    )]);
    let mut doc = Invoice::default();
    doc.header.invoice_number = "D-2026-3".into();
    assert!(matches!(
        agent.delete_proforma(&doc),
        Err(AgentError::RemoteOperationFailed { .. })
    ));
}

// --- Receipts and taxpayer ---

#[test]
fn generate_receipt_parses_the_xml_reply() {
    let body = b"<xmlnyugtavalasz><sikeres>true</sikeres><nyugta><alap>\
        <nyugtaszam>NYGTA-2026-12</nyugtaszam></alap></nyugta></xmlnyugtavalasz>";
    let (agent, transport) = agent_over(vec![reply(&[("content-type", "application/xml")], body)]);

    let mut receipt = Receipt::new(ReceiptHeader::new("NYGTA", "bankkártya", "HUF"));
    receipt.items.push(Item::new("Kávé", 1.0, "db", 1000.0, "27"));
    let outcome = agent.generate_receipt(&receipt).unwrap();
    assert_eq!(outcome.receipt_number.as_deref(), Some("NYGTA-2026-12"));

    let requests = transport.requests.lock().unwrap();
    let sent = String::from_utf8_lossy(&requests[0].body);
    assert!(sent.contains("name=\"action-szamla_agent_nyugta_create\""));
    assert!(sent.contains("<netto><![CDATA[1000.0]]></netto>"));
}

#[test]
fn send_receipt_includes_the_email_block() {
    let body = b"<xmlnyugtavalasz><sikeres>true</sikeres><nyugta><alap>\
        <nyugtaszam>NYGTA-2026-12</nyugtaszam></alap></nyugta></xmlnyugtavalasz>";
    let (agent, transport) = agent_over(vec![reply(&[("content-type", "application/xml")], body)]);

    agent
        .send_receipt("NYGTA-2026-12", Some(EmailSend::to("vevo@example.com")))
        .unwrap();

    let requests = transport.requests.lock().unwrap();
    let sent = String::from_utf8_lossy(&requests[0].body);
    assert!(sent.contains("<emailKuldes>"));
    assert!(sent.contains("<email><![CDATA[vevo@example.com]]></email>"));
}

#[test]
fn taxpayer_lookup_reads_the_namespaced_reply() {
    let body = b"<ns2:QueryTaxpayerResponse xmlns:ns2=\"http://schemas.nav.gov.hu/OSA/2.0/api\">\
        <ns2:funcCode>OK</ns2:funcCode><ns2:taxpayerValidity>true</ns2:taxpayerValidity>\
        </ns2:QueryTaxpayerResponse>";
    let (agent, transport) = agent_over(vec![reply(&[("content-type", "application/xml")], body)]);

    let outcome = agent.get_taxpayer("12345678").unwrap();
    assert_eq!(outcome.taxpayer_valid, Some(true));

    let requests = transport.requests.lock().unwrap();
    let sent = String::from_utf8_lossy(&requests[0].body);
    assert!(sent.contains("name=\"action-szamla_agent_taxpayer\""));
    assert!(sent.contains("<torzsszam><![CDATA[12345678]]></torzsszam>"));
}

// --- Session continuity ---

#[test]
fn session_cookie_carries_over_to_the_next_call() {
    let dir = tempfile::tempdir().unwrap();
    let transport = std::sync::Arc::new(MockTransport::new(vec![
        reply(
            &[
                ("szlahu_szamlaszam", "E-2026-1"),
                ("set-cookie", "JSESSIONID=token-abc; Path=/; HttpOnly"),
            ],
            b"",
        ),
        reply(&[("szlahu_szamlaszam", "E-2026-2")], b""),
    ]));
    let config = AgentConfig {
        session_backend: SessionBackend::CookieFile(dir.path().to_path_buf()),
        ..AgentConfig::default()
    };
    let agent = Agent::with_transport(
        Settings::with_api_key("agent-key-123"),
        config,
        Box::new(ArcTransport(transport.clone())),
    );

    agent.generate_invoice(&invoice()).unwrap();
    agent.generate_invoice(&invoice()).unwrap();

    let requests = transport.requests.lock().unwrap();
    assert_eq!(requests[0].header("cookie"), None);
    assert_eq!(
        requests[1].header("cookie"),
        Some("JSESSIONID=token-abc")
    );
}
