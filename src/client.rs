//! The agent client: one value per credential set, one method per
//! operation.

use std::time::Duration;

use tracing::{debug, info};

use crate::core::{AgentError, Operation, WireMap};
use crate::document::{
    CreditNote, EmailSend, Invoice, Receipt, Settings, SettingsContext, TaxPayerQuery, ToWireData,
    notes_wire_data,
};
use crate::response::{
    InvoiceOutcome, Outcome, ProformaDeletionOutcome, ReceiptOutcome, TaxPayerOutcome,
    resolve_invoice, resolve_proforma_deletion, resolve_receipt, resolve_taxpayer,
};
use crate::schema::{self, ResponseEncoding, Section};
use crate::session::{SessionBackend, SessionStore, account_key};
use crate::transport::{
    Attachment, HttpResponse, HttpTransport, REQUEST_TIMEOUT, ReqwestTransport, frame,
};
use crate::wire::{Escaping, build_document};

/// Endpoint of the Agent service.
pub const API_URL: &str = "https://www.szamlazz.hu/szamla/";

/// Which reply form the invoice and receipt operations ask for via
/// `valaszVerzio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseVersion {
    /// Fields in `szlahu_*` headers, body text or PDF.
    #[default]
    Text,
    /// A wrapped XML body.
    Xml,
}

impl ResponseVersion {
    fn code(self) -> i64 {
        match self {
            Self::Text => 1,
            Self::Xml => 2,
        }
    }

    fn encoding(self) -> ResponseEncoding {
        match self {
            Self::Text => ResponseEncoding::Text,
            Self::Xml => ResponseEncoding::Xml,
        }
    }
}

/// Call-level configuration. The defaults match the live service; tests
/// and self-hosted proxies override `api_url`.
pub struct AgentConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub response_version: ResponseVersion,
    pub escaping: Escaping,
    /// Extra headers sent with every request.
    pub custom_headers: Vec<(String, String)>,
    /// Where session cookies persist between calls.
    pub session_backend: SessionBackend,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_url: API_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
            response_version: ResponseVersion::default(),
            escaping: Escaping::default(),
            custom_headers: Vec::new(),
            session_backend: SessionBackend::CookieFile(std::env::temp_dir()),
        }
    }
}

/// A client bound to one account. Construct once and reuse; the session
/// cookie the service issues on the first call is carried to the next.
pub struct Agent {
    settings: Settings,
    config: AgentConfig,
    session: SessionStore,
    transport: Box<dyn HttpTransport>,
}

impl Agent {
    /// Client with default configuration and the blocking HTTP transport.
    pub fn new(settings: Settings) -> Result<Self, AgentError> {
        Self::with_config(settings, AgentConfig::default())
    }

    pub fn with_config(settings: Settings, config: AgentConfig) -> Result<Self, AgentError> {
        let transport = Box::new(ReqwestTransport::new()?);
        Ok(Self::with_transport(settings, config, transport))
    }

    /// Client over a caller-supplied transport. This is the seam tests use.
    pub fn with_transport(
        settings: Settings,
        mut config: AgentConfig,
        transport: Box<dyn HttpTransport>,
    ) -> Self {
        let key = account_key(&settings.username, &settings.password, &settings.api_key);
        let backend = std::mem::replace(&mut config.session_backend, SessionBackend::Disabled);
        Self {
            settings,
            config,
            session: SessionStore::new(key, backend),
            transport,
        }
    }

    /// Issues an invoice-family document. The header flags of `invoice`
    /// select the concrete type (plain, proforma, delivery note,
    /// prepayment, final, corrective).
    pub fn generate_invoice(&self, invoice: &Invoice) -> Result<InvoiceOutcome, AgentError> {
        let op = invoice.operation();
        let response = self.dispatch(op, invoice, &invoice.attachments)?;
        self.finish_invoice(op, response)
    }

    /// Reverses (storno) the invoice named by `invoice.header.invoice_number`.
    pub fn reverse_invoice(&self, invoice: &Invoice) -> Result<InvoiceOutcome, AgentError> {
        let op = Operation::ReverseInvoice;
        let response = self.dispatch(op, invoice, &[])?;
        self.finish_invoice(op, response)
    }

    /// Registers up to five payments against an existing invoice.
    /// `additive` appends to the payments already registered instead of
    /// replacing them.
    pub fn pay_invoice(
        &self,
        invoice_number: &str,
        credit_notes: &[CreditNote],
        additive: bool,
    ) -> Result<InvoiceOutcome, AgentError> {
        let op = Operation::PayInvoice;
        let sections = notes_wire_data(credit_notes)?;
        let ctx = SettingsContext {
            invoice_number: invoice_number.to_string(),
            additive,
            ..SettingsContext::default()
        };
        let response = self.send(op, sections, ctx, &[])?;
        self.finish_invoice(op, response)
    }

    /// Fetches the full XML of an existing invoice; with `pdf` the reply
    /// embeds the PDF as well.
    pub fn get_invoice_data(
        &self,
        invoice_number: &str,
        order_number: &str,
        pdf: bool,
    ) -> Result<InvoiceOutcome, AgentError> {
        let op = Operation::GetInvoiceData;
        let ctx = SettingsContext {
            invoice_number: invoice_number.to_string(),
            order_number: order_number.to_string(),
            request_pdf: pdf,
            ..SettingsContext::default()
        };
        let response = self.send(op, WireMap::new(), ctx, &[])?;
        self.finish_invoice(op, response)
    }

    /// Downloads the PDF of an existing invoice.
    pub fn get_invoice_pdf(
        &self,
        invoice_number: &str,
        order_number: &str,
    ) -> Result<InvoiceOutcome, AgentError> {
        let op = Operation::GetInvoicePdf;
        let ctx = SettingsContext {
            invoice_number: invoice_number.to_string(),
            order_number: order_number.to_string(),
            ..SettingsContext::default()
        };
        let response = self.send(op, WireMap::new(), ctx, &[])?;
        self.finish_invoice(op, response)
    }

    /// Deletes an unsettled proforma by its number or order number.
    pub fn delete_proforma(&self, invoice: &Invoice) -> Result<ProformaDeletionOutcome, AgentError> {
        let response = self.dispatch(Operation::DeleteProforma, invoice, &[])?;
        let outcome = resolve_proforma_deletion(&response)?;
        self.finish(outcome)
    }

    pub fn generate_receipt(&self, receipt: &Receipt) -> Result<ReceiptOutcome, AgentError> {
        self.receipt_call(Operation::CreateReceipt, receipt)
    }

    pub fn reverse_receipt(&self, receipt: &Receipt) -> Result<ReceiptOutcome, AgentError> {
        self.receipt_call(Operation::ReverseReceipt, receipt)
    }

    pub fn get_receipt_data(&self, receipt: &Receipt) -> Result<ReceiptOutcome, AgentError> {
        self.receipt_call(Operation::GetReceiptData, receipt)
    }

    /// Like [`Agent::get_receipt_data`]; whether the reply embeds the PDF
    /// follows the account's `download_pdf` setting.
    pub fn get_receipt_pdf(&self, receipt: &Receipt) -> Result<ReceiptOutcome, AgentError> {
        self.receipt_call(Operation::GetReceiptPdf, receipt)
    }

    /// Mails an existing receipt. `email` overrides the account template.
    pub fn send_receipt(
        &self,
        receipt_number: &str,
        email: Option<EmailSend>,
    ) -> Result<ReceiptOutcome, AgentError> {
        let mut receipt = Receipt::default();
        receipt.header.receipt_number = receipt_number.to_string();
        receipt.email = email;
        self.receipt_call(Operation::SendReceipt, &receipt)
    }

    /// Looks up a taxpayer in the NAV register by the first eight digits
    /// of its tax number.
    pub fn get_taxpayer(&self, tax_payer_id: &str) -> Result<TaxPayerOutcome, AgentError> {
        let query = TaxPayerQuery::new(tax_payer_id);
        let response = self.dispatch(Operation::GetTaxPayer, &query, &[])?;
        let outcome = resolve_taxpayer(&response)?;
        self.finish(outcome)
    }

    fn receipt_call(&self, op: Operation, receipt: &Receipt) -> Result<ReceiptOutcome, AgentError> {
        let response = self.dispatch(op, receipt, &[])?;
        let outcome = resolve_receipt(&response)?;
        self.finish(outcome)
    }

    fn dispatch(
        &self,
        op: Operation,
        doc: &dyn ToWireData,
        attachments: &[Attachment],
    ) -> Result<HttpResponse, AgentError> {
        let sections = doc.to_wire_data(op)?;
        self.send(op, sections, doc.settings_context(), attachments)
    }

    fn send(
        &self,
        op: Operation,
        sections: WireMap,
        mut ctx: SettingsContext,
        attachments: &[Attachment],
    ) -> Result<HttpResponse, AgentError> {
        self.settings.validate()?;
        let schema = schema::resolve(op);
        ctx.response_version = self.config.response_version.code();

        let mut root = WireMap::new();
        match schema.sections.first() {
            Some(Section::Settings) => {
                root.put_map(
                    "beallitasok",
                    self.settings.build_section(schema.settings_fields, &ctx),
                );
            }
            Some(Section::SettingsInline) => {
                root.merge(self.settings.build_section(schema.settings_fields, &ctx));
            }
            _ => {}
        }
        root.merge(sections);

        let xml = build_document(schema, &root, self.config.escaping)?;
        let token = self.session.token();
        let request = frame(
            schema,
            &xml,
            attachments,
            &self.config.api_url,
            &self.config.custom_headers,
            token.as_deref(),
            self.config.timeout,
        )?;

        info!(operation = ?op, schema = schema.xml_name, "sending agent request");
        let response = self.transport.send(&request)?;
        debug!(status = response.status, "agent reply received");
        self.session.observe(&response.headers);
        crate::response::precheck(&response)?;
        Ok(response)
    }

    fn finish_invoice(
        &self,
        op: Operation,
        response: HttpResponse,
    ) -> Result<InvoiceOutcome, AgentError> {
        let outcome = resolve_invoice(self.effective_encoding(op), &response)?;
        self.finish(outcome)
    }

    /// The reply encoding actually in force for an operation: the data
    /// query always answers in XML and the taxpayer lookup always relays
    /// NAV XML, whatever the configured response version says.
    fn effective_encoding(&self, op: Operation) -> ResponseEncoding {
        let schema = schema::resolve(op);
        match schema.response_encoding {
            ResponseEncoding::TaxpayerXml => ResponseEncoding::TaxpayerXml,
            ResponseEncoding::Xml => ResponseEncoding::Xml,
            ResponseEncoding::Text => self.config.response_version.encoding(),
        }
    }

    fn finish<O: Outcome>(&self, outcome: O) -> Result<O, AgentError> {
        if outcome.is_success() {
            Ok(outcome)
        } else {
            Err(AgentError::RemoteOperationFailed {
                code: outcome.error_code().unwrap_or_default().to_string(),
                message: outcome.error_message().unwrap_or_default().to_string(),
            })
        }
    }
}
