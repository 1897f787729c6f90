//! The business document graph: settings, headers, parties, items and the
//! aggregates that serialize themselves into wire trees.
//!
//! Every entity validates its fields against a `const` table before
//! emitting anything, so a bad document fails locally with a field-level
//! error instead of a remote rejection.

mod buyer;
mod credit_note;
mod header;
mod invoice;
mod item;
mod receipt;
mod seller;
mod settings;
mod taxpayer;
mod waybill;

pub use buyer::{Buyer, BuyerLedger};
pub use credit_note::{CREDIT_NOTE_LIMIT, CreditNote};
pub(crate) use credit_note::notes_wire_data;
pub use header::InvoiceHeader;
pub use invoice::Invoice;
pub use item::{Item, ItemLedger};
pub use receipt::{EmailSend, Receipt, ReceiptHeader};
pub use seller::Seller;
pub use settings::Settings;
pub use taxpayer::TaxPayerQuery;
pub use waybill::{MplWaybill, PppWaybill, SprinterWaybill, TransoflexWaybill, Waybill, WaybillCarrier};

use crate::core::{AgentError, Operation, WireMap};

/// Per-call values the `<beallitasok>` section needs but that live on the
/// document rather than on [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsContext {
    /// `eszamla` of the invoice create schemas.
    pub e_invoice: bool,
    /// `valaszVerzio`, filled in by the client from its configuration.
    pub response_version: i64,
    /// `additiv` of the payment registration schema.
    pub additive: bool,
    /// `szamlaszam` where the schema addresses an existing document.
    pub invoice_number: String,
    /// `rendelesSzam` of the data and PDF queries.
    pub order_number: String,
    /// `pdf` of the invoice data query.
    pub request_pdf: bool,
}

/// A document that can serialize its non-settings sections.
///
/// The returned map holds the sections in schema order, keyed by their
/// element names; the client prepends the settings section and hands the
/// whole tree to the XML builder.
pub trait ToWireData {
    fn to_wire_data(&self, op: Operation) -> Result<WireMap, AgentError>;

    fn settings_context(&self) -> SettingsContext {
        SettingsContext::default()
    }
}
