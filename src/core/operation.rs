/// A named business action against the Agent service.
///
/// Every operation maps to exactly one wire schema, see [`crate::schema::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateInvoice,
    CreatePrepaymentInvoice,
    CreateFinalInvoice,
    CreateCorrectiveInvoice,
    CreateDeliveryNote,
    CreateProforma,
    DeleteProforma,
    ReverseInvoice,
    PayInvoice,
    GetInvoiceData,
    GetInvoicePdf,
    CreateReceipt,
    ReverseReceipt,
    SendReceipt,
    GetReceiptData,
    GetReceiptPdf,
    GetTaxPayer,
}

/// The response family a schema belongs to. The former deep document
/// inheritance tree collapses into this tag plus per-kind flags on the
/// header types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Invoice,
    Proforma,
    Receipt,
    TaxPayer,
}

/// Document type codes the service prints on reverse/corrective documents.
pub mod type_code {
    pub const INVOICE: &str = "SZ";
    pub const REVERSE_INVOICE: &str = "SS";
    pub const PAY_INVOICE: &str = "JS";
    pub const CORRECTIVE_INVOICE: &str = "HS";
    pub const PREPAYMENT_INVOICE: &str = "ES";
}

impl Operation {
    /// The response family this operation resolves into.
    pub fn kind(self) -> DocumentKind {
        crate::schema::resolve(self).kind
    }
}
