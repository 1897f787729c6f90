//! Receipts: header, aggregate and the send-notification block.

use crate::core::{
    AgentError, FieldKind, FieldSpec, FieldValue, Operation, WireMap, check_field, is_blank,
};

use super::credit_note::notes_wire_data;
use super::{CreditNote, Item, ToWireData};

const ENTITY: &str = "ReceiptHeader";

const CREATE_REQUIRED: &[FieldSpec] = &[
    FieldSpec::new("elotag", FieldKind::Str, true),
    FieldSpec::new("fizmod", FieldKind::Str, true),
    FieldSpec::new("penznem", FieldKind::Str, true),
];

/// Header of a receipt. Creation needs the prefix, payment method and
/// currency; every other operation addresses an existing receipt by its
/// number.
#[derive(Debug, Clone, Default)]
pub struct ReceiptHeader {
    /// `hivasAzonosito`, caller-side idempotency identifier.
    pub call_id: String,
    /// `elotag`, the receipt number prefix configured on the account.
    pub prefix: String,
    pub payment_method: String,
    pub currency: String,
    /// `devizabank`, bank quoting the exchange rate.
    pub exchange_bank: String,
    /// `devizaarf`, emitted only when non-zero.
    pub exchange_rate: f64,
    pub comment: String,
    pub pdf_template: String,
    /// `fokonyvVevo`, buyer ledger account number.
    pub ledger_buyer_id: String,
    /// `nyugtaszam` of an existing receipt, for reversal, query and send.
    pub receipt_number: String,
}

impl ReceiptHeader {
    pub fn new(
        prefix: impl Into<String>,
        payment_method: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            payment_method: payment_method.into(),
            currency: currency.into(),
            ..Self::default()
        }
    }

    fn validate_create(&self) -> Result<(), AgentError> {
        for spec in CREATE_REQUIRED {
            let value = match spec.name {
                "elotag" => &self.prefix,
                "fizmod" => &self.payment_method,
                _ => &self.currency,
            };
            check_field(ENTITY, spec, FieldValue::Str(value))?;
        }
        Ok(())
    }

    fn create_wire_data(&self) -> Result<WireMap, AgentError> {
        self.validate_create()?;
        let mut map = WireMap::new();
        map.put_opt_str("hivasAzonosito", Some(&self.call_id));
        map.put_str("elotag", &self.prefix);
        map.put_str("fizmod", &self.payment_method);
        map.put_str("penznem", &self.currency);
        map.put_opt_str("devizabank", Some(&self.exchange_bank));
        if self.exchange_rate != 0.0 {
            map.put_double("devizaarf", self.exchange_rate);
        }
        map.put_opt_str("megjegyzes", Some(&self.comment));
        map.put_opt_str("pdfSablon", Some(&self.pdf_template));
        map.put_opt_str("fokonyvVevo", Some(&self.ledger_buyer_id));
        Ok(map)
    }

    fn addressed_wire_data(&self) -> Result<WireMap, AgentError> {
        if is_blank(&self.receipt_number) {
            return Err(AgentError::validation(
                "nyugtaszam",
                format!("required field of {ENTITY} has no value set"),
            ));
        }
        let mut map = WireMap::new();
        map.put_str("nyugtaszam", &self.receipt_number);
        map.put_opt_str("pdfSablon", Some(&self.pdf_template));
        Ok(map)
    }
}

/// `<emailKuldes>` of the receipt send operation. The address is required,
/// the rest overrides the account's mail template.
#[derive(Debug, Clone, Default)]
pub struct EmailSend {
    pub email: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

impl EmailSend {
    pub fn to(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    fn wire_data(&self) -> Result<WireMap, AgentError> {
        if is_blank(&self.email) {
            return Err(AgentError::validation(
                "email",
                "required field of EmailSend has no value set",
            ));
        }
        let mut map = WireMap::new();
        map.put_str("email", &self.email);
        map.put_opt_str("emailReplyto", Some(&self.reply_to));
        map.put_opt_str("emailTargy", Some(&self.subject));
        map.put_opt_str("emailSzoveg", Some(&self.body));
        Ok(map)
    }
}

/// A receipt document. Creation takes the items (and optionally the
/// payments that settle it); the other operations only read the header's
/// receipt number and, for send, the mail block.
#[derive(Debug, Clone, Default)]
pub struct Receipt {
    pub header: ReceiptHeader,
    pub items: Vec<Item>,
    pub credit_notes: Vec<CreditNote>,
    pub email: Option<EmailSend>,
}

impl Receipt {
    pub fn new(header: ReceiptHeader) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }
}

impl ToWireData for Receipt {
    fn to_wire_data(&self, op: Operation) -> Result<WireMap, AgentError> {
        let mut root = WireMap::new();
        match op {
            Operation::CreateReceipt => {
                root.put_map("fejlec", self.header.create_wire_data()?);
                if self.items.is_empty() {
                    return Err(AgentError::validation(
                        "tetelek",
                        "a receipt needs at least one item",
                    ));
                }
                let mut items = WireMap::new();
                for (i, item) in self.items.iter().enumerate() {
                    items.put_map(format!("item{i}"), item.receipt_wire_data()?);
                }
                root.put_map("tetelek", items);
                if !self.credit_notes.is_empty() {
                    root.put_map("kifizetesek", notes_wire_data(&self.credit_notes)?);
                }
            }
            Operation::SendReceipt => {
                root.put_map("fejlec", self.header.addressed_wire_data()?);
                if let Some(email) = &self.email {
                    root.put_map("emailKuldes", email.wire_data()?);
                }
            }
            _ => {
                root.put_map("fejlec", self.header.addressed_wire_data()?);
            }
        }
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_needs_items() {
        let receipt = Receipt::new(ReceiptHeader::new("NYGTA", "készpénz", "HUF"));
        assert!(matches!(
            receipt.to_wire_data(Operation::CreateReceipt),
            Err(AgentError::Validation { .. })
        ));
    }

    #[test]
    fn create_emits_header_items_payments_in_order() {
        let mut receipt = Receipt::new(ReceiptHeader::new("NYGTA", "bankkártya", "HUF"));
        receipt.items.push(Item::new("Kávé", 2.0, "db", 500.0, "27"));
        receipt.credit_notes.push(CreditNote::new("bankkártya", 1270.0));
        let root = receipt.to_wire_data(Operation::CreateReceipt).unwrap();
        let keys: Vec<_> = root.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["fejlec", "tetelek", "kifizetesek"]);
    }

    #[test]
    fn reversal_addresses_by_receipt_number() {
        let mut receipt = Receipt::default();
        assert!(receipt.to_wire_data(Operation::ReverseReceipt).is_err());
        receipt.header.receipt_number = "NYGTA-2026-1".into();
        let root = receipt.to_wire_data(Operation::ReverseReceipt).unwrap();
        assert_eq!(root.entries()[0].0, "fejlec");
    }
}
