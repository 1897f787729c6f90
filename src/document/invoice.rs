//! The invoice aggregate and its serialization per operation.

use crate::core::{AgentError, Operation, WireMap};
use crate::transport::Attachment;

use super::{Buyer, InvoiceHeader, Item, Seller, SettingsContext, ToWireData, Waybill};

/// An invoice-family document: the header flags decide whether it is a
/// plain invoice, a proforma, a delivery note or one of the
/// prepayment/final/corrective variants — they all share this shape and
/// the `xmlszamla` schema.
#[derive(Debug, Clone, Default)]
pub struct Invoice {
    pub header: InvoiceHeader,
    pub seller: Seller,
    pub buyer: Buyer,
    pub waybill: Option<Waybill>,
    pub items: Vec<Item>,
    /// Files uploaded alongside the document, at most five.
    pub attachments: Vec<Attachment>,
    /// `eszamla`: issue as an electronic invoice.
    pub e_invoice: bool,
}

impl Invoice {
    pub fn new(header: InvoiceHeader) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }

    /// The operation the header flags select within the create family.
    pub fn operation(&self) -> Operation {
        if self.header.proforma {
            Operation::CreateProforma
        } else if self.header.delivery_note {
            Operation::CreateDeliveryNote
        } else if self.header.corrective {
            Operation::CreateCorrectiveInvoice
        } else if self.header.final_invoice {
            Operation::CreateFinalInvoice
        } else if self.header.prepayment {
            Operation::CreatePrepaymentInvoice
        } else {
            Operation::CreateInvoice
        }
    }
}

impl ToWireData for Invoice {
    fn to_wire_data(&self, op: Operation) -> Result<WireMap, AgentError> {
        let mut root = WireMap::new();
        match op {
            Operation::ReverseInvoice => {
                root.put_map("fejlec", self.header.reverse_wire_data()?);
                root.put_map("elado", self.seller.reverse_wire_data());
                root.put_map("vevo", self.buyer.reverse_wire_data());
            }
            Operation::DeleteProforma => {
                root.put_map("fejlec", self.header.proforma_delete_wire_data()?);
            }
            _ => {
                root.put_map("fejlec", self.header.create_wire_data(op)?);
                root.put_map("elado", self.seller.create_wire_data());
                root.put_map("vevo", self.buyer.create_wire_data()?);
                if let Some(waybill) = &self.waybill {
                    root.put_map("fuvarlevel", waybill.wire_data()?);
                }
                if self.items.is_empty() {
                    return Err(AgentError::validation(
                        "tetelek",
                        "an invoice needs at least one item",
                    ));
                }
                let mut items = WireMap::new();
                for (i, item) in self.items.iter().enumerate() {
                    items.put_map(format!("item{i}"), item.invoice_wire_data()?);
                }
                root.put_map("tetelek", items);
            }
        }
        Ok(root)
    }

    fn settings_context(&self) -> SettingsContext {
        SettingsContext {
            e_invoice: self.e_invoice,
            invoice_number: self.header.invoice_number.clone(),
            order_number: self.header.order_number.clone(),
            ..SettingsContext::default()
        }
    }
}
