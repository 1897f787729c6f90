//! Invoice header: dates, payment terms and the document-type flags.

use crate::core::{
    AgentError, FieldKind, FieldSpec, FieldValue, Operation, WireMap, check_field, is_blank,
    today_str, type_code,
};

const ENTITY: &str = "InvoiceHeader";

/// Fields the create schemas require. The three dates must be calendar
/// valid; everything else here is presence-checked.
const CREATE_REQUIRED: &[FieldSpec] = &[
    FieldSpec::new("keltDatum", FieldKind::Date, true),
    FieldSpec::new("teljesitesDatum", FieldKind::Date, true),
    FieldSpec::new("fizetesiHataridoDatum", FieldKind::Date, true),
    FieldSpec::new("fizmod", FieldKind::Str, true),
    FieldSpec::new("penznem", FieldKind::Str, true),
    FieldSpec::new("szamlaNyelve", FieldKind::Str, true),
];

/// Header of every invoice-family document. The boolean flags select the
/// concrete document type; the constructors set consistent combinations,
/// so prefer them over flipping flags by hand.
#[derive(Debug, Clone, Default)]
pub struct InvoiceHeader {
    /// `keltDatum`, the issue date.
    pub issue_date: String,
    /// `teljesitesDatum`, the fulfillment date.
    pub fulfillment_date: String,
    /// `fizetesiHataridoDatum`, the payment due date.
    pub payment_due_date: String,
    /// `fizmod`, free-text payment method.
    pub payment_method: String,
    /// `penznem`, currency code.
    pub currency: String,
    /// `szamlaNyelve`, invoice language code.
    pub language: String,
    pub comment: String,
    /// `arfolyamBank`, the bank quoting the exchange rate.
    pub exchange_bank: String,
    /// `arfolyam`, emitted only when non-zero.
    pub exchange_rate: f64,
    pub order_number: String,
    /// `dijbekeroSzamlaszam`, number of the proforma this invoice settles.
    pub proforma_number: String,
    pub prepayment: bool,
    pub final_invoice: bool,
    /// `elolegSzamlaszam`, referenced from a final invoice.
    pub prepayment_invoice_number: String,
    pub corrective: bool,
    /// `helyesbitettSzamlaszam`, the number being corrected.
    pub corrected_invoice_number: String,
    pub proforma: bool,
    pub delivery_note: bool,
    pub logo_extra: String,
    /// `szamlaszamElotag`, invoice number prefix.
    pub invoice_prefix: String,
    /// `fizetendoKorrekcio`, emitted only when non-zero.
    pub correction_to_pay: f64,
    pub paid: bool,
    /// `arresAfa`, margin-scheme VAT.
    pub margin_scheme_vat: bool,
    pub eu_vat: bool,
    pub invoice_template: String,
    pub preview_pdf: bool,
    /// `szamlaszam` of an existing document, for reversal and proforma
    /// deletion.
    pub invoice_number: String,
}

impl InvoiceHeader {
    fn with_today() -> Self {
        let today = today_str();
        Self {
            issue_date: today.clone(),
            fulfillment_date: today.clone(),
            payment_due_date: today,
            ..Self::default()
        }
    }

    /// A plain invoice dated today.
    pub fn invoice() -> Self {
        Self::with_today()
    }

    pub fn proforma() -> Self {
        Self {
            proforma: true,
            ..Self::with_today()
        }
    }

    pub fn delivery_note() -> Self {
        Self {
            delivery_note: true,
            ..Self::with_today()
        }
    }

    pub fn prepayment() -> Self {
        Self {
            prepayment: true,
            ..Self::with_today()
        }
    }

    /// A final invoice settling the given prepayment invoice.
    pub fn final_invoice(prepayment_invoice_number: impl Into<String>) -> Self {
        Self {
            final_invoice: true,
            prepayment_invoice_number: prepayment_invoice_number.into(),
            ..Self::with_today()
        }
    }

    /// A corrective invoice for the given invoice number.
    pub fn corrective(corrected_invoice_number: impl Into<String>) -> Self {
        Self {
            corrective: true,
            corrected_invoice_number: corrected_invoice_number.into(),
            ..Self::with_today()
        }
    }

    pub(super) fn validate_create(&self) -> Result<(), AgentError> {
        for spec in CREATE_REQUIRED {
            let value = match spec.name {
                "keltDatum" => FieldValue::Date(&self.issue_date),
                "teljesitesDatum" => FieldValue::Date(&self.fulfillment_date),
                "fizetesiHataridoDatum" => FieldValue::Date(&self.payment_due_date),
                "fizmod" => FieldValue::Str(&self.payment_method),
                "penznem" => FieldValue::Str(&self.currency),
                "szamlaNyelve" => FieldValue::Str(&self.language),
                _ => FieldValue::Absent,
            };
            // Dates are required, so an empty one has to fail the presence
            // check before the calendar check sees it.
            if spec.kind == FieldKind::Date {
                if let FieldValue::Date(s) = value {
                    if is_blank(s) {
                        return Err(AgentError::validation(
                            spec.name,
                            format!("required field of {ENTITY} has no value set"),
                        ));
                    }
                }
            }
            check_field(ENTITY, spec, value)?;
        }
        Ok(())
    }

    /// `<fejlec>` of the create-invoice schema.
    pub(super) fn create_wire_data(&self, _op: Operation) -> Result<WireMap, AgentError> {
        self.validate_create()?;
        let mut map = WireMap::new();
        map.put_str("keltDatum", &self.issue_date);
        map.put_str("teljesitesDatum", &self.fulfillment_date);
        map.put_str("fizetesiHataridoDatum", &self.payment_due_date);
        map.put_str("fizmod", &self.payment_method);
        map.put_str("penznem", &self.currency);
        map.put_str("szamlaNyelve", &self.language);
        map.put_opt_str("megjegyzes", Some(&self.comment));
        map.put_opt_str("arfolyamBank", Some(&self.exchange_bank));
        if self.exchange_rate != 0.0 {
            map.put_double("arfolyam", self.exchange_rate);
        }
        map.put_opt_str("rendelesSzam", Some(&self.order_number));
        map.put_bool("elolegszamla", self.prepayment);
        map.put_bool("vegszamla", self.final_invoice);
        map.put_opt_str("elolegSzamlaszam", Some(&self.prepayment_invoice_number));
        map.put_bool("helyesbitoszamla", self.corrective);
        map.put_opt_str(
            "helyesbitettSzamlaszam",
            Some(&self.corrected_invoice_number),
        );
        map.put_bool("dijbekero", self.proforma);
        map.put_opt_str("dijbekeroSzamlaszam", Some(&self.proforma_number));
        map.put_bool("szallitolevel", self.delivery_note);
        map.put_opt_str("logoExtra", Some(&self.logo_extra));
        map.put_opt_str("szamlaszamElotag", Some(&self.invoice_prefix));
        if self.correction_to_pay != 0.0 {
            map.put_double("fizetendoKorrekcio", self.correction_to_pay);
        }
        map.put_bool("fizetve", self.paid);
        map.put_bool("arresAfa", self.margin_scheme_vat);
        map.put_bool("eusAfa", self.eu_vat);
        map.put_opt_str("szamlaSablon", Some(&self.invoice_template));
        if self.preview_pdf {
            map.put_bool("elonezetpdf", true);
        }
        Ok(map)
    }

    /// `<fejlec>` of the reversal schema. Carries the reversed number and
    /// the `SS` type code the service prints on the counter-document.
    pub(super) fn reverse_wire_data(&self) -> Result<WireMap, AgentError> {
        if is_blank(&self.invoice_number) {
            return Err(AgentError::validation(
                "szamlaszam",
                format!("required field of {ENTITY} has no value set"),
            ));
        }
        for (name, value) in [
            ("keltDatum", &self.issue_date),
            ("teljesitesDatum", &self.fulfillment_date),
        ] {
            if !is_blank(value) {
                let spec = FieldSpec::new(name, FieldKind::Date, false);
                check_field(ENTITY, &spec, FieldValue::Date(value))?;
            }
        }
        let mut map = WireMap::new();
        map.put_str("szamlaszam", &self.invoice_number);
        map.put_opt_str("keltDatum", Some(&self.issue_date));
        map.put_opt_str("teljesitesDatum", Some(&self.fulfillment_date));
        map.put_opt_str("megjegyzes", Some(&self.comment));
        map.put_str("tipus", type_code::REVERSE_INVOICE);
        map.put_opt_str("szamlaSablon", Some(&self.invoice_template));
        Ok(map)
    }

    /// `<fejlec>` of the proforma deletion schema. The service accepts
    /// either the proforma number or the order number it was issued under.
    pub(super) fn proforma_delete_wire_data(&self) -> Result<WireMap, AgentError> {
        if is_blank(&self.invoice_number) && is_blank(&self.order_number) {
            return Err(AgentError::validation(
                "szamlaszam",
                "proforma deletion needs a document number or an order number",
            ));
        }
        let mut map = WireMap::new();
        map.put_opt_str("szamlaszam", Some(&self.invoice_number));
        map.put_opt_str("rendelesszam", Some(&self.order_number));
        Ok(map)
    }
}
