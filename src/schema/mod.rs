//! Per-operation wire schemas.
//!
//! Each operation maps to one XML schema of the Agent protocol: root element
//! name, XSD folder (used in the `schemaLocation` attribute), multipart part
//! name, the response family and the ordered section list emitted under the
//! root. Section order is document order on the wire and the service is
//! order-sensitive for some schemas, so the lists below must not be
//! reordered.

use crate::core::{DocumentKind, Operation};

/// Base URL of the XML namespaces. Wire-format constant, do not change.
pub const XML_BASE_URL: &str = "http://www.szamlazz.hu/";

/// How the service encodes the reply for a schema by default. Invoice and
/// receipt families can be switched between `Text` and `Xml` per agent
/// configuration; the tax-payer lookup always answers with NAV XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseEncoding {
    /// Fields arrive as `szlahu_*` response headers, the body is opaque
    /// text or a raw PDF stream.
    Text,
    /// The body is a complete XML document for the business object.
    Xml,
    /// The body is the namespaced XML relayed from the NAV online system.
    TaxpayerXml,
}

/// A top-level section of a request document, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// `<beallitasok>` with the credential and option fields.
    Settings,
    /// Settings fields flattened directly under the root (data/PDF queries).
    SettingsInline,
    /// `<fejlec>` document header.
    Header,
    /// `<elado>` seller block.
    Seller,
    /// `<vevo>` buyer block.
    Buyer,
    /// `<fuvarlevel>` waybill block, emitted only when present.
    Waybill,
    /// `<tetelek>` wrapping repeated `<tetel>` items.
    Items,
    /// `<kifizetesek>` wrapping repeated `<kifizetes>` credit notes.
    CreditNotes,
    /// Repeated `<kifizetes>` credit notes directly under the root.
    CreditNotesInline,
    /// `<emailKuldes>` block of the receipt send operation.
    EmailSend,
    /// `<torzsszam>` of the tax-payer lookup.
    TaxNumber,
}

/// The wire contract of one operation.
#[derive(Debug)]
pub struct WireSchema {
    /// XML root element name, also the namespace leaf.
    pub xml_name: &'static str,
    /// XSD folder under `szamla/docs/xsds/`.
    pub xsd_dir: &'static str,
    /// Name of the multipart part carrying the XML document.
    pub part_name: &'static str,
    /// Response family of the operation.
    pub kind: DocumentKind,
    /// Default reply encoding.
    pub response_encoding: ResponseEncoding,
    /// Ordered section list under the root element.
    pub sections: &'static [Section],
    /// Settings fields this schema carries, by wire key, in order.
    pub settings_fields: &'static [&'static str],
}

impl WireSchema {
    /// The `xmlns` attribute value of the root element.
    pub fn namespace(&self) -> String {
        format!("{XML_BASE_URL}{}", self.xml_name)
    }

    /// The `xsi:schemaLocation` attribute value of the root element.
    pub fn schema_location(&self) -> String {
        format!(
            "{base}szamla/{name} {base}szamla/docs/xsds/{dir}/{name}.xsd",
            base = XML_BASE_URL,
            name = self.xml_name,
            dir = self.xsd_dir,
        )
    }
}

macro_rules! settings_fields {
    ($($extra:literal),* $(,)?) => {
        &["felhasznalo", "jelszo", "szamlaagentkulcs" $(, $extra)*]
    };
}

static CREATE_INVOICE: WireSchema = WireSchema {
    xml_name: "xmlszamla",
    xsd_dir: "agent",
    part_name: "action-xmlagentxmlfile",
    kind: DocumentKind::Invoice,
    response_encoding: ResponseEncoding::Text,
    sections: &[
        Section::Settings,
        Section::Header,
        Section::Seller,
        Section::Buyer,
        Section::Waybill,
        Section::Items,
    ],
    settings_fields: settings_fields![
        "eszamla",
        "szamlaLetoltes",
        "szamlaLetoltesPld",
        "valaszVerzio",
        "aggregator",
        "guardian",
        "cikkazoninvoice",
        "szamlaKulsoAzon",
    ],
};

static REVERSE_INVOICE: WireSchema = WireSchema {
    xml_name: "xmlszamlast",
    xsd_dir: "agentst",
    part_name: "action-szamla_agent_st",
    kind: DocumentKind::Invoice,
    response_encoding: ResponseEncoding::Text,
    sections: &[
        Section::Settings,
        Section::Header,
        Section::Seller,
        Section::Buyer,
    ],
    settings_fields: settings_fields![
        "eszamla",
        "szamlaLetoltes",
        "szamlaLetoltesPld",
        "aggregator",
        "guardian",
        "valaszVerzio",
        "szamlaKulsoAzon",
    ],
};

static PAY_INVOICE: WireSchema = WireSchema {
    xml_name: "xmlszamlakifiz",
    xsd_dir: "agentkifiz",
    part_name: "action-szamla_agent_kifiz",
    kind: DocumentKind::Invoice,
    response_encoding: ResponseEncoding::Text,
    sections: &[Section::Settings, Section::CreditNotesInline],
    settings_fields: settings_fields![
        "szamlaszam",
        "adoszam",
        "additiv",
        "aggregator",
        "valaszVerzio",
    ],
};

static GET_INVOICE_DATA: WireSchema = WireSchema {
    xml_name: "xmlszamlaxml",
    xsd_dir: "agentxml",
    part_name: "action-szamla_agent_xml",
    kind: DocumentKind::Invoice,
    response_encoding: ResponseEncoding::Xml,
    sections: &[Section::SettingsInline],
    settings_fields: settings_fields!["szamlaszam", "rendelesSzam", "pdf"],
};

static GET_INVOICE_PDF: WireSchema = WireSchema {
    xml_name: "xmlszamlapdf",
    xsd_dir: "agentpdf",
    part_name: "action-szamla_agent_pdf",
    kind: DocumentKind::Invoice,
    response_encoding: ResponseEncoding::Text,
    sections: &[Section::SettingsInline],
    settings_fields: settings_fields![
        "szamlaszam",
        "rendelesSzam",
        "valaszVerzio",
        "szamlaKulsoAzon",
    ],
};

static CREATE_RECEIPT: WireSchema = WireSchema {
    xml_name: "xmlnyugtacreate",
    xsd_dir: "nyugtacreate",
    part_name: "action-szamla_agent_nyugta_create",
    kind: DocumentKind::Receipt,
    response_encoding: ResponseEncoding::Text,
    sections: &[
        Section::Settings,
        Section::Header,
        Section::Items,
        Section::CreditNotes,
    ],
    settings_fields: settings_fields!["pdfLetoltes"],
};

static REVERSE_RECEIPT: WireSchema = WireSchema {
    xml_name: "xmlnyugtast",
    xsd_dir: "nyugtast",
    part_name: "action-szamla_agent_nyugta_storno",
    kind: DocumentKind::Receipt,
    response_encoding: ResponseEncoding::Text,
    sections: &[Section::Settings, Section::Header],
    settings_fields: settings_fields!["pdfLetoltes"],
};

static SEND_RECEIPT: WireSchema = WireSchema {
    xml_name: "xmlnyugtasend",
    xsd_dir: "nyugtasend",
    part_name: "action-szamla_agent_nyugta_send",
    kind: DocumentKind::Receipt,
    response_encoding: ResponseEncoding::Text,
    sections: &[Section::Settings, Section::Header, Section::EmailSend],
    settings_fields: settings_fields![],
};

static GET_RECEIPT: WireSchema = WireSchema {
    xml_name: "xmlnyugtaget",
    xsd_dir: "nyugtaget",
    part_name: "action-szamla_agent_nyugta_get",
    kind: DocumentKind::Receipt,
    response_encoding: ResponseEncoding::Text,
    sections: &[Section::Settings, Section::Header],
    settings_fields: settings_fields!["pdfLetoltes"],
};

static GET_TAXPAYER: WireSchema = WireSchema {
    xml_name: "xmltaxpayer",
    xsd_dir: "taxpayer",
    part_name: "action-szamla_agent_taxpayer",
    kind: DocumentKind::TaxPayer,
    response_encoding: ResponseEncoding::TaxpayerXml,
    sections: &[Section::Settings, Section::TaxNumber],
    settings_fields: settings_fields![],
};

static DELETE_PROFORMA: WireSchema = WireSchema {
    xml_name: "xmlszamladbkdel",
    xsd_dir: "dijbekerodel",
    part_name: "action-szamla_agent_dijbekero_torlese",
    kind: DocumentKind::Proforma,
    response_encoding: ResponseEncoding::Text,
    sections: &[Section::Settings, Section::Header],
    settings_fields: settings_fields![],
};

/// Look up the wire schema of an operation. Total over [`Operation`].
pub fn resolve(op: Operation) -> &'static WireSchema {
    match op {
        Operation::CreateInvoice
        | Operation::CreatePrepaymentInvoice
        | Operation::CreateFinalInvoice
        | Operation::CreateCorrectiveInvoice
        | Operation::CreateDeliveryNote
        | Operation::CreateProforma => &CREATE_INVOICE,
        Operation::ReverseInvoice => &REVERSE_INVOICE,
        Operation::PayInvoice => &PAY_INVOICE,
        Operation::GetInvoiceData => &GET_INVOICE_DATA,
        Operation::GetInvoicePdf => &GET_INVOICE_PDF,
        Operation::CreateReceipt => &CREATE_RECEIPT,
        Operation::ReverseReceipt => &REVERSE_RECEIPT,
        Operation::SendReceipt => &SEND_RECEIPT,
        Operation::GetReceiptData | Operation::GetReceiptPdf => &GET_RECEIPT,
        Operation::GetTaxPayer => &GET_TAXPAYER,
        Operation::DeleteProforma => &DELETE_PROFORMA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operation_resolves() {
        let ops = [
            Operation::CreateInvoice,
            Operation::CreateProforma,
            Operation::DeleteProforma,
            Operation::ReverseInvoice,
            Operation::PayInvoice,
            Operation::GetInvoiceData,
            Operation::GetInvoicePdf,
            Operation::CreateReceipt,
            Operation::ReverseReceipt,
            Operation::SendReceipt,
            Operation::GetReceiptData,
            Operation::GetTaxPayer,
        ];
        for op in ops {
            let schema = resolve(op);
            assert!(!schema.xml_name.is_empty());
            assert!(schema.sections.first().is_some());
        }
    }

    #[test]
    fn credentials_lead_every_settings_list() {
        let schema = resolve(Operation::CreateInvoice);
        assert_eq!(
            &schema.settings_fields[..3],
            &["felhasznalo", "jelszo", "szamlaagentkulcs"]
        );
        assert!(schema.settings_fields.contains(&"szamlaLetoltes"));
    }

    #[test]
    fn schema_location_shape() {
        let schema = resolve(Operation::CreateInvoice);
        assert_eq!(schema.namespace(), "http://www.szamlazz.hu/xmlszamla");
        assert_eq!(
            schema.schema_location(),
            "http://www.szamlazz.hu/szamla/xmlszamla \
             http://www.szamlazz.hu/szamla/docs/xsds/agent/xmlszamla.xsd"
        );
    }
}
