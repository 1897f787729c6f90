use szamla_agent::core::Operation;
use szamla_agent::document::{
    Buyer, Invoice, InvoiceHeader, Item, Settings, SettingsContext, ToWireData, Waybill,
};
use szamla_agent::schema;
use szamla_agent::wire::{Escaping, build_document};

fn settings() -> Settings {
    Settings::with_api_key("agent-key-123")
}

fn invoice() -> Invoice {
    let mut header = InvoiceHeader::invoice();
    header.issue_date = "2026-08-29".into();
    header.fulfillment_date = "2026-08-29".into();
    header.payment_due_date = "2026-09-12".into();
    header.payment_method = "átutalás".into();
    header.currency = "HUF".into();
    header.language = "hu".into();
    Invoice {
        header,
        buyer: Buyer::new("Kovács Bt.", "2030", "Érd", "Tárnoki út 23."),
        items: vec![
            Item::new("Eladó tétel 1", 1.0, "db", 10000.0, "27"),
            Item::new("Eladó tétel 2", 2.0, "óra", 2500.0, "27"),
        ],
        ..Invoice::default()
    }
}

fn build(op: Operation, doc: &Invoice, escaping: Escaping) -> String {
    let schema = schema::resolve(op);
    let ctx = SettingsContext {
        response_version: 1,
        ..doc.settings_context()
    };
    let mut root = szamla_agent::WireMap::new();
    root.put_map(
        "beallitasok",
        settings().build_section(schema.settings_fields, &ctx),
    );
    root.merge(doc.to_wire_data(op).unwrap());
    build_document(schema, &root, escaping).unwrap()
}

// --- Create invoice ---

#[test]
fn create_invoice_document_shape() {
    let xml = build(Operation::CreateInvoice, &invoice(), Escaping::Cdata);

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<xmlszamla xmlns=\"http://www.szamlazz.hu/xmlszamla\""));
    assert!(xml.contains(
        "xsi:schemaLocation=\"http://www.szamlazz.hu/szamla/xmlszamla \
         http://www.szamlazz.hu/szamla/docs/xsds/agent/xmlszamla.xsd\""
    ));
    assert!(xml.contains("<szamlaagentkulcs><![CDATA[agent-key-123]]></szamlaagentkulcs>"));

    // Section order is document order.
    let beallitasok = xml.find("<beallitasok>").unwrap();
    let fejlec = xml.find("<fejlec>").unwrap();
    let elado = xml.find("<elado>").unwrap();
    let vevo = xml.find("<vevo>").unwrap();
    let tetelek = xml.find("<tetelek>").unwrap();
    assert!(beallitasok < fejlec && fejlec < elado && elado < vevo && vevo < tetelek);
}

#[test]
fn items_become_repeated_tetel_siblings() {
    let xml = build(Operation::CreateInvoice, &invoice(), Escaping::Cdata);
    assert_eq!(xml.matches("<tetel>").count(), 2);
    assert!(!xml.contains("<item0>"));
    let first = xml.find("Eladó tétel 1").unwrap();
    let second = xml.find("Eladó tétel 2").unwrap();
    assert!(first < second);
}

#[test]
fn doubles_carry_a_decimal_digit_on_the_wire() {
    let xml = build(Operation::CreateInvoice, &invoice(), Escaping::Cdata);
    assert!(xml.contains("<nettoErtek><![CDATA[10000.0]]></nettoErtek>"));
    assert!(xml.contains("<bruttoErtek><![CDATA[12700.0]]></bruttoErtek>"));
}

#[test]
fn waybill_section_appears_only_when_attached() {
    let mut doc = invoice();
    assert!(!build(Operation::CreateInvoice, &doc, Escaping::Cdata).contains("<fuvarlevel>"));
    doc.waybill = Some(Waybill {
        destination: "2030 Érd, Tárnoki út 23.".into(),
        courier: "MPL".into(),
        ..Waybill::default()
    });
    let xml = build(Operation::CreateInvoice, &doc, Escaping::Cdata);
    assert!(xml.contains("<fuvarlevel>"));
    assert!(xml.contains("<uticel><![CDATA[2030 Érd, Tárnoki út 23.]]></uticel>"));
}

#[test]
fn building_twice_yields_identical_documents() {
    let doc = invoice();
    let first = build(Operation::CreateInvoice, &doc, Escaping::Cdata);
    let second = build(Operation::CreateInvoice, &doc, Escaping::Cdata);
    assert_eq!(first, second);
}

// --- Escaping ---

#[test]
fn entity_mode_escapes_instead_of_cdata() {
    let mut doc = invoice();
    doc.items[0].name = "Fejlesztés <2026> & extra".into();
    let xml = build(Operation::CreateInvoice, &doc, Escaping::Entities);
    assert!(xml.contains("Fejlesztés &lt;2026&gt; &amp; extra"));
    assert!(!xml.contains("<![CDATA["));
}

#[test]
fn cdata_terminator_inside_text_stays_well_formed() {
    let mut doc = invoice();
    doc.items[0].comment = "tartalmaz ]]> sorozatot".into();
    let xml = build(Operation::CreateInvoice, &doc, Escaping::Cdata);
    // The builder re-parses its own output, so reaching here means the
    // document is well-formed; the raw terminator must not survive as-is.
    assert!(!xml.contains("<![CDATA[tartalmaz ]]> sorozatot]]>"));
}

// --- Other schemas ---

#[test]
fn reverse_invoice_carries_the_ss_type_code() {
    let mut doc = Invoice::default();
    doc.header.invoice_number = "E-2026-42".into();
    let xml = build(Operation::ReverseInvoice, &doc, Escaping::Cdata);
    assert!(xml.contains("<xmlszamlast xmlns=\"http://www.szamlazz.hu/xmlszamlast\""));
    assert!(xml.contains("<szamlaszam><![CDATA[E-2026-42]]></szamlaszam>"));
    assert!(xml.contains("<tipus><![CDATA[SS]]></tipus>"));
}

#[test]
fn invoice_data_query_flattens_settings_under_the_root() {
    let schema = schema::resolve(Operation::GetInvoiceData);
    let ctx = SettingsContext {
        invoice_number: "E-2026-42".into(),
        request_pdf: true,
        response_version: 1,
        ..SettingsContext::default()
    };
    let mut root = szamla_agent::WireMap::new();
    root.merge(settings().build_section(schema.settings_fields, &ctx));
    let xml = build_document(schema, &root, Escaping::Cdata).unwrap();
    assert!(xml.contains("<xmlszamlaxml xmlns=\"http://www.szamlazz.hu/xmlszamlaxml\""));
    assert!(!xml.contains("<beallitasok>"));
    assert!(xml.contains("<szamlaszam><![CDATA[E-2026-42]]></szamlaszam>"));
    assert!(xml.contains("<pdf><![CDATA[true]]></pdf>"));
}
