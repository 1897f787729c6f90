//! Buyer party of an invoice.

use crate::core::{AgentError, FieldKind, FieldSpec, FieldValue, WireMap, check_field, is_blank};

const ENTITY: &str = "Buyer";
const LEDGER_ENTITY: &str = "BuyerLedger";

const CREATE_REQUIRED: &[FieldSpec] = &[
    FieldSpec::new("nev", FieldKind::Str, true),
    FieldSpec::new("irsz", FieldKind::Str, true),
    FieldSpec::new("telepules", FieldKind::Str, true),
    FieldSpec::new("cim", FieldKind::Str, true),
];

#[derive(Debug, Clone, Default)]
pub struct Buyer {
    pub name: String,
    pub country: String,
    pub zip: String,
    pub city: String,
    pub address: String,
    pub email: String,
    /// `sendEmail`: let the service mail the finished document.
    pub send_email: bool,
    /// `adoalany` tax-subject code of the service (7, 6, 1, 0, -1),
    /// emitted only when set.
    pub tax_subject: Option<i64>,
    pub tax_number: String,
    /// `csoportazonosito`, group membership identifier.
    pub group_identifier: String,
    pub tax_number_eu: String,
    pub postal_name: String,
    pub postal_country: String,
    pub postal_zip: String,
    pub postal_city: String,
    pub postal_address: String,
    /// `azonosito`, the buyer's identifier in the account's partner list.
    pub identifier: String,
    pub signing_name: String,
    pub phone: String,
    pub comment: String,
    /// `vevoFokonyv`, the buyer's general-ledger block.
    pub ledger: Option<BuyerLedger>,
}

/// General-ledger data of the buyer, emitted as the `vevoFokonyv`
/// sub-element of `<vevo>`.
#[derive(Debug, Clone, Default)]
pub struct BuyerLedger {
    /// `konyvelesDatum`, the booking date.
    pub booking_date: String,
    /// `vevoAzonosito`, the buyer's ledger identifier.
    pub buyer_id: String,
    /// `vevoFokonyviSzam`, the buyer's ledger account number.
    pub ledger_account_number: String,
    /// `folyamatosTelj`, continued fulfillment; emitted only when set.
    pub continued_fulfillment: bool,
    /// `elszDatumTol`, start of the settlement period.
    pub settlement_period_start: String,
    /// `elszDatumIg`, end of the settlement period.
    pub settlement_period_end: String,
}

impl BuyerLedger {
    fn wire_data(&self) -> Result<WireMap, AgentError> {
        for (name, value) in [
            ("konyvelesDatum", &self.booking_date),
            ("elszDatumTol", &self.settlement_period_start),
            ("elszDatumIg", &self.settlement_period_end),
        ] {
            if !is_blank(value) {
                let spec = FieldSpec::new(name, FieldKind::Date, false);
                check_field(LEDGER_ENTITY, &spec, FieldValue::Date(value))?;
            }
        }
        let mut map = WireMap::new();
        map.put_opt_str("konyvelesDatum", Some(&self.booking_date));
        map.put_opt_str("vevoAzonosito", Some(&self.buyer_id));
        map.put_opt_str("vevoFokonyviSzam", Some(&self.ledger_account_number));
        if self.continued_fulfillment {
            map.put_bool("folyamatosTelj", true);
        }
        map.put_opt_str("elszDatumTol", Some(&self.settlement_period_start));
        map.put_opt_str("elszDatumIg", Some(&self.settlement_period_end));
        Ok(map)
    }
}

impl Buyer {
    pub fn new(
        name: impl Into<String>,
        zip: impl Into<String>,
        city: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            zip: zip.into(),
            city: city.into(),
            address: address.into(),
            ..Self::default()
        }
    }

    fn validate_create(&self) -> Result<(), AgentError> {
        for spec in CREATE_REQUIRED {
            let value = match spec.name {
                "nev" => &self.name,
                "irsz" => &self.zip,
                "telepules" => &self.city,
                _ => &self.address,
            };
            check_field(ENTITY, spec, FieldValue::Str(value))?;
        }
        Ok(())
    }

    /// `<vevo>` of the create-invoice schema.
    pub(super) fn create_wire_data(&self) -> Result<WireMap, AgentError> {
        self.validate_create()?;
        let mut map = WireMap::new();
        map.put_str("nev", &self.name);
        map.put_opt_str("orszag", Some(&self.country));
        map.put_str("irsz", &self.zip);
        map.put_str("telepules", &self.city);
        map.put_str("cim", &self.address);
        map.put_opt_str("email", Some(&self.email));
        map.put_bool("sendEmail", self.send_email);
        if let Some(code) = self.tax_subject {
            map.put_int("adoalany", code);
        }
        map.put_opt_str("adoszam", Some(&self.tax_number));
        map.put_opt_str("csoportazonosito", Some(&self.group_identifier));
        map.put_opt_str("adoszamEU", Some(&self.tax_number_eu));
        map.put_opt_str("postazasiNev", Some(&self.postal_name));
        map.put_opt_str("postazasiOrszag", Some(&self.postal_country));
        map.put_opt_str("postazasiIrsz", Some(&self.postal_zip));
        map.put_opt_str("postazasiTelepules", Some(&self.postal_city));
        map.put_opt_str("postazasiCim", Some(&self.postal_address));
        if let Some(ledger) = &self.ledger {
            let data = ledger.wire_data()?;
            if !data.is_empty() {
                map.put_map("vevoFokonyv", data);
            }
        }
        map.put_opt_str("azonosito", Some(&self.identifier));
        map.put_opt_str("alairoNeve", Some(&self.signing_name));
        map.put_opt_str("telefonszam", Some(&self.phone));
        map.put_opt_str("megjegyzes", Some(&self.comment));
        Ok(map)
    }

    /// `<vevo>` of the reversal schema, which only carries the contact and
    /// tax-number subset.
    pub(super) fn reverse_wire_data(&self) -> WireMap {
        let mut map = WireMap::new();
        map.put_opt_str("email", Some(&self.email));
        map.put_opt_str("adoszam", Some(&self.tax_number));
        map.put_opt_str("adoszamEU", Some(&self.tax_number_eu));
        map
    }
}
