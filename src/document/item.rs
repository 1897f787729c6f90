//! Invoice and receipt line items.

use crate::core::{AgentError, FieldKind, FieldSpec, FieldValue, WireMap, check_field, is_blank};

const ENTITY: &str = "Item";
const LEDGER_ENTITY: &str = "ItemLedger";

const REQUIRED: &[FieldSpec] = &[
    FieldSpec::new("megnevezes", FieldKind::Str, true),
    FieldSpec::new("mennyiseg", FieldKind::Double, true),
    FieldSpec::new("mennyisegiEgyseg", FieldKind::Str, true),
    FieldSpec::new("nettoEgysegar", FieldKind::Double, true),
    FieldSpec::new("afakulcs", FieldKind::Str, true),
    FieldSpec::new("nettoErtek", FieldKind::Double, true),
    FieldSpec::new("afaErtek", FieldKind::Double, true),
    FieldSpec::new("bruttoErtek", FieldKind::Double, true),
];

/// One line of an invoice or receipt. Value fields are absolute amounts,
/// not unit amounts, and the service cross-checks them against quantity
/// and unit price.
#[derive(Debug, Clone, Default)]
pub struct Item {
    pub name: String,
    /// `azonosito` in the account's product catalog.
    pub identifier: String,
    pub quantity: f64,
    /// `mennyisegiEgyseg`, free-text unit.
    pub unit: String,
    pub net_unit_price: f64,
    /// `afakulcs`: a percentage or one of the service's special markers
    /// (`TAM`, `AAM`, `EU`, `EUK`, `MAA`, `F.AFA`, `K.AFA`, `HO`, `TEHK`,
    /// `TAHK`, `KBAET`, `KBAUK`, `EAM`, `NAM`, `ATK`, `EUT`, `EUKT`).
    pub vat_rate: String,
    /// `arresAfaAlap`, margin-scheme VAT base, emitted only when non-zero.
    pub margin_vat_base: f64,
    pub net_value: f64,
    pub vat_value: f64,
    pub gross_value: f64,
    pub comment: String,
    /// General-ledger block of the line, `tetelFokonyv` on invoices and
    /// `fokonyv` on receipts.
    pub ledger: Option<ItemLedger>,
}

/// General-ledger data of a line item.
#[derive(Debug, Clone, Default)]
pub struct ItemLedger {
    /// `gazdasagiEsem`, the economic event type of the revenue.
    pub economic_event: String,
    /// `gazdasagiEsemAfa`, the economic event type of the VAT.
    pub vat_economic_event: String,
    /// `arbevetelFokonyviSzam` (`arbevetel` on receipts).
    pub revenue_account_number: String,
    /// `afaFokonyviSzam` (`afa` on receipts).
    pub vat_account_number: String,
    /// `elszDatumTol`, start of the settlement period.
    pub settlement_period_start: String,
    /// `elszDatumIg`, end of the settlement period.
    pub settlement_period_end: String,
}

impl ItemLedger {
    fn invoice_wire_data(&self) -> Result<WireMap, AgentError> {
        for (name, value) in [
            ("elszDatumTol", &self.settlement_period_start),
            ("elszDatumIg", &self.settlement_period_end),
        ] {
            if !is_blank(value) {
                let spec = FieldSpec::new(name, FieldKind::Date, false);
                check_field(LEDGER_ENTITY, &spec, FieldValue::Date(value))?;
            }
        }
        let mut map = WireMap::new();
        map.put_opt_str("gazdasagiEsem", Some(&self.economic_event));
        map.put_opt_str("gazdasagiEsemAfa", Some(&self.vat_economic_event));
        map.put_opt_str("arbevetelFokonyviSzam", Some(&self.revenue_account_number));
        map.put_opt_str("afaFokonyviSzam", Some(&self.vat_account_number));
        map.put_opt_str("elszDatumTol", Some(&self.settlement_period_start));
        map.put_opt_str("elszDatumIg", Some(&self.settlement_period_end));
        Ok(map)
    }

    /// The receipt schema only takes the two account numbers.
    fn receipt_wire_data(&self) -> WireMap {
        let mut map = WireMap::new();
        map.put_opt_str("arbevetel", Some(&self.revenue_account_number));
        map.put_opt_str("afa", Some(&self.vat_account_number));
        map
    }
}

impl Item {
    /// A line with its value fields derived from quantity, unit price and
    /// a percentage VAT rate. Non-numeric rate markers yield zero VAT;
    /// set the value fields directly for those cases if the amounts differ.
    pub fn new(
        name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        net_unit_price: f64,
        vat_rate: impl Into<String>,
    ) -> Self {
        let vat_rate = vat_rate.into();
        let net_value = quantity * net_unit_price;
        let vat_value = vat_rate
            .parse::<f64>()
            .map(|rate| net_value * rate / 100.0)
            .unwrap_or(0.0);
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
            net_unit_price,
            vat_rate,
            net_value,
            vat_value,
            gross_value: net_value + vat_value,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), AgentError> {
        for spec in REQUIRED {
            let value = match spec.name {
                "megnevezes" => FieldValue::Str(&self.name),
                "mennyiseg" => FieldValue::Double(self.quantity),
                "mennyisegiEgyseg" => FieldValue::Str(&self.unit),
                "nettoEgysegar" => FieldValue::Double(self.net_unit_price),
                "afakulcs" => FieldValue::Str(&self.vat_rate),
                "nettoErtek" => FieldValue::Double(self.net_value),
                "afaErtek" => FieldValue::Double(self.vat_value),
                _ => FieldValue::Double(self.gross_value),
            };
            check_field(ENTITY, spec, value)?;
        }
        Ok(())
    }

    /// `<tetel>` of the invoice schema.
    pub(super) fn invoice_wire_data(&self) -> Result<WireMap, AgentError> {
        self.validate()?;
        let mut map = WireMap::new();
        map.put_str("megnevezes", &self.name);
        map.put_opt_str("azonosito", Some(&self.identifier));
        map.put_double("mennyiseg", self.quantity);
        map.put_str("mennyisegiEgyseg", &self.unit);
        map.put_double("nettoEgysegar", self.net_unit_price);
        map.put_str("afakulcs", &self.vat_rate);
        if self.margin_vat_base != 0.0 {
            map.put_double("arresAfaAlap", self.margin_vat_base);
        }
        map.put_double("nettoErtek", self.net_value);
        map.put_double("afaErtek", self.vat_value);
        map.put_double("bruttoErtek", self.gross_value);
        map.put_opt_str("megjegyzes", Some(&self.comment));
        if let Some(ledger) = &self.ledger {
            let data = ledger.invoice_wire_data()?;
            if !data.is_empty() {
                map.put_map("tetelFokonyv", data);
            }
        }
        Ok(map)
    }

    /// `<tetel>` of the receipt schema, which names the value fields
    /// differently.
    pub(super) fn receipt_wire_data(&self) -> Result<WireMap, AgentError> {
        self.validate()?;
        let mut map = WireMap::new();
        map.put_str("megnevezes", &self.name);
        map.put_opt_str("azonosito", Some(&self.identifier));
        map.put_double("mennyiseg", self.quantity);
        map.put_str("mennyisegiEgyseg", &self.unit);
        map.put_double("nettoEgysegar", self.net_unit_price);
        map.put_str("afakulcs", &self.vat_rate);
        map.put_double("netto", self.net_value);
        map.put_double("afa", self.vat_value);
        map.put_double("brutto", self.gross_value);
        if let Some(ledger) = &self.ledger {
            let data = ledger.receipt_wire_data();
            if !data.is_empty() {
                map.put_map("fokonyv", data);
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WireNode;

    fn text_of(map: &WireMap, key: &str) -> String {
        map.entries()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| match v {
                WireNode::Text(t) => t.clone(),
                WireNode::Map(_) => panic!("{key} is not scalar"),
            })
            .unwrap()
    }

    #[test]
    fn derived_values_follow_the_rate() {
        let item = Item::new("Eladó tétel", 2.0, "db", 5000.0, "27");
        assert_eq!(item.net_value, 10000.0);
        assert_eq!(item.vat_value, 2700.0);
        assert_eq!(item.gross_value, 12700.0);
    }

    #[test]
    fn wire_doubles_always_carry_a_decimal() {
        let item = Item::new("Eladó tétel", 1.0, "db", 10000.0, "27");
        let map = item.invoice_wire_data().unwrap();
        assert_eq!(text_of(&map, "nettoErtek"), "10000.0");
        assert_eq!(text_of(&map, "afaErtek"), "2700.0");
        assert_eq!(text_of(&map, "bruttoErtek"), "12700.0");
    }

    #[test]
    fn marker_rate_yields_zero_vat_but_validates() {
        let item = Item::new("Közvetített szolgáltatás", 1.0, "db", 800.0, "AAM");
        assert_eq!(item.vat_value, 0.0);
        assert!(item.invoice_wire_data().is_ok());
    }

    fn sub_map<'a>(map: &'a WireMap, key: &str) -> &'a WireMap {
        map.entries()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| match v {
                WireNode::Map(inner) => inner,
                WireNode::Text(_) => panic!("{key} is not a map"),
            })
            .unwrap()
    }

    #[test]
    fn invoice_ledger_appears_as_tetel_fokonyv() {
        let mut item = Item::new("Eladó tétel", 1.0, "db", 10000.0, "27");
        item.ledger = Some(ItemLedger {
            revenue_account_number: "911".into(),
            vat_account_number: "467".into(),
            settlement_period_start: "2026-01-01".into(),
            settlement_period_end: "2026-01-31".into(),
            ..ItemLedger::default()
        });
        let map = item.invoice_wire_data().unwrap();
        let keys: Vec<_> = sub_map(&map, "tetelFokonyv")
            .entries()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(
            keys,
            ["arbevetelFokonyviSzam", "afaFokonyviSzam", "elszDatumTol", "elszDatumIg"]
        );
    }

    #[test]
    fn receipt_ledger_uses_the_short_account_tags() {
        let mut item = Item::new("Eladó tétel", 1.0, "db", 10000.0, "27");
        item.ledger = Some(ItemLedger {
            revenue_account_number: "911".into(),
            vat_account_number: "467".into(),
            ..ItemLedger::default()
        });
        let map = item.receipt_wire_data().unwrap();
        let keys: Vec<_> = sub_map(&map, "fokonyv")
            .entries()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["arbevetel", "afa"]);
    }

    #[test]
    fn ledger_settlement_dates_are_strict() {
        let mut item = Item::new("Eladó tétel", 1.0, "db", 10000.0, "27");
        item.ledger = Some(ItemLedger {
            settlement_period_start: "2026-1-1".into(),
            ..ItemLedger::default()
        });
        let err = item.invoice_wire_data().unwrap_err();
        match err {
            AgentError::Validation { field, .. } => assert_eq!(field, "elszDatumTol"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nameless_item_is_rejected() {
        let item = Item::new("", 1.0, "db", 100.0, "27");
        assert!(matches!(
            item.invoice_wire_data(),
            Err(AgentError::Validation { .. })
        ));
    }
}
