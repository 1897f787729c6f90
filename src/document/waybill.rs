//! Waybill block, attached to an invoice when the goods ship.

use crate::core::{AgentError, WireMap, is_blank};

#[derive(Debug, Clone, Default)]
pub struct Waybill {
    /// `uticel`, shipping destination.
    pub destination: String,
    /// `futarSzolgalat`, name of the courier service.
    pub courier: String,
    /// `vonalkod`, the parcel barcode.
    pub barcode: String,
    pub comment: String,
    /// Courier-specific parcel data, emitted as a sub-element named after
    /// the carrier.
    pub carrier: Option<WaybillCarrier>,
}

/// The carrier integrations the service understands, each with its own
/// extra field set.
#[derive(Debug, Clone)]
pub enum WaybillCarrier {
    Mpl(MplWaybill),
    Sprinter(SprinterWaybill),
    Transoflex(TransoflexWaybill),
    Ppp(PppWaybill),
}

/// `<mpl>`, Magyar Posta Logisztika parcel data.
#[derive(Debug, Clone, Default)]
pub struct MplWaybill {
    /// `vevokod`, the sender's MPL customer code.
    pub buyer_code: String,
    /// `vonalkod`, the MPL parcel barcode.
    pub barcode: String,
    /// `tomeg`, parcel weight.
    pub weight: String,
    /// `kulonszolgaltatasok`, extra services requested.
    pub extra_services: String,
    /// `erteknyilvanitas`, declared parcel value.
    pub insured_value: Option<f64>,
}

/// `<sprinter>` parcel data.
#[derive(Debug, Clone, Default)]
pub struct SprinterWaybill {
    /// `azonosito`, the Sprinter contract identifier.
    pub identifier: String,
    /// `feladokod`, the sender's code.
    pub sender_code: String,
    /// `iranykod`, the shipment routing code.
    pub routing_code: String,
    /// `csomagszam`, number of parcels in the shipment.
    pub parcel_count: Option<i64>,
    /// `vonalkodPostfix` appended to the printed barcode.
    pub barcode_postfix: String,
    /// `szallitasiIdo`, promised delivery time.
    pub shipping_time: String,
}

/// `<tof>`, Transoflex parcel data.
#[derive(Debug, Clone, Default)]
pub struct TransoflexWaybill {
    /// `azonosito`, the Transoflex contract identifier.
    pub identifier: String,
    /// `shippingID` of the shipment.
    pub shipping_id: String,
    /// `csomagszam`, number of parcels in the shipment.
    pub parcel_count: Option<i64>,
    /// `countryCode` of the destination.
    pub country_code: String,
    /// `zip` of the destination.
    pub zip: String,
    /// `service` code requested.
    pub service: String,
}

/// `<ppp>`, Pick Pack Pont parcel data.
#[derive(Debug, Clone, Default)]
pub struct PppWaybill {
    /// `vonalkodPrefix` of the printed barcode.
    pub barcode_prefix: String,
    /// `vonalkodPostfix` of the printed barcode.
    pub barcode_postfix: String,
}

impl Waybill {
    /// `<fuvarlevel>`; callers skip the section entirely when no waybill
    /// is attached.
    pub(super) fn wire_data(&self) -> Result<WireMap, AgentError> {
        let mut map = WireMap::new();
        map.put_opt_str("uticel", Some(&self.destination));
        map.put_opt_str("futarSzolgalat", Some(&self.courier));
        map.put_opt_str("vonalkod", Some(&self.barcode));
        map.put_opt_str("megjegyzes", Some(&self.comment));
        match &self.carrier {
            Some(WaybillCarrier::Mpl(mpl)) => map.put_map("mpl", mpl.wire_data()?),
            Some(WaybillCarrier::Sprinter(sprinter)) => {
                map.put_map("sprinter", sprinter.wire_data());
            }
            Some(WaybillCarrier::Transoflex(tof)) => map.put_map("tof", tof.wire_data()),
            Some(WaybillCarrier::Ppp(ppp)) => map.put_map("ppp", ppp.wire_data()),
            None => {}
        }
        Ok(map)
    }
}

impl MplWaybill {
    fn wire_data(&self) -> Result<WireMap, AgentError> {
        for (name, value) in [
            ("vevokod", &self.buyer_code),
            ("vonalkod", &self.barcode),
            ("tomeg", &self.weight),
        ] {
            if is_blank(value) {
                return Err(AgentError::validation(
                    name,
                    "required field of MplWaybill has no value set",
                ));
            }
        }
        let mut map = WireMap::new();
        map.put_str("vevokod", &self.buyer_code);
        map.put_str("vonalkod", &self.barcode);
        map.put_str("tomeg", &self.weight);
        map.put_opt_str("kulonszolgaltatasok", Some(&self.extra_services));
        if let Some(value) = self.insured_value {
            map.put_double("erteknyilvanitas", value);
        }
        Ok(map)
    }
}

impl SprinterWaybill {
    fn wire_data(&self) -> WireMap {
        let mut map = WireMap::new();
        map.put_opt_str("azonosito", Some(&self.identifier));
        map.put_opt_str("feladokod", Some(&self.sender_code));
        map.put_opt_str("iranykod", Some(&self.routing_code));
        if let Some(count) = self.parcel_count {
            map.put_int("csomagszam", count);
        }
        map.put_opt_str("vonalkodPostfix", Some(&self.barcode_postfix));
        map.put_opt_str("szallitasiIdo", Some(&self.shipping_time));
        map
    }
}

impl TransoflexWaybill {
    fn wire_data(&self) -> WireMap {
        let mut map = WireMap::new();
        map.put_opt_str("azonosito", Some(&self.identifier));
        map.put_opt_str("shippingID", Some(&self.shipping_id));
        if let Some(count) = self.parcel_count {
            map.put_int("csomagszam", count);
        }
        map.put_opt_str("countryCode", Some(&self.country_code));
        map.put_opt_str("zip", Some(&self.zip));
        map.put_opt_str("service", Some(&self.service));
        map
    }
}

impl PppWaybill {
    fn wire_data(&self) -> WireMap {
        let mut map = WireMap::new();
        map.put_opt_str("vonalkodPrefix", Some(&self.barcode_prefix));
        map.put_opt_str("vonalkodPostfix", Some(&self.barcode_postfix));
        map
    }
}
