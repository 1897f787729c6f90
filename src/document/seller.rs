//! Seller party: bank data and the notification mail fields. Everything
//! here is optional, the account profile supplies the rest.

use crate::core::WireMap;

#[derive(Debug, Clone, Default)]
pub struct Seller {
    pub bank: String,
    /// `bankszamlaszam`, the account number printed on the document.
    pub bank_account: String,
    pub email_reply_to: String,
    pub email_subject: String,
    pub email_body: String,
    pub signing_name: String,
}

impl Seller {
    /// `<elado>` of the create-invoice schema.
    pub(super) fn create_wire_data(&self) -> WireMap {
        let mut map = WireMap::new();
        map.put_opt_str("bank", Some(&self.bank));
        map.put_opt_str("bankszamlaszam", Some(&self.bank_account));
        map.put_opt_str("emailReplyto", Some(&self.email_reply_to));
        map.put_opt_str("emailTargy", Some(&self.email_subject));
        map.put_opt_str("emailSzoveg", Some(&self.email_body));
        map.put_opt_str("alairoNeve", Some(&self.signing_name));
        map
    }

    /// `<elado>` of the reversal schema: mail fields only.
    pub(super) fn reverse_wire_data(&self) -> WireMap {
        let mut map = WireMap::new();
        map.put_opt_str("emailReplyto", Some(&self.email_reply_to));
        map.put_opt_str("emailTargy", Some(&self.email_subject));
        map.put_opt_str("emailSzoveg", Some(&self.email_body));
        map
    }
}
