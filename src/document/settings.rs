//! Account credentials and the `<beallitasok>` section.

use crate::core::{AgentError, WireMap, is_blank};

use super::SettingsContext;

/// Credentials and account-level options of one Agent account.
///
/// Either the Agent key alone or a username/password pair must be set;
/// key-based auth is what the service recommends.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub username: String,
    pub password: String,
    /// `szamlaagentkulcs`, the per-account Agent key.
    pub api_key: String,
    /// `szamlaLetoltes` / `pdfLetoltes`: ask for the PDF in the reply.
    pub download_pdf: bool,
    /// `szamlaLetoltesPld`: number of copies in the downloaded PDF.
    pub copies: i64,
    /// `aggregator` identifier, for resellers acting on behalf of clients.
    pub aggregator: String,
    pub guardian: bool,
    /// `cikkazoninvoice`: item identifiers refer to the account's catalog.
    pub invoice_item_identifier: bool,
    /// `szamlaKulsoAzon`: caller-side external identifier of the invoice.
    pub invoice_external_id: String,
    /// `adoszam` the payment registration schema carries.
    pub tax_number: String,
}

impl Settings {
    /// Key-based authentication with the defaults the service expects.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            download_pdf: true,
            copies: 1,
            ..Self::default()
        }
    }

    /// Username/password authentication.
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            download_pdf: true,
            copies: 1,
            ..Self::default()
        }
    }

    /// At least one complete authentication method has to be present.
    pub fn validate(&self) -> Result<(), AgentError> {
        if !is_blank(&self.api_key) {
            return Ok(());
        }
        if !is_blank(&self.username) && !is_blank(&self.password) {
            return Ok(());
        }
        Err(AgentError::validation(
            "szamlaagentkulcs",
            "no agent key and no username/password pair is set",
        ))
    }

    /// Emits the settings fields a schema declares, in its declared order.
    /// Fields the schema does not list are never emitted, so one account
    /// object serves every operation.
    pub fn build_section(&self, fields: &[&str], ctx: &SettingsContext) -> WireMap {
        let mut map = WireMap::new();
        for &field in fields {
            match field {
                "felhasznalo" => map.put_opt_str(field, Some(&self.username)),
                "jelszo" => map.put_opt_str(field, Some(&self.password)),
                "szamlaagentkulcs" => map.put_opt_str(field, Some(&self.api_key)),
                "eszamla" => map.put_bool(field, ctx.e_invoice),
                "szamlaLetoltes" | "pdfLetoltes" => map.put_bool(field, self.download_pdf),
                "szamlaLetoltesPld" => {
                    if self.download_pdf && self.copies > 0 {
                        map.put_int(field, self.copies);
                    }
                }
                "valaszVerzio" => map.put_int(field, ctx.response_version),
                "aggregator" => map.put_opt_str(field, Some(&self.aggregator)),
                "guardian" => map.put_bool(field, self.guardian),
                "cikkazoninvoice" => map.put_bool(field, self.invoice_item_identifier),
                "szamlaKulsoAzon" => map.put_opt_str(field, Some(&self.invoice_external_id)),
                "szamlaszam" => map.put_opt_str(field, Some(&ctx.invoice_number)),
                "adoszam" => map.put_opt_str(field, Some(&self.tax_number)),
                "additiv" => map.put_bool(field, ctx.additive),
                "rendelesSzam" => map.put_opt_str(field, Some(&ctx.order_number)),
                "pdf" => map.put_bool(field, ctx.request_pdf),
                _ => {}
            }
        }
        map
    }
}
