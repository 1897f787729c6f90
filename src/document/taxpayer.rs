//! Taxpayer lookup request.

use crate::core::{AgentError, Operation, WireMap, is_blank};

use super::ToWireData;

/// Queries the NAV register through the service. The identifier is the
/// first eight digits of the Hungarian tax number.
#[derive(Debug, Clone, Default)]
pub struct TaxPayerQuery {
    pub tax_payer_id: String,
}

impl TaxPayerQuery {
    pub fn new(tax_payer_id: impl Into<String>) -> Self {
        Self {
            tax_payer_id: tax_payer_id.into(),
        }
    }
}

impl ToWireData for TaxPayerQuery {
    fn to_wire_data(&self, _op: Operation) -> Result<WireMap, AgentError> {
        if is_blank(&self.tax_payer_id) {
            return Err(AgentError::validation(
                "torzsszam",
                "required field of TaxPayerQuery has no value set",
            ));
        }
        let mut root = WireMap::new();
        root.put_str("torzsszam", self.tax_payer_id.trim());
        Ok(root)
    }
}
