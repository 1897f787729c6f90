//! Payment records (credit notes) on invoices and receipts.

use crate::core::{AgentError, FieldKind, FieldSpec, FieldValue, WireMap, check_field, today_str};

const ENTITY: &str = "CreditNote";

/// Most payments the service registers against one document in one call.
pub const CREDIT_NOTE_LIMIT: usize = 5;

const REQUIRED: &[FieldSpec] = &[
    FieldSpec::new("datum", FieldKind::Date, true),
    FieldSpec::new("jogcim", FieldKind::Str, true),
    FieldSpec::new("osszeg", FieldKind::Double, true),
];

/// One registered payment: date, legal title, amount.
#[derive(Debug, Clone, Default)]
pub struct CreditNote {
    pub date: String,
    /// `jogcim`, the payment method or legal title of the payment.
    pub payment_method: String,
    pub amount: f64,
    pub description: String,
}

impl CreditNote {
    /// A payment dated today.
    pub fn new(payment_method: impl Into<String>, amount: f64) -> Self {
        Self {
            date: today_str(),
            payment_method: payment_method.into(),
            amount,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), AgentError> {
        for spec in REQUIRED {
            let value = match spec.name {
                "datum" => FieldValue::Date(&self.date),
                "jogcim" => FieldValue::Str(&self.payment_method),
                _ => FieldValue::Double(self.amount),
            };
            check_field(ENTITY, spec, value)?;
        }
        Ok(())
    }

    /// `<kifizetes>` entry.
    pub(super) fn wire_data(&self) -> Result<WireMap, AgentError> {
        self.validate()?;
        let mut map = WireMap::new();
        map.put_str("datum", &self.date);
        map.put_str("jogcim", &self.payment_method);
        map.put_double("osszeg", self.amount);
        map.put_opt_str("leiras", Some(&self.description));
        Ok(map)
    }
}

/// Serializes a payment list as `note0, note1, …` entries, which the XML
/// builder flattens into repeated `<kifizetes>` siblings. Errors when the
/// list exceeds [`CREDIT_NOTE_LIMIT`].
pub(crate) fn notes_wire_data(notes: &[CreditNote]) -> Result<WireMap, AgentError> {
    if notes.len() > CREDIT_NOTE_LIMIT {
        return Err(AgentError::validation(
            "kifizetes",
            format!(
                "{} payments given, the service accepts at most {CREDIT_NOTE_LIMIT} per call",
                notes.len()
            ),
        ));
    }
    let mut map = WireMap::new();
    for (i, note) in notes.iter().enumerate() {
        map.put_map(format!("note{i}"), note.wire_data()?);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_payments_exceed_the_limit() {
        let notes = vec![CreditNote::new("átutalás", 100.0); 6];
        assert!(matches!(
            notes_wire_data(&notes),
            Err(AgentError::Validation { .. })
        ));
        assert!(notes_wire_data(&notes[..5]).is_ok());
    }

    #[test]
    fn undated_payment_is_rejected() {
        let note = CreditNote {
            payment_method: "készpénz".into(),
            amount: 100.0,
            ..CreditNote::default()
        };
        assert!(note.wire_data().is_err());
    }
}
