//! Presence and primitive-type checks run over every declared field of an
//! entity before serialization. Field tables are declared statically per
//! entity type; there is no reflective property walking.

use chrono::NaiveDate;

use super::error::AgentError;

/// Primitive wire kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Int,
    Double,
    Bool,
    Date,
}

/// One declared field of an entity. Tables of these are `const` per entity.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind, required: bool) -> Self {
        Self {
            name,
            kind,
            required,
        }
    }
}

/// The value of a field at validation time. `Absent` covers unset options.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Absent,
    Str(&'a str),
    Int(i64),
    Double(f64),
    Bool(bool),
    /// A date carried as text, expected in `YYYY-MM-DD` form.
    Date(&'a str),
}

/// A string counts as blank when it is empty or trims to empty. The literal
/// `"0"` is never blank (inherited wire convention).
pub fn is_blank(value: &str) -> bool {
    value != "0" && value.trim().is_empty()
}

/// Strict calendar-valid `YYYY-MM-DD` check. Zero padding is mandatory.
pub fn is_valid_date(value: &str) -> bool {
    if value.len() != 10 {
        return false;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string() == value,
        Err(_) => false,
    }
}

fn required_err(entity: &str, field: &str) -> AgentError {
    AgentError::validation(
        field,
        format!("required field of {entity} has no value set"),
    )
}

/// Validate a single field against its spec.
///
/// Int/Double keep the inherited leniency: a required numeric field is
/// satisfied by any numeric value, including a default 0, and only an
/// absent value fails. Tightening this would diverge from what the remote
/// service itself accepts.
pub fn check_field(entity: &str, spec: &FieldSpec, value: FieldValue<'_>) -> Result<(), AgentError> {
    match spec.kind {
        FieldKind::Str => match value {
            FieldValue::Absent => {
                if spec.required {
                    return Err(required_err(entity, spec.name));
                }
            }
            FieldValue::Str(s) => {
                if spec.required && is_blank(s) {
                    return Err(required_err(entity, spec.name));
                }
            }
            _ => {
                return Err(AgentError::validation(
                    spec.name,
                    format!("value of {entity} field is not a string"),
                ));
            }
        },
        FieldKind::Int => match value {
            FieldValue::Absent => {
                if spec.required {
                    return Err(required_err(entity, spec.name));
                }
            }
            FieldValue::Int(_) => {}
            _ => {
                return Err(AgentError::validation(
                    spec.name,
                    format!("value of {entity} field is not an integer"),
                ));
            }
        },
        FieldKind::Double => match value {
            FieldValue::Absent => {
                if spec.required {
                    return Err(required_err(entity, spec.name));
                }
            }
            FieldValue::Double(_) => {}
            _ => {
                return Err(AgentError::validation(
                    spec.name,
                    format!("value of {entity} field is not a double"),
                ));
            }
        },
        FieldKind::Bool => match value {
            FieldValue::Absent | FieldValue::Bool(_) => {}
            _ => {
                let message = if spec.required {
                    format!("required field of {entity} is not a boolean")
                } else {
                    format!("value of {entity} field is not a boolean")
                };
                return Err(AgentError::validation(spec.name, message));
            }
        },
        FieldKind::Date => match value {
            FieldValue::Absent => {}
            FieldValue::Date(s) | FieldValue::Str(s) => {
                if !is_valid_date(s) {
                    let message = if spec.required {
                        format!("required field of {entity} does not hold a valid date")
                    } else {
                        format!("value of {entity} field is not a date")
                    };
                    return Err(AgentError::validation(spec.name, message));
                }
            }
            _ => {
                return Err(AgentError::validation(
                    spec.name,
                    format!("value of {entity} field is not a date"),
                ));
            }
        },
    }
    Ok(())
}
