//! The schema-agnostic intermediate tree every document serializes into.
//!
//! Values are pre-formatted per the wire conventions here — doubles always
//! carry at least one decimal digit, booleans render as literal
//! `true`/`false` tokens, dates stay `YYYY-MM-DD` — so the XML builder only
//! has to walk and emit.

use chrono::Local;

use super::fields::is_blank;

/// An ordered key → node mapping. Insertion order is document order on the
/// wire, and some schemas are order-sensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireMap(Vec<(String, WireNode)>);

/// A recursive wire value: a formatted scalar or an ordered mapping.
///
/// Repeated collections are encoded as map children keyed `item0, item1, …`
/// or `note0, note1, …`; the XML builder rewrites those keys to the fixed
/// sibling tags (`tetel`, `kifizetes`) when emitting.
#[derive(Debug, Clone, PartialEq)]
pub enum WireNode {
    Text(String),
    Map(WireMap),
}

impl WireMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[(String, WireNode)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn put_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), WireNode::Text(value.into())));
    }

    /// Adds the value only when it is set and not blank, matching the
    /// optional-field emission rules of the wire schemas.
    pub fn put_opt_str(&mut self, key: impl Into<String>, value: Option<&str>) {
        if let Some(v) = value {
            if !is_blank(v) {
                self.put_str(key, v);
            }
        }
    }

    pub fn put_bool(&mut self, key: impl Into<String>, value: bool) {
        self.put_str(key, if value { "true" } else { "false" });
    }

    pub fn put_int(&mut self, key: impl Into<String>, value: i64) {
        self.put_str(key, value.to_string());
    }

    pub fn put_double(&mut self, key: impl Into<String>, value: f64) {
        self.put_str(key, format_double(value));
    }

    pub fn put_opt_double(&mut self, key: impl Into<String>, value: Option<f64>) {
        if let Some(v) = value {
            self.put_double(key, v);
        }
    }

    pub fn put_map(&mut self, key: impl Into<String>, value: WireMap) {
        self.0.push((key.into(), WireNode::Map(value)));
    }

    /// Appends every entry of `other`, used where a schema flattens a
    /// section's children directly under the root.
    pub fn merge(&mut self, other: WireMap) {
        self.0.extend(other.0);
    }
}

/// Wire formatting for doubles: at least one decimal digit, otherwise the
/// shortest representation. `10000` → `"10000.0"`, `2700.5` → `"2700.5"`.
pub fn format_double(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Today's date in the wire date format.
pub fn today_str() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_format_pads_whole_numbers() {
        assert_eq!(format_double(10000.0), "10000.0");
        assert_eq!(format_double(2700.5), "2700.5");
        assert_eq!(format_double(0.0), "0.0");
        assert_eq!(format_double(-3.0), "-3.0");
    }

    #[test]
    fn map_preserves_insertion_order() {
        let mut map = WireMap::new();
        map.put_str("b", "2");
        map.put_str("a", "1");
        let keys: Vec<_> = map.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn opt_str_skips_blank_but_keeps_zero() {
        let mut map = WireMap::new();
        map.put_opt_str("empty", Some("  "));
        map.put_opt_str("zero", Some("0"));
        map.put_opt_str("unset", None);
        assert_eq!(map.len(), 1);
        assert_eq!(map.entries()[0].0, "zero");
    }
}
