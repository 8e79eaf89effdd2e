//! Heterogeneous parameter values and their canonical string coercion.
//!
//! Query parameters and bulk headers accept a small family of value types
//! rather than raw strings. [`ParamValue`] is the closed set of accepted
//! shapes; anything else simply does not convert, so there is no runtime
//! "unsupported type" failure mode.

use std::collections::BTreeMap;
use std::fmt;

/// A heterogeneous map suitable for bulk query-parameter and header setters,
/// and for the shorthand verb functions.
///
/// # Examples
///
/// ```
/// use herald::{ParamValue, Table};
///
/// let mut params = Table::new();
/// params.insert("page".to_string(), ParamValue::from(2));
/// params.insert("tags".to_string(), ParamValue::from(vec!["a", "b"]));
/// ```
pub type Table = BTreeMap<String, ParamValue>;

/// A value accepted by query-parameter and header setters.
///
/// Coercion to the wire representation is exhaustive over these variants:
/// strings pass through, integers and floats use plain decimal formatting
/// (floats render their shortest round-trip form, no trailing zeros),
/// booleans render as `true`/`false`, and lists join with commas.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    StrList(Vec<String>),
    IntList(Vec<i64>),
}

impl ParamValue {
    /// Renders the canonical string form used for query encoding and header
    /// transmission.
    ///
    /// # Examples
    ///
    /// ```
    /// use herald::ParamValue;
    ///
    /// assert_eq!(ParamValue::from(3.5).coerce(), "3.5");
    /// assert_eq!(ParamValue::from(vec![1_i64, 2, 3]).coerce(), "1,2,3");
    /// ```
    pub fn coerce(&self) -> String {
        match self {
            ParamValue::Str(s) => s.clone(),
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::StrList(items) => items.join(","),
            ParamValue::IntList(items) => items
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.coerce())
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(n as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Int(n as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        ParamValue::Float(f)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(items: Vec<String>) -> Self {
        ParamValue::StrList(items)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(items: Vec<&str>) -> Self {
        ParamValue::StrList(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(items: Vec<i64>) -> Self {
        ParamValue::IntList(items)
    }
}

/// Coerces a heterogeneous table into the canonical string-keyed,
/// string-valued mapping used for query encoding and header transmission.
pub fn coerce_table<K, V, I>(table: I) -> BTreeMap<String, String>
where
    K: Into<String>,
    V: Into<ParamValue>,
    I: IntoIterator<Item = (K, V)>,
{
    table
        .into_iter()
        .map(|(k, v)| (k.into(), v.into().coerce()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_pass_through() {
        assert_eq!(ParamValue::from("hello").coerce(), "hello");
        assert_eq!(ParamValue::from(String::from("x y")).coerce(), "x y");
    }

    #[test]
    fn integers_format_decimal() {
        assert_eq!(ParamValue::from(42).coerce(), "42");
        assert_eq!(ParamValue::from(-7_i64).coerce(), "-7");
    }

    #[test]
    fn floats_use_shortest_representation() {
        assert_eq!(ParamValue::from(3.5).coerce(), "3.5");
        assert_eq!(ParamValue::from(1.0).coerce(), "1");
        assert_eq!(ParamValue::from(0.125).coerce(), "0.125");
    }

    #[test]
    fn bools_format_lowercase() {
        assert_eq!(ParamValue::from(true).coerce(), "true");
        assert_eq!(ParamValue::from(false).coerce(), "false");
    }

    #[test]
    fn lists_join_with_commas() {
        assert_eq!(ParamValue::from(vec!["a", "b", "c"]).coerce(), "a,b,c");
        assert_eq!(ParamValue::from(vec![1_i64, 2, 3]).coerce(), "1,2,3");
        assert_eq!(ParamValue::StrList(vec![]).coerce(), "");
    }

    #[test]
    fn table_coercion_keeps_all_keys() {
        let coerced = coerce_table([
            ("a", ParamValue::from(1)),
            ("b", ParamValue::from("two")),
            ("c", ParamValue::from(true)),
        ]);
        assert_eq!(coerced.len(), 3);
        assert_eq!(coerced["a"], "1");
        assert_eq!(coerced["b"], "two");
        assert_eq!(coerced["c"], "true");
    }
}
