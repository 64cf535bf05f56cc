//! `key value` record blocks as printed and read by the administrative tool

use crate::codec::multiline::fold_at;
use crate::codec::override_list::{self, ListFormat, NONE};
use crate::errors::{GridConfError, Result};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Column the value starts at when rendering
const KEY_WIDTH: usize = 18;

/// An ordered block of `key value` attributes
///
/// Keys may repeat (resource quota rules use several `limit` lines); the
/// single-value accessors read the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(String, String)>,
}

/// Conversion between a typed entity and its attribute record
pub trait RecordCodec: Sized {
    /// # Errors
    ///
    /// Returns the first malformed or missing attribute.
    fn from_record(record: &Record) -> Result<Self>;

    fn to_record(&self) -> Record;

    /// Parse the tool's text output directly
    ///
    /// # Errors
    ///
    /// See [`Record::parse`] and [`RecordCodec::from_record`].
    fn from_text(text: &str) -> Result<Self> {
        Self::from_record(&Record::parse(text)?)
    }
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the tool output, folding wrapped values
    ///
    /// Blank lines and `#` comments are skipped, as are indented lines that
    /// do not continue a wrapped value.
    ///
    /// # Errors
    ///
    /// Propagates errors from the multi-line reader.
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.lines().collect();
        let mut record = Record::new();
        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            let trimmed = line.trim();
            if trimmed.is_empty()
                || trimmed.starts_with('#')
                || line.starts_with(|c: char| c.is_whitespace())
            {
                i += 1;
                continue;
            }
            let folded = fold_at(&lines, i)?;
            record.entries.push((folded.key, folded.value));
            i = folded.next_index;
        }
        Ok(record)
    }

    /// Append an attribute
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Builder form of [`Record::push`]
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.push(key, value.to_string());
        self
    }

    pub fn with_bool(self, key: impl Into<String>, value: bool) -> Self {
        self.with(key, if value { "TRUE" } else { "FALSE" })
    }

    /// Plain list; empty renders as `NONE`
    pub fn with_list(self, key: impl Into<String>, items: &[String], separator: &str) -> Self {
        let value = override_list::join_list(items, separator);
        self.with(key, value)
    }

    /// Override-capable list; overrides are moved last
    pub fn with_override_list(self, key: impl Into<String>, tokens: &[String], format: ListFormat) -> Self {
        let value = override_list::encode(tokens, format.separator());
        self.with(key, value)
    }

    /// `k=v` pairs in key order; empty renders as `NONE`
    pub fn with_map<V: Display>(self, key: impl Into<String>, map: &BTreeMap<String, V>) -> Self {
        let value = join_key_value_map(map, ",");
        self.with(key, value)
    }

    /// `k=v` pairs with six decimals, the way the tool prints scaling factors
    pub fn with_float_map(self, key: impl Into<String>, map: &BTreeMap<String, f64>) -> Self {
        let value = join_float_map(map, ",");
        self.with(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values of a repeated key, in order
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// # Errors
    ///
    /// Returns `MissingField` if the key is absent.
    pub fn string(&self, key: &str) -> Result<String> {
        self.get(key)
            .map(str::to_string)
            .ok_or_else(|| GridConfError::MissingField {
                field: key.to_string(),
            })
    }

    /// Value of an optional attribute, empty if absent
    pub fn string_or_empty(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// # Errors
    ///
    /// Returns `MissingField` or `NotANumber`.
    pub fn int(&self, key: &str) -> Result<i64> {
        let raw = self.string(key)?;
        parse_int(key, &raw)
    }

    /// Integer attribute that defaults to 0 when absent
    ///
    /// # Errors
    ///
    /// Returns `NotANumber` for a present but non-numeric value.
    pub fn int_or_zero(&self, key: &str) -> Result<i64> {
        match self.get(key) {
            Some(raw) => parse_int(key, raw),
            None => Ok(0),
        }
    }

    /// Accepts `TRUE`/`FALSE` in any case and `1`/`0`; absent is `false`
    ///
    /// # Errors
    ///
    /// Returns `NotABool` for anything else.
    pub fn bool(&self, key: &str) -> Result<bool> {
        let Some(raw) = self.get(key) else {
            return Ok(false);
        };
        match raw.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            v if v.eq_ignore_ascii_case("true") => Ok(true),
            v if v.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(GridConfError::NotABool {
                field: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// # Errors
    ///
    /// Returns `MissingField` or `NotANumber`.
    pub fn float(&self, key: &str) -> Result<f64> {
        let raw = self.string(key)?;
        parse_float(key, &raw)
    }

    /// Whitespace-separated list; absent or `NONE` is empty
    pub fn space_list(&self, key: &str) -> Vec<String> {
        split_plain(self.get(key), |c| c.is_whitespace())
    }

    /// Comma-separated list; absent or `NONE` is empty
    pub fn comma_list(&self, key: &str) -> Vec<String> {
        split_plain(self.get(key), |c| c == ',')
    }

    /// List split on both spaces and commas
    pub fn space_or_comma_list(&self, key: &str) -> Vec<String> {
        split_plain(self.get(key), |c| c == ',' || c.is_whitespace())
    }

    /// Override-capable list; absent is empty
    ///
    /// # Errors
    ///
    /// Returns `UnbalancedBrackets` for malformed text.
    pub fn override_list(&self, key: &str, format: ListFormat) -> Result<Vec<String>> {
        match self.get(key) {
            Some(raw) => override_list::decode(raw, format),
            None => Ok(Vec::new()),
        }
    }

    /// `k=v,k=v` map; absent or `NONE` is empty
    ///
    /// # Errors
    ///
    /// Returns `MalformedPair` for an element without `=`.
    pub fn key_value_map(&self, key: &str) -> Result<BTreeMap<String, String>> {
        parse_key_value_map(key, self.get(key).unwrap_or(NONE))
    }

    /// `k=v` map with numeric values
    ///
    /// # Errors
    ///
    /// Returns `MalformedPair` or `NotANumber`.
    pub fn float_map(&self, key: &str) -> Result<BTreeMap<String, f64>> {
        parse_float_map(key, self.get(key).unwrap_or(NONE))
    }

    /// Render in the tool's input format, one attribute per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            let width = KEY_WIDTH.max(key.len());
            out.push_str(&format!("{:<width$} {}\n", key, value, width = width));
        }
        out
    }
}

fn split_plain(raw: Option<&str>, is_sep: impl Fn(char) -> bool) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let items: Vec<String> = raw
        .split(is_sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.len() == 1 && items[0].eq_ignore_ascii_case(NONE) {
        return Vec::new();
    }
    items
}

pub(crate) fn parse_int(field: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| GridConfError::NotANumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

fn parse_float(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| GridConfError::NotANumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

/// Parse `k=v` pairs separated by commas or whitespace
///
/// # Errors
///
/// Returns `MalformedPair` for an element without `=`.
pub fn parse_key_value_map(field: &str, raw: &str) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for item in split_plain(Some(raw), |c| c == ',' || c.is_whitespace()) {
        let (k, v) = item
            .split_once('=')
            .ok_or_else(|| GridConfError::MalformedPair {
                field: field.to_string(),
                value: item.clone(),
            })?;
        map.insert(k.to_string(), v.to_string());
    }
    Ok(map)
}

/// [`parse_key_value_map`] with numeric values
///
/// # Errors
///
/// Returns `MalformedPair` or `NotANumber`.
pub fn parse_float_map(field: &str, raw: &str) -> Result<BTreeMap<String, f64>> {
    parse_key_value_map(field, raw)?
        .into_iter()
        .map(|(k, v)| parse_float(field, &v).map(|f| (k, f)))
        .collect()
}

/// Join a map as `k=v` pairs in key order; empty renders as `NONE`
pub fn join_key_value_map<V: Display>(map: &BTreeMap<String, V>, separator: &str) -> String {
    if map.is_empty() {
        return NONE.to_string();
    }
    map.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Join a float map with six decimals per value
pub fn join_float_map(map: &BTreeMap<String, f64>, separator: &str) -> String {
    if map.is_empty() {
        return NONE.to_string();
    }
    map.iter()
        .map(|(k, v)| format!("{}={:.6}", k, v))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PE_TEXT: &str = "\
pe_name            mpi
slots              64
user_lists         staff \\
                   students
xuser_lists        NONE
# generated
job_is_first_task  FALSE
";

    #[test]
    fn test_parse_folds_and_skips_comments() {
        let rec = Record::parse(PE_TEXT).unwrap();
        assert_eq!(rec.len(), 5);
        assert_eq!(rec.get("pe_name"), Some("mpi"));
        assert_eq!(rec.space_list("user_lists"), vec!["staff", "students"]);
        assert!(rec.space_list("xuser_lists").is_empty());
        assert_eq!(rec.int("slots").unwrap(), 64);
        assert!(!rec.bool("job_is_first_task").unwrap());
    }

    #[test]
    fn test_parse_keeps_every_indented_line_of_a_wrapped_value() {
        let rec = Record::parse("qname all.q\nhostlist n1 \\\n         n2\n         n3\nslots 1\n")
            .unwrap();
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.space_list("hostlist"), vec!["n1", "n2", "n3"]);
        assert_eq!(rec.get("slots"), Some("1"));
    }

    #[test]
    fn test_typed_accessor_errors() {
        let rec = Record::new().with("slots", "many").with("enabled", "maybe");
        assert_eq!(
            rec.int("slots").unwrap_err(),
            GridConfError::NotANumber {
                field: "slots".into(),
                value: "many".into()
            }
        );
        assert!(matches!(
            rec.bool("enabled"),
            Err(GridConfError::NotABool { .. })
        ));
        assert!(matches!(
            rec.string("pe_name"),
            Err(GridConfError::MissingField { .. })
        ));
    }

    #[test]
    fn test_key_value_maps() {
        let map = parse_key_value_map("complex_values", "mem=4G,gpu=2").unwrap();
        assert_eq!(map.get("gpu").map(String::as_str), Some("2"));
        assert_eq!(join_key_value_map(&map, ","), "gpu=2,mem=4G");
        assert!(parse_key_value_map("complex_values", "NONE")
            .unwrap()
            .is_empty());
        assert!(matches!(
            parse_key_value_map("complex_values", "mem=4G,gpu"),
            Err(GridConfError::MalformedPair { .. })
        ));

        let floats = parse_float_map("load_scaling", "np_load_avg=1.5").unwrap();
        assert_eq!(join_float_map(&floats, ","), "np_load_avg=1.500000");
    }

    #[test]
    fn test_render_pads_keys() {
        let rec = Record::new()
            .with("pe_name", "mpi")
            .with_list("user_lists", &[], " ")
            .with_bool("job_is_first_task", true);
        let text = rec.render();
        assert_eq!(
            text,
            "pe_name            mpi\nuser_lists         NONE\njob_is_first_task  TRUE\n"
        );
        assert_eq!(Record::parse(&text).unwrap(), rec);
    }

    #[test]
    fn test_repeated_keys() {
        let rec = Record::parse("limit users {*} to slots=4\nlimit projects {p1} to slots=8\n").unwrap();
        assert_eq!(rec.get_all("limit").len(), 2);
        assert_eq!(rec.get("limit"), Some("users {*} to slots=4"));
    }
}
