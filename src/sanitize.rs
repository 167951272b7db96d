//! Convert a record tree into a generic TOML table.
//!
//! Field names are the lower-cased descriptor names and keep declaration
//! order. Inline records merge into their parent's table, sections without
//! any value are left out, and unset optional records are omitted entirely.
//! Durations become strings in their compound text form.

use toml::{Table, Value};

use crate::duration;
use crate::error::DotfigError;
use crate::record::{FieldRef, Record};
use crate::value::Value as LeafValue;

/// Build the generic table for `record`.
pub fn sanitize(record: &dyn Record) -> Result<Table, DotfigError> {
    let mut table = Table::new();
    fill(record, &mut table, &mut Vec::new())?;
    Ok(table)
}

fn fill(record: &dyn Record, table: &mut Table, path: &mut Vec<String>) -> Result<(), DotfigError> {
    for (index, info) in record.descriptor().fields().iter().enumerate() {
        let Some(field) = record.field(index) else {
            continue;
        };
        match field {
            FieldRef::Leaf(slot) => {
                path.push(info.name().to_string());
                let converted = leaf_to_toml(slot.get(), path);
                path.pop();
                table.insert(info.name().to_string(), converted?);
            }
            FieldRef::Record(inner) | FieldRef::Optional(Some(inner)) => {
                if info.is_inline() {
                    fill(inner, table, path)?;
                } else {
                    section(inner, info.name(), table, path)?;
                }
            }
            FieldRef::Optional(None) => {}
            FieldRef::Map(map) => {
                path.push(info.name().to_string());
                let mut entries = Table::new();
                let result = map
                    .entries()
                    .try_for_each(|(key, entry)| section(&**entry, key, &mut entries, path));
                path.pop();
                result?;
                if !entries.is_empty() {
                    table.insert(info.name().to_string(), Value::Table(entries));
                }
            }
        }
    }
    Ok(())
}

/// Add `record` under `name` unless it has nothing to show.
fn section(
    record: &dyn Record,
    name: &str,
    parent: &mut Table,
    path: &mut Vec<String>,
) -> Result<(), DotfigError> {
    path.push(name.to_string());
    let mut table = Table::new();
    let result = fill(record, &mut table, path);
    path.pop();
    result?;
    if !table.is_empty() {
        parent.insert(name.to_string(), Value::Table(table));
    }
    Ok(())
}

pub(crate) fn leaf_to_toml(value: LeafValue, path: &[String]) -> Result<Value, DotfigError> {
    Ok(match value {
        LeafValue::Bool(v) => Value::Boolean(v),
        LeafValue::I8(v) => Value::Integer(v.into()),
        LeafValue::I16(v) => Value::Integer(v.into()),
        LeafValue::I32(v) => Value::Integer(v.into()),
        LeafValue::I64(v) => Value::Integer(v),
        LeafValue::U8(v) => Value::Integer(v.into()),
        LeafValue::U16(v) => Value::Integer(v.into()),
        LeafValue::U32(v) => Value::Integer(v.into()),
        LeafValue::U64(v) => {
            Value::Integer(i64::try_from(v).map_err(|_| DotfigError::UnsupportedValue {
                key: path.join("."),
                reason: format!("{v} does not fit in a TOML integer"),
            })?)
        }
        // Widen through the shortest decimal form so 0.1f32 stays 0.1.
        LeafValue::F32(v) => Value::Float(
            v.to_string()
                .parse::<f64>()
                .unwrap_or_else(|_| f64::from(v)),
        ),
        LeafValue::F64(v) => Value::Float(v),
        LeafValue::String(v) => Value::String(v),
        LeafValue::Strings(items) => Value::Array(items.into_iter().map(Value::String).collect()),
        LeafValue::Duration(v) => Value::String(duration::format(v)),
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::fixtures::test::{ExtA, Tls, new_test_config};

    fn sub<'a>(table: &'a Table, key: &str) -> &'a Table {
        table[key].as_table().unwrap()
    }

    #[test]
    fn top_level_keys_in_declaration_order() {
        let config = new_test_config();
        let table = sanitize(&config).unwrap();
        let keys: Vec<&str> = table.keys().map(String::as_str).collect();
        // dummy has no fields and tls is unset
        assert_eq!(keys, ["foo", "bar", "baz", "ext"]);
    }

    #[test]
    fn inline_records_merge_into_parent() {
        let mut config = new_test_config();
        config.baz.embed.embedded = true;
        let table = sanitize(&config).unwrap();
        let baz = sub(&table, "baz");
        assert_eq!(baz["embedded"], Value::Boolean(true));
        assert!(!baz.contains_key("embed"));
        assert_eq!(sub(baz, "embed1")["embedded"], Value::Boolean(false));
        assert_eq!(sub(baz, "embed2")["embedded"], Value::Boolean(false));
    }

    #[test]
    fn unset_inline_optional_leaves_empty_section_out() {
        let mut config = new_test_config();
        config.baz.embed2.base = None;
        let table = sanitize(&config).unwrap();
        assert!(!sub(&table, "baz").contains_key("embed2"));
    }

    #[test]
    fn durations_become_strings() {
        let mut config = new_test_config();
        config.baz.interval = TimeDelta::hours(1);
        let table = sanitize(&config).unwrap();
        assert_eq!(sub(&table, "baz")["interval"], Value::String("1h0m0s".into()));
    }

    #[test]
    fn string_lists_become_arrays() {
        let mut config = new_test_config();
        config.foo.key13 = vec!["a".into(), "b".into()];
        let table = sanitize(&config).unwrap();
        assert_eq!(
            sub(&table, "foo")["key13"],
            Value::Array(vec![Value::String("a".into()), Value::String("b".into())])
        );
    }

    #[test]
    fn f32_keeps_its_short_form() {
        let mut config = new_test_config();
        config.foo.key10 = 0.1;
        let table = sanitize(&config).unwrap();
        assert_eq!(sub(&table, "foo")["key10"], Value::Float(0.1));
    }

    #[test]
    fn map_entries_use_their_keys() {
        let mut config = new_test_config();
        config.ext.downcast_mut::<ExtA>("a").unwrap().average = 123;
        let table = sanitize(&config).unwrap();
        let ext = sub(&table, "ext");
        assert_eq!(sub(ext, "a")["average"], Value::Integer(123));
        assert_eq!(sub(ext, "b")["beverage"], Value::Integer(0));
    }

    #[test]
    fn allocated_optional_is_included() {
        let mut config = new_test_config();
        config.tls = Some(Box::new(Tls {
            cert: "server.pem".into(),
            verify: true,
        }));
        let table = sanitize(&config).unwrap();
        assert_eq!(sub(&table, "tls")["cert"], Value::String("server.pem".into()));
    }

    #[test]
    fn huge_u64_is_unsupported() {
        let mut config = new_test_config();
        config.foo.key9 = u64::MAX;
        let err = sanitize(&config).unwrap_err();
        assert!(matches!(err, DotfigError::UnsupportedValue { ref key, .. } if key == "foo.key9"));
    }
}
