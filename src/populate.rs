//! Apply a generic TOML table to a record tree.
//!
//! Every terminal value becomes a dotted path plus text and goes through
//! [`set_from_str`], so the same parsing rules apply as for command-line
//! assignments. Fields the table does not mention keep their values.

use toml::{Table, Value};
use tracing::debug;

use crate::coerce::set_from_str;
use crate::error::DotfigError;
use crate::path::KeyPath;
use crate::record::Record;

/// Write every value in `table` into `record`.
///
/// With `strict` off, keys that name no field are logged and skipped. Any
/// other failure stops the walk; values written before it stay written.
pub fn populate(record: &mut dyn Record, table: &Table, strict: bool) -> Result<(), DotfigError> {
    walk(record, table, &mut Vec::new(), strict)
}

fn walk(
    record: &mut dyn Record,
    table: &Table,
    prefix: &mut Vec<String>,
    strict: bool,
) -> Result<(), DotfigError> {
    for (key, value) in table {
        prefix.push(key.clone());
        let result = match value {
            Value::Table(inner) => walk(record, inner, prefix, strict),
            terminal => {
                let path = KeyPath::from_segments(prefix.clone());
                assign_terminal(record, path, terminal, strict)
            }
        };
        prefix.pop();
        result?;
    }
    Ok(())
}

fn assign_terminal(
    record: &mut dyn Record,
    path: KeyPath,
    value: &Value,
    strict: bool,
) -> Result<(), DotfigError> {
    let text = terminal_text(&path, value)?;
    match set_from_str(record, &path, &text) {
        Err(err) if !strict && err.is_unknown_key() => {
            debug!(key = %path, "skipping unknown key");
            Ok(())
        }
        result => result,
    }
}

/// The text [`set_from_str`] expects for a TOML value.
fn terminal_text(path: &KeyPath, value: &Value) -> Result<String, DotfigError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Array(_) => Ok(value.to_string()),
        Value::Datetime(_) => Err(DotfigError::UnsupportedValue {
            key: path.to_string(),
            reason: "dates and times are not supported".into(),
        }),
        Value::Table(_) => Err(DotfigError::NotALeaf(path.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{
        ExtA, ExtB, TEST_CONFIG_TOML, TestConfig, assert_test_config_values, new_test_config,
    };

    fn table(text: &str) -> Table {
        text.parse().unwrap()
    }

    #[test]
    fn full_document() {
        let mut config = new_test_config();
        populate(&mut config, &table(TEST_CONFIG_TOML), true).unwrap();
        assert_test_config_values(&config);
    }

    #[test]
    fn absent_keys_keep_defaults() {
        let mut config = new_test_config();
        populate(&mut config, &table("[foo]\nkey4 = 5\n"), true).unwrap();
        assert_eq!(config.foo.key4, 5);
        assert_eq!(config.bar, 67890);
    }

    #[test]
    fn map_entries_are_populated() {
        let mut config = new_test_config();
        populate(
            &mut config,
            &table("[ext.a]\naverage = 123\n\n[ext.b]\nbeverage = 456\n"),
            true,
        )
        .unwrap();
        assert_eq!(config.ext.downcast_ref::<ExtA>("a").unwrap().average, 123);
        assert_eq!(config.ext.downcast_ref::<ExtB>("b").unwrap().beverage, 456);
    }

    #[test]
    fn strict_rejects_unknown_key() {
        let mut config = new_test_config();
        let err = populate(&mut config, &table("typo = 1\n"), true).unwrap_err();
        assert!(matches!(err, DotfigError::UnknownKey(ref key) if key == "typo"));
    }

    #[test]
    fn lenient_skips_unknown_keys() {
        let mut config = new_test_config();
        populate(
            &mut config,
            &table("typo = 1\nbar = 5\n\n[ext.c]\naverage = 1\n"),
            false,
        )
        .unwrap();
        assert_eq!(config.bar, 5);
    }

    #[test]
    fn lenient_still_fails_on_bad_values() {
        let mut config = new_test_config();
        let err = populate(&mut config, &table("[foo]\nkey6 = 256\n"), false).unwrap_err();
        assert!(matches!(err, DotfigError::InvalidValue { .. }));
        assert_eq!(config.foo.key6, 0);
    }

    #[test]
    fn earlier_writes_survive_a_failure() {
        let mut config = new_test_config();
        let result = populate(&mut config, &table("bar = 1\n\n[foo]\nkey1 = 2\n"), true);
        assert!(result.is_err());
        assert_eq!(config.bar, 1);
    }

    #[test]
    fn section_through_unset_inline_fails() {
        let mut config = TestConfig::default();
        let err = populate(&mut config, &table("[baz.embed2]\nembedded = true\n"), false)
            .unwrap_err();
        assert!(matches!(err, DotfigError::NilEmbedded(_)));
    }

    #[test]
    fn datetimes_are_unsupported() {
        let mut config = new_test_config();
        let err = populate(&mut config, &table("[foo]\nkey12 = 1979-05-27\n"), true).unwrap_err();
        assert!(matches!(err, DotfigError::UnsupportedValue { .. }));
    }

    #[test]
    fn integer_into_string_field_is_taken_as_text() {
        let mut config = new_test_config();
        populate(&mut config, &table("[baz.quux]\nkey_a = 42\n"), true).unwrap();
        assert_eq!(config.baz.quux.key_a, "42");
    }
}
