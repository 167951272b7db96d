//! Typed and textual access to leaf fields.
//!
//! Typed writes require the value's kind to match the field's kind exactly.
//! Textual writes parse the text according to the field's kind first, so
//! `"300"` is accepted by a `u16` field and rejected by a `u8` one. Nothing is
//! written unless the whole operation succeeds.

use std::fmt::Display;
use std::str::FromStr;

use tracing::debug;

use crate::duration;
use crate::error::DotfigError;
use crate::path::KeyPath;
use crate::record::{FieldMut, FieldRef, Record};
use crate::resolve::{resolve, resolve_mut};
use crate::value::{Kind, Leaf, Slot, Value};

/// Read the value at `path`.
pub fn get(record: &dyn Record, path: &KeyPath) -> Result<Value, DotfigError> {
    match resolve(record, path)? {
        FieldRef::Leaf(slot) => Ok(slot.get()),
        _ => Err(DotfigError::NotALeaf(path.to_string())),
    }
}

/// Read the value at `path` as the native type `T`.
pub fn get_as<T: Leaf>(record: &dyn Record, path: &KeyPath) -> Result<T, DotfigError> {
    get(record, path)?
        .into_inner::<T>()
        .map_err(|found| DotfigError::KindMismatch {
            key: path.to_string(),
            expected: T::KIND,
            found: found.kind(),
        })
}

/// Write `value` to the field at `path`.
///
/// Fails with [`DotfigError::KindMismatch`] unless the value has exactly the
/// field's kind; there is no widening between integer sizes. A duration that
/// does not fit in signed 64-bit nanoseconds is an invalid value.
pub fn set(
    record: &mut dyn Record,
    path: &KeyPath,
    value: impl Into<Value>,
) -> Result<(), DotfigError> {
    let slot = leaf_mut(record, path)?;
    let value = value.into();
    let expected = slot.kind();
    if value.kind() != expected {
        return Err(DotfigError::KindMismatch {
            key: path.to_string(),
            expected,
            found: value.kind(),
        });
    }
    if let Value::Duration(delta) = &value
        && !duration::in_range(*delta)
    {
        return Err(DotfigError::InvalidValue {
            key: path.to_string(),
            reason: "duration does not fit in signed 64-bit nanoseconds".into(),
        });
    }
    slot.put(value).map_err(|rejected| DotfigError::KindMismatch {
        key: path.to_string(),
        expected,
        found: rejected.kind(),
    })
}

/// Parse `text` according to the field's kind and write it.
pub fn set_from_str(record: &mut dyn Record, path: &KeyPath, text: &str) -> Result<(), DotfigError> {
    let slot = leaf_mut(record, path)?;
    let kind = slot.kind();
    let value = parse_text(kind, text).map_err(|reason| DotfigError::InvalidValue {
        key: path.to_string(),
        reason,
    })?;
    slot.put(value).map_err(|rejected| DotfigError::KindMismatch {
        key: path.to_string(),
        expected: kind,
        found: rejected.kind(),
    })
}

/// Render the value at `path` as text that [`set_from_str`] accepts.
pub fn render(record: &dyn Record, path: &KeyPath) -> Result<String, DotfigError> {
    get(record, path).map(|value| render_text(&value))
}

/// Apply a `path=value` assignment.
///
/// The path is trimmed, the value is taken verbatim. With `strict` off an
/// unknown path is logged and skipped.
pub fn assign(record: &mut dyn Record, expr: &str, strict: bool) -> Result<(), DotfigError> {
    let (key, text) = expr
        .split_once('=')
        .ok_or_else(|| DotfigError::InvalidAssignment(expr.into()))?;
    let path = KeyPath::parse(key.trim())?;
    match set_from_str(record, &path, text) {
        Err(err) if !strict && err.is_unknown_key() => {
            debug!(key = %path, "ignoring assignment to unknown key");
            Ok(())
        }
        result => result,
    }
}

fn leaf_mut<'a>(record: &'a mut dyn Record, path: &KeyPath) -> Result<&'a mut dyn Slot, DotfigError> {
    match resolve_mut(record, path)? {
        FieldMut::Leaf(slot) => Ok(slot),
        _ => Err(DotfigError::NotALeaf(path.to_string())),
    }
}

/// Parse the text form of a `kind` value.
pub fn parse_text(kind: Kind, text: &str) -> Result<Value, String> {
    match kind {
        Kind::Bool => match text {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(format!("'{text}' is not a bool (expected true or false)")),
        },
        Kind::I8 => number(kind, text).map(Value::I8),
        Kind::I16 => number(kind, text).map(Value::I16),
        Kind::I32 => number(kind, text).map(Value::I32),
        Kind::I64 => number(kind, text).map(Value::I64),
        Kind::U8 => number(kind, text).map(Value::U8),
        Kind::U16 => number(kind, text).map(Value::U16),
        Kind::U32 => number(kind, text).map(Value::U32),
        Kind::U64 => number(kind, text).map(Value::U64),
        Kind::F32 => float(kind, text).map(Value::F32),
        Kind::F64 => float(kind, text).map(Value::F64),
        Kind::String => Ok(Value::String(text.to_string())),
        Kind::Strings => parse_strings(text).map(Value::Strings),
        Kind::Duration => duration::parse(text).map(Value::Duration),
    }
}

fn number<T>(kind: Kind, text: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    text.parse::<T>()
        .map_err(|e| format!("'{text}' is not a valid {kind}: {e}"))
}

/// Like [`number`], but infinities and NaN are rejected, whether spelled out
/// or produced by overflowing the target width.
fn float<T>(kind: Kind, text: &str) -> Result<T, String>
where
    T: FromStr + Copy + Into<f64>,
    T::Err: Display,
{
    let value: T = number(kind, text)?;
    let wide: f64 = value.into();
    if wide.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{text}' is out of range for {kind}"))
    }
}

/// Parse `["a", "b"]` into its strings.
fn parse_strings(text: &str) -> Result<Vec<String>, String> {
    let parsed: toml_edit::Value = text
        .parse()
        .map_err(|e| format!("'{text}' is not a list of strings: {e}"))?;
    let array = parsed
        .as_array()
        .ok_or_else(|| format!("'{text}' is not a list of strings"))?;
    array
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("'{text}' contains a non-string item"))
        })
        .collect()
}

/// The text form of `value`, accepted back by [`parse_text`].
pub fn render_text(value: &Value) -> String {
    match value {
        Value::Bool(v) => v.to_string(),
        Value::I8(v) => v.to_string(),
        Value::I16(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::U8(v) => v.to_string(),
        Value::U16(v) => v.to_string(),
        Value::U32(v) => v.to_string(),
        Value::U64(v) => v.to_string(),
        Value::F32(v) => format!("{v:?}"),
        Value::F64(v) => format!("{v:?}"),
        Value::String(v) => quote(v),
        Value::Strings(items) => {
            let items: Vec<String> = items.iter().map(|s| quote(s)).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Duration(v) => duration::format(*v),
    }
}

fn quote(text: &str) -> String {
    toml_edit::Value::from(text).to_string().trim().to_string()
}
