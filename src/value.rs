//! Leaf kinds and boxed runtime values.
//!
//! Every addressable leaf field has exactly one [`Kind`]. A [`Value`] carries
//! a leaf's content together with its kind, and typed writes only succeed
//! when the two kinds are identical: an `i64` value never lands in an `i32`
//! field, even if it would fit.

use std::fmt;

use chrono::TimeDelta;

/// The closed set of leaf kinds the engine can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Strings,
    Duration,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::String => "string",
            Kind::Strings => "[string]",
            Kind::Duration => "duration",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A leaf value with its native kind preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Strings(Vec<String>),
    Duration(TimeDelta),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::I8(_) => Kind::I8,
            Value::I16(_) => Kind::I16,
            Value::I32(_) => Kind::I32,
            Value::I64(_) => Kind::I64,
            Value::U8(_) => Kind::U8,
            Value::U16(_) => Kind::U16,
            Value::U32(_) => Kind::U32,
            Value::U64(_) => Kind::U64,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::String(_) => Kind::String,
            Value::Strings(_) => Kind::Strings,
            Value::Duration(_) => Kind::Duration,
        }
    }

    /// Unbox into the native type `T`. Gives the value back on a kind mismatch.
    pub fn into_inner<T: Leaf>(self) -> Result<T, Value> {
        T::from_value(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::coerce::render_text(self))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

/// A native Rust type that can be stored in a leaf field.
pub trait Leaf: Sized + 'static {
    const KIND: Kind;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, Value>;
}

macro_rules! leaf_types {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Leaf for $ty {
            const KIND: Kind = Kind::$variant;

            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }

            fn from_value(value: Value) -> Result<Self, Value> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(other),
                }
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }

        impl TryFrom<Value> for $ty {
            type Error = Value;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                <$ty as Leaf>::from_value(value)
            }
        }
    )*};
}

leaf_types! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    Vec<String> => Strings,
    TimeDelta => Duration,
}

/// Object-safe view of a single leaf field.
pub trait Slot {
    fn kind(&self) -> Kind;

    fn get(&self) -> Value;

    /// Overwrite the field. A value of another kind is handed back untouched
    /// and the field keeps its previous content.
    fn put(&mut self, value: Value) -> Result<(), Value>;
}

impl<T: Leaf> Slot for T {
    fn kind(&self) -> Kind {
        T::KIND
    }

    fn get(&self) -> Value {
        self.to_value()
    }

    fn put(&mut self, value: Value) -> Result<(), Value> {
        *self = T::from_value(value)?;
        Ok(())
    }
}
