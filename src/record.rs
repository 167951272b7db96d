//! Record descriptors: the table that makes a plain struct addressable.
//!
//! A record type implements [`Record`], usually through the [`record!`]
//! macro. The implementation provides a [`Descriptor`] (field names and
//! shapes, built once per type and cached) plus positional accessors that
//! hand out [`FieldRef`]/[`FieldMut`] views. Everything else in the crate
//! works against `dyn Record` and never needs per-type code.
//!
//! ```ignore
//! #[derive(Default)]
//! struct Audio {
//!     enabled: bool,
//!     samplerate: u32,
//! }
//!
//! #[derive(Default)]
//! struct AppConfig {
//!     comment: String,
//!     audio: Audio,
//!     scratch: Vec<u8>, // not listed: invisible to dotfig
//! }
//!
//! dotfig::record!(Audio { enabled, samplerate });
//! dotfig::record!(AppConfig { comment, audio: nested });
//! ```
//!
//! # Field classes
//!
//! | Class             | Field type            | Path segments                   |
//! |-------------------|-----------------------|---------------------------------|
//! | `leaf` (default)  | any [`Leaf`] type     | its own name                    |
//! | `nested`          | `T: Record`           | its name, then `T`'s fields     |
//! | `inline`          | `T: Record`           | `T`'s fields, no extra segment  |
//! | `optional`        | `Option<Box<T>>`      | like `nested` when allocated    |
//! | `inline_optional` | `Option<Box<T>>`      | like `inline` when allocated    |
//! | `map`             | [`RecordMap`]         | its name, the key, then fields  |
//!
//! Fields that are not listed cannot be addressed, enumerated or written.

use std::any::Any;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use crate::value::{Kind, Leaf, Slot};

/// A struct whose fields can be reached through dotted paths.
pub trait Record: Any {
    /// The cached descriptor of this type.
    fn schema() -> &'static Descriptor
    where
        Self: Sized;

    /// The descriptor of the concrete type behind `self`.
    fn descriptor(&self) -> &'static Descriptor;

    /// Shared view of the field at `index` in descriptor order.
    fn field(&self, index: usize) -> Option<FieldRef<'_>>;

    /// Mutable view of the field at `index` in descriptor order.
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<'a> dyn Record + 'a {
    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Record>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Ordered field table of one record type.
#[derive(Debug)]
pub struct Descriptor {
    type_name: &'static str,
    fields: Vec<FieldInfo>,
}

impl Descriptor {
    pub fn new(type_name: &'static str, fields: Vec<FieldInfo>) -> Self {
        Self { type_name, fields }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Find the field a single path segment refers to.
    ///
    /// Returns the chain of field indices to follow: zero or more inline
    /// records, then the named field itself. Fields declared directly on
    /// this record shadow fields promoted from inline records; inline
    /// records are searched in declaration order.
    pub fn locate(&self, segment: &str) -> Option<Vec<usize>> {
        if let Some(index) = self
            .fields
            .iter()
            .position(|f| !f.is_inline() && f.name == segment)
        {
            return Some(vec![index]);
        }
        for (index, field) in self.fields.iter().enumerate() {
            if let Some(inner) = field.inline_schema()
                && let Some(mut chain) = inner.locate(segment)
            {
                chain.insert(0, index);
                return Some(chain);
            }
        }
        None
    }
}

/// Name and shape of one addressable field.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    name: String,
    shape: FieldShape,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldShape {
    Leaf(Kind),
    Record {
        inline: bool,
        schema: fn() -> &'static Descriptor,
    },
    Optional {
        inline: bool,
        schema: fn() -> &'static Descriptor,
    },
    Map,
}

impl FieldInfo {
    fn new(name: &str, shape: FieldShape) -> Self {
        Self {
            name: name.to_lowercase(),
            shape,
        }
    }

    /// A leaf field. The closure only pins down the field's type.
    pub fn leaf<R, T, F>(name: &str, _witness: F) -> Self
    where
        T: Leaf,
        F: Fn(&R) -> &T,
    {
        Self::new(name, FieldShape::Leaf(T::KIND))
    }

    /// A sub-record held by value.
    pub fn record<R, T, F>(name: &str, inline: bool, _witness: F) -> Self
    where
        T: Record,
        F: Fn(&R) -> &T,
    {
        Self::new(
            name,
            FieldShape::Record {
                inline,
                schema: T::schema,
            },
        )
    }

    /// A sub-record held by `Option<Box<T>>`.
    pub fn optional<R, T, F>(name: &str, inline: bool, _witness: F) -> Self
    where
        T: Record,
        F: Fn(&R) -> &Option<Box<T>>,
    {
        Self::new(
            name,
            FieldShape::Optional {
                inline,
                schema: T::schema,
            },
        )
    }

    pub fn map(name: &str) -> Self {
        Self::new(name, FieldShape::Map)
    }

    /// Lower-cased field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    pub fn kind(&self) -> Option<Kind> {
        match self.shape {
            FieldShape::Leaf(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(
            self.shape,
            FieldShape::Record { inline: true, .. } | FieldShape::Optional { inline: true, .. }
        )
    }

    fn inline_schema(&self) -> Option<&'static Descriptor> {
        match self.shape {
            FieldShape::Record {
                inline: true,
                schema,
            }
            | FieldShape::Optional {
                inline: true,
                schema,
            } => Some(schema()),
            _ => None,
        }
    }
}

/// Shared view of one field.
pub enum FieldRef<'a> {
    Leaf(&'a dyn Slot),
    Record(&'a dyn Record),
    Optional(Option<&'a dyn Record>),
    Map(&'a RecordMap),
}

/// Mutable view of one field.
pub enum FieldMut<'a> {
    Leaf(&'a mut dyn Slot),
    Record(&'a mut dyn Record),
    Optional(Option<&'a mut dyn Record>),
    Map(&'a mut RecordMap),
}

fn type_name(record: &dyn Record) -> &'static str {
    record.descriptor().type_name()
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Leaf(slot) => f.debug_tuple("Leaf").field(&slot.get()).finish(),
            FieldRef::Record(record) => f.debug_tuple("Record").field(&type_name(*record)).finish(),
            FieldRef::Optional(record) => f
                .debug_tuple("Optional")
                .field(&record.map(type_name))
                .finish(),
            FieldRef::Map(map) => f.debug_tuple("Map").field(map).finish(),
        }
    }
}

impl fmt::Debug for FieldMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldMut::Leaf(slot) => f.debug_tuple("Leaf").field(&slot.get()).finish(),
            FieldMut::Record(record) => f.debug_tuple("Record").field(&type_name(&**record)).finish(),
            FieldMut::Optional(record) => f
                .debug_tuple("Optional")
                .field(&record.as_deref().map(type_name))
                .finish(),
            FieldMut::Map(map) => f.debug_tuple("Map").field(map).finish(),
        }
    }
}

/// String-keyed subtree whose entries may each be a different record type.
///
/// Entries are registered by the caller; the engine only looks them up and
/// descends into them. Iteration is sorted by key.
#[derive(Default)]
pub struct RecordMap {
    entries: BTreeMap<String, Box<dyn Record>>,
}

impl RecordMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<R: Record>(
        &mut self,
        key: impl Into<String>,
        record: R,
    ) -> Option<Box<dyn Record>> {
        self.insert_boxed(key, Box::new(record))
    }

    pub fn insert_boxed(
        &mut self,
        key: impl Into<String>,
        record: Box<dyn Record>,
    ) -> Option<Box<dyn Record>> {
        self.entries.insert(key.into(), record)
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Record>> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&dyn Record> {
        match self.entries.get(key) {
            Some(record) => Some(&**record),
            None => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut dyn Record> {
        match self.entries.get_mut(key) {
            Some(record) => Some(&mut **record),
            None => None,
        }
    }

    pub fn downcast_ref<R: Record>(&self, key: &str) -> Option<&R> {
        self.get(key)?.downcast_ref::<R>()
    }

    pub fn downcast_mut<R: Record>(&mut self, key: &str) -> Option<&mut R> {
        self.get_mut(key)?.downcast_mut::<R>()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub(crate) fn entries(&self) -> btree_map::Iter<'_, String, Box<dyn Record>> {
        self.entries.iter()
    }
}

impl fmt::Debug for RecordMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(key, record)| (key, record.descriptor().type_name())),
            )
            .finish()
    }
}

/// Implement [`Record`] for a struct by listing its addressable fields.
///
/// Each entry is `field` (a leaf) or `field: class`, where class is one of
/// `leaf`, `nested`, `inline`, `optional`, `inline_optional` or `map`. See
/// the [module docs](mod@crate::record) for what each class means.
#[macro_export]
macro_rules! record {
    ($owner:ident { $($name:ident $(: $class:ident)?),* $(,)? }) => {
        impl $crate::Record for $owner {
            fn schema() -> &'static $crate::Descriptor {
                static SCHEMA: ::std::sync::OnceLock<$crate::Descriptor> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::Descriptor::new(
                        stringify!($owner),
                        ::std::vec![$($crate::__record_info!($owner, $name $(, $class)?)),*],
                    )
                })
            }

            fn descriptor(&self) -> &'static $crate::Descriptor {
                <Self as $crate::Record>::schema()
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn field(&self, index: usize) -> ::std::option::Option<$crate::FieldRef<'_>> {
                let mut position = 0usize;
                $(
                    if position == index {
                        return ::std::option::Option::Some(
                            $crate::__record_ref!(self.$name $(, $class)?),
                        );
                    }
                    position += 1;
                )*
                ::std::option::Option::None
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::std::option::Option<$crate::FieldMut<'_>> {
                let mut position = 0usize;
                $(
                    if position == index {
                        return ::std::option::Option::Some(
                            $crate::__record_mut!(self.$name $(, $class)?),
                        );
                    }
                    position += 1;
                )*
                ::std::option::Option::None
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_info {
    ($owner:ident, $name:ident) => {
        $crate::FieldInfo::leaf(stringify!($name), |r: &$owner| &r.$name)
    };
    ($owner:ident, $name:ident, leaf) => {
        $crate::FieldInfo::leaf(stringify!($name), |r: &$owner| &r.$name)
    };
    ($owner:ident, $name:ident, nested) => {
        $crate::FieldInfo::record(stringify!($name), false, |r: &$owner| &r.$name)
    };
    ($owner:ident, $name:ident, inline) => {
        $crate::FieldInfo::record(stringify!($name), true, |r: &$owner| &r.$name)
    };
    ($owner:ident, $name:ident, optional) => {
        $crate::FieldInfo::optional(stringify!($name), false, |r: &$owner| &r.$name)
    };
    ($owner:ident, $name:ident, inline_optional) => {
        $crate::FieldInfo::optional(stringify!($name), true, |r: &$owner| &r.$name)
    };
    ($owner:ident, $name:ident, map) => {
        $crate::FieldInfo::map(stringify!($name))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_ref {
    ($field:expr) => {
        $crate::FieldRef::Leaf(&$field)
    };
    ($field:expr, leaf) => {
        $crate::FieldRef::Leaf(&$field)
    };
    ($field:expr, nested) => {
        $crate::FieldRef::Record(&$field)
    };
    ($field:expr, inline) => {
        $crate::FieldRef::Record(&$field)
    };
    ($field:expr, optional) => {
        $crate::FieldRef::Optional(match &$field {
            ::std::option::Option::Some(r) => {
                ::std::option::Option::Some(&**r as &dyn $crate::Record)
            }
            ::std::option::Option::None => ::std::option::Option::None,
        })
    };
    ($field:expr, inline_optional) => {
        $crate::__record_ref!($field, optional)
    };
    ($field:expr, map) => {
        $crate::FieldRef::Map(&$field)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_mut {
    ($field:expr) => {
        $crate::FieldMut::Leaf(&mut $field)
    };
    ($field:expr, leaf) => {
        $crate::FieldMut::Leaf(&mut $field)
    };
    ($field:expr, nested) => {
        $crate::FieldMut::Record(&mut $field)
    };
    ($field:expr, inline) => {
        $crate::FieldMut::Record(&mut $field)
    };
    ($field:expr, optional) => {
        $crate::FieldMut::Optional(match &mut $field {
            ::std::option::Option::Some(r) => {
                ::std::option::Option::Some(&mut **r as &mut dyn $crate::Record)
            }
            ::std::option::Option::None => ::std::option::Option::None,
        })
    };
    ($field:expr, inline_optional) => {
        $crate::__record_mut!($field, optional)
    };
    ($field:expr, map) => {
        $crate::FieldMut::Map(&mut $field)
    };
}
