//! Field resolution: walk a [`KeyPath`] down a record tree.
//!
//! Each segment is looked up in the current record's descriptor. A field
//! declared directly on the record wins; otherwise inline records are searched
//! without consuming the segment. A map field consumes the next segment as its
//! key. The walk never allocates: an unset optional record on the way is an
//! error, not an invitation to create one.

use crate::error::DotfigError;
use crate::path::KeyPath;
use crate::record::{FieldMut, FieldRef, Record, RecordMap};

/// Where the walk currently stands between two segments.
enum Node<'a> {
    Record(&'a dyn Record),
    Map(&'a RecordMap),
}

enum NodeMut<'a> {
    Record(&'a mut dyn Record),
    Map(&'a mut RecordMap),
}

/// Resolve `path` to a shared view of the field it names.
pub fn resolve<'a>(record: &'a dyn Record, path: &KeyPath) -> Result<FieldRef<'a>, DotfigError> {
    let last = path.len() - 1;
    let mut node = Node::Record(record);
    for (depth, segment) in path.segments().iter().enumerate() {
        let field = match node {
            Node::Record(record) => step(record, segment, path)?,
            Node::Map(map) => FieldRef::Record(
                map.get(segment)
                    .ok_or_else(|| DotfigError::UnknownKey(path.to_string()))?,
            ),
        };
        if depth == last {
            return Ok(field);
        }
        node = match field {
            FieldRef::Record(record) | FieldRef::Optional(Some(record)) => Node::Record(record),
            FieldRef::Map(map) => Node::Map(map),
            FieldRef::Optional(None) => return Err(DotfigError::NilEmbedded(path.to_string())),
            FieldRef::Leaf(_) => return Err(DotfigError::NotARecord(path.to_string())),
        };
    }
    Err(DotfigError::EmptyPath)
}

/// Resolve `path` to a mutable view of the field it names.
pub fn resolve_mut<'a>(
    record: &'a mut dyn Record,
    path: &KeyPath,
) -> Result<FieldMut<'a>, DotfigError> {
    let last = path.len() - 1;
    let mut node = NodeMut::Record(record);
    for (depth, segment) in path.segments().iter().enumerate() {
        let field = match node {
            NodeMut::Record(record) => step_mut(record, segment, path)?,
            NodeMut::Map(map) => FieldMut::Record(
                map.get_mut(segment)
                    .ok_or_else(|| DotfigError::UnknownKey(path.to_string()))?,
            ),
        };
        if depth == last {
            return Ok(field);
        }
        node = match field {
            FieldMut::Record(record) | FieldMut::Optional(Some(record)) => {
                NodeMut::Record(record)
            }
            FieldMut::Map(map) => NodeMut::Map(map),
            FieldMut::Optional(None) => return Err(DotfigError::NilEmbedded(path.to_string())),
            FieldMut::Leaf(_) => return Err(DotfigError::NotARecord(path.to_string())),
        };
    }
    Err(DotfigError::EmptyPath)
}

/// Look up one segment on `record`, following inline records.
fn step<'a>(
    record: &'a dyn Record,
    segment: &str,
    path: &KeyPath,
) -> Result<FieldRef<'a>, DotfigError> {
    let unknown = || DotfigError::UnknownKey(path.to_string());
    let chain = record.descriptor().locate(segment).ok_or_else(unknown)?;
    let (&target, inline) = chain.split_last().ok_or_else(unknown)?;

    let mut current = record;
    for &index in inline {
        current = match current.field(index) {
            Some(FieldRef::Record(inner)) | Some(FieldRef::Optional(Some(inner))) => inner,
            Some(FieldRef::Optional(None)) => {
                return Err(DotfigError::NilEmbedded(path.to_string()));
            }
            _ => return Err(unknown()),
        };
    }
    current.field(target).ok_or_else(unknown)
}

fn step_mut<'a>(
    record: &'a mut dyn Record,
    segment: &str,
    path: &KeyPath,
) -> Result<FieldMut<'a>, DotfigError> {
    let unknown = || DotfigError::UnknownKey(path.to_string());
    let chain = record.descriptor().locate(segment).ok_or_else(unknown)?;
    let (&target, inline) = chain.split_last().ok_or_else(unknown)?;

    let mut current = record;
    for &index in inline {
        current = match current.field_mut(index) {
            Some(FieldMut::Record(inner)) | Some(FieldMut::Optional(Some(inner))) => inner,
            Some(FieldMut::Optional(None)) => {
                return Err(DotfigError::NilEmbedded(path.to_string()));
            }
            _ => return Err(unknown()),
        };
    }
    current.field_mut(target).ok_or_else(unknown)
}
