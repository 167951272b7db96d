//! Lazy depth-first walk over every addressable leaf of a record tree.
//!
//! Leaves come out in declaration order with their full dotted paths. Inline
//! records contribute their fields in place, map entries are visited in key
//! order, and unset optional records contribute nothing.

use std::collections::btree_map;

use crate::path::KeyPath;
use crate::record::{FieldInfo, FieldRef, Record};
use crate::value::{Kind, Slot};

/// Walk all leaves of `record`. Each call starts a fresh walk.
pub fn leaves(record: &dyn Record) -> Leaves<'_> {
    Leaves {
        stack: vec![Frame::Record {
            record,
            next: 0,
            prefix: Vec::new(),
        }],
    }
}

/// Every leaf path of `record` with its kind, in declaration order.
pub fn enumerate(record: &dyn Record) -> impl Iterator<Item = (KeyPath, Kind)> + '_ {
    leaves(record).map(|(path, slot)| (path, slot.kind()))
}

/// Iterator returned by [`leaves`].
pub struct Leaves<'a> {
    stack: Vec<Frame<'a>>,
}

enum Frame<'a> {
    Record {
        record: &'a dyn Record,
        next: usize,
        prefix: Vec<String>,
    },
    Map {
        entries: btree_map::Iter<'a, String, Box<dyn Record>>,
        prefix: Vec<String>,
    },
}

enum Step<'a> {
    Yield(KeyPath, &'a dyn Slot),
    Push(Frame<'a>),
    Pop,
    Skip,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = (KeyPath, &'a dyn Slot);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let step = match self.stack.last_mut()? {
                Frame::Record {
                    record,
                    next,
                    prefix,
                } => {
                    let current: &'a dyn Record = *record;
                    let index = *next;
                    *next += 1;
                    match (current.descriptor().fields().get(index), current.field(index)) {
                        (Some(info), Some(field)) => visit(info, field, prefix),
                        _ => Step::Pop,
                    }
                }
                Frame::Map { entries, prefix } => match entries.next() {
                    Some((key, entry)) => Step::Push(Frame::Record {
                        record: &**entry,
                        next: 0,
                        prefix: child(prefix, key),
                    }),
                    None => Step::Pop,
                },
            };
            match step {
                Step::Yield(path, slot) => return Some((path, slot)),
                Step::Push(frame) => self.stack.push(frame),
                Step::Pop => {
                    self.stack.pop();
                }
                Step::Skip => {}
            }
        }
    }
}

fn visit<'a>(info: &FieldInfo, field: FieldRef<'a>, prefix: &[String]) -> Step<'a> {
    let prefix = if info.is_inline() {
        prefix.to_vec()
    } else {
        child(prefix, info.name())
    };
    match field {
        FieldRef::Leaf(slot) => Step::Yield(KeyPath::from_segments(prefix), slot),
        FieldRef::Record(record) | FieldRef::Optional(Some(record)) => Step::Push(Frame::Record {
            record,
            next: 0,
            prefix,
        }),
        FieldRef::Optional(None) => Step::Skip,
        FieldRef::Map(map) => Step::Push(Frame::Map {
            entries: map.entries(),
            prefix,
        }),
    }
}

fn child(prefix: &[String], name: &str) -> Vec<String> {
    let mut segments = Vec::with_capacity(prefix.len() + 1);
    segments.extend_from_slice(prefix);
    segments.push(name.to_string());
    segments
}
