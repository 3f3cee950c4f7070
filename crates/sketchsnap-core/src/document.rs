//! The sketch document and its linear undo/redo history.
//!
//! The live element sequence doubles as the undo stack: undo pops the most
//! recent element onto the redo stack, redo pushes it back. Any other
//! structural edit empties the redo stack, so history never branches.
//!
//! Undoable deletions leave a tombstone behind. Every placement and every
//! tombstone is stamped from a monotonic clock, and undo reverts whichever of
//! "last element appended" or "last element deleted" happened most recently.

use crate::elements::{Element, ElementId};
use serde::{Deserialize, Serialize};

/// An element removed by an undoable delete.
#[derive(Debug, Clone)]
struct Tombstone {
    /// Position the element occupied.
    index: usize,
    element: Element,
    /// Stamp the element carried while it was live.
    element_stamp: u64,
    /// When the delete happened.
    stamp: u64,
}

/// Something redo can re-apply.
#[derive(Debug, Clone)]
enum RedoEntry {
    /// Re-append an element popped by undo.
    Append { element: Element, stamp: u64 },
    /// Re-delete an element whose deletion was undone.
    Delete { id: ElementId, stamp: u64 },
}

/// Ordered element sequence; order is paint order (later on top).
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
    /// Placement stamp for each element, parallel to `elements`.
    stamps: Vec<u64>,
    tombstones: Vec<Tombstone>,
    redo_stack: Vec<RedoEntry>,
    clock: u64,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    elements: &'a [Element],
}

#[derive(Deserialize)]
struct Snapshot {
    elements: Vec<Element>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_stamp(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Elements in paint order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Current index of an element.
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Nearest stroke scanning back from the top, with its current index.
    pub fn last_stroke(&self) -> Option<(usize, &Element)> {
        self.elements.iter().enumerate().rev().find(|(_, e)| e.is_stroke())
    }

    /// Topmost element hit at `point`.
    pub fn element_at(&self, point: kurbo::Point) -> Option<&Element> {
        self.elements.iter().rev().find(|e| e.hit_test(point))
    }

    /// Add an element on top. Clears redo history.
    pub fn append(&mut self, element: Element) -> ElementId {
        let id = element.id();
        let stamp = self.next_stamp();
        self.elements.push(element);
        self.stamps.push(stamp);
        self.redo_stack.clear();
        id
    }

    /// Remove the element at `index` permanently. Clears redo history.
    pub fn remove_at(&mut self, index: usize) -> Option<Element> {
        if index >= self.elements.len() {
            return None;
        }
        let element = self.elements.remove(index);
        self.stamps.remove(index);
        for tombstone in &mut self.tombstones {
            if tombstone.index > index {
                tombstone.index -= 1;
            }
        }
        self.redo_stack.clear();
        Some(element)
    }

    /// Remove an element permanently by identifier.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        self.remove_at(index)
    }

    /// Remove an element such that a later undo restores it in place.
    /// Clears redo history.
    pub fn delete_undoable(&mut self, id: ElementId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let stamp = self.next_stamp();
        self.bury(index, stamp);
        self.redo_stack.clear();
        true
    }

    fn bury(&mut self, index: usize, stamp: u64) {
        let element = self.elements.remove(index);
        let element_stamp = self.stamps.remove(index);
        self.tombstones.push(Tombstone {
            index,
            element,
            element_stamp,
            stamp,
        });
    }

    /// Revert the most recent append or undoable delete.
    /// Returns true if anything changed.
    pub fn undo(&mut self) -> bool {
        let last_append = self.stamps.last().copied();
        let last_delete = self.tombstones.last().map(|t| t.stamp);

        match (last_append, last_delete) {
            (live, Some(dead)) if live.is_none_or(|live| dead > live) => {
                let Some(tombstone) = self.tombstones.pop() else {
                    return false;
                };
                let index = tombstone.index.min(self.elements.len());
                let id = tombstone.element.id();
                self.elements.insert(index, tombstone.element);
                self.stamps.insert(index, tombstone.element_stamp);
                self.redo_stack.push(RedoEntry::Delete {
                    id,
                    stamp: tombstone.stamp,
                });
                true
            }
            (Some(_), _) => {
                let (Some(element), Some(stamp)) = (self.elements.pop(), self.stamps.pop()) else {
                    return false;
                };
                self.redo_stack.push(RedoEntry::Append { element, stamp });
                true
            }
            (None, _) => false,
        }
    }

    /// Re-apply the most recently undone change.
    /// Returns true if anything changed.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };
        match entry {
            RedoEntry::Append { element, stamp } => {
                self.elements.push(element);
                self.stamps.push(stamp);
            }
            RedoEntry::Delete { id, stamp } => match self.index_of(id) {
                Some(index) => self.bury(index, stamp),
                None => return false,
            },
        }
        true
    }

    /// Drop everything, history included. Not undoable.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.stamps.clear();
        self.tombstones.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.elements.is_empty() || !self.tombstones.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undone changes waiting to be redone.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Serialize the visible elements to JSON. History is not included.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&SnapshotRef {
            elements: &self.elements,
        })
    }

    /// Build a document from JSON produced by [`Document::to_json`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        let mut document = Self::new();
        for element in snapshot.elements {
            document.append(element);
        }
        Ok(document)
    }
}
