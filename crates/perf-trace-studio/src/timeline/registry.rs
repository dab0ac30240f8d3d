//! Process and command registries.
//!
//! The process registry exclusively owns every `ProcessRecord`. Parent and
//! child links are stored as keys and resolved through the registry on demand.
//! Only lifecycle events create records: a parent that is merely named by a
//! fork stays a bare key until an event of its own arrives.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Identity of a process/thread for the lifetime of one run
///
/// pid/tid values can be reused by the kernel; two lifetimes sharing a key
/// within one capture are indistinguishable and merge into one record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ProcessKey {
    pub pid: u32,
    pub tid: u32,
}

impl ProcessKey {
    pub fn new(pid: u32, tid: u32) -> Self {
        Self { pid, tid }
    }
}

impl fmt::Display for ProcessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pid, self.tid)
    }
}

/// Everything known about one process/thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub key: ProcessKey,

    /// Last observed command name; empty until a COMM event is seen
    pub name: String,

    pub start_ns: Option<u64>,
    pub end_ns: Option<u64>,

    pub parent: Option<ProcessKey>,
    pub children: BTreeSet<ProcessKey>,

    /// Written by the row assigner; `None` when excluded from rendering
    pub render_row: Option<u64>,
}

impl ProcessRecord {
    pub fn new(key: ProcessKey) -> Self {
        Self {
            key,
            name: String::new(),
            start_ns: None,
            end_ns: None,
            parent: None,
            children: BTreeSet::new(),
            render_row: None,
        }
    }

    /// `[start, end)` when both bounds are known and ordered
    pub fn interval(&self) -> Option<(u64, u64)> {
        match (self.start_ns, self.end_ns) {
            (Some(start), Some(end)) if end >= start => Some((start, end)),
            _ => None,
        }
    }

    pub fn duration_ns(&self) -> Option<u64> {
        self.interval().map(|(start, end)| end - start)
    }

    /// Whether the record can be laid out and rendered
    pub fn is_complete(&self) -> bool {
        self.interval().is_some()
    }
}

/// All process records of a run, keyed by (pid, tid)
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    records: BTreeMap<ProcessKey, ProcessRecord>,

    /// Children of parents that have no record yet
    pending_children: BTreeMap<ProcessKey, BTreeSet<ProcessKey>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing record for `key`, or a fresh one inserted on first reference
    pub fn get_or_create(&mut self, key: ProcessKey) -> &mut ProcessRecord {
        let pending = &mut self.pending_children;
        self.records.entry(key).or_insert_with(|| {
            let mut record = ProcessRecord::new(key);
            record.children = pending.remove(&key).unwrap_or_default();
            record
        })
    }

    pub fn get(&self, key: &ProcessKey) -> Option<&ProcessRecord> {
        self.records.get(key)
    }

    pub fn get_mut(&mut self, key: &ProcessKey) -> Option<&mut ProcessRecord> {
        self.records.get_mut(key)
    }

    pub fn contains(&self, key: &ProcessKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in key order
    pub fn iter(&self) -> impl Iterator<Item = &ProcessRecord> {
        self.records.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ProcessRecord> {
        self.records.values_mut()
    }

    /// Link `child` under `parent`, creating the child record if needed
    ///
    /// The parent record is not created. If it does not exist yet the child
    /// is attached once the parent's first event creates it.
    pub fn link_parent(&mut self, child: ProcessKey, parent: ProcessKey) {
        if child == parent {
            return;
        }

        let previous = self.get_or_create(child).parent.replace(parent);
        if let Some(previous) = previous.filter(|p| *p != parent) {
            self.detach_child(previous, child);
        }

        match self.records.get_mut(&parent) {
            Some(record) => {
                record.children.insert(child);
            }
            None => {
                self.pending_children
                    .entry(parent)
                    .or_default()
                    .insert(child);
            }
        }
    }

    fn detach_child(&mut self, parent: ProcessKey, child: ProcessKey) {
        if let Some(record) = self.records.get_mut(&parent) {
            record.children.remove(&child);
        } else if let Entry::Occupied(mut pending) = self.pending_children.entry(parent) {
            pending.get_mut().remove(&child);
            if pending.get().is_empty() {
                pending.remove();
            }
        }
    }

    pub fn parent_of(&self, key: &ProcessKey) -> Option<&ProcessRecord> {
        self.get(key)
            .and_then(|record| record.parent)
            .and_then(|parent| self.get(&parent))
    }

    pub fn children_of<'a>(
        &'a self,
        key: &ProcessKey,
    ) -> impl Iterator<Item = &'a ProcessRecord> + 'a {
        self.get(key)
            .into_iter()
            .flat_map(|record| record.children.iter())
            .filter_map(move |child| self.get(child))
    }

    /// Records that will appear in the rendered trace
    pub fn complete_count(&self) -> usize {
        self.iter().filter(|record| record.is_complete()).count()
    }
}

/// Command name -> small integer id, assigned in first-seen order
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    ids: HashMap<String, u32>,
    names: Vec<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `name`, registering it if this is the first time it is seen
    pub fn register(&mut self, name: &str) -> u32 {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }

        let id = self.names.len() as u32;
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    pub fn id(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in id order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(id, name)| (id as u32, name.as_str()))
    }
}
