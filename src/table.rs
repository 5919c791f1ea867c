//! Named coefficient tables owned outside the filters
//!
//! A table lives in a [`TableRegistry`] (or any other [`TableSource`]) and is
//! shared as an `Arc<RwLock<TableData>>`. FIR filters keep only a weak handle
//! to it: the owner may edit, resize, replace or drop the table at any time,
//! and a filter that finds its table gone or changed goes silent until it is
//! bound again.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Contents of a named table
#[derive(Debug, Clone, PartialEq)]
pub enum TableData {
    /// Plain array of floats, usable as FIR coefficients
    Floats(Vec<f32>),
    /// Array of structured elements (anything that is not a bare float)
    Structured { template: String, len: usize },
}

impl TableData {
    pub fn len(&self) -> usize {
        match self {
            TableData::Floats(values) => values.len(),
            TableData::Structured { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The float values, if this is a float array.
    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            TableData::Floats(values) => Some(values),
            TableData::Structured { .. } => None,
        }
    }
}

pub type SharedTable = Arc<RwLock<TableData>>;

/// Lookup of tables by name
pub trait TableSource {
    fn find_table(&self, name: &str) -> Option<SharedTable>;
}

/// Owner of named tables
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: HashMap<String, SharedTable>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the table `name`, returning the owning handle.
    ///
    /// Replacing a table drops the registry's handle to the old one; filters
    /// bound to the old table go silent once no other owner holds it.
    pub fn insert(&mut self, name: impl Into<String>, data: TableData) -> SharedTable {
        let table = Arc::new(RwLock::new(data));
        self.tables.insert(name.into(), Arc::clone(&table));
        table
    }

    pub fn insert_floats(&mut self, name: impl Into<String>, values: Vec<f32>) -> SharedTable {
        self.insert(name, TableData::Floats(values))
    }

    pub fn remove(&mut self, name: &str) -> Option<SharedTable> {
        self.tables.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&SharedTable> {
        self.tables.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableSource for TableRegistry {
    fn find_table(&self, name: &str) -> Option<SharedTable> {
        self.tables.get(name).cloned()
    }
}
