#![allow(dead_code)]

use novella::{Chapter, PersistentStore, StoreError};
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Store that keeps every write so tests can count persisted updates.
#[derive(Clone, Default)]
pub struct RecordingStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    writes: Rc<RefCell<Vec<(String, String)>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes_to(&self, key: &str) -> Vec<String> {
        self.writes
            .borrow()
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl PersistentStore for RecordingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.writes
            .borrow_mut()
            .push((key.to_string(), value.to_string()));
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn chapters(count: usize) -> Vec<Chapter> {
    (0..count)
        .map(|index| Chapter {
            index,
            title: format!("Chapter {}", index + 1),
        })
        .collect()
}
