//! In-memory `Directory` that records every call

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use bibsync_core::{Directory, LookupError, PageFields, PageId, RemoteError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Find(String),
    Insert(PageFields),
    Overwrite(PageId, PageFields),
}

#[derive(Default)]
pub struct RecordingDirectory {
    pages: RefCell<HashMap<String, PageId>>,
    calls: RefCell<Vec<Call>>,
    failing_lookups: RefCell<HashMap<String, LookupError>>,
    failing_writes: Cell<bool>,
    next_id: Cell<usize>,
}

impl RecordingDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a page already exists for `reference_id`
    pub fn with_page(self, reference_id: &str, page_id: &str) -> Self {
        self.pages
            .borrow_mut()
            .insert(reference_id.to_string(), PageId(page_id.to_string()));
        self
    }

    /// Make lookups of `reference_id` fail with `error`
    pub fn fail_lookup(&self, reference_id: &str, error: LookupError) {
        self.failing_lookups
            .borrow_mut()
            .insert(reference_id.to_string(), error);
    }

    /// Make every insert and overwrite fail with a transport error
    pub fn fail_writes(&self) {
        self.failing_writes.set(true);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn finds(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Find(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn inserts(&self) -> Vec<PageFields> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Insert(fields) => Some(fields),
                _ => None,
            })
            .collect()
    }

    pub fn overwrites(&self) -> Vec<(PageId, PageFields)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Overwrite(page, fields) => Some((page, fields)),
                _ => None,
            })
            .collect()
    }
}

impl Directory for RecordingDirectory {
    fn find_page(&self, reference_id: &str) -> Result<PageId, LookupError> {
        self.calls
            .borrow_mut()
            .push(Call::Find(reference_id.to_string()));

        if let Some(error) = self.failing_lookups.borrow().get(reference_id) {
            return Err(error.clone());
        }

        self.pages
            .borrow()
            .get(reference_id)
            .cloned()
            .ok_or(LookupError::NotFound)
    }

    fn insert_page(&self, fields: &PageFields) -> Result<PageId, RemoteError> {
        self.calls.borrow_mut().push(Call::Insert(fields.clone()));

        if self.failing_writes.get() {
            return Err(RemoteError::Transport("HTTP 503".to_string()));
        }

        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        let page = PageId(format!("page-{}", n));
        self.pages
            .borrow_mut()
            .insert(fields.reference_id.clone(), page.clone());
        Ok(page)
    }

    fn overwrite_page(&self, page: &PageId, fields: &PageFields) -> Result<(), RemoteError> {
        self.calls
            .borrow_mut()
            .push(Call::Overwrite(page.clone(), fields.clone()));

        if self.failing_writes.get() {
            return Err(RemoteError::Transport("HTTP 503".to_string()));
        }
        Ok(())
    }
}
