use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Result;
use crate::vcs::Vcs;

/// Mock VCS for testing without running git
///
/// Serves canned answers and records every operation invoked, in order, so
/// tests can assert which queries ran and which were skipped.
pub struct MockVcs {
    revision_count: u64,
    commit_hash: String,
    status_output: String,
    tags: Vec<String>,
    head_tag: Option<String>,
    push_statuses: HashMap<String, i32>,
    calls: Mutex<Vec<String>>,
}

impl MockVcs {
    /// Create a mock with an empty, clean repository state
    pub fn new() -> Self {
        MockVcs {
            revision_count: 0,
            commit_hash: "0123456789abcdef0123456789abcdef01234567".to_string(),
            status_output: String::new(),
            tags: Vec::new(),
            head_tag: None,
            push_statuses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the commit count the mock reports
    pub fn set_revision_count(&mut self, count: u64) {
        self.revision_count = count;
    }

    /// Set the commit hash the mock reports
    pub fn set_commit_hash(&mut self, hash: impl Into<String>) {
        self.commit_hash = hash.into();
    }

    /// Set the raw status output (non-empty means a dirty tree)
    pub fn set_status_output(&mut self, output: impl Into<String>) {
        self.status_output = output.into();
    }

    /// Add an existing tag
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    /// Set the exact tag reported at HEAD
    pub fn set_head_tag(&mut self, tag: impl Into<String>) {
        self.head_tag = Some(tag.into());
    }

    /// Make pushes of `refname` exit with `status`
    pub fn set_push_status(&mut self, refname: impl Into<String>, status: i32) {
        self.push_statuses.insert(refname.into(), status);
    }

    /// Operations invoked so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: impl Into<String>) {
        self.calls.lock().unwrap().push(op.into());
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vcs for MockVcs {
    fn revision_count(&self) -> Result<u64> {
        self.record("revision_count");
        Ok(self.revision_count)
    }

    fn current_commit_hash(&self) -> Result<String> {
        self.record("current_commit_hash");
        Ok(self.commit_hash.clone())
    }

    fn status(&self) -> Result<String> {
        self.record("status");
        Ok(self.status_output.clone())
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        self.record("tag_exists");
        Ok(self.tags.iter().any(|t| t == tag))
    }

    fn describe_exact_tag_at_head(&self) -> Result<Option<String>> {
        self.record("describe_exact_tag_at_head");
        Ok(self.head_tag.clone())
    }

    fn push_ref(&self, _remote: &str, refname: &str) -> Result<i32> {
        self.record(format!("push_ref {}", refname));
        Ok(*self.push_statuses.get(refname).unwrap_or(&0))
    }
}
