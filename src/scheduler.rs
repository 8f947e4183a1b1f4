//! Exactly-once emission bookkeeping.
//!
//! A type name is in one of three states: unknown, queued (reserved, work
//! item possibly still being built) or finalized (written out). Finalized
//! names never change again; registering them is a no-op.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::code::CodeBuffer;
use crate::decl::Declaration;

#[derive(Debug, Default)]
pub struct EmissionScheduler {
    /// `None` while the builder is still resolving the declaration's members.
    queued: IndexMap<String, Option<Declaration>>,
    finalized: HashSet<String>,
}

impl EmissionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_queued(&self, name: &str) -> bool {
        self.queued.contains_key(name)
    }

    pub fn is_finalized(&self, name: &str) -> bool {
        self.finalized.contains(name)
    }

    /// Queued or finalized.
    pub fn is_known(&self, name: &str) -> bool {
        self.is_queued(name) || self.is_finalized(name)
    }

    /// Claim `name` before building its declaration. Returns `false` when the
    /// name is already queued or finalized; callers then reuse it as is.
    pub fn reserve(&mut self, name: &str) -> bool {
        if self.is_known(name) {
            return false;
        }
        self.queued.insert(name.to_string(), None);
        true
    }

    /// Attach the finished work item to a reserved name.
    pub fn fill(&mut self, name: &str, decl: Declaration) {
        if self.is_finalized(name) {
            return;
        }
        self.queued.insert(name.to_string(), Some(decl));
    }

    /// Marker for [`rollback`](Self::rollback). Entries queued after it
    /// are exactly the ones added since, since the queue only appends.
    pub fn checkpoint(&self) -> usize {
        self.queued.len()
    }

    /// Drop everything queued since `checkpoint`: a failed build's own
    /// reservation and any nested declarations it queued along the way.
    /// Returns how many entries were dropped.
    pub fn rollback(&mut self, checkpoint: usize) -> usize {
        let dropped = self.queued.len().saturating_sub(checkpoint);
        self.queued.truncate(checkpoint);
        dropped
    }

    /// Register-if-absent.
    pub fn register(&mut self, name: &str, decl: Declaration) -> bool {
        if !self.reserve(name) {
            return false;
        }
        self.fill(name, decl);
        true
    }

    /// Queue `decl`, replacing a still-queued entry (keeping its position).
    /// No-op once `name` is finalized.
    pub fn replace(&mut self, name: &str, decl: Declaration) -> bool {
        if self.is_finalized(name) {
            return false;
        }
        self.queued.insert(name.to_string(), Some(decl));
        true
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.queued.get(name).and_then(Option::as_ref)
    }

    /// Queued work items in emission order.
    pub fn queued(&self) -> impl Iterator<Item = (&str, &Declaration)> {
        self.queued
            .iter()
            .filter_map(|(name, decl)| decl.as_ref().map(|d| (name.as_str(), d)))
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    /// Write every queued declaration in order and finalize it.
    /// Returns how many declarations were written.
    pub fn drain_into(&mut self, code: &mut dyn CodeBuffer) -> usize {
        let mut written = 0;
        for (name, slot) in self.queued.drain(..) {
            let Some(decl) = slot else {
                tracing::warn!(type_name = %name, "dropping reservation that was never built");
                continue;
            };
            decl.write_to(code);
            code.line("");
            self.finalized.insert(name);
            written += 1;
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Code, CodeScript};

    fn custom(text: &str) -> Declaration {
        let mut script = CodeScript::new();
        script.line(text);
        Declaration::Custom(script)
    }

    #[test]
    fn states_are_exclusive() {
        let mut s = EmissionScheduler::new();
        assert!(!s.is_known("A"));
        assert!(s.reserve("A"));
        assert!(s.is_queued("A") && !s.is_finalized("A"));
        assert!(!s.reserve("A"));
        s.fill("A", custom("a"));

        let mut code = Code::new();
        assert_eq!(s.drain_into(&mut code), 1);
        assert!(!s.is_queued("A") && s.is_finalized("A"));
        assert!(!s.reserve("A"));
    }

    #[test]
    fn register_if_absent_keeps_first() {
        let mut s = EmissionScheduler::new();
        assert!(s.register("A", custom("first")));
        assert!(!s.register("A", custom("second")));
        assert_eq!(s.get("A"), Some(&custom("first")));
    }

    #[test]
    fn replace_overrides_queued_but_not_finalized() {
        let mut s = EmissionScheduler::new();
        s.register("A", custom("first"));
        s.register("B", custom("b"));
        assert!(s.replace("A", custom("second")));
        let order: Vec<&str> = s.queued().map(|(n, _)| n).collect();
        assert_eq!(order, ["A", "B"]);

        let mut code = Code::new();
        s.drain_into(&mut code);
        assert_eq!(code.render(), "second\n\nb\n\n");
        assert!(!s.replace("A", custom("third")));
        assert_eq!(s.queued_len(), 0);
    }

    #[test]
    fn rollback_drops_everything_after_the_checkpoint() {
        let mut s = EmissionScheduler::new();
        s.register("Earlier", custom("e"));
        let mark = s.checkpoint();
        s.reserve("Pending");
        s.register("Nested", custom("n"));
        assert_eq!(s.rollback(mark), 2);
        assert!(!s.is_known("Pending"));
        assert!(!s.is_known("Nested"));
        assert!(s.is_queued("Earlier"));
        assert_eq!(s.rollback(mark), 0);
    }
}
