//! Order-preserving, id-deduplicated target accumulation.

use emscope_protocol::{TaggedTarget, Target};
use std::collections::HashSet;

/// Collects discovered targets across the discovery passes.
///
/// First insertion wins: a later add with an already-seen id is a no-op, so
/// output order is first-insertion order and no id ever appears twice.
#[derive(Debug, Default)]
pub struct Accumulator {
    seen: HashSet<String>,
    items: Vec<TaggedTarget>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a catalog row, projected to its minimal public shape.
    pub fn add(&mut self, target: &Target) {
        if self.seen.contains(&target.id) {
            return;
        }
        self.seen.insert(target.id.clone());
        self.items.push(TaggedTarget::from_target(target));
    }

    /// Add every row of a candidate set in order.
    pub fn add_all<'a, I>(&mut self, targets: I)
    where
        I: IntoIterator<Item = &'a Target>,
    {
        for target in targets {
            self.add(target);
        }
    }

    /// Add an already-enriched target, keeping its enrichment fields.
    pub fn add_tagged(&mut self, target: TaggedTarget) {
        if self.seen.contains(&target.id) {
            return;
        }
        self.seen.insert(target.id.clone());
        self.items.push(target);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the accumulator, yielding targets in first-insertion order.
    pub fn into_vec(self) -> Vec<TaggedTarget> {
        self.items
    }

    /// Mutable view for the tag application pass.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TaggedTarget> {
        self.items.iter_mut()
    }
}
