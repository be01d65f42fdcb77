use tracing::trace;

use crate::binding::bound_value::BoundValue;
use crate::binding::index::{NormalizedIndex, NO_INDEX};
use crate::binding::value::BindableValue;

/// Collects the outcome of testing one candidate event against a trigger, and
/// then resolves output values from what was collected.
///
/// Every test call appends exactly one slot, in call order. A reference
/// index on an output field names one of these slots, so callers must test
/// their fields in a fixed, documented order.
///
/// Validity only ever goes from `true` to `false`. After the first rejection
/// further test calls still append a [`NO_INDEX`] slot but no longer touch
/// the strategies, so a toggle cursor is not advanced by a test that could no
/// longer succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTester {
    indices: Vec<NormalizedIndex>,
    valid: bool,
}

impl Default for MatchTester {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchTester {
    pub fn new() -> Self {
        Self {
            indices: Vec::new(),
            valid: true,
        }
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn indices(&self) -> &[NormalizedIndex] {
        &self.indices
    }

    /// The index stored in `slot`, or [`NO_INDEX`] when there is no such slot.
    pub fn index_at(&self, slot: i32) -> NormalizedIndex {
        usize::try_from(slot)
            .ok()
            .and_then(|slot| self.indices.get(slot).copied())
            .unwrap_or(NO_INDEX)
    }

    pub fn test_against<T: BindableValue>(&mut self, bound: &mut BoundValue<T>, candidate: &T) -> bool {
        if !self.valid {
            self.indices.push(NO_INDEX);
            return false;
        }
        match bound.match_candidate(candidate) {
            Some(index) => self.indices.push(index),
            None => {
                trace!(slot = self.indices.len(), ?candidate, mode = %bound.mode(), "candidate rejected");
                self.indices.push(NO_INDEX);
                self.valid = false;
            }
        }
        self.valid
    }

    /// Tests a field whose acceptance is already known.
    pub fn test_conditionally(&mut self, accepted: bool) -> bool {
        self.indices.push(NO_INDEX);
        if !accepted {
            self.valid = false;
        }
        self.valid
    }

    /// Keeps the slot of a field the caller decided to skip.
    pub fn test_empty(&mut self) {
        self.indices.push(NO_INDEX);
    }

    /// Tests a boolean field against a raw literal that is spelled either
    /// `truthy` or `falsy`. Any other literal rejects.
    pub fn test_literal(&mut self, bound: &mut BoundValue<bool>, literal: &str, truthy: &str, falsy: &str) -> bool {
        let candidate = if literal == truthy {
            true
        } else if literal == falsy {
            false
        } else {
            return self.test_conditionally(false);
        };
        self.test_against(bound, &candidate)
    }

    /// Resolves `bound` into `output`, borrowing the slot named by its
    /// reference index when its mode uses one. Returns whether a value was
    /// produced; `output` is left untouched otherwise.
    pub fn resolve<T: BindableValue>(&self, bound: &mut BoundValue<T>, output: &mut T) -> bool {
        let index = if bound.uses_reference() {
            self.index_at(bound.reference_index())
        } else {
            NO_INDEX
        };
        bound.resolve(index, output)
    }

    /// Like [`resolve`](Self::resolve) but starting from `current` and
    /// returning the produced value.
    pub fn resolved<T: BindableValue>(&self, bound: &mut BoundValue<T>, current: &T) -> Option<T> {
        let mut output = current.clone();
        self.resolve(bound, &mut output).then_some(output)
    }
}
