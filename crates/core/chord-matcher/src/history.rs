use ringbuf::traits::{Consumer, Observer, RingBuffer};
use ringbuf::HeapRb;

use crate::types::{Keystroke, ModifierSet};

/// One entry of the key history: the modifiers that were active while it was open and at
/// most one non-modifier keystroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySlot {
    pub modifiers: ModifierSet,
    pub keystroke: Option<Keystroke>,
}

impl HistorySlot {
    pub fn new(modifiers: ModifierSet) -> Self {
        Self {
            modifiers,
            keystroke: None,
        }
    }

    pub fn has_key(&self) -> bool {
        self.keystroke.is_some()
    }
}

/// Fixed-capacity FIFO of history slots. Pushing past capacity silently drops the oldest slot.
pub struct BoundedHistory {
    slots: HeapRb<HistorySlot>,
}

impl BoundedHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: HeapRb::new(capacity.max(1)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity().get()
    }

    pub fn len(&self) -> usize {
        self.slots.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn push(&mut self, slot: HistorySlot) {
        if let Some(evicted) = self.slots.push_overwrite(slot) {
            log::trace!("History full, evicted {:?}", evicted);
        }
    }

    pub fn clear(&mut self) {
        Consumer::clear(&mut self.slots);
    }

    pub fn last(&self) -> Option<&HistorySlot> {
        self.slots.iter().last()
    }

    pub fn last_mut(&mut self) -> Option<&mut HistorySlot> {
        self.slots.iter_mut().last()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistorySlot> {
        self.slots.iter()
    }

    /// Rebuilds the buffer with a new capacity, keeping the newest slots that still fit.
    pub fn resize(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        if capacity == self.capacity() {
            return;
        }

        let mut resized = HeapRb::new(capacity);
        resized.push_iter_overwrite(self.slots.pop_iter());
        self.slots = resized;
    }
}
