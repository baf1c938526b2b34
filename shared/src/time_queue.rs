use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

/// Items released once a caller-supplied clock passes their due time.
///
/// Items due at the same instant come out in insertion order. There is no
/// way to cancel an item once added.
pub struct TimeQueue<T> {
    queue: BinaryHeap<ItemContainer<T>>,
    next_sequence: u64,
}

impl<T> TimeQueue<T> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn add_item(&mut self, due: Duration, item: T) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.queue.push(ItemContainer {
            due,
            sequence,
            item,
        });
    }

    pub fn has_item(&self, now: Duration) -> bool {
        match self.queue.peek() {
            Some(container) => container.due <= now,
            None => false,
        }
    }

    pub fn pop_item(&mut self, now: Duration) -> Option<T> {
        if !self.has_item(now) {
            return None;
        }
        self.queue.pop().map(|container| container.item)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Default for TimeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct ItemContainer<T> {
    due: Duration,
    sequence: u64,
    item: T,
}

// BinaryHeap is a max-heap, so the earliest item must compare greatest
impl<T> Ord for ItemContainer<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<T> PartialOrd for ItemContainer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for ItemContainer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.sequence == other.sequence
    }
}

impl<T> Eq for ItemContainer<T> {}
