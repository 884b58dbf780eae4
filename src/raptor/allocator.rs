//! The "marked stops" set: a deduplicating, fast-clearing buffer of stops
//! touched during a round, consulted at the start of the next.

use crate::ids::StopId;

/// A swap-and-clear marked-stops tracker: a `Vec<bool>` presence mask plus a
/// touched-index buffer, so clearing only touches what was actually marked.
pub(crate) struct Allocator {
    marked: Vec<bool>,
    touched: Vec<StopId>,
}

impl Allocator {
    pub(crate) fn new(stop_count: usize) -> Self {
        Self {
            marked: vec![false; stop_count],
            touched: Vec::new(),
        }
    }

    pub(crate) fn mark(&mut self, stop: StopId) {
        let slot = &mut self.marked[stop.0 as usize];
        if !*slot {
            *slot = true;
            self.touched.push(stop);
        }
    }

    /// Drains the touched buffer, clearing every marked slot it names, and
    /// returns the stops that were marked since the last call.
    pub(crate) fn take_marked(&mut self) -> Vec<StopId> {
        let touched = std::mem::take(&mut self.touched);
        for &stop in &touched {
            self.marked[stop.0 as usize] = false;
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marking_the_same_stop_twice_only_touches_it_once() {
        let mut allocator = Allocator::new(4);
        allocator.mark(StopId(2));
        allocator.mark(StopId(2));
        allocator.mark(StopId(1));
        assert_eq!(allocator.take_marked().len(), 2);
    }

    #[test]
    fn take_marked_clears_for_the_next_round() {
        let mut allocator = Allocator::new(4);
        allocator.mark(StopId(0));
        assert_eq!(allocator.take_marked().len(), 1);
        assert_eq!(allocator.take_marked().len(), 0);
    }
}
