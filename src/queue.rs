use std::collections::VecDeque;

/// Pending arrivals, oldest first. Each entry is the simulation time of arrival.
#[derive(Clone, Debug, Default)]
pub struct QueueStore {
    arrivals: VecDeque<f64>,
}

impl QueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an arrival. Timestamps earlier than the current tail are raised to it
    /// so the queue stays non-decreasing.
    pub fn push(&mut self, arrived_at: f64) {
        let arrived_at = match self.arrivals.back() {
            Some(&last) if arrived_at < last => last,
            _ => arrived_at,
        };
        self.arrivals.push_back(arrived_at);
    }

    pub fn pop_oldest(&mut self) -> Option<f64> {
        self.arrivals.pop_front()
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    pub fn clear(&mut self) {
        self.arrivals.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.arrivals.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_arrival_order() {
        let mut queue = QueueStore::new();
        queue.push(1.0);
        queue.push(2.5);
        queue.push(4.0);
        assert_eq!(queue.pop_oldest(), Some(1.0));
        assert_eq!(queue.pop_oldest(), Some(2.5));
        assert_eq!(queue.pop_oldest(), Some(4.0));
        assert_eq!(queue.pop_oldest(), None);
    }

    #[test]
    fn timestamps_never_decrease() {
        let mut queue = QueueStore::new();
        queue.push(10.0);
        queue.push(5.0);
        let stamps: Vec<f64> = queue.iter().copied().collect();
        assert_eq!(stamps, vec![10.0, 10.0]);
    }

    #[test]
    fn clear_empties_the_queue() {
        let mut queue = QueueStore::new();
        queue.push(0.0);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }
}
