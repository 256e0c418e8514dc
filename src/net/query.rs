//! Per-key request bookkeeping for a single query.
//!
//! DESIGN
//! ======
//! A `QueryCell` tracks at most one in-flight key and the last settled key.
//! Every `begin` bumps a generation counter; a completion only counts if its
//! ticket carries the current generation, so a key change or a cancel turns
//! older tickets stale. Starting a key that is already in flight is refused.

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

/// Proof that a request was started for `key` at `generation`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryTicket<K> {
    key: K,
    generation: u64,
}

impl<K> QueryTicket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

#[derive(Clone, Debug)]
pub struct QueryCell<K> {
    generation: u64,
    in_flight: Option<QueryTicket<K>>,
    settled: Option<K>,
}

impl<K> Default for QueryCell<K> {
    fn default() -> Self {
        Self { generation: 0, in_flight: None, settled: None }
    }
}

impl<K: Clone + PartialEq> QueryCell<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a request for `key` is neither running nor already settled.
    pub fn needs_fetch(&self, key: &K) -> bool {
        !self.is_in_flight(key) && self.settled.as_ref() != Some(key)
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        self.in_flight.as_ref().is_some_and(|t| &t.key == key)
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a request for `key`.
    ///
    /// Returns `None` when the same key is already in flight. Starting a
    /// different key supersedes the running request.
    pub fn begin(&mut self, key: K) -> Option<QueryTicket<K>> {
        if self.is_in_flight(&key) {
            return None;
        }
        self.generation += 1;
        let ticket = QueryTicket { key, generation: self.generation };
        self.in_flight = Some(ticket.clone());
        Some(ticket)
    }

    /// Record completion of `ticket`. Returns `false` if the ticket was
    /// superseded or cancelled, in which case its result must be dropped.
    pub fn finish(&mut self, ticket: &QueryTicket<K>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        match self.in_flight.take() {
            Some(current) => {
                self.settled = Some(current.key);
                true
            }
            None => false,
        }
    }

    /// Abandon the in-flight request, if any.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.in_flight = None;
    }

    /// Forget the settled key so it can be fetched again.
    pub fn invalidate(&mut self) {
        self.settled = None;
    }
}
