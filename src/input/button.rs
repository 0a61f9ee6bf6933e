//! Join push-button debouncing

/// Rising-edge debouncer for the join button
///
/// An edge triggers only if more than the guard time has passed since the
/// previous edge. Every edge, accepted or not, restarts the guard.
#[derive(Clone, Copy, Debug)]
pub struct JoinButton {
    guard_ms: u64,
    last_edge_ms: Option<u64>,
}

impl JoinButton {
    /// Create a debouncer with the given guard time
    #[must_use]
    pub const fn new(guard_ms: u64) -> Self {
        Self {
            guard_ms,
            last_edge_ms: None,
        }
    }

    /// Guard time in milliseconds
    #[must_use]
    pub const fn guard_ms(&self) -> u64 {
        self.guard_ms
    }

    /// Register an edge at `now_ms`, returning whether it is a press
    pub fn on_edge(&mut self, now_ms: u64) -> bool {
        let pressed = match self.last_edge_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > self.guard_ms,
        };
        self.last_edge_ms = Some(now_ms);
        pressed
    }
}
