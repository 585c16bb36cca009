//! Decides when a stored digest should be regenerated at the current cost.
use super::password::work_factor;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RehashAdvisor {
    current_work_factor: u32,
}

impl RehashAdvisor {
    pub fn new(current_work_factor: u32) -> Self {
        Self {
            current_work_factor,
        }
    }

    /// True for digests weaker than the configured cost, and for digests whose
    /// cost cannot be read at all.
    pub fn should_rehash(&self, digest: &str) -> bool {
        match work_factor(digest) {
            Ok(cost) => cost < self.current_work_factor,
            Err(_) => {
                debug!("stored digest has unrecognised format, flagging for rehash");
                true
            },
        }
    }
}
