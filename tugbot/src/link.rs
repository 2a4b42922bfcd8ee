//! Intent link watchdog
//!
//! Holds the most recent [`IntentFrame`] from the transport layer and
//! substitutes a neutral, disarmed intent once it is older than the
//! configured timeout.

use log::{info, warn};
use tugbot_core::clock::elapsed_ms;
use tugbot_core::params::LinkConfig;
use tugbot_library::IntentFrame;

/// Watchdog over the operator intent stream
#[derive(Debug, Clone)]
pub struct IntentLink {
    timeout_ms: u64,
    latest: IntentFrame,
    last_rx_ms: Option<u64>,
    link_ok: bool,
    armed: bool,
}

impl IntentLink {
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            timeout_ms: config.intent_timeout_ms,
            latest: IntentFrame::neutral(),
            last_rx_ms: None,
            link_ok: false,
            armed: false,
        }
    }

    /// Record a frame delivered by the transport
    pub fn submit(&mut self, frame: IntentFrame, now_ms: u64) {
        self.latest = frame;
        self.last_rx_ms = Some(now_ms);
    }

    /// Intent to act on at `now_ms` and whether the link is considered alive
    pub fn current(&mut self, now_ms: u64) -> (IntentFrame, bool) {
        let fresh = self
            .last_rx_ms
            .is_some_and(|rx| elapsed_ms(rx, now_ms) <= self.timeout_ms);

        if fresh != self.link_ok {
            if fresh {
                info!("Intent link up");
            } else {
                warn!(
                    "Intent link lost: no frame for more than {} ms, failsafe engaged",
                    self.timeout_ms
                );
            }
            self.link_ok = fresh;
        }

        let frame = if fresh {
            self.latest
        } else {
            IntentFrame::neutral()
        };

        if frame.armed != self.armed {
            info!("{}", if frame.armed { "Armed" } else { "Disarmed" });
            self.armed = frame.armed;
        }

        (frame, fresh)
    }

    pub fn latest(&self) -> &IntentFrame {
        &self.latest
    }

    pub fn last_rx_ms(&self) -> Option<u64> {
        self.last_rx_ms
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}
