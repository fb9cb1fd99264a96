//! ReadinessGate: wait for display targets before the first render.
//!
//! The gate polls a probe on a fixed schedule (`delay` between attempts, at
//! most `max_attempts` probes). The first time every target is present it
//! opens and becomes consumed; later readiness signals are no-ops. When the
//! budget runs out it logs once and reports `GaveUp` without consuming itself,
//! so a later readiness signal may try again.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::error::GateError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateConfig {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// All targets present; the caller should run the pipeline now.
    Opened { attempts: u32 },
    /// Budget exhausted with targets still missing.
    GaveUp(GateError),
    /// The gate already opened earlier.
    Consumed,
}

#[derive(Debug)]
pub struct ReadinessGate {
    config: GateConfig,
    consumed: bool,
}

impl ReadinessGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            consumed: false,
        }
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Poll `missing` (returns the ids still absent) until it is empty or the budget is spent.
    pub async fn wait<P>(&mut self, mut missing: P) -> GateOutcome
    where
        P: FnMut() -> Vec<String>,
    {
        if self.consumed {
            debug!("readiness gate already consumed");
            return GateOutcome::Consumed;
        }

        let attempts = self.config.max_attempts.max(1);
        let mut absent = Vec::new();
        for attempt in 1..=attempts {
            absent = missing();
            if absent.is_empty() {
                self.consumed = true;
                info!(attempt, "display targets ready");
                return GateOutcome::Opened { attempts: attempt };
            }

            debug!(attempt, missing = ?absent, "display targets not ready");
            if attempt < attempts {
                tokio::time::sleep(self.config.delay).await;
            }
        }

        error!(attempts, missing = ?absent, "giving up waiting for display targets");
        GateOutcome::GaveUp(GateError::TargetMissing {
            attempts,
            missing: absent,
        })
    }
}
