//! Disruption actions and how they are picked.

use std::fmt;
use std::time::Duration;

use crate::random::SimRng;

/// Service the controller can disrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Gateway,
    Backend,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Gateway, Target::Backend];
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Gateway => f.write_str("gateway"),
            Target::Backend => f.write_str("backend"),
        }
    }
}

/// What to do to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisruptionKind {
    /// One `restart` call.
    Restart,
    /// `stop`, a fixed pause, then `start`.
    StopStart { pause: Duration },
}

impl DisruptionKind {
    pub fn name(&self) -> &'static str {
        match self {
            DisruptionKind::Restart => "restart",
            DisruptionKind::StopStart { .. } => "stop_start",
        }
    }
}

/// One disruption, chosen and executed entirely inside the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisruptionAction {
    pub target: Target,
    pub kind: DisruptionKind,
}

impl DisruptionAction {
    /// Uniform target, then uniform kind.
    pub fn choose(rng: &SimRng, pause: Duration) -> Self {
        let target = rng.pick(&Target::ALL).unwrap_or(Target::Gateway);
        let kinds = [DisruptionKind::Restart, DisruptionKind::StopStart { pause }];
        let kind = rng.pick(&kinds).unwrap_or(DisruptionKind::Restart);
        Self { target, kind }
    }
}

impl fmt::Display for DisruptionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.kind.name(), self.target)
    }
}
