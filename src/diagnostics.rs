//! Recoverable anomalies raised while simulating a tick.
//!
//! Nothing in the simulation is fatal. Anything unusual is corrected locally
//! and reported here so a host can observe it; every event is also logged.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Diagnostic {
    /// More simultaneous contact planes than the solver tracks.
    PlaneSetOverflow,
    /// Sweep reported more travel than was attempted; clamped to 1.
    TravelFractionOvershoot { fraction: f32 },
    /// No slide direction satisfies all contact planes.
    ConflictingPlanes { planes: usize },
    /// Remaining tick time went negative mid-solve.
    TimeBudgetExhausted,
    /// Solver used every bump iteration without converging.
    BumpLimitReached,
    /// Volume overlaps geometry.
    Stuck { ticks: u32 },
    /// Overlap persisted long enough to force an upward escape.
    SevereStuck { ticks: u32 },
    /// Penetration query could not produce a separating direction.
    PenetrationUnresolved,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::PlaneSetOverflow => write!(f, "colliding with too many planes at once"),
            Diagnostic::TravelFractionOvershoot { fraction } => {
                write!(f, "travel fraction {fraction} exceeds 1")
            }
            Diagnostic::ConflictingPlanes { planes } => {
                write!(f, "no slide direction fits {planes} contact planes")
            }
            Diagnostic::TimeBudgetExhausted => write!(f, "out of tick time"),
            Diagnostic::BumpLimitReached => write!(f, "bump limit exceeded"),
            Diagnostic::Stuck { ticks } => write!(f, "stuck for {ticks} tick(s)"),
            Diagnostic::SevereStuck { ticks } => {
                write!(f, "severely stuck for {ticks} ticks, forcing escape")
            }
            Diagnostic::PenetrationUnresolved => write!(f, "penetration could not be resolved"),
        }
    }
}

/// Collects the diagnostics of one tick.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
    deferred: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink for a tentative move. Events are only logged once
    /// [`merge`](Self::merge)d into a regular sink.
    pub fn deferred() -> Self {
        Self {
            events: Vec::new(),
            deferred: true,
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        if !self.deferred {
            match diagnostic {
                Diagnostic::TimeBudgetExhausted | Diagnostic::Stuck { .. } => {
                    log::debug!("{diagnostic}")
                }
                _ => log::warn!("{diagnostic}"),
            }
        }
        self.events.push(diagnostic);
    }

    /// Report every event of `other`, in order.
    pub fn merge(&mut self, other: Diagnostics) {
        for diagnostic in other.events {
            self.report(diagnostic);
        }
    }

    pub fn contains(&self, diagnostic: &Diagnostic) -> bool {
        self.events.contains(diagnostic)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.events.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.events
    }
}
