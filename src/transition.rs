//! Exclusive one-of-N activation
//!
//! Both the top-level pages and the carousel slides are a fixed set of members with
//! exactly one active at rest. The engine owns that partition and pushes status
//! changes to a [`Stage`], which is the only thing that touches the view.
//!
//! Pages switch immediately. Slides switch in two phases: the logical index moves
//! at once, the outgoing slide is held as [`MemberStatus::Previous`] for a short
//! cross-fade, and the incoming slide only becomes active when the returned
//! [`SettleTicket`] is settled. Every activation bumps a generation counter so a
//! late settle for a superseded transition is ignored.

use std::fmt;

use serde_json::json;

use crate::analytics::Analytics;
use crate::error::{Error, Result};

/// Visual status of one member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberStatus {
    Active,
    /// Outgoing member kept visible during a cross-fade
    Previous,
    #[default]
    Inactive,
}

/// How the incoming member becomes visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleMode {
    /// Swap in the same call
    Immediate,
    /// Hold the outgoing member until [`TransitionEngine::settle`]
    Deferred,
}

/// Token for a pending deferred settle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleTicket {
    generation: u64,
    target: usize,
}

impl SettleTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Index of the member that becomes active on settle
    pub fn target(&self) -> usize {
        self.target
    }
}

/// Outcome of an activation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Target was already the current member
    Unchanged,
    /// Current member moved from `from` to `to` (indices)
    Changed {
        from: usize,
        to: usize,
        /// Present in deferred mode; settle it after the cross-fade delay
        settle: Option<SettleTicket>,
    },
}

impl Activation {
    pub fn is_changed(&self) -> bool {
        matches!(self, Activation::Changed { .. })
    }

    pub fn settle_ticket(&self) -> Option<SettleTicket> {
        match self {
            Activation::Changed { settle, .. } => *settle,
            Activation::Unchanged => None,
        }
    }
}

/// Something the engine can switch between
pub trait Member: Copy + Eq + fmt::Debug {
    /// Stable identifier (DOM id for pages)
    fn id(&self) -> String;
    /// Human-readable name for analytics
    fn label(&self) -> String;
}

impl Member for usize {
    fn id(&self) -> String {
        self.to_string()
    }

    fn label(&self) -> String {
        format!("Slide {}", self + 1)
    }
}

/// View-side hooks driven by the engine
pub trait Stage<M> {
    /// Reflect a member's new status
    fn set_status(&mut self, member: M, status: MemberStatus);

    /// Member just became visibly active: reset its scroll and replay its entry
    /// animations
    fn entered(&mut self, _member: M) {}
}

/// Exclusive activation state for a fixed member set
#[derive(Debug, Clone)]
pub struct TransitionEngine<M> {
    members: Vec<M>,
    statuses: Vec<MemberStatus>,
    current: usize,
    generation: u64,
    pending: Option<SettleTicket>,
    mode: SettleMode,
    navigation_event: Option<&'static str>,
}

impl<M: Member> TransitionEngine<M> {
    /// Create an engine with `initial` active. Fails if `initial` is not a member.
    pub fn new(members: Vec<M>, initial: M, mode: SettleMode) -> Result<Self> {
        let current = members
            .iter()
            .position(|m| *m == initial)
            .ok_or_else(|| Error::NotFound(initial.id()))?;

        let mut statuses = vec![MemberStatus::Inactive; members.len()];
        statuses[current] = MemberStatus::Active;

        Ok(Self {
            members,
            statuses,
            current,
            generation: 0,
            pending: None,
            mode,
            navigation_event: None,
        })
    }

    /// Report every change under `event`
    pub fn with_navigation_event(mut self, event: &'static str) -> Self {
        self.navigation_event = Some(event);
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[M] {
        &self.members
    }

    /// Logical current member (moves before a deferred settle)
    pub fn current(&self) -> M {
        self.members[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn position(&self, member: M) -> Option<usize> {
        self.members.iter().position(|m| *m == member)
    }

    pub fn status(&self, member: M) -> Option<MemberStatus> {
        self.position(member).map(|i| self.statuses[i])
    }

    pub fn status_at(&self, index: usize) -> Option<MemberStatus> {
        self.statuses.get(index).copied()
    }

    /// Number of members currently shown as active
    pub fn active_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|s| **s == MemberStatus::Active)
            .count()
    }

    /// A deferred settle is outstanding
    pub fn is_settling(&self) -> bool {
        self.pending.is_some()
    }

    /// Make `target` the current member
    pub fn activate<S: Stage<M>>(
        &mut self,
        target: M,
        stage: &mut S,
        analytics: &Analytics,
    ) -> Result<Activation> {
        let index = self
            .position(target)
            .ok_or_else(|| Error::NotFound(target.id()))?;
        self.activate_index(index, stage, analytics)
    }

    /// Make the member at `index` the current member
    pub fn activate_index<S: Stage<M>>(
        &mut self,
        index: usize,
        stage: &mut S,
        analytics: &Analytics,
    ) -> Result<Activation> {
        let Some(&target) = self.members.get(index) else {
            return Err(Error::NotFound(index.to_string()));
        };
        if index == self.current {
            return Ok(Activation::Unchanged);
        }

        let from = self.current;
        let outgoing = self.members[from];

        if let Some(event) = self.navigation_event {
            analytics.report(
                event,
                json!({
                    "from_page": outgoing.id(),
                    "from_page_name": outgoing.label(),
                    "to_page": target.id(),
                    "to_page_name": target.label(),
                }),
            );
        }

        self.generation += 1;
        self.current = index;

        let settle = match self.mode {
            SettleMode::Immediate => {
                self.set_status(from, MemberStatus::Inactive, stage);
                self.set_status(index, MemberStatus::Active, stage);
                stage.entered(target);
                self.pending = None;
                None
            }
            SettleMode::Deferred => {
                if self.statuses[from] == MemberStatus::Active {
                    self.set_status(from, MemberStatus::Previous, stage);
                }
                let ticket = SettleTicket {
                    generation: self.generation,
                    target: index,
                };
                self.pending = Some(ticket);
                Some(ticket)
            }
        };

        log::debug!("Transition {:?} -> {:?}", outgoing, target);
        Ok(Activation::Changed {
            from,
            to: index,
            settle,
        })
    }

    /// Finish a deferred transition. Returns false for a stale or unknown ticket.
    pub fn settle<S: Stage<M>>(&mut self, ticket: SettleTicket, stage: &mut S) -> bool {
        if self.pending != Some(ticket) {
            log::debug!(
                "Ignoring stale settle (generation {}, latest {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.pending = None;

        for i in 0..self.statuses.len() {
            if self.statuses[i] == MemberStatus::Previous {
                self.set_status(i, MemberStatus::Inactive, stage);
            }
        }
        self.set_status(ticket.target, MemberStatus::Active, stage);
        stage.entered(self.members[ticket.target]);
        true
    }

    fn set_status<S: Stage<M>>(&mut self, index: usize, status: MemberStatus, stage: &mut S) {
        self.statuses[index] = status;
        stage.set_status(self.members[index], status);
    }
}
