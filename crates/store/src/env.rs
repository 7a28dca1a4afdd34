//! Environment collaborators: who is calling, and at what position.

use std::sync::atomic::{AtomicU64, Ordering};
use tessera_core::{Position, Principal};

/// Supplies the verified acting principal for a call.
pub trait IdentitySource {
    fn caller(&self) -> Principal;
}

/// Supplies the monotonically increasing position recorded at registration.
pub trait PositionSource {
    fn current_position(&self) -> Position;
}

/// Everything the registry needs from the environment for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
    pub position: Position,
}

impl CallContext {
    pub const fn new(caller: Principal, position: Position) -> Self {
        Self { caller, position }
    }

    /// Reads both sources once.
    pub fn capture<I, P>(identity: &I, positions: &P) -> Self
    where
        I: IdentitySource + ?Sized,
        P: PositionSource + ?Sized,
    {
        Self {
            caller: identity.caller(),
            position: positions.current_position(),
        }
    }
}

/// Identity source that always answers with the same principal.
#[derive(Debug, Clone, Copy)]
pub struct FixedIdentity(pub Principal);

impl IdentitySource for FixedIdentity {
    fn caller(&self) -> Principal {
        self.0
    }
}

/// Position source that hands out `start, start + 1, ...`, one per read.
#[derive(Debug)]
pub struct SequentialPositions {
    next: AtomicU64,
}

impl SequentialPositions {
    pub fn starting_at(start: Position) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Raises the next value to at least `floor`; never lowers it.
    pub fn advance_to(&self, floor: Position) {
        self.next.fetch_max(floor, Ordering::Relaxed);
    }

    /// Accepts an externally supplied `position` if it is not below the next
    /// value and moves past it. Otherwise returns the next value unchanged.
    pub fn claim(&self, position: Position) -> Result<Position, Position> {
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |next| {
                (position >= next).then(|| position.saturating_add(1))
            })
            .map(|_| position)
    }
}

impl Default for SequentialPositions {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl PositionSource for SequentialPositions {
    fn current_position(&self) -> Position {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
