//! Gesture ownership
//!
//! The active glyph's command table has a single writer. A gesture takes
//! the [`GestureLock`] when it starts and holds it through a
//! [`GestureGuard`] until it ends, is cancelled or is torn down; dropping
//! the guard always releases the lock.

use kurbo::{Point, Vec2};
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

/// What currently owns the outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    PointDrag,
    Transform,
    Freehand,
}

/// Single-writer lock over the active glyph
#[derive(Debug, Clone, Default)]
pub struct GestureLock {
    owner: Rc<Cell<Option<GestureKind>>>,
}

impl GestureLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock for `kind`, or `None` while another gesture holds it
    pub fn try_acquire(&self, kind: GestureKind) -> Option<GestureGuard> {
        if let Some(owner) = self.owner.get() {
            debug!("Gesture {:?} refused, {:?} owns the outline", kind, owner);
            return None;
        }
        self.owner.set(Some(kind));
        Some(GestureGuard {
            owner: Rc::clone(&self.owner),
            kind,
        })
    }

    pub fn owner(&self) -> Option<GestureKind> {
        self.owner.get()
    }

    pub fn is_held(&self) -> bool {
        self.owner.get().is_some()
    }
}

/// Proof of ownership; releases the lock on drop
#[derive(Debug)]
pub struct GestureGuard {
    owner: Rc<Cell<Option<GestureKind>>>,
    kind: GestureKind,
}

impl GestureGuard {
    pub fn kind(&self) -> GestureKind {
        self.kind
    }
}

impl Drop for GestureGuard {
    fn drop(&mut self) {
        if self.owner.get() == Some(self.kind) {
            self.owner.set(None);
        }
    }
}

/// One pointer gesture, from pointer-down to pointer-up.
///
/// Moves are reported as the total displacement from the origin. After
/// [`DragSession::cancel`] the lock is gone and no further move is
/// processed.
#[derive(Debug)]
pub struct DragSession {
    guard: Option<GestureGuard>,
    kind: GestureKind,
    origin: Point,
    current: Point,
}

impl DragSession {
    pub fn begin(lock: &GestureLock, kind: GestureKind, origin: Point) -> Option<Self> {
        let guard = lock.try_acquire(kind)?;
        debug!("Drag session started: {:?} at ({}, {})", kind, origin.x, origin.y);
        Some(Self {
            guard: Some(guard),
            kind,
            origin,
            current: origin,
        })
    }

    /// Record a move and return the total displacement since the origin
    pub fn update(&mut self, pointer: Point) -> Option<Vec2> {
        if self.guard.is_none() {
            return None;
        }
        self.current = pointer;
        Some(pointer - self.origin)
    }

    /// Stop processing moves and release the lock
    pub fn cancel(&mut self) {
        if self.guard.take().is_some() {
            debug!("Drag session cancelled: {:?}", self.kind);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.guard.is_none()
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn current(&self) -> Point {
        self.current
    }

    pub fn delta(&self) -> Vec2 {
        self.current - self.origin
    }
}
