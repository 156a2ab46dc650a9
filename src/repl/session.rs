//! Nested Sessions
//!
//! Each running loop owns one [`Session`] on the [`SessionStack`]. A
//! [`BreakoutSignal`] names the level of the session that should finish;
//! every loop above it pops itself and passes the signal on.

use super::error::{ReplError, Result};
use super::value::Value;

/// Session identifier, unique for the life of the stack
pub type SessionId = u64;

/// One running read-eval-print loop
#[derive(Debug, Clone)]
pub struct Session {
    /// Identifier
    pub id: SessionId,
    /// Position on the stack; the outermost session is level 0
    pub depth: usize,
    /// What expressions are evaluated against
    pub target: Value,
    /// Stack position of the enclosing session
    pub parent: Option<usize>,
}

/// Request to unwind nested sessions.
///
/// The session at `target_depth` finishes and returns normally; every
/// session nested inside it is popped on the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakoutSignal {
    pub target_depth: usize,
}

impl BreakoutSignal {
    /// Finish the session at `depth`
    pub fn to_depth(depth: usize) -> Self {
        Self {
            target_depth: depth,
        }
    }
}

/// The ordered stack of running sessions
#[derive(Debug, Default)]
pub struct SessionStack {
    sessions: Vec<Session>,
    next_id: SessionId,
}

impl SessionStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session on `target` above the current one
    pub fn push(
        &mut self,
        target: Value,
    ) -> &Session {
        let depth = self.sessions.len();
        let id = self.next_id;
        self.next_id += 1;
        self.sessions.push(Session {
            id,
            depth,
            target,
            parent: depth.checked_sub(1),
        });
        &self.sessions[depth]
    }

    /// Remove the innermost session
    pub fn pop(&mut self) -> Option<Session> {
        self.sessions.pop()
    }

    /// Number of running sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is running
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Level of the innermost session
    pub fn level(&self) -> Option<usize> {
        self.sessions.len().checked_sub(1)
    }

    /// The innermost session
    pub fn current(&self) -> Option<&Session> {
        self.sessions.last()
    }

    /// Session at `depth`
    pub fn get(
        &self,
        depth: usize,
    ) -> Option<&Session> {
        self.sessions.get(depth)
    }

    /// The session enclosing `session`
    pub fn parent_of(
        &self,
        session: &Session,
    ) -> Option<&Session> {
        session.parent.and_then(|depth| self.sessions.get(depth))
    }

    /// Outermost first
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    /// A signal that finishes the session at `depth`, checked against
    /// the running sessions.
    pub fn breakout_to(
        &self,
        depth: usize,
    ) -> Result<BreakoutSignal> {
        match self.level() {
            Some(level) if depth <= level => Ok(BreakoutSignal::to_depth(depth)),
            Some(level) => Err(ReplError::malformed(format!(
                "Invalid nest level. Must be between 0 and {}. Got {}.",
                level, depth
            ))),
            None => Err(ReplError::malformed("No session is running")),
        }
    }
}
