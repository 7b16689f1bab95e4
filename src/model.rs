//! Core value types for the swipe-to-delete gesture.
//! Everything here is plain data: no DOM handles, no timers.

use serde::Deserialize;

use crate::error::ConfigError;

/// Discrete swipe progress for one item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SwipeState {
    #[default]
    Idle,
    /// Delete affordance visible.
    Revealed,
    /// Releasing now asks for confirmation.
    Armed,
}

/// Distances in CSS pixels, measured leftwards from the touch origin.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub reveal: f64,
    pub arm: f64,
    /// Movement within +/- this band is ignored.
    pub deadband: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            reveal: 60.0,
            arm: 150.0,
            deadband: 10.0,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.reveal > 0.0) {
            return Err(ConfigError::NonPositiveReveal(self.reveal));
        }
        if !(self.arm > self.reveal) {
            return Err(ConfigError::ArmNotBeyondReveal {
                reveal: self.reveal,
                arm: self.arm,
            });
        }
        if !(self.deadband >= 0.0 && self.deadband < self.reveal) {
            return Err(ConfigError::DeadbandOutOfRange {
                deadband: self.deadband,
                reveal: self.reveal,
            });
        }
        Ok(())
    }

    /// State for a leftward displacement that is already past the dead band.
    pub fn classify(&self, diff: f64) -> SwipeState {
        if diff >= self.arm {
            SwipeState::Armed
        } else if diff >= self.reveal {
            SwipeState::Revealed
        } else {
            SwipeState::Idle
        }
    }
}

/// Vibration patterns, in milliseconds (on, off, on, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pulse {
    Reveal,
    Arm,
    Delete,
}

impl Pulse {
    pub fn pattern(self) -> &'static [u32] {
        match self {
            Pulse::Reveal => &[30],
            Pulse::Arm => &[50, 30, 50],
            Pulse::Delete => &[100, 50, 100],
        }
    }
}

/// What the tracker asks the outside world to do after a touch input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// Cancel any in-flight reset animation before a new gesture.
    Interrupt,
    /// Stop the browser from scrolling for this touch-move.
    PreventScroll,
    /// Translate the item `offset` px to the left, following the finger.
    Follow { offset: f64 },
    /// Show the affordance with the neutral glyph (also used when backing out of Armed).
    Reveal,
    /// Relabel the affordance as a delete button and mark the item armed.
    Arm,
    /// Hide the affordance again while the finger is still down.
    Conceal,
    Pulse(Pulse),
    /// Snap to `offset` px and leave the item swiped open.
    Hold { offset: f64 },
    /// Animate back to rest.
    Reset,
    /// Open the confirmation gate.
    Confirm,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
        }
    }
}

/// A single request handed to the server collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletionRequest {
    pub method: Method,
    pub target: String,
}

impl DeletionRequest {
    pub fn get(target: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            target: target.into(),
        }
    }
}
