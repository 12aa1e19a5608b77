//! Window visual state machine.
//!
//! Visibility (`Open` / `Minimized`) is crossed with an independent
//! `maximized` flag, giving three phases:
//!
//! ```text
//!   OpenNormal --minimize--> Minimized --restore--> OpenNormal
//!   OpenNormal <--toggle_maximize--> OpenMaximized
//!   OpenMaximized --minimize--> Minimized
//! ```
//!
//! Restoring always lands in `OpenNormal`. Dragging is only possible in
//! `OpenNormal`; pointer moves outside a drag are ignored.

use serde::{Deserialize, Serialize};

use crate::error::WindowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Open,
    Minimized,
}

/// Combined visibility and maximize state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPhase {
    OpenNormal,
    OpenMaximized,
    Minimized,
}

/// Pixel offset of the window, or of a pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Transient visual state of one window. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowState {
    visibility: Visibility,
    maximized: bool,
    position: Position,
    /// Pointer offset from `position`, present only while dragging.
    grab: Option<Position>,
}

impl WindowState {
    pub fn new(initial_minimized: bool) -> Self {
        Self {
            visibility: if initial_minimized {
                Visibility::Minimized
            } else {
                Visibility::Open
            },
            maximized: false,
            position: Position::default(),
            grab: None,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_minimized(&self) -> bool {
        self.visibility == Visibility::Minimized
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Whether document-level pointer events should be routed to this window.
    pub fn wants_pointer_events(&self) -> bool {
        self.is_dragging()
    }

    pub fn phase(&self) -> WindowPhase {
        match (self.visibility, self.maximized) {
            (Visibility::Minimized, _) => WindowPhase::Minimized,
            (Visibility::Open, true) => WindowPhase::OpenMaximized,
            (Visibility::Open, false) => WindowPhase::OpenNormal,
        }
    }

    pub fn minimize(&mut self) -> Result<(), WindowError> {
        if self.is_minimized() {
            return Err(WindowError::AlreadyMinimized);
        }
        self.visibility = Visibility::Minimized;
        self.grab = None;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<(), WindowError> {
        if !self.is_minimized() {
            return Err(WindowError::NotMinimized);
        }
        self.visibility = Visibility::Open;
        self.maximized = false;
        Ok(())
    }

    /// Flip between `OpenNormal` and `OpenMaximized`. Returns the new flag.
    pub fn toggle_maximize(&mut self) -> Result<bool, WindowError> {
        if self.is_minimized() {
            return Err(WindowError::Minimized);
        }
        self.maximized = !self.maximized;
        self.grab = None;
        Ok(self.maximized)
    }

    /// Re-derive visibility from the host's `minimized` prop.
    ///
    /// Used when the host reopens an instance (for example a tray restore).
    /// Returns whether visibility changed.
    pub fn sync_visibility(&mut self, minimized: bool) -> bool {
        let target = if minimized {
            Visibility::Minimized
        } else {
            Visibility::Open
        };
        if self.visibility == target {
            return false;
        }
        self.visibility = target;
        self.maximized = false;
        self.grab = None;
        true
    }

    /// Pointer pressed on the header.
    pub fn begin_drag(&mut self, pointer: Position) -> Result<(), WindowError> {
        if self.is_minimized() {
            return Err(WindowError::Minimized);
        }
        if self.maximized {
            return Err(WindowError::Maximized);
        }
        self.grab = Some(pointer - self.position);
        Ok(())
    }

    /// Pointer moved anywhere in the document. Returns whether the window moved.
    pub fn drag_to(&mut self, pointer: Position) -> bool {
        match self.grab {
            Some(grab) => {
                self.position = pointer - grab;
                true
            }
            None => false,
        }
    }

    /// Pointer released anywhere in the document.
    pub fn end_drag(&mut self) {
        self.grab = None;
    }
}
