//! Pointer events and handler responses

use voxseg_core::Point3;

/// Interaction mode of the host application
///
/// A handler only reacts while the mode it was built for is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionMode {
    /// Camera navigation, no segmentation handler is active
    #[default]
    Navigate,
    /// Sample-driven automatic segmentation
    AutoSegmentation,
    /// Manual painting of region labels
    RegionPaint,
    /// Application-defined mode
    Custom(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Push,
    Drag,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Adds (paints, positive samples)
    Primary,
    /// Removes (erases, negative samples)
    Secondary,
}

/// Pointer event located in volume coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub button: PointerButton,
    pub point: Point3,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, button: PointerButton, point: Point3) -> Self {
        Self {
            kind,
            button,
            point,
        }
    }

    pub fn push(button: PointerButton, point: Point3) -> Self {
        Self::new(PointerEventKind::Push, button, point)
    }

    pub fn drag(button: PointerButton, point: Point3) -> Self {
        Self::new(PointerEventKind::Drag, button, point)
    }

    pub fn release(button: PointerButton, point: Point3) -> Self {
        Self::new(PointerEventKind::Release, button, point)
    }
}

/// Whether a handler consumed an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Handled,
    /// The event is left for other handlers
    PassThrough,
}

/// Summary of a completed stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrokeResult {
    /// Number of cells whose label was written
    pub modified: usize,
}

/// What a handler did with one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerResponse {
    pub outcome: EventOutcome,
    /// Set when the event completed a stroke
    pub stroke: Option<StrokeResult>,
}

impl HandlerResponse {
    pub fn pass_through() -> Self {
        Self {
            outcome: EventOutcome::PassThrough,
            stroke: None,
        }
    }

    pub fn handled() -> Self {
        Self {
            outcome: EventOutcome::Handled,
            stroke: None,
        }
    }

    pub fn completed(modified: usize) -> Self {
        Self {
            outcome: EventOutcome::Handled,
            stroke: Some(StrokeResult { modified }),
        }
    }

    pub fn is_handled(&self) -> bool {
        self.outcome == EventOutcome::Handled
    }

    /// Modified cell count of a completed stroke, 0 otherwise
    pub fn modified(&self) -> usize {
        self.stroke.map_or(0, |s| s.modified)
    }
}
