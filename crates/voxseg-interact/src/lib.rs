//! voxseg-interact - Pointer-driven segmentation handlers
//!
//! Two handlers turn pointer strokes into label changes:
//!
//! - [`SamplingHandler`] collects density samples along strokes and hands
//!   them to a [`Segmenter`] on release
//! - [`PaintHandler`] rasterizes strokes onto a slice with a paint tool
//!
//! Both implement [`EventHandler`] and stay inert outside their
//! [`InteractionMode`].

pub mod error;
pub mod event;
pub mod handler;
pub mod paint;
pub mod sampler;
pub mod segmenter;
pub mod training;

pub use error::{InteractError, InteractResult};
pub use event::{
    EventOutcome, HandlerResponse, InteractionMode, PointerButton, PointerEvent,
    PointerEventKind, StrokeResult,
};
pub use handler::{EventHandler, SamplingHandler, SegmentationContext};
pub use paint::{PaintHandler, PaintOptions, PaintTool, SliceOrientation};
pub use sampler::{MeanSampler, NeighbourhoodSampler, Sampler, VoxelValueSampler};
pub use segmenter::{
    ClusteringSegmenter, EmSegmenter, EmSegmenterOptions, RangeSegmenter, RangeSegmenterOptions,
    Segmenter,
};
pub use training::TrainingSet;
