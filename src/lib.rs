//! Reactive core for interactive tomography visualization demos.
//!
//! One UI control parameter is bound to one property of an externally-owned
//! rendering pipeline (an isosurface threshold or a Gaussian-smoothing sigma).
//! Every parameter change deterministically produces exactly one pipeline
//! mutation and one redraw request; rapid changes coalesce to the latest value.
//!
//! Rendering itself (Flying Edges extraction, volume ray-casting, Gaussian
//! filtering) is delegated to a native visualization library behind the traits
//! in [`backend`]; this crate only does the parameter wiring, dataset fetching
//! and volume decoding around it.

pub mod backend;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod transfer;
pub mod volume;

pub use error::{Result, TomoError};
pub use params::ControlParameter;
pub use pipeline::{ParameterPipeline, UpdateOutcome};
