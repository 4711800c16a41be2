#![forbid(unsafe_code)]

//! Rating record model, render options and slate design constants.
//!
//! This crate is deliberately I/O-free: it defines the data that flows between
//! the resolver (`slategen-esrb`), the layout/compositing engine
//! (`slategen-render`) and the CLI, plus the validation rules those layers
//! share (aspect-ratio bounds, sentinel filtering, category/asset mapping).

pub mod design;
pub mod options;
pub mod record;

pub use design::SlateDesign;
pub use options::{
    AspectRatio, OutputFormat, RatioError, RatioRequest, RenderOptions, ResolutionTier,
};
pub use record::{CategoryParseError, RatingCategory, RatingRecord};
