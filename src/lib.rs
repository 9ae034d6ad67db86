//! A stand-in for a Live2D model loader.
//!
//! [`Live2DModel::from`] resolves a `model3.json` style settings document and builds a
//! [`PlaceholderModel`]: a cartoon face drawn from a handful of circles through a [`Surface`],
//! with canned motions and expressions driven by timers on the current tokio runtime.
//! No Cubism data is ever parsed or deformed.

pub mod fetch;
pub mod formats;
pub mod live2d;
pub mod math;
pub mod model;
pub mod settings;
pub mod surface;
pub mod texture;
pub mod timer;

pub use fetch::{LoadError, Loader, LoaderConfig};
pub use live2d::{FromError, FromOptions, Live2DModel, ModelSource};
pub use model::{Expression, Motion, PlaceholderModel, RenderSetupError};
pub use settings::{CubismGeneration, ModelSettings};
pub use surface::{RecordingSurface, Surface};
