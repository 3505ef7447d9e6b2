pub mod context;

pub use context::{DrawCommand, RenderContext};
