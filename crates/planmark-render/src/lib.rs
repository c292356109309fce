//! Planmark Render Library
//!
//! Overlay surface abstraction and the render pipeline that projects
//! document-space annotations into screen space. Any 2D graphics API can
//! back the overlay by implementing [`DrawSurface`].

mod pipeline;
mod recording;
mod surface;

pub use pipeline::{render_overlay, BASE_TEXT_SIZE};
pub use recording::{DrawCmd, RecordingSurface};
pub use surface::{DrawSurface, Stroke};
