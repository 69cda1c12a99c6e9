//! Terminal UI module using ratatui.
//!
//! - `render`: Main frame rendering, layout, and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `views`: Per-view content rendering (list, edit, create)

pub mod input;
pub mod render;
pub mod styles;
pub mod views;
