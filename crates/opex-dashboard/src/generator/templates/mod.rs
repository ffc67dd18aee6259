//! Render functions turning a [`TemplateContext`](super::context::TemplateContext) into output text.

mod dashboard;
mod terraform;

pub use dashboard::render_dashboard;
pub use terraform::render_terraform;
