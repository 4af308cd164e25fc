use std::io::Write;

use crate::render_data::RenderFrame;
use crate::render_loop::{RenderError, Renderer};
use crate::Viewport;

/// Discards frames, keeping only counts.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: u64,
    pub viewport: Option<Viewport>,
}

impl Renderer for NullRenderer {
    fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        self.viewport = Some(viewport);
        Ok(())
    }

    fn render(&mut self, frame: &RenderFrame) -> Result<(), RenderError> {
        self.frames += 1;
        log::trace!("Frame {}: {} meshes", frame.frame_index, frame.meshes.len());
        Ok(())
    }
}

/// Writes every frame as one line of JSON, for an external draw process.
pub struct JsonFrameWriter<W: Write> {
    writer: W,
    frames: u64,
}

impl<W: Write> JsonFrameWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, frames: 0 }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for JsonFrameWriter<W> {
    fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        log::debug!("Frame output resized to {}x{}", viewport.width, viewport.height);
        Ok(())
    }

    fn render(&mut self, frame: &RenderFrame) -> Result<(), RenderError> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelview_core::{ViewerContext, ViewerOptions};

    #[test]
    fn test_json_writer_emits_one_line_per_frame() {
        let ctx = ViewerContext::new(ViewerOptions::default(), 0.0);
        let mut writer = JsonFrameWriter::new(Vec::new());
        for i in 0..3 {
            writer
                .render(&RenderFrame::capture(&ctx, Viewport::new(4, 3), i))
                .unwrap();
        }
        assert_eq!(writer.frames(), 3);

        let out = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        let last: RenderFrame = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last.frame_index, 2);
        assert_eq!(last.viewport, Viewport::new(4, 3));
    }

    #[test]
    fn test_null_renderer_counts() {
        let ctx = ViewerContext::new(ViewerOptions::default(), 0.0);
        let mut renderer = NullRenderer::default();
        renderer.resize(Viewport::new(2, 2)).unwrap();
        renderer
            .render(&RenderFrame::capture(&ctx, Viewport::new(2, 2), 0))
            .unwrap();
        assert_eq!(renderer.frames, 1);
        assert_eq!(renderer.viewport, Some(Viewport::new(2, 2)));
    }
}
