//! PDF backend built on `hayro`
//!
//! Pages are rendered at `RenderConfig::scale` (1.0 is 72 dpi) and
//! flattened to opaque RGB.

use std::path::Path;
use std::sync::Arc;

use hayro::{render, InterpreterSettings, Pdf, RenderSettings};

use crate::error::{Error, Result};
use crate::rendering::{raster, PixelBuffer};
use crate::{Document, RenderConfig};

pub struct PdfDocument {
    pdf: Pdf,
    page_count: usize,
    scale: f32,
}

impl PdfDocument {
    pub fn open(path: &Path, config: &RenderConfig) -> Result<Self> {
        let open_err = |reason: String| Error::OpenError {
            path: path.display().to_string(),
            reason,
        };
        let data = std::fs::read(path).map_err(|e| open_err(e.to_string()))?;
        let pdf = Pdf::new(Arc::new(data)).map_err(|e| open_err(format!("{:?}", e)))?;
        let page_count = pdf.pages().iter().count();
        log::debug!("opened {} ({} pages)", path.display(), page_count);
        Ok(Self { pdf, page_count, scale: config.scale })
    }
}

impl Document for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn rasterize(&self, page: usize) -> Result<PixelBuffer> {
        let count = self.page_count;
        let pages = self.pdf.pages();
        let target = pages
            .iter()
            .nth(page)
            .ok_or(Error::PageOutOfRange { page, count })?;

        let render_settings = RenderSettings {
            x_scale: self.scale,
            y_scale: self.scale,
            ..Default::default()
        };
        let pixmap = render(target, &InterpreterSettings::default(), &render_settings);
        let buf = raster::from_premultiplied_rgba(
            u32::from(pixmap.width()),
            u32::from(pixmap.height()),
            pixmap.data_as_u8_slice(),
        )?;
        log::debug!("rendered page {} at {}x{}", page, buf.width(), buf.height());
        Ok(buf)
    }
}
