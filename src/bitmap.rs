//! Raster image files (PNG, PPM/PAM, JPEG, ...) opened as one-page documents

use std::path::Path;

use crate::error::{Error, Result};
use crate::rendering::{raster, PixelBuffer};
use crate::Document;

pub struct BitmapDocument {
    page: PixelBuffer,
}

impl BitmapDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path).map_err(|e| Error::OpenError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let page = raster::rgb_buffer(image)?;
        log::debug!("opened {} ({}x{})", path.display(), page.width(), page.height());
        Ok(Self { page })
    }
}

impl Document for BitmapDocument {
    fn page_count(&self) -> usize {
        1
    }

    fn rasterize(&self, page: usize) -> Result<PixelBuffer> {
        if page != 0 {
            return Err(Error::PageOutOfRange { page, count: 1 });
        }
        Ok(self.page.clone())
    }
}
