//! Compositor implementation.
//!
//! The compositor assumes a validated [`BlendConfig`]: placements outside the
//! base are clipped rather than reported, and no size rule is re-checked.

use crate::compositor::blend::blend_pixel;
use crate::compositor::progress::{ProgressCallback, ProgressTracker, ProgressUpdate};
use crate::compositor::tiling::placement_origins;
use crate::core::config::BlendConfig;
use crate::core::types::Raster;
use image::{Rgb, RgbImage};
use log::{debug, info};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

/// Bytes per pixel of the opaque output canvas.
const CHANNELS: usize = 3;

/// Compositing options.
#[derive(Clone)]
pub struct CompositeOptions {
    /// Whether to blend rows on the rayon thread pool.
    pub parallel: bool,
    /// Progress callback.
    pub progress_callback: Option<Arc<ProgressCallback>>,
}

impl std::fmt::Debug for CompositeOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeOptions")
            .field("parallel", &self.parallel)
            .field("progress_callback", &self.progress_callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            progress_callback: None,
        }
    }
}

impl CompositeOptions {
    /// Create a new options builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable/disable parallel row blending.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set progress callback.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(Box::new(callback)));
        self
    }
}

/// Blends a watermark over a base image.
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    options: CompositeOptions,
}

impl Compositor {
    /// Create a compositor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compositor with the given options.
    pub fn with_options(options: CompositeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompositeOptions {
        &self.options
    }

    /// Produce the watermarked image.
    ///
    /// The output is a new opaque buffer the size of `base`. In grid mode
    /// every tile is applied to the output of the previous one, in row-major
    /// order; ownership of the canvas moves through the fold.
    pub fn composite(&self, base: &Raster, watermark: &Raster, config: &BlendConfig) -> RgbImage {
        let start = Instant::now();
        let origins =
            placement_origins(config.placement, base.dimensions(), watermark.dimensions());
        debug!(
            "compositing {}x{} watermark over {}x{} image, {} tile(s), weight {}",
            watermark.width(),
            watermark.height(),
            base.width(),
            base.height(),
            origins.len(),
            config.weight
        );

        let mut tracker = ProgressTracker::new(origins.len())
            .with_callback(self.options.progress_callback.clone());
        tracker.start();

        let output = origins.into_iter().fold(base.to_rgb8(), |canvas, origin| {
            let canvas = self.apply_tile(canvas, watermark, config, origin);
            tracker.tile_completed(origin);
            canvas
        });

        tracker.complete();
        info!(
            "composited {} in {}ms",
            config.placement,
            start.elapsed().as_millis()
        );
        output
    }

    /// Blend one copy of `watermark` with its top-left corner at `origin`.
    ///
    /// Only pixels inside the watermark window clipped to the canvas are
    /// touched; every other pixel already equals the base.
    pub fn apply_tile(
        &self,
        mut canvas: RgbImage,
        watermark: &Raster,
        config: &BlendConfig,
        origin: (u32, u32),
    ) -> RgbImage {
        let (x0, y0) = origin;
        let x1 = x0.saturating_add(watermark.width()).min(canvas.width());
        let y1 = y0.saturating_add(watermark.height()).min(canvas.height());
        if x0 >= x1 || y0 >= y1 {
            return canvas;
        }

        let stride = canvas.width() as usize * CHANNELS;
        let window = TileWindow { x0, x1, y0 };
        let rows_to_skip = y0 as usize;
        let rows_to_take = (y1 - y0) as usize;
        let blend_row = |(y, row): (usize, &mut [u8])| {
            window.blend_row(row, y as u32, watermark, config);
        };

        let buffer: &mut [u8] = &mut canvas;
        if self.options.parallel {
            buffer
                .par_chunks_mut(stride)
                .enumerate()
                .skip(rows_to_skip)
                .take(rows_to_take)
                .for_each(blend_row);
        } else {
            buffer
                .chunks_mut(stride)
                .enumerate()
                .skip(rows_to_skip)
                .take(rows_to_take)
                .for_each(blend_row);
        }

        canvas
    }
}

/// Horizontal extent of a tile on the canvas plus its top edge.
#[derive(Debug, Clone, Copy)]
struct TileWindow {
    x0: u32,
    x1: u32,
    y0: u32,
}

impl TileWindow {
    fn blend_row(&self, row: &mut [u8], y: u32, watermark: &Raster, config: &BlendConfig) {
        let wy = y - self.y0;
        for x in self.x0..self.x1 {
            let wx = x - self.x0;
            let i = x as usize * CHANNELS;
            let base = Rgb([row[i], row[i + 1], row[i + 2]]);
            let out = blend_pixel(base, watermark.rgb(wx, wy), watermark.alpha(wx, wy), config);
            row[i..i + CHANNELS].copy_from_slice(&out.0);
        }
    }
}
