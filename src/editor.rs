//! The edit pipeline.
//!
//! One request runs strictly in sequence:
//!
//! fetch image → decode → resize → fetch logo → gradient → logo →
//! text layout → text render → flatten → encode
//!
//! Any failing step aborts the rest; no partial image is ever produced, and a
//! base image that cannot be decoded never costs a logo download. Downloads
//! run on the async runtime; decoding and compositing run on blocking threads
//! since they are CPU-bound.

use image::DynamicImage;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

use crate::compositor::{build_vertical_gradient, parse_hex_color, Backdrop, Canvas, Color};
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::fetcher::{decode_image, AssetSource, FetcherConfig, HttpAssetSource, SourceLimits};
use crate::layout::{compute_block_placement, layout_text_block, FontFace, ImageDimensions};
use crate::metrics::EditorMetrics;

/// JSON body of `POST /edit_image`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EditRequest {
    pub image_url: Option<String>,
    pub text: Option<String>,
    pub logo_url: Option<String>,
    /// Draw a backdrop behind the caption; falls back to the configured default
    pub backdrop: Option<bool>,
}

impl EditRequest {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: Some(image_url.into()),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_logo_url(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }

    pub fn with_backdrop(mut self, backdrop: bool) -> Self {
        self.backdrop = Some(backdrop);
        self
    }
}

/// A finished JPEG.
#[derive(Debug, Clone)]
pub struct EditedImage {
    pub data: Vec<u8>,
    pub content_type: &'static str,
}

/// Request with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedRequest {
    image_url: String,
    logo_url: String,
    text: String,
    backdrop: bool,
}

/// Runs the edit pipeline against shared, read-only state.
pub struct ImageEditor {
    config: EditorConfig,
    source: Arc<dyn AssetSource>,
    font: Result<Arc<FontFace>, EditorError>,
    text_color: Color,
}

impl ImageEditor {
    /// Build an editor with an explicit asset source and font.
    ///
    /// A font error is kept and reported by every subsequent edit, so the
    /// service can start without a usable font.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Internal` if the configured text color is invalid.
    pub fn new(
        config: EditorConfig,
        source: Arc<dyn AssetSource>,
        font: Result<FontFace, EditorError>,
    ) -> Result<Self, EditorError> {
        let text_color = parse_hex_color(&config.text.color)
            .map_err(|e| EditorError::Internal(format!("text color: {}", e)))?;

        Ok(Self {
            config,
            source,
            font: font.map(Arc::new),
            text_color,
        })
    }

    /// Build an editor that downloads over HTTP and loads its font from the
    /// configured candidates.
    pub fn from_config(config: EditorConfig) -> Result<Self, EditorError> {
        let source = HttpAssetSource::new(FetcherConfig::from_editor_config(&config))?;

        let font = FontFace::load_first(&config.font_candidates(), config.text.font_size);
        match &font {
            Ok(face) => tracing::info!(
                font = %face.source().map(|p| p.display().to_string()).unwrap_or_default(),
                size = face.size(),
                "Font loaded"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                "No usable font; edit requests will fail until one is configured"
            ),
        }

        Self::new(config, Arc::new(source), font)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn has_font(&self) -> bool {
        self.font.is_ok()
    }

    fn resolve(&self, request: EditRequest) -> Result<ResolvedRequest, EditorError> {
        let image_url = request
            .image_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| EditorError::InvalidRequest("image_url is required".to_string()))?;

        Ok(ResolvedRequest {
            image_url,
            logo_url: request
                .logo_url
                .unwrap_or_else(|| self.config.default_logo_url.clone()),
            text: request
                .text
                .unwrap_or_else(|| self.config.default_text.clone()),
            backdrop: request.backdrop.unwrap_or(self.config.backdrop.enabled),
        })
    }

    /// Run the full pipeline for one request.
    pub async fn edit(&self, request: EditRequest) -> Result<EditedImage, EditorError> {
        let started = Instant::now();
        let result = self.run(request).await;

        let metrics = EditorMetrics::global();
        metrics
            .edit_duration
            .observe(started.elapsed().as_secs_f64());
        if let Err(e) = &result {
            metrics.record_edit_error(e.kind());
        }

        result
    }

    async fn run(&self, request: EditRequest) -> Result<EditedImage, EditorError> {
        let request = self.resolve(request)?;
        let font = self.font.clone()?;
        let limits = SourceLimits::from_editor_config(&self.config);
        let metrics = EditorMetrics::global();

        let image_bytes = self.source.fetch(&request.image_url).await?;
        metrics.fetched_bytes.inc_by(image_bytes.len() as u64);
        tracing::debug!(
            image_url = %request.image_url,
            bytes = image_bytes.len(),
            "Source image fetched"
        );

        let canvas_size = self.config.canvas_size;
        let canvas = run_blocking(move || {
            let base = decode_image(&image_bytes, &limits)?;
            Canvas::from_source(&base, canvas_size)
        })
        .await?;

        let logo_bytes = self.source.fetch(&request.logo_url).await?;
        metrics.fetched_bytes.inc_by(logo_bytes.len() as u64);
        tracing::debug!(
            logo_url = %request.logo_url,
            bytes = logo_bytes.len(),
            "Logo fetched"
        );

        let config = self.config.clone();
        let color = self.text_color;
        let data = run_blocking(move || {
            let logo = decode_image(&logo_bytes, &limits)?;
            compose_onto(
                canvas,
                &config,
                &font,
                color,
                &logo,
                &request.text,
                request.backdrop,
            )
        })
        .await?;

        Ok(EditedImage {
            data,
            content_type: "image/jpeg",
        })
    }
}

/// Run CPU-bound work on the blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T, EditorError>
where
    F: FnOnce() -> Result<T, EditorError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| EditorError::Internal(format!("compositing task failed: {}", e)))?
}

/// Composite `logo` and `text` onto `base` and encode the result as JPEG.
pub fn compose(
    config: &EditorConfig,
    font: &FontFace,
    color: Color,
    base: &DynamicImage,
    logo: &DynamicImage,
    text: &str,
    backdrop: bool,
) -> Result<Vec<u8>, EditorError> {
    let canvas = Canvas::from_source(base, config.canvas_size)?;
    compose_onto(canvas, config, font, color, logo, text, backdrop)
}

/// Everything after the resize: gradient, logo, caption, encode.
pub fn compose_onto(
    mut canvas: Canvas,
    config: &EditorConfig,
    font: &FontFace,
    color: Color,
    logo: &DynamicImage,
    text: &str,
    backdrop: bool,
) -> Result<Vec<u8>, EditorError> {
    let band_height = config
        .gradient
        .band_height_for(canvas.height())
        .min(canvas.height());
    let gradient = build_vertical_gradient(canvas.width(), band_height, config.gradient.max_alpha);
    canvas.apply_darkening_overlay(&gradient);

    let logo_size = ImageDimensions::new(config.logo.width, config.logo.height);
    let logo_pos = canvas.place_logo(logo, logo_size, config.logo.offset_from_bottom)?;

    let block = layout_text_block(text, font, config.max_text_width());
    let placement = compute_block_placement(
        block.line_count(),
        block.line_height,
        logo_pos.y,
        config.text.gap_above_logo,
    );
    tracing::debug!(
        lines = block.line_count(),
        line_height = block.line_height,
        top_y = placement.top_y,
        "Caption laid out"
    );

    let backdrop = backdrop.then_some(Backdrop {
        alpha: config.backdrop.alpha,
        padding: config.backdrop.padding,
    });
    canvas.render_text_block(&block, font, placement.top_y, color, backdrop);

    canvas.finalize(config.jpeg_quality)
}
