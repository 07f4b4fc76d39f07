//! Image viewer: data URL, dimensions, zoom and fit
//!
//! Objects arrive base64-encoded from the gateway. Raster formats are
//! decoded only far enough to read their dimensions; SVG is passed through.

use base64::Engine;
use image::ImageReader;
use std::io::Cursor;

pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.25;

/// MIME type for an image key, by extension
pub fn mime_type(file_name: &str) -> &'static str {
    match crate::classify::extension(file_name).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageViewer {
    pub file_name: String,
    encoded: String,
    mime: String,
    zoom: f32,
    /// Scale down to the pane instead of showing natural size
    pub fit: bool,
}

impl ImageViewer {
    /// `content_type` wins over the extension when it names an image type
    pub fn new(file_name: impl Into<String>, encoded: impl Into<String>, content_type: Option<&str>) -> Self {
        let file_name = file_name.into();
        let mime = match content_type {
            Some(ct) if ct.starts_with("image/") => ct.to_string(),
            _ => mime_type(&file_name).to_string(),
        };
        Self {
            file_name,
            encoded: encoded.into(),
            mime,
            zoom: 1.0,
            fit: true,
        }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Inline `data:` URL for an `<img>` source
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.encoded)
    }

    fn bytes(&self) -> Option<Vec<u8>> {
        base64::engine::general_purpose::STANDARD.decode(&self.encoded).ok()
    }

    /// Size of the decoded object in bytes
    pub fn file_size(&self) -> usize {
        self.bytes().map(|b| b.len()).unwrap_or(0)
    }

    /// Pixel dimensions, when the format can be read
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let bytes = self.bytes()?;
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format().ok()?;
        match reader.into_dimensions() {
            Ok(dims) => Some(dims),
            Err(e) => {
                tracing::debug!("Could not read dimensions of {}: {}", self.file_name, e);
                None
            }
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom < MAX_ZOOM
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom > MIN_ZOOM
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(MIN_ZOOM);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    pub fn toggle_fit(&mut self) {
        self.fit = !self.fit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, RgbImage};

    fn png_base64(width: u32, height: u32) -> String {
        let img: RgbImage = ImageBuffer::from_fn(width, height, |_x, _y| image::Rgb([255u8, 0u8, 0u8]));
        let mut png_data: Vec<u8> = Vec::new();
        img.write_to(&mut Cursor::new(&mut png_data), ImageFormat::Png).unwrap();
        base64::engine::general_purpose::STANDARD.encode(png_data)
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type("a.PNG"), "image/png");
        assert_eq!(mime_type("a.jpeg"), "image/jpeg");
        assert_eq!(mime_type("icon.svg"), "image/svg+xml");
        assert_eq!(mime_type("blob"), "application/octet-stream");
    }

    #[test]
    fn test_content_type_wins() {
        let viewer = ImageViewer::new("photo", "AAAA", Some("image/webp"));
        assert_eq!(viewer.mime(), "image/webp");
        let viewer = ImageViewer::new("photo.png", "AAAA", Some("binary/octet-stream"));
        assert_eq!(viewer.mime(), "image/png");
    }

    #[test]
    fn test_data_url() {
        let viewer = ImageViewer::new("a.gif", "R0lGOD", None);
        assert_eq!(viewer.data_url(), "data:image/gif;base64,R0lGOD");
    }

    #[test]
    fn test_png_dimensions() {
        let viewer = ImageViewer::new("red.png", png_base64(3, 2), None);
        assert_eq!(viewer.dimensions(), Some((3, 2)));
        assert!(viewer.file_size() > 0);
    }

    #[test]
    fn test_svg_and_garbage_have_no_dimensions() {
        let svg = base64::engine::general_purpose::STANDARD.encode("<svg xmlns=\"http://www.w3.org/2000/svg\"/>");
        assert_eq!(ImageViewer::new("a.svg", svg, None).dimensions(), None);
        assert_eq!(ImageViewer::new("a.png", "not base64!", None).dimensions(), None);
    }

    #[test]
    fn test_zoom_bounds() {
        let mut viewer = ImageViewer::new("a.png", "", None);
        assert_eq!(viewer.zoom_percent(), 100);

        for _ in 0..20 {
            viewer.zoom_in();
        }
        assert_eq!(viewer.zoom(), 3.0);
        assert!(!viewer.can_zoom_in());

        for _ in 0..20 {
            viewer.zoom_out();
        }
        assert_eq!(viewer.zoom_percent(), 25);
        assert!(!viewer.can_zoom_out());

        viewer.reset_zoom();
        viewer.zoom_in();
        assert_eq!(viewer.zoom_percent(), 125);
    }

    #[test]
    fn test_fit_toggle() {
        let mut viewer = ImageViewer::new("a.png", "", None);
        assert!(viewer.fit);
        viewer.toggle_fit();
        assert!(!viewer.fit);
    }
}
