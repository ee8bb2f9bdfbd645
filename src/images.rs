//! Image retrieval and decoding for `image` elements.
//!
//! Retrieval is a collaborator concern: an [`ImageSource`] turns a reference into
//! raw encoded bytes or nothing. Decoding to RGBA and the optional nearest-neighbor
//! resize happen here, before the compositor ever sees the bitmap.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use image::imageops::FilterType;
use image::RgbaImage;
use log::debug;

use crate::{Error, Result};

/// Where an image element's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Path(PathBuf),
    Url(String),
}

/// Resolves image references to encoded bytes.
///
/// Implementations bound their own latency; `None` means "no image for this element".
pub trait ImageSource: Send + Sync {
    fn fetch<'a>(&'a self, reference: &'a ImageRef) -> BoxFuture<'a, Option<Vec<u8>>>;
}

/// Source that never yields an image.
pub struct NoImages;

impl ImageSource for NoImages {
    fn fetch<'a>(&'a self, _reference: &'a ImageRef) -> BoxFuture<'a, Option<Vec<u8>>> {
        async { None }.boxed()
    }
}

/// Reads image files from an allow-list of directories.
///
/// URL references are not resolved by this source.
pub struct FileImageSource {
    allowed: Vec<PathBuf>,
    timeout: Duration,
}

impl FileImageSource {
    pub fn new(allowed: Vec<PathBuf>, timeout_ms: u64) -> Self {
        Self {
            allowed,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn is_allowed(&self, path: &Path) -> bool {
        let Ok(path) = path.canonicalize() else {
            return false;
        };
        self.allowed.iter().any(|dir| {
            dir.canonicalize()
                .map(|d| path.starts_with(d))
                .unwrap_or(false)
        })
    }
}

impl ImageSource for FileImageSource {
    fn fetch<'a>(&'a self, reference: &'a ImageRef) -> BoxFuture<'a, Option<Vec<u8>>> {
        async move {
            let path = match reference {
                ImageRef::Path(p) => p,
                ImageRef::Url(url) => {
                    debug!("no fetcher for url {}", url);
                    return None;
                }
            };
            if !self.is_allowed(path) {
                debug!("image path {} is not in an allowed directory", path.display());
                return None;
            }
            match tokio::time::timeout(self.timeout, tokio::fs::read(path)).await {
                Ok(Ok(bytes)) => Some(bytes),
                Ok(Err(e)) => {
                    debug!("failed to read {}: {}", path.display(), e);
                    None
                }
                Err(_) => {
                    debug!("timed out reading {}", path.display());
                    None
                }
            }
        }
        .boxed()
    }
}

/// Decode encoded bytes to RGBA, nearest-neighbor resizing when a size is given.
pub fn decode(bytes: &[u8], size: Option<(u32, u32)>) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes).map_err(|e| Error::ImageError(e.to_string()))?;
    let rgba = img.to_rgba8();
    Ok(match size {
        Some((w, h)) if (w, h) != rgba.dimensions() => {
            image::imageops::resize(&rgba, w, h, FilterType::Nearest)
        }
        _ => rgba,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decode_resizes_nearest() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 128]));
        let out = decode(&png_bytes(&img), Some((4, 2))).unwrap();
        assert_eq!(out.dimensions(), (4, 2));
        assert_eq!(out.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(3, 0).0, [0, 0, 255, 128]);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode(b"not an image", None), Err(Error::ImageError(_))));
    }

    #[tokio::test]
    async fn file_source_enforces_allow_list() {
        let dir = std::env::temp_dir().join("pixmatrix-images-test");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("dot.png");
        std::fs::write(&file, png_bytes(&RgbaImage::new(1, 1))).unwrap();

        let allowed = FileImageSource::new(vec![dir.clone()], 1000);
        assert!(allowed.fetch(&ImageRef::Path(file.clone())).await.is_some());
        assert!(allowed
            .fetch(&ImageRef::Url("http://example.com/a.png".into()))
            .await
            .is_none());

        let denied = FileImageSource::new(vec![], 1000);
        assert!(denied.fetch(&ImageRef::Path(file)).await.is_none());
    }
}
