use crate::AssetError;
use image::imageops::FilterType;
use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::Path;

/// A decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, row-major, no padding.
    pub rgba: Vec<u8>,
}

impl ImageData {
    /// A single opaque texel.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    fn to_buffer(&self) -> Option<RgbaImage> {
        ImageBuffer::<Rgba<u8>, _>::from_raw(self.width, self.height, self.rgba.clone())
    }
}

/// Decode an image file of any supported format into RGBA8.
///
/// One, three and four channel sources are all expanded to RGBA.
pub fn load_image(path: impl AsRef<Path>) -> Result<ImageData, AssetError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| match source {
        image::ImageError::IoError(source) => AssetError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => AssetError::Image {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let channels = img.color().channel_count();
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(
        "decoded {} ({width}x{height}, {channels} channels)",
        path.display()
    );
    Ok(ImageData {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Number of levels in a full mip chain down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Build the full mip chain for `base`, level 0 first.
pub fn mip_chain(base: &ImageData) -> Vec<ImageData> {
    let levels = mip_level_count(base.width, base.height);
    let mut chain = Vec::with_capacity(levels as usize);
    chain.push(base.clone());

    let Some(source) = base.to_buffer() else {
        tracing::warn!(
            "image buffer size does not match {}x{}; skipping mips",
            base.width,
            base.height
        );
        return chain;
    };

    for level in 1..levels {
        let w = (base.width >> level).max(1);
        let h = (base.height >> level).max(1);
        let resized = image::imageops::resize(&source, w, h, FilterType::Triangle);
        chain.push(ImageData {
            width: w,
            height: h,
            rgba: resized.into_raw(),
        });
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mip_level_counts() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(512, 512), 10);
        assert_eq!(mip_level_count(300, 17), 9);
        assert_eq!(mip_level_count(0, 0), 1);
    }

    #[test]
    fn mip_chain_halves_down_to_one() {
        let base = ImageData {
            width: 8,
            height: 2,
            rgba: vec![255; 8 * 2 * 4],
        };
        let chain = mip_chain(&base);
        let dims: Vec<(u32, u32)> = chain.iter().map(|m| (m.width, m.height)).collect();
        assert_eq!(dims, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        for level in &chain {
            assert_eq!(level.rgba.len(), (level.width * level.height * 4) as usize);
        }
    }

    #[test]
    fn solid_is_single_texel() {
        let img = ImageData::solid([1, 2, 3, 4]);
        assert_eq!((img.width, img.height), (1, 1));
        assert_eq!(mip_chain(&img).len(), 1);
    }

    #[test]
    fn load_png_expands_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayImage::from_pixel(4, 2, image::Luma([128])).save(&path).unwrap();

        let img = load_image(&path).unwrap();
        assert_eq!((img.width, img.height), (4, 2));
        assert_eq!(img.rgba.len(), 4 * 2 * 4);
        assert_eq!(&img.rgba[..4], &[128, 128, 128, 255]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_image("/nonexistent/container2.png").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, AssetError::Image { .. }));
    }
}
