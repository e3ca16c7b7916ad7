use std::path::Path;

use image::RgbaImage;
use winit::window::Icon;

use crate::error::ConfigError;

pub trait ImageExt {
    fn to_icon(&self) -> Result<Icon, ConfigError>;
}

impl ImageExt for RgbaImage {
    fn to_icon(&self) -> Result<Icon, ConfigError> {
        rgba_icon(self.as_raw().clone(), self.width(), self.height())
    }
}

pub fn rgba_icon(rgba: Vec<u8>, width: u32, height: u32) -> Result<Icon, ConfigError> {
    Ok(Icon::from_rgba(rgba, width, height)?)
}

/// 读取窗口图标，格式由文件内容决定
pub fn load_icon(path: impl AsRef<Path>) -> Result<Icon, ConfigError> {
    image::open(path)?.into_rgba8().to_icon()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn rgba_image_becomes_icon() {
        let img = RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]));
        assert!(img.to_icon().is_ok());
    }

    #[test]
    fn short_buffer_is_bad_icon() {
        let err = rgba_icon(vec![0; 12], 2, 2).unwrap_err();
        assert!(matches!(err, ConfigError::BadIcon(_)));
    }

    #[test]
    fn missing_icon_file() {
        let err = load_icon("no-such-icon.png").unwrap_err();
        assert!(matches!(err, ConfigError::Image(_)));
    }
}
