use crate::application::ports::image_processor::{EncodedAttachment, ImageProcessor};
use crate::shared::config::MediaConfig;
use crate::shared::error::AppError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::io::Cursor;

/// 添付画像の変換処理。
///
/// EXIF の向きを補正した上で最大バウンディングボックス
/// （既定 1200x1600）にアスペクト比を保って収め、JPEG（既定 q75）へ
/// 再エンコードして base64 ペイロードにする。
pub struct AttachmentProcessor {
    config: MediaConfig,
}

impl AttachmentProcessor {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    fn decode_oriented(bytes: &[u8]) -> Result<DynamicImage, AppError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|err| AppError::ImageProcessing(err.to_string()))?;
        let mut decoder = reader.into_decoder()?;
        // 向きが読めない形式は無回転として扱う
        let orientation = decoder
            .orientation()
            .unwrap_or(Orientation::NoTransforms);
        let mut image = DynamicImage::from_decoder(decoder)?;
        image.apply_orientation(orientation);
        Ok(image)
    }

    fn fit_within(image: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
        if image.width() <= max_width && image.height() <= max_height {
            return image;
        }
        image.resize(max_width, max_height, FilterType::Triangle)
    }

    fn encode(&self, image: &DynamicImage) -> Result<EncodedAttachment, AppError> {
        // JPEG はアルファ非対応
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        let mut payload = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut payload, self.config.jpeg_quality);
        rgb.write_with_encoder(encoder)?;

        Ok(EncodedAttachment {
            base64: STANDARD.encode(&payload),
            width: rgb.width(),
            height: rgb.height(),
        })
    }
}

impl ImageProcessor for AttachmentProcessor {
    fn process(&self, bytes: &[u8]) -> Result<EncodedAttachment, AppError> {
        let image = Self::decode_oriented(bytes)?;
        let fitted = Self::fit_within(image, self.config.max_width, self.config.max_height);
        self.encode(&fitted)
    }

    fn preview(&self, bytes: &[u8]) -> Result<EncodedAttachment, AppError> {
        let image = Self::decode_oriented(bytes)?;
        let edge = self.config.preview_edge;
        let fitted = Self::fit_within(image, edge, edge);
        self.encode(&fitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([200, 120, 40]),
        ));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn processor() -> AttachmentProcessor {
        AttachmentProcessor::new(MediaConfig {
            max_width: 40,
            max_height: 40,
            jpeg_quality: 75,
            preview_edge: 10,
        })
    }

    #[test]
    fn downsamples_to_fit_bounding_box_preserving_aspect() {
        let encoded = processor().process(&png_bytes(100, 50)).unwrap();
        assert_eq!((encoded.width, encoded.height), (40, 20));
        assert!(!encoded.base64.is_empty());
        // 有効な base64 であること
        STANDARD.decode(&encoded.base64).unwrap();
    }

    #[test]
    fn image_within_bounds_is_not_resized() {
        let encoded = processor().process(&png_bytes(30, 20)).unwrap();
        assert_eq!((encoded.width, encoded.height), (30, 20));
    }

    #[test]
    fn preview_uses_smaller_box() {
        let encoded = processor().preview(&png_bytes(100, 50)).unwrap();
        assert_eq!((encoded.width, encoded.height), (10, 5));
    }

    #[test]
    fn undecodable_payload_is_an_image_processing_error() {
        let err = processor().process(b"not an image").unwrap_err();
        assert!(matches!(err, AppError::ImageProcessing(_)));
    }

    /// SOI 直後に Orientation エントリだけを持つ EXIF APP1 を差し込んだ JPEG
    fn jpeg_bytes_with_orientation(width: u32, height: u32, orientation: u8) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([80, 160, 40]),
        ));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();

        #[rustfmt::skip]
        let app1: [u8; 36] = [
            0xFF, 0xE1, 0x00, 0x22,                         // APP1, length 34
            b'E', b'x', b'i', b'f', 0x00, 0x00,
            b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, // TIFF header (little endian)
            0x01, 0x00,                                     // IFD0: 1 entry
            0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, // tag 0x0112, SHORT, count 1
            orientation, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,                         // next IFD
        ];

        let mut out = bytes[..2].to_vec();
        out.extend_from_slice(&app1);
        out.extend_from_slice(&bytes[2..]);
        out
    }

    #[test]
    fn exif_rotation_is_applied_before_encoding() {
        let processor = AttachmentProcessor::new(MediaConfig {
            max_width: 200,
            max_height: 200,
            jpeg_quality: 75,
            preview_edge: 10,
        });

        // Orientation 6 = 90度回転。100x50 の元画像は 50x100 として出る
        let encoded = processor
            .process(&jpeg_bytes_with_orientation(100, 50, 6))
            .unwrap();
        assert_eq!((encoded.width, encoded.height), (50, 100));
        STANDARD.decode(&encoded.base64).unwrap();
    }

    #[test]
    fn rotated_image_is_downsampled_after_orientation() {
        // 回転後の 50x100 が 40x40 のボックスに収まる
        let encoded = processor()
            .process(&jpeg_bytes_with_orientation(100, 50, 6))
            .unwrap();
        assert_eq!((encoded.width, encoded.height), (20, 40));
    }
}
