//! Encoder port backed by the `qrcode` crate.
//!
//! The crate builds the module matrix; this adapter only maps options onto it
//! and packages the result as a PNG data URL or SVG markup.

use crate::domain::model::{Color, EccLevel, RasterOptions, VectorOptions};
use crate::domain::ports::QrEncoder;
use crate::utils::error::{QrError, Result};
use async_trait::async_trait;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

// 寬度不足以容納所有模組時使用的預設倍率
const FALLBACK_SCALE: u32 = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeEncoder;

impl QrCodeEncoder {
    pub fn new() -> Self {
        Self
    }
}

fn ec_level(ecc: EccLevel) -> EcLevel {
    match ecc {
        EccLevel::L => EcLevel::L,
        EccLevel::M => EcLevel::M,
        EccLevel::Q => EcLevel::Q,
        EccLevel::H => EcLevel::H,
    }
}

fn build_code(payload: &str, ecc: EccLevel) -> Result<QrCode> {
    QrCode::with_error_correction_level(payload.as_bytes(), ec_level(ecc))
        .map_err(|e| QrError::encode_failure(e.to_string()))
}

fn pixel(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, 255])
}

/// 產生正方形 PNG，邊長為 `options.width`（含留白）
pub fn render_png(payload: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let code = build_code(payload, options.ecc)?;
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let margin = options.margin;
    let total = modules + 2 * margin;
    let side = if options.width >= total {
        options.width
    } else {
        total * FALLBACK_SCALE
    };

    let dark = pixel(options.dark);
    let light = pixel(options.light);
    let module_at = |p: u32| (u64::from(p) * u64::from(total) / u64::from(side)) as u32;

    let img = RgbaImage::from_fn(side, side, |x, y| {
        let (mx, my) = (module_at(x), module_at(y));
        let inside = mx >= margin && my >= margin && mx - margin < modules && my - margin < modules;
        if inside {
            let index = ((my - margin) * modules + (mx - margin)) as usize;
            if colors[index] == qrcode::Color::Dark {
                return dark;
            }
        }
        light
    });

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| QrError::encode_failure(format!("PNG encoding failed: {}", e)))?;
    Ok(png)
}

pub fn render_svg(payload: &str, options: &VectorOptions) -> Result<String> {
    let code = build_code(payload, options.ecc)?;
    let dark = options.dark.to_hex();
    let light = options.light.to_hex();

    Ok(code
        .render::<svg::Color<'_>>()
        .quiet_zone(true)
        .dark_color(svg::Color(&dark))
        .light_color(svg::Color(&light))
        .build())
}

#[async_trait]
impl QrEncoder for QrCodeEncoder {
    fn probe(&self) -> Result<()> {
        build_code("probe", EccLevel::M).map(|_| ())
    }

    async fn encode_raster(&self, payload: &str, options: &RasterOptions) -> Result<String> {
        let payload = payload.to_string();
        let options = *options;
        let png = tokio::task::spawn_blocking(move || render_png(&payload, &options))
            .await
            .map_err(|e| QrError::encode_failure(format!("render task failed: {}", e)))??;

        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }

    async fn encode_vector(&self, payload: &str, options: &VectorOptions) -> Result<String> {
        let payload = payload.to_string();
        let options = *options;
        tokio::task::spawn_blocking(move || render_svg(&payload, &options))
            .await
            .map_err(|e| QrError::encode_failure(format!("render task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(width: u32) -> RasterOptions {
        RasterOptions {
            width,
            margin: 2,
            ecc: EccLevel::M,
            dark: Color::DEFAULT_FOREGROUND,
            light: Color::DEFAULT_BACKGROUND,
        }
    }

    #[test]
    fn test_png_has_requested_width() {
        let png = render_png("https://example.com", &raster(256)).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(img.width(), 256);
        assert_eq!(img.height(), 256);
    }

    #[test]
    fn test_png_uses_colors_and_margin() {
        let options = RasterOptions {
            dark: Color::rgb(0x12, 0x34, 0x56),
            light: Color::rgb(0xfe, 0xdc, 0xba),
            ..raster(250)
        };
        let png = render_png("hello", &options).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgba8();

        // 左上角是留白
        assert_eq!(img.get_pixel(0, 0), &Rgba([0xfe, 0xdc, 0xba, 255]));
        // 版本 1 共 21 + 2 * 2 個模組，每個 10px；留白之後是定位圖案的深色模組
        assert_eq!(img.get_pixel(25, 25), &Rgba([0x12, 0x34, 0x56, 255]));
    }

    #[test]
    fn test_png_too_small_uses_fallback_scale() {
        let png = render_png("hello", &raster(8)).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(img.width(), (21 + 4) * FALLBACK_SCALE);
    }

    #[test]
    fn test_svg_uses_colors() {
        let options = VectorOptions {
            ecc: EccLevel::H,
            dark: Color::rgb(0xaa, 0, 0),
            light: Color::rgb(0, 0, 0xbb),
        };
        let markup = render_svg("hello", &options).unwrap();
        assert!(markup.contains("<svg"));
        assert!(markup.contains("#aa0000"));
        assert!(markup.contains("#0000bb"));
    }

    #[test]
    fn test_too_long_payload_fails() {
        let payload = "x".repeat(8000);
        let err = render_svg(
            &payload,
            &VectorOptions {
                ecc: EccLevel::H,
                dark: Color::DEFAULT_FOREGROUND,
                light: Color::DEFAULT_BACKGROUND,
            },
        )
        .unwrap_err();
        assert!(matches!(err, QrError::EncodeFailure { .. }));
    }

    #[tokio::test]
    async fn test_raster_is_png_data_url() {
        let encoder = QrCodeEncoder::new();
        assert!(encoder.probe().is_ok());

        let data_url = encoder.encode_raster("hello", &raster(128)).await.unwrap();
        assert!(data_url.starts_with("data:image/png;base64,"));
    }
}
