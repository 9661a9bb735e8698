mod common;

use anyhow::Result;
use common::RecordingPresenter;
use small_qr::core::export::save_download;
use small_qr::domain::model::{Color, FormState, InputMode, OutputFormat, QrImage};
use small_qr::{ControllerConfig, LocalStorage, QrCodeEncoder, RegenerationController, TriggerSource};
use std::sync::Arc;
use tempfile::TempDir;

fn url_form(format: OutputFormat) -> FormState {
    FormState {
        text: "example.com".to_string(),
        size: 256,
        format,
        mode: InputMode::Url,
        auto_generate: false,
        ..FormState::default()
    }
}

async fn generate(form: FormState) -> RegenerationController<QrCodeEncoder, RecordingPresenter> {
    let mut controller = RegenerationController::new(
        Arc::new(QrCodeEncoder::new()),
        RecordingPresenter::default(),
        form,
        ControllerConfig::default(),
    );
    controller.submit(TriggerSource::Button);
    controller.settle().await;
    controller
}

#[tokio::test]
async fn test_url_to_png_download() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let controller = generate(url_form(OutputFormat::Png)).await;

    assert_eq!(
        controller.presenter().last_status().message,
        "QR code generated."
    );
    let rendered = controller.current().unwrap();
    assert_eq!(rendered.request.payload, "https://example.com");
    assert_eq!(rendered.link.filename, "qrcode.png");
    assert_eq!(rendered.link.mime_type, "image/png");
    assert!(rendered.link.href.starts_with("data:image/png;base64,"));

    let storage = LocalStorage::new(output_path.clone());
    let path = save_download(&storage, &rendered.image, &rendered.link.filename).await?;
    assert!(path.ends_with("qrcode.png"));

    let full_path = temp_dir.path().join("qrcode.png");
    assert!(full_path.exists());
    let png = image::open(&full_path)?.to_rgba8();
    assert_eq!(png.dimensions(), (256, 256));
    // 左上角是留白
    assert_eq!(png.get_pixel(0, 0).0, [0xff, 0xff, 0xff, 0xff]);

    Ok(())
}

#[tokio::test]
async fn test_url_to_svg_download_with_custom_colors() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let form = FormState {
        foreground: Color::rgb(0x00, 0x33, 0x66),
        background: Color::rgb(0xff, 0xee, 0xdd),
        ..url_form(OutputFormat::Svg)
    };

    let controller = generate(form).await;
    let rendered = controller.current().unwrap();
    assert_eq!(rendered.link.filename, "qrcode.svg");
    assert!(rendered
        .link
        .href
        .starts_with("data:image/svg+xml;charset=utf-8,"));

    let QrImage::Vector { markup } = &rendered.image else {
        panic!("expected SVG output");
    };
    assert!(markup.contains("<svg"));
    assert!(markup.contains("#003366"));
    assert!(markup.contains("#ffeedd"));

    let storage = LocalStorage::new(temp_dir.path().to_string_lossy().to_string());
    save_download(&storage, &rendered.image, "qrcode.svg").await?;
    let saved = std::fs::read_to_string(temp_dir.path().join("qrcode.svg"))?;
    assert_eq!(&saved, markup);

    Ok(())
}

#[tokio::test]
async fn test_oversized_payload_reports_encode_failure() {
    let form = FormState {
        text: "x".repeat(8000),
        format: OutputFormat::Png,
        auto_generate: false,
        ..FormState::default()
    };

    let controller = generate(form).await;

    assert!(controller.current().is_none());
    assert!(controller
        .presenter()
        .last_status()
        .message
        .starts_with("Failed to generate QR: "));
}
