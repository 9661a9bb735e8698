use clap::Parser;
use small_qr::app::{GenerationReport, Session, TerminalPresenter};
use small_qr::core::export::{copy_image, copy_status, save_download};
use small_qr::domain::ports::Presenter;
use small_qr::utils::error::{QrError, Result};
use small_qr::utils::{logger, validation::Validate};
use small_qr::{
    CliConfig, LocalStorage, QrCodeEncoder, RegenerationController, Settings, TomlConfig,
    TriggerSource,
};
use std::io::Write;
use std::sync::Arc;

#[cfg(feature = "clipboard")]
type SystemClipboard = small_qr::adapters::SystemClipboard;
#[cfg(not(feature = "clipboard"))]
type SystemClipboard = small_qr::adapters::UnsupportedClipboard;

type Output = Box<dyn Write + Send>;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 設定檔先於日誌載入，因為日誌格式可能寫在設定檔裡
    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    if settings.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting small-qr CLI");
    if cli.verbose {
        tracing::debug!("Settings: {:?}", settings);
    }

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let result = if cli.interactive {
        run_interactive(settings).await
    } else {
        run_once(settings, &cli).await
    };

    if let Err(e) = result {
        tracing::error!("❌ Generation failed: {} (Severity: {:?})", e, e.severity());
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }

    Ok(())
}

fn load_settings(cli: &CliConfig) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => TomlConfig::from_file(path)?.to_settings(),
        None => Settings::default(),
    };
    cli.apply_to(&mut settings);
    Ok(settings)
}

fn build_controller(
    settings: &Settings,
    out: Output,
) -> RegenerationController<QrCodeEncoder, TerminalPresenter<Output>> {
    RegenerationController::new(
        Arc::new(QrCodeEncoder::new()),
        TerminalPresenter::new(out),
        settings.form.clone(),
        settings.controller.clone(),
    )
}

async fn run_interactive(settings: Settings) -> Result<()> {
    let mut controller = build_controller(&settings, Box::new(std::io::stdout()));
    controller.ensure_enabled()?;
    controller.presenter_mut().note(small_qr::app::commands::HELP);

    let storage = LocalStorage::new(settings.output_path.clone());
    let mut session = Session::new(controller, SystemClipboard::default(), storage);
    session
        .run(tokio::io::BufReader::new(tokio::io::stdin()))
        .await
}

async fn run_once(settings: Settings, cli: &CliConfig) -> Result<()> {
    // JSON 報告走 stdout，狀態列改寫到 stderr
    let out: Output = if cli.json {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    };
    let mut controller = build_controller(&settings, out);
    controller.ensure_enabled()?;

    controller.submit(TriggerSource::Button);
    controller.settle().await;

    if let Some(e) = controller.take_last_error() {
        return Err(e);
    }
    let Some(rendered) = controller.current().cloned() else {
        return Err(QrError::encode_failure("no result was produced"));
    };

    let storage = LocalStorage::new(settings.output_path.clone());
    let path = save_download(&storage, &rendered.image, &rendered.link.filename).await?;

    let mut report = GenerationReport::new(&rendered);
    report.saved_to = Some(path.clone());

    if cli.copy {
        let outcome = copy_image(&SystemClipboard::default(), &rendered.image).await;
        let status = copy_status(&outcome, &rendered.image);
        controller.presenter_mut().status(&status);
        if outcome.is_ok() {
            report.copied = Some(status.message);
        }
    }

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("📁 Output saved to: {}", path);
    }

    Ok(())
}
