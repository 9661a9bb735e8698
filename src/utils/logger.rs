use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` 優先；否則依 verbose 決定本 crate 的層級
fn filter(verbose: bool) -> EnvFilter {
    let directive = if verbose {
        "small_qr=debug,info"
    } else {
        "small_qr=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// 互動與單次模式共用：精簡格式輸出到 stderr，stdout 留給結果
pub fn init_cli_logger(verbose: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(layer)
        .init();
}

pub fn init_json_logger(verbose: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .json()
        .with_current_span(false);

    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(layer)
        .init();
}
