use colored::Colorize;
use pywin_inventory::config::ScanConfig;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(windows)]
fn run(config: &ScanConfig) -> pywin_inventory::Result<()> {
    use pywin_inventory::registry::WinRegistry;
    use pywin_inventory::{inventory, report};

    colored::control::set_override(config.color);

    let inventory = inventory::collect(&WinRegistry::new(), config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::render(&inventory, &mut out)?;

    if let Some(path) = &config.export_path {
        report::export_json(&inventory, path)?;
        report::render_export_notice(path, &mut out)?;
    }
    Ok(())
}

#[cfg(not(windows))]
fn run(_config: &ScanConfig) -> pywin_inventory::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "registry discovery requires Windows",
    )
    .into())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pywin_inventory=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ScanConfig::from_env();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Inventory failed");
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
