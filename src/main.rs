//! XIRTAM Admin - desktop console for the RFID access control system.

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use xirtam_admin as app;

use app::config::{AppConfig, ConfigLoadResult};
use app::ui::{App, SetupApp, SetupWizard};

/// Desktop console for the RFID access control system.
#[derive(Parser)]
#[command(name = "xirtam-admin", version)]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Log debug output from the application
    #[arg(short, long)]
    verbose: bool,
}

/// Application launch mode.
enum LaunchMode {
    /// Normal operation with valid config.
    Normal(AppConfig),
    /// Setup wizard for first run or invalid config.
    Setup(SetupWizard, Option<String>),
}

fn main() -> eframe::Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = app::logging::init(cli.verbose);

    tracing::info!("XIRTAM Admin {} starting...", env!("CARGO_PKG_VERSION"));

    // Determine config path based on mode
    let config_path = if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };
    tracing::info!("Config path: {:?}", config_path);

    let launch_mode = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            LaunchMode::Normal(config)
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, starting setup wizard");
            LaunchMode::Setup(SetupWizard::new(), None)
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::warn!("Config invalid: {}", e);
            LaunchMode::Setup(SetupWizard::new(), Some(e.to_string()))
        }
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;

    match launch_mode {
        LaunchMode::Normal(config) => run_main_app(config, config_path, rt),
        LaunchMode::Setup(wizard, error) => run_setup_wizard(wizard, error, config_path, rt),
    }
}

/// Register the icon font next to the default fonts.
fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}

/// Run the setup wizard.
fn run_setup_wizard(
    wizard: SetupWizard,
    initial_error: Option<String>,
    config_path: PathBuf,
    rt: tokio::runtime::Runtime,
) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("XIRTAM Admin - Setup")
            .with_inner_size([600.0, 500.0])
            .with_min_inner_size([500.0, 400.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "XIRTAM Admin - Setup",
        options,
        Box::new(|_cc| Ok(Box::new(SetupApp::new(wizard, initial_error, config_path, rt)))),
    )
}

/// Run the main application.
fn run_main_app(config: AppConfig, config_path: PathBuf, rt: tokio::runtime::Runtime) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("XIRTAM Admin")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "XIRTAM Admin",
        options,
        Box::new(|cc| {
            install_fonts(&cc.egui_ctx);
            Ok(Box::new(App::new(cc.egui_ctx.clone(), config, config_path, rt)?))
        }),
    )
}
