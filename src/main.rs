use std::process::ExitCode;

use eframe::egui;

use snapedit::app::SnapEditApp;
use snapedit::{cli, logger};

fn main() -> ExitCode {
    // -- CLI / headless mode ---------------------------------------------
    if cli::CliArgs::is_cli_mode() {
        use clap::Parser;
        return cli::run(cli::CliArgs::parse());
    }

    // -- GUI mode --------------------------------------------------------

    // Initialize session log (overwrites previous session log)
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1360.0, 600.0])
            .with_title("SnapEdit"),
        ..Default::default()
    };

    match eframe::run_native(
        "SnapEdit",
        options,
        Box::new(|cc| Box::new(SnapEditApp::new(cc))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: failed to start the window: {}", e);
            ExitCode::FAILURE
        }
    }
}
