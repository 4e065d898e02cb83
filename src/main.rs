mod app;
mod util;
mod vault;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Root folder of the note vault to visualize.
    vault_root: PathBuf,

    #[arg(long, default_value_t = 1500)]
    width: u32,

    #[arg(long, default_value_t = 900)]
    height: u32,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width as f32, args.height as f32]),
        ..Default::default()
    };

    eframe::run_native(
        "vault-graph",
        options,
        Box::new(move |cc| Ok(Box::new(app::VaultGraphApp::new(cc, args.vault_root.clone())))),
    )
}
