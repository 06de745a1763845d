use anyhow::{Context, Result};
use clap::Parser;

use ct_color::palette::Palette;
use ct_core::config::{GridConfig, load_config};
use ct_export::host::PngHost;
use ct_export::painter::ImageExporter;
use ct_layout::layout::{GridPresenter, compute_layout};

pub mod app;
pub mod cli;
pub mod schedule;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider les arguments
    cli.validate()?;

    // 4. Charger la config
    let mut config = resolve_config(&cli)?;
    if let Some(ref font) = cli.font {
        config.export.font_path = Some(font.clone());
    }

    // 5. Charger l'emploi du temps et la palette
    let records = schedule::load_schedule(&cli.schedule)?;
    let palette = Palette::from_hex(&config.palette)?;
    let week = cli.week.unwrap_or(1);

    // 6. Export headless : une passe, une image, pas de terminal
    if let Some(output) = cli.export {
        let layout = compute_layout(&records, &palette, &config, week, cli.seed);
        if layout.is_empty() {
            log::info!("no visible courses for week {week}: exporting an empty grid");
        }
        let font_path = config
            .export
            .font_path
            .clone()
            .context("no export font configured (--font or export.font_path)")?;
        let host = PngHost::from_font_path(config.export.width, config.export.height, &font_path)?;
        let mut exporter = ImageExporter::new(host, config, output);
        let path = exporter.present(&layout)?;
        println!("{}", path.display());
        return Ok(());
    }

    // 7. Mode interactif
    let terminal = ratatui::init();
    let mut app_instance = app::App::new(records, palette, config, week, cli.seed);
    let result = app_instance.run(terminal);

    // 8. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    ratatui::restore();

    result
}

/// Charge la config TOML, ou les défauts si le fichier n'existe pas.
fn resolve_config(cli: &cli::Cli) -> Result<GridConfig> {
    if cli.config.exists() {
        load_config(&cli.config)
    } else {
        log::debug!(
            "config {} not found, using defaults",
            cli.config.display()
        );
        Ok(GridConfig::default())
    }
}
