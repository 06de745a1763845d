use std::path::PathBuf;

use clap::Parser;

/// courseTable — campus timetable grid renderer.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Emploi du temps : chemin vers le JSON renvoyé par la source de données.
    #[arg(long)]
    pub schedule: PathBuf,

    /// Semaine sélectionnée au lancement.
    #[arg(long)]
    pub week: Option<u16>,

    /// Seed initial de la passe couleur.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Exporter directement en PNG (mode headless) puis quitter.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Police TTF/OTF pour l'export. Prioritaire sur la config.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Validate the argument combination.
    ///
    /// # Errors
    /// Returns an error if the selected week is outside any plausible
    /// semester, or if a headless export is requested without an output
    /// extension the flatten host understands.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(week) = self.week {
            if !(1..=53).contains(&week) {
                anyhow::bail!("--week {week} is outside 1..=53");
            }
        }
        if let Some(ref out) = self.export {
            let ext = out
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase);
            if ext.as_deref() != Some("png") {
                anyhow::bail!("--export expects a .png output path");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let base = ["coursetable", "--schedule", "courses.json"];
        Cli::parse_from(base.iter().copied().chain(args.iter().copied()))
    }

    #[test]
    fn week_bounds_are_checked() {
        assert!(cli(&["--week", "18"]).validate().is_ok());
        assert!(cli(&["--week", "0"]).validate().is_err());
        assert!(cli(&["--week", "54"]).validate().is_err());
    }

    #[test]
    fn export_requires_png_extension() {
        assert!(cli(&["--export", "out.png"]).validate().is_ok());
        assert!(cli(&["--export", "out.jpg"]).validate().is_err());
        assert!(cli(&["--export", "out"]).validate().is_err());
    }
}
