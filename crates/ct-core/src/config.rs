use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::slots::TOTAL_WEEKS;

/// Configuration complète du rendu de la grille.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use ct_core::config::GridConfig;
/// let config = GridConfig::default();
/// assert!((config.base_alpha - 0.8).abs() < 1e-6);
/// assert!((config.min_contrast - 4.5).abs() < 1e-6);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GridConfig {
    // === Couleur ===
    /// Alpha initial des cartes de cours [0.3, 1.0].
    pub base_alpha: f32,
    /// Incrément d'alpha à chaque passe d'escalade du contraste.
    pub alpha_step: f32,
    /// Ratio de contraste WCAG minimal exigé pour le texte.
    pub min_contrast: f32,
    /// Palette de fonds en hexadécimal. Vide = palette intégrée (16 pastels).
    pub palette: Vec<String>,

    // === Semestre ===
    /// Nombre de semaines du semestre. Au-delà : vacances.
    pub total_weeks: u16,

    // === Export raster ===
    /// Géométrie et typographie de l'export image.
    pub export: ExportConfig,
}

/// Géométrie explicite du backend raster.
///
/// La hauteur d'une ligne de données vaut
/// `(height - header_height - footer_height) / 12`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Largeur totale de l'image en pixels.
    pub width: u32,
    /// Hauteur totale de l'image en pixels.
    pub height: u32,
    /// Largeur de la colonne des horaires, à gauche.
    pub gutter_width: u32,
    /// Hauteur du bandeau d'en-tête (jours de la semaine).
    pub header_height: u32,
    /// Hauteur du pied de page.
    pub footer_height: u32,
    /// Rayon des coins arrondis des cartes.
    pub corner_radius: u32,
    /// Marge intérieure des cartes, en pixels.
    pub cell_padding: u32,
    /// Nombre de caractères cible par ligne d'une colonne ; la taille de
    /// police vaut largeur de colonne / cette valeur, bornée ci-dessous.
    pub target_chars: u32,
    /// Taille de police minimale en pixels.
    pub font_min: f32,
    /// Taille de police maximale en pixels.
    pub font_max: f32,
    /// Police TTF/OTF utilisée pour le rendu du texte.
    pub font_path: Option<PathBuf>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            base_alpha: 0.8,
            alpha_step: 0.05,
            min_contrast: 4.5,
            palette: Vec::new(),
            total_weeks: TOTAL_WEEKS,
            export: ExportConfig::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            gutter_width: 96,
            header_height: 120,
            footer_height: 84,
            corner_radius: 12,
            cell_padding: 8,
            target_chars: 6,
            font_min: 16.0,
            font_max: 30.0,
            font_path: None,
        }
    }
}

impl GridConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.base_alpha = self.base_alpha.clamp(0.3, 1.0);
        self.alpha_step = self.alpha_step.clamp(0.01, 0.25);
        self.min_contrast = self.min_contrast.clamp(1.0, 21.0);
        self.total_weeks = self.total_weeks.clamp(1, 53);
        let e = &mut self.export;
        e.width = e.width.clamp(320, 4096);
        e.height = e.height.clamp(480, 8192);
        e.gutter_width = e.gutter_width.min(e.width / 3);
        e.header_height = e.header_height.min(e.height / 4);
        e.footer_height = e.footer_height.min(e.height / 4);
        e.corner_radius = e.corner_radius.min(64);
        e.cell_padding = e.cell_padding.min(48);
        e.target_chars = e.target_chars.clamp(2, 24);
        e.font_min = e.font_min.clamp(8.0, 64.0);
        e.font_max = e.font_max.clamp(e.font_min, 96.0);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    grid: Option<GridSection>,
    export: Option<ExportSection>,
}

/// Grid section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct GridSection {
    base_alpha: Option<f32>,
    alpha_step: Option<f32>,
    min_contrast: Option<f32>,
    palette: Option<Vec<String>>,
    total_weeks: Option<u16>,
}

/// Export section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct ExportSection {
    width: Option<u32>,
    height: Option<u32>,
    gutter_width: Option<u32>,
    header_height: Option<u32>,
    footer_height: Option<u32>,
    corner_radius: Option<u32>,
    cell_padding: Option<u32>,
    target_chars: Option<u32>,
    font_min: Option<f32>,
    font_max: Option<f32>,
    font_path: Option<PathBuf>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use ct_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<GridConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;

    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("TOML parse error in {}", path.display()))?;

    let mut config = GridConfig::default();

    if let Some(g) = file.grid {
        if let Some(v) = g.base_alpha {
            config.base_alpha = v;
        }
        if let Some(v) = g.alpha_step {
            config.alpha_step = v;
        }
        if let Some(v) = g.min_contrast {
            config.min_contrast = v;
        }
        if let Some(v) = g.palette {
            config.palette = v;
        }
        if let Some(v) = g.total_weeks {
            config.total_weeks = v;
        }
    }

    if let Some(e) = file.export {
        if let Some(v) = e.width {
            config.export.width = v;
        }
        if let Some(v) = e.height {
            config.export.height = v;
        }
        if let Some(v) = e.gutter_width {
            config.export.gutter_width = v;
        }
        if let Some(v) = e.header_height {
            config.export.header_height = v;
        }
        if let Some(v) = e.footer_height {
            config.export.footer_height = v;
        }
        if let Some(v) = e.corner_radius {
            config.export.corner_radius = v;
        }
        if let Some(v) = e.cell_padding {
            config.export.cell_padding = v;
        }
        if let Some(v) = e.target_chars {
            config.export.target_chars = v;
        }
        if let Some(v) = e.font_min {
            config.export.font_min = v;
        }
        if let Some(v) = e.font_max {
            config.export.font_max = v;
        }
        if let Some(v) = e.font_path {
            config.export.font_path = Some(v);
        }
    }

    config.clamp_all();
    log::debug!("config loaded from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_merges_over_defaults() {
        let toml_str = "[grid]\nbase_alpha = 0.6\n\n[export]\nwidth = 750\n";
        let file: ConfigFile = toml::from_str(toml_str).unwrap();
        let mut config = GridConfig::default();
        if let Some(g) = file.grid {
            if let Some(v) = g.base_alpha {
                config.base_alpha = v;
            }
        }
        if let Some(e) = file.export {
            if let Some(v) = e.width {
                config.export.width = v;
            }
        }
        assert!((config.base_alpha - 0.6).abs() < 1e-6);
        assert_eq!(config.export.width, 750);
        // Untouched fields keep their defaults.
        assert!((config.min_contrast - 4.5).abs() < 1e-6);
        assert_eq!(config.export.height, 1920);
    }

    #[test]
    fn clamp_forces_valid_ranges() {
        let mut config = GridConfig {
            base_alpha: 3.0,
            alpha_step: 0.0,
            min_contrast: 100.0,
            ..GridConfig::default()
        };
        config.export.font_min = 40.0;
        config.export.font_max = 20.0;
        config.clamp_all();
        assert!((config.base_alpha - 1.0).abs() < 1e-6);
        assert!(config.alpha_step >= 0.01);
        assert!(config.min_contrast <= 21.0);
        assert!(config.export.font_max >= config.export.font_min);
    }
}
