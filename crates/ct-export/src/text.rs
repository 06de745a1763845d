/// Taille de police dérivée de la largeur de colonne : largeur divisée par
/// le nombre de caractères cible, bornée pour rester lisible sur les
/// colonnes étroites.
///
/// # Example
/// ```
/// use ct_export::text::font_size;
/// assert!((font_size(140, 7, 16.0, 30.0) - 20.0).abs() < 1e-6);
/// // Narrow column clamps to the minimum.
/// assert!((font_size(40, 7, 16.0, 30.0) - 16.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn font_size(col_width: u32, target_chars: u32, min: f32, max: f32) -> f32 {
    (col_width as f32 / target_chars.max(1) as f32).clamp(min, max)
}

/// Césure gloutonne caractère par caractère contre une primitive de
/// mesure : le texte n'a pas de points de coupure naturels, chaque
/// caractère est mesuré et placé individuellement.
///
/// Une largeur de mesure nulle ou négative produit une ligne par
/// caractère plutôt qu'une boucle infinie.
pub fn wrap_measured<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(char) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0f32;

    for ch in text.chars() {
        let advance = measure(ch).max(0.0);
        if !current.is_empty() && current_width + advance > max_width {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }
        current.push(ch);
        current_width += advance;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
