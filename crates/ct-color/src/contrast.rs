use ct_core::color::{Rgb, composite_over_white, contrast_ratio};

/// Near-black text candidate.
pub const TEXT_DARK: Rgb = Rgb::new(51, 51, 51);

/// White text candidate.
pub const TEXT_LIGHT: Rgb = Rgb::WHITE;

/// Résultat de l'escalade d'alpha : un couple fond/texte lisible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolved {
    /// Final alpha, possibly saturated at 1.0.
    pub alpha: f32,
    /// Base composited over white at `alpha`.
    pub background: Rgb,
    /// Winning text candidate.
    pub text: Rgb,
    /// Contrast ratio actually reached.
    pub ratio: f32,
}

/// Resolve a legible `(alpha, text color)` pair for `base`.
///
/// Composites `base` over white at the current alpha, evaluates the WCAG
/// contrast ratio of both text candidates, keeps the better one, and
/// raises alpha by `step` until the ratio reaches `min_contrast` or alpha
/// saturates at 1.0. Pure: identical inputs always produce identical
/// outputs.
///
/// # Example
/// ```
/// use ct_core::color::Rgb;
/// use ct_color::contrast::{TEXT_DARK, resolve};
/// let r = resolve(Rgb::new(251, 231, 243), 0.8, 4.5, 0.05);
/// assert_eq!(r.text, TEXT_DARK);
/// assert!(r.ratio >= 4.5);
/// ```
#[must_use]
pub fn resolve(base: Rgb, base_alpha: f32, min_contrast: f32, step: f32) -> Resolved {
    // A non-positive step would loop forever at alpha < 1.0.
    let step = step.max(0.01);
    let mut alpha = base_alpha.clamp(0.0, 1.0);

    loop {
        let background = composite_over_white(base, alpha);
        let dark = contrast_ratio(background, TEXT_DARK);
        let light = contrast_ratio(background, TEXT_LIGHT);
        let (text, ratio) = if dark >= light {
            (TEXT_DARK, dark)
        } else {
            (TEXT_LIGHT, light)
        };

        if ratio >= min_contrast || alpha >= 1.0 {
            return Resolved {
                alpha,
                background,
                text,
                ratio,
            };
        }
        alpha = (alpha + step).min(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use ct_core::color::relative_luminance;

    #[test]
    fn pastel_picks_dark_text() {
        // #FBE7F3 at 0.8: the composite is light, so the near-black
        // candidate must win with the higher ratio.
        let r = resolve(Rgb::new(251, 231, 243), 0.8, 4.5, 0.05);
        assert_eq!(r.text, TEXT_DARK);
        assert!(
            contrast_ratio(r.background, TEXT_DARK) >= contrast_ratio(r.background, TEXT_LIGHT)
        );
        // No escalation needed for a pastel.
        assert!((r.alpha - 0.8).abs() < 1e-6);
    }

    #[test]
    fn dark_base_picks_light_text() {
        let r = resolve(Rgb::new(20, 20, 60), 0.8, 4.5, 0.05);
        assert_eq!(r.text, TEXT_LIGHT);
        assert!(r.ratio >= 4.5);
    }

    #[test]
    fn whole_palette_meets_minimum_or_saturates() {
        let palette = Palette::builtin();
        for i in 0..palette.len() {
            let r = resolve(palette.color(i), 0.8, 4.5, 0.05);
            assert!(
                r.ratio >= 4.5 || (r.alpha - 1.0).abs() < 1e-6,
                "palette[{i}]: ratio={} alpha={}",
                r.ratio,
                r.alpha
            );
        }
    }

    #[test]
    fn mid_grey_saturates_alpha() {
        // A mid grey never reaches 4.5 against either candidate; alpha must
        // cap at 1.0 instead of looping.
        let r = resolve(Rgb::new(128, 128, 128), 0.8, 4.5, 0.05);
        assert!((r.alpha - 1.0).abs() < 1e-6);
        assert!(r.ratio < 4.5);
    }

    #[test]
    fn resolution_is_deterministic() {
        let a = resolve(Rgb::new(230, 244, 215), 0.8, 4.5, 0.05);
        let b = resolve(Rgb::new(230, 244, 215), 0.8, 4.5, 0.05);
        assert_eq!(a, b);
    }

    #[test]
    fn escalation_reaches_minimum_on_mid_grey() {
        // (90,90,90) composited at 0.8 sits in the mid-tone band where both
        // candidates fail; one escalation step darkens it enough for white
        // text to pass.
        let base = Rgb::new(90, 90, 90);
        let r = resolve(base, 0.8, 4.5, 0.05);
        assert!(r.alpha > 0.8);
        assert_eq!(r.text, TEXT_LIGHT);
        assert!(r.ratio >= 4.5);
        assert!(relative_luminance(r.background) < 0.19);
    }
}
