use ct_core::CoreError;
use ct_core::color::{Rgb, parse_hex};

/// 16 pastels — fonds clairs, texte sombre lisible dès l'alpha par défaut.
pub const PALETTE_PASTEL: [&str; 16] = [
    "#FBE7F3", "#FDE2E2", "#FFE9DB", "#FFF3D6", "#FFF0C9", "#E6F4D7", "#E8F7E2", "#DDEEE7",
    "#DCF3F1", "#D6F0FF", "#E0ECFF", "#EAE4FF", "#F6E3FF", "#FFE3EE", "#ECE7FB", "#EFF0F5",
];

/// Fixed list of base colors available for block backgrounds.
///
/// Parsed once at startup; never empty.
///
/// # Example
/// ```
/// use ct_color::palette::Palette;
/// let palette = Palette::builtin();
/// assert_eq!(palette.len(), 16);
/// ```
#[derive(Clone, Debug)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// The built-in 16-color pastel palette.
    ///
    /// # Panics
    /// Never: the built-in hex codes are checked by tests.
    #[must_use]
    pub fn builtin() -> Self {
        let colors = PALETTE_PASTEL
            .iter()
            .filter_map(|hex| parse_hex(hex).ok())
            .collect();
        Self { colors }
    }

    /// Build a palette from user-supplied hex codes. An empty list falls
    /// back to the built-in palette.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidColor` on the first code that does not
    /// parse as `#RRGGBB`.
    pub fn from_hex(codes: &[String]) -> Result<Self, CoreError> {
        if codes.is_empty() {
            return Ok(Self::builtin());
        }
        let colors = codes
            .iter()
            .map(|code| parse_hex(code))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { colors })
    }

    /// Number of colors in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True if the palette holds no colors. Cannot happen through the
    /// public constructors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, modulo the palette size.
    #[must_use]
    pub fn color(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_parses_all_sixteen() {
        let palette = Palette::builtin();
        assert_eq!(palette.len(), PALETTE_PASTEL.len());
        assert_eq!(palette.color(0), Rgb::new(251, 231, 243));
    }

    #[test]
    fn empty_override_falls_back() {
        let palette = Palette::from_hex(&[]).unwrap();
        assert_eq!(palette.len(), 16);
    }

    #[test]
    fn custom_palette_keeps_order() {
        let codes = vec!["#112233".to_string(), "#445566".to_string()];
        let palette = Palette::from_hex(&codes).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.color(1), Rgb::new(0x44, 0x55, 0x66));
        // Modulo access wraps.
        assert_eq!(palette.color(2), palette.color(0));
    }

    #[test]
    fn bad_code_is_rejected() {
        let codes = vec!["#11223".to_string()];
        assert!(Palette::from_hex(&codes).is_err());
    }
}
