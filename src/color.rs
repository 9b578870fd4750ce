use rand::Rng;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

// ============================================================================
// PALETTE
// ============================================================================

/// Number of entries in the text-mode palette.
pub const PALETTE_SIZE: usize = 16;

/// Palette index that renders as "nothing" (the terminal's own colour).
pub const TRANSPARENT: u8 = 0;

/// Classic 16 colour text-mode table. Index 0 is transparent.
const COLOR_TABLE: [(u8, u8, u8); PALETTE_SIZE] = [
    (0x00, 0x00, 0x00),
    (0x00, 0x00, 0xAA),
    (0x00, 0xAA, 0x00),
    (0x00, 0xAA, 0xAA),
    (0xAA, 0x00, 0x00),
    (0xAA, 0x00, 0xAA),
    (0xAA, 0x55, 0x00),
    (0xAA, 0xAA, 0xAA),
    (0x55, 0x55, 0x55),
    (0x55, 0x55, 0xFF),
    (0x55, 0xFF, 0x55),
    (0x55, 0xFF, 0xFF),
    (0xFF, 0x55, 0x55),
    (0xFF, 0x55, 0xFF),
    (0xFF, 0xFF, 0x55),
    (0xFF, 0xFF, 0xFF),
];

/// First and last palette entries used for flashing glyphs.
const BRIGHT_RANGE: std::ops::RangeInclusive<u8> = 10..=14;

/// A background/foreground pair of palette indices.
///
/// Serialized as a two element array `[background, foreground]` so config files
/// stay compact. Either entry may also be a palette name, and a bare name such
/// as `"white"` means that foreground on a transparent background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawColor", into = "[u8; 2]")]
pub struct ColorPair {
    pub background: u8,
    pub foreground: u8,
}

impl ColorPair {
    pub const TRANSPARENT: ColorPair = ColorPair::new(TRANSPARENT, TRANSPARENT);
    pub const WHITE: ColorPair = ColorPair::new(TRANSPARENT, 15);

    pub const fn new(background: u8, foreground: u8) -> Self {
        Self {
            background,
            foreground,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Index(u8),
    Name(String),
}

impl ColorValue {
    fn resolve(&self) -> Result<u8, String> {
        match self {
            ColorValue::Index(i) if (*i as usize) < PALETTE_SIZE => Ok(*i),
            ColorValue::Index(i) => Err(format!("palette index {i} out of range 0..{PALETTE_SIZE}")),
            ColorValue::Name(name) => {
                parse_color_name(name).ok_or_else(|| format!("unknown colour '{name}'"))
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawColor {
    Pair([ColorValue; 2]),
    Foreground(ColorValue),
}

impl TryFrom<RawColor> for ColorPair {
    type Error = String;

    fn try_from(raw: RawColor) -> Result<Self, Self::Error> {
        match raw {
            RawColor::Pair([background, foreground]) => {
                Ok(Self::new(background.resolve()?, foreground.resolve()?))
            }
            RawColor::Foreground(foreground) => Ok(Self::new(TRANSPARENT, foreground.resolve()?)),
        }
    }
}

impl From<ColorPair> for [u8; 2] {
    fn from(pair: ColorPair) -> Self {
        [pair.background, pair.foreground]
    }
}

/// Roll a random flashing colour on a transparent background.
pub fn random_bright<R: Rng + ?Sized>(rng: &mut R) -> ColorPair {
    ColorPair::new(TRANSPARENT, rng.gen_range(BRIGHT_RANGE))
}

/// Map a palette index to a terminal colour. Out-of-range indices wrap.
pub fn palette_color(index: u8) -> Color {
    if index == TRANSPARENT {
        return Color::Reset;
    }
    let (r, g, b) = COLOR_TABLE[index as usize % PALETTE_SIZE];
    Color::Rgb(r, g, b)
}

// ============================================================================
// COLOR PARSING
// ============================================================================

/// Parse a palette entry by name or by raw index ("0".."15").
pub fn parse_color_name(color_str: &str) -> Option<u8> {
    let index = match color_str.trim().to_lowercase().as_str() {
        "transparent" | "none" => 0,
        "blue" => 1,
        "green" => 2,
        "cyan" => 3,
        "red" => 4,
        "magenta" => 5,
        "brown" | "yellow" => 6,
        "gray" | "grey" | "lightgray" => 7,
        "darkgray" | "darkgrey" => 8,
        "lightblue" => 9,
        "lightgreen" => 10,
        "lightcyan" => 11,
        "lightred" => 12,
        "lightmagenta" => 13,
        "lightyellow" => 14,
        "white" => 15,
        raw => raw.parse::<u8>().ok().filter(|i| (*i as usize) < PALETTE_SIZE)?,
    };
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::rstest;

    #[rstest]
    #[case("white", Some(15))]
    #[case("LightCyan", Some(11))]
    #[case("transparent", Some(0))]
    #[case("7", Some(7))]
    #[case("16", None)]
    #[case("chartreuse", None)]
    fn parses_palette_names(#[case] input: &str, #[case] expected: Option<u8>) {
        assert_eq!(parse_color_name(input), expected);
    }

    #[test]
    fn bright_colors_stay_in_flash_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let pair = random_bright(&mut rng);
            assert_eq!(pair.background, TRANSPARENT);
            assert!(BRIGHT_RANGE.contains(&pair.foreground));
        }
    }

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        color: ColorPair,
    }

    #[rstest]
    #[case("color = [0, 15]", ColorPair::new(0, 15))]
    #[case("color = [\"blue\", \"white\"]", ColorPair::new(1, 15))]
    #[case("color = [\"transparent\", 14]", ColorPair::new(0, 14))]
    #[case("color = \"lightred\"", ColorPair::new(0, 12))]
    fn color_pairs_deserialize_from_names_and_indices(#[case] input: &str, #[case] expected: ColorPair) {
        let parsed: Wrapper = toml::from_str(input).expect("valid colour");
        assert_eq!(parsed.color, expected);
    }

    #[rstest]
    #[case("color = [0, 16]")]
    #[case("color = \"chartreuse\"")]
    fn bad_colors_are_rejected(#[case] input: &str) {
        assert!(toml::from_str::<Wrapper>(input).is_err());
    }

    #[test]
    fn transparent_maps_to_reset() {
        assert_eq!(palette_color(0), Color::Reset);
        assert_eq!(palette_color(15), Color::Rgb(0xFF, 0xFF, 0xFF));
    }
}
