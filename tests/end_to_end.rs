//! Whole-frame scenarios through the frame driver.

use rand::{rngs::StdRng, SeedableRng};
use textsplash::color::ColorPair;
use textsplash::config::{Config, InitialWavesConfig};
use textsplash::frame::FrameDriver;
use textsplash::name::NameArt;
use textsplash::render::to_plain_text;

const ART: &str = "/\\ |\n\\/ |\n|__|";

fn config() -> Config {
    let mut config = Config::default();
    config.general.art = ART.to_string();
    config.name.start_row_factor = 0.5;
    config.initial_waves = InitialWavesConfig {
        waves: Vec::new(),
        ..InitialWavesConfig::default()
    };
    config
}

fn driver() -> FrameDriver<StdRng> {
    FrameDriver::new(&config(), 40, 25, StdRng::seed_from_u64(42)).expect("valid geometry")
}

#[test]
fn nothing_is_visible_at_the_reveal_offset() {
    let mut driver = driver();
    driver.tick(config().name.reveal_offset_secs);
    assert!(driver
        .grid()
        .cells()
        .all(|cell| (cell.background, cell.foreground) == (0, 0)));
    assert!(to_plain_text(driver.grid(), false).chars().all(|c| c == ' ' || c == '\n'));
}

#[test]
fn settled_banner_is_fully_drawn_in_the_steady_colour() {
    let art = NameArt::new(ART);
    assert_eq!((art.width(), art.height()), (6, 5));

    let mut driver = driver();
    driver.tick(5.0);
    let grid = driver.grid();

    // start row floor((25 - 3) * 0.5) = 11, start col (40 - 6) / 2 = 17
    let (col, row) = (17, 11);
    for (i, &ch) in art.merged().iter().enumerate() {
        let x = col + (i % art.width()) as i32;
        let y = row + (i / art.width()) as i32;
        if art.is_isolated_space(i) {
            assert_eq!(grid.colors_at(x, y), Some(ColorPair::TRANSPARENT), "halo at {i}");
        } else {
            assert_eq!(grid.char_at(x, y), Some(ch), "glyph at {i}");
            assert_eq!(grid.colors_at(x, y), Some(ColorPair::WHITE), "colour at {i}");
        }
    }

    let text = to_plain_text(grid, false);
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(&rows[12][18..22], "/\\ |");
    assert_eq!(&rows[13][18..22], "\\/ |");
    assert_eq!(&rows[14][18..22], "|__|");
}

#[test]
fn clicks_ripple_over_the_banner() {
    let mut driver = driver();
    driver.tick(5.0);
    driver.click(18, 12, 5.0);
    driver.tick(5.05);

    let lit = driver.grid().colors_at(18, 12).expect("on grid");
    assert!((10..=14).contains(&lit.foreground));

    driver.tick(60.0);
    assert!(driver.effects().is_empty());
    assert_eq!(driver.grid().colors_at(18, 12), Some(ColorPair::WHITE));
}
