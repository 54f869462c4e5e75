//! Weather icon sprites with auto-sizing and multi-color layer support
//!
//! Sprites are loaded from text files at compile time using `include_str!`.
//! Each icon has Small (5 lines) and Large (9 lines) variants; layers are
//! composited back-to-front with spaces treated as transparent.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};

use crate::icons::IconKey;

// ============================================================================
// Sprite data - embedded at compile time
// File naming: {size}_{color}.txt (e.g., small_yellow.txt, large_gray.txt)
// ============================================================================

mod sprite_data {
    pub mod sun {
        pub const SMALL_YELLOW: &str = include_str!("../sprites/sun/small_yellow.txt");
        pub const LARGE_YELLOW: &str = include_str!("../sprites/sun/large_yellow.txt");
    }
    pub mod cloud_sun {
        // Sun layer (background)
        pub const SMALL_YELLOW: &str = include_str!("../sprites/cloud_sun/small_yellow.txt");
        pub const LARGE_YELLOW: &str = include_str!("../sprites/cloud_sun/large_yellow.txt");
        // Cloud layer (foreground)
        pub const SMALL_GRAY: &str = include_str!("../sprites/cloud_sun/small_gray.txt");
        pub const LARGE_GRAY: &str = include_str!("../sprites/cloud_sun/large_gray.txt");
    }
    pub mod cloud {
        pub const SMALL_DARKGRAY: &str = include_str!("../sprites/cloud/small_darkgray.txt");
        pub const LARGE_DARKGRAY: &str = include_str!("../sprites/cloud/large_darkgray.txt");
        pub const SMALL_LIGHTGRAY: &str = include_str!("../sprites/cloud/small_lightgray.txt");
        pub const LARGE_LIGHTGRAY: &str = include_str!("../sprites/cloud/large_lightgray.txt");
    }
    pub mod wind {
        pub const SMALL_DARKGRAY: &str = include_str!("../sprites/wind/small_darkgray.txt");
        pub const LARGE_DARKGRAY: &str = include_str!("../sprites/wind/large_darkgray.txt");
        pub const SMALL_LIGHTGRAY: &str = include_str!("../sprites/wind/small_lightgray.txt");
        pub const LARGE_LIGHTGRAY: &str = include_str!("../sprites/wind/large_lightgray.txt");
    }
    pub mod cloud_rain {
        pub const SMALL_GRAY: &str = include_str!("../sprites/cloud_rain/small_gray.txt");
        pub const LARGE_GRAY: &str = include_str!("../sprites/cloud_rain/large_gray.txt");
        pub const SMALL_BLUE: &str = include_str!("../sprites/cloud_rain/small_blue.txt");
        pub const LARGE_BLUE: &str = include_str!("../sprites/cloud_rain/large_blue.txt");
    }
    pub mod cloud_snow {
        pub const SMALL_GRAY: &str = include_str!("../sprites/cloud_snow/small_gray.txt");
        pub const LARGE_GRAY: &str = include_str!("../sprites/cloud_snow/large_gray.txt");
        pub const SMALL_WHITE: &str = include_str!("../sprites/cloud_snow/small_white.txt");
        pub const LARGE_WHITE: &str = include_str!("../sprites/cloud_snow/large_white.txt");
    }
    pub mod cloud_lightning {
        pub const SMALL_GRAY: &str = include_str!("../sprites/cloud_lightning/small_gray.txt");
        pub const LARGE_GRAY: &str = include_str!("../sprites/cloud_lightning/large_gray.txt");
        pub const SMALL_YELLOW: &str =
            include_str!("../sprites/cloud_lightning/small_yellow.txt");
        pub const LARGE_YELLOW: &str =
            include_str!("../sprites/cloud_lightning/large_yellow.txt");
    }
}

// ============================================================================
// Layer compositing
// ============================================================================

/// A single sprite layer with its content and color
struct SpriteLayer {
    content: &'static str,
    color: Color,
}

/// Composite multiple layers into Text, treating spaces as transparent
fn composite_layers(layers: &[SpriteLayer]) -> Text<'static> {
    if layers.is_empty() {
        return Text::default();
    }

    let layer_lines: Vec<Vec<Vec<char>>> = layers
        .iter()
        .map(|l| l.content.lines().map(|line| line.chars().collect()).collect())
        .collect();

    let max_lines = layer_lines.iter().map(|l| l.len()).max().unwrap_or(0);
    let max_width = layer_lines
        .iter()
        .flat_map(|lines| lines.iter())
        .map(|line| line.len())
        .max()
        .unwrap_or(0);

    let mut result_lines = Vec::with_capacity(max_lines);

    for line_idx in 0..max_lines {
        let mut spans = Vec::with_capacity(max_width);

        for col_idx in 0..max_width {
            // Topmost non-space character wins (last layer = foreground)
            let mut found_char = ' ';
            let mut found_color = Color::Reset;

            for (layer_idx, layer) in layers.iter().enumerate().rev() {
                let ch = layer_lines[layer_idx]
                    .get(line_idx)
                    .and_then(|line| line.get(col_idx));
                if let Some(&ch) = ch {
                    if ch != ' ' {
                        found_char = ch;
                        found_color = layer.color;
                        break;
                    }
                }
            }

            spans.push(Span::styled(
                found_char.to_string(),
                Style::default().fg(found_color),
            ));
        }

        result_lines.push(Line::from(spans));
    }

    Text::from(result_lines)
}

// ============================================================================
// Types
// ============================================================================

/// Sprite size categories
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteSize {
    /// 5 lines - for compact terminals
    Small,
    /// 9 lines - for roomy terminals
    Large,
}

impl SpriteSize {
    pub const SMALL_HEIGHT: u16 = 5;
    pub const LARGE_HEIGHT: u16 = 9;

    /// Pick the largest sprite that fits the available height.
    /// Returns `None` if even Small won't fit.
    pub fn for_height(available: u16) -> Option<Self> {
        if available >= Self::LARGE_HEIGHT {
            Some(SpriteSize::Large)
        } else if available >= Self::SMALL_HEIGHT {
            Some(SpriteSize::Small)
        } else {
            None
        }
    }

    pub fn height(self) -> u16 {
        match self {
            SpriteSize::Small => Self::SMALL_HEIGHT,
            SpriteSize::Large => Self::LARGE_HEIGHT,
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

fn pick(size: SpriteSize, small: &'static str, large: &'static str) -> &'static str {
    match size {
        SpriteSize::Small => small,
        SpriteSize::Large => large,
    }
}

/// Get weather art for the given icon and size
pub fn get_sprite(icon: IconKey, size: SpriteSize) -> Text<'static> {
    use sprite_data::*;

    let layers: Vec<SpriteLayer> = match icon {
        IconKey::Sun => vec![SpriteLayer {
            content: pick(size, sun::SMALL_YELLOW, sun::LARGE_YELLOW),
            color: Color::Yellow,
        }],

        IconKey::CloudSun => vec![
            SpriteLayer {
                content: pick(size, cloud_sun::SMALL_YELLOW, cloud_sun::LARGE_YELLOW),
                color: Color::Yellow,
            },
            SpriteLayer {
                content: pick(size, cloud_sun::SMALL_GRAY, cloud_sun::LARGE_GRAY),
                color: Color::Rgb(200, 200, 210),
            },
        ],

        IconKey::Cloud => vec![
            SpriteLayer {
                content: pick(size, cloud::SMALL_DARKGRAY, cloud::LARGE_DARKGRAY),
                color: Color::Rgb(120, 120, 140),
            },
            SpriteLayer {
                content: pick(size, cloud::SMALL_LIGHTGRAY, cloud::LARGE_LIGHTGRAY),
                color: Color::Rgb(170, 170, 185),
            },
        ],

        IconKey::Wind => vec![
            SpriteLayer {
                content: pick(size, wind::SMALL_DARKGRAY, wind::LARGE_DARKGRAY),
                color: Color::Rgb(140, 140, 155),
            },
            SpriteLayer {
                content: pick(size, wind::SMALL_LIGHTGRAY, wind::LARGE_LIGHTGRAY),
                color: Color::Rgb(180, 180, 190),
            },
        ],

        IconKey::CloudRain => vec![
            SpriteLayer {
                content: pick(size, cloud_rain::SMALL_GRAY, cloud_rain::LARGE_GRAY),
                color: Color::Rgb(160, 160, 175),
            },
            SpriteLayer {
                content: pick(size, cloud_rain::SMALL_BLUE, cloud_rain::LARGE_BLUE),
                color: Color::Rgb(80, 140, 200),
            },
        ],

        IconKey::CloudSnow => vec![
            SpriteLayer {
                content: pick(size, cloud_snow::SMALL_GRAY, cloud_snow::LARGE_GRAY),
                color: Color::Rgb(160, 160, 175),
            },
            SpriteLayer {
                content: pick(size, cloud_snow::SMALL_WHITE, cloud_snow::LARGE_WHITE),
                color: Color::Rgb(200, 220, 255),
            },
        ],

        IconKey::CloudLightning => vec![
            SpriteLayer {
                content: pick(
                    size,
                    cloud_lightning::SMALL_GRAY,
                    cloud_lightning::LARGE_GRAY,
                ),
                color: Color::Rgb(120, 120, 140),
            },
            SpriteLayer {
                content: pick(
                    size,
                    cloud_lightning::SMALL_YELLOW,
                    cloud_lightning::LARGE_YELLOW,
                ),
                color: Color::Yellow,
            },
        ],
    };

    composite_layers(&layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ICONS: [IconKey; 7] = [
        IconKey::Sun,
        IconKey::CloudSun,
        IconKey::Cloud,
        IconKey::Wind,
        IconKey::CloudRain,
        IconKey::CloudSnow,
        IconKey::CloudLightning,
    ];

    #[test]
    fn test_sprite_size_for_height() {
        assert_eq!(SpriteSize::for_height(0), None);
        assert_eq!(SpriteSize::for_height(4), None);
        assert_eq!(SpriteSize::for_height(5), Some(SpriteSize::Small));
        assert_eq!(SpriteSize::for_height(8), Some(SpriteSize::Small));
        assert_eq!(SpriteSize::for_height(9), Some(SpriteSize::Large));
        assert_eq!(SpriteSize::for_height(60), Some(SpriteSize::Large));
    }

    #[test]
    fn test_all_sprites_have_declared_height() {
        for icon in ALL_ICONS {
            for size in [SpriteSize::Small, SpriteSize::Large] {
                let text = get_sprite(icon, size);
                assert_eq!(
                    text.lines.len(),
                    size.height() as usize,
                    "Sprite {:?}/{:?} has wrong height",
                    icon,
                    size
                );
                assert!(
                    text.lines
                        .iter()
                        .any(|line| line.spans.iter().any(|s| s.content != " ")),
                    "Sprite {:?}/{:?} should not be blank",
                    icon,
                    size
                );
            }
        }
    }

    #[test]
    fn test_foreground_layer_wins() {
        let layers = [
            SpriteLayer {
                content: "ab\n",
                color: Color::Red,
            },
            SpriteLayer {
                content: " X\n",
                color: Color::Blue,
            },
        ];
        let text = composite_layers(&layers);
        let spans = &text.lines[0].spans;
        assert_eq!(spans[0].content, "a");
        assert_eq!(spans[0].style.fg, Some(Color::Red));
        assert_eq!(spans[1].content, "X");
        assert_eq!(spans[1].style.fg, Some(Color::Blue));
    }
}
