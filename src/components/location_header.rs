use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::state::LOADING_ANIM_CYCLE_TICKS;

pub struct LocationHeader;

pub struct LocationHeaderProps<'a> {
    /// Place name, drawn as FIGlet art
    pub name: &'a str,
    /// Country (or any secondary line); empty hides it
    pub subtitle: &'a str,
    pub temperature: Option<f32>,
    pub is_animating: bool,
    pub tick_count: u32,
}

/// Overhead inside the header area: 1 spacer + 1 country line.
/// The FIGlet place name gets `area.height - HEADER_OVERHEAD`.
pub const HEADER_OVERHEAD: u16 = 2;

type Rgb = (u8, u8, u8);

/// Exclusive upper bound in °C, then the two gradient ends.
const TEMP_BANDS: [(f32, Rgb, Rgb); 4] = [
    (0.0, (150, 200, 255), (200, 230, 255)),
    (15.0, (100, 180, 255), (150, 220, 200)),
    (25.0, (100, 200, 150), (255, 220, 100)),
    (35.0, (255, 180, 80), (255, 120, 80)),
];
const HOT: (Rgb, Rgb) = ((255, 100, 80), (255, 60, 60));
/// Accent cyan, used until a temperature is known
const NO_READING: (Rgb, Rgb) = ((6, 182, 212), (34, 211, 238));

fn band_colors(temp: Option<f32>) -> (Rgb, Rgb) {
    let Some(t) = temp else {
        return NO_READING;
    };
    TEMP_BANDS
        .iter()
        .find(|(upper, _, _)| t < *upper)
        .map(|&(_, start, end)| (start, end))
        .unwrap_or(HOT)
}

pub(crate) fn gradient_colors(temp: Option<f32>) -> (ArtColor, ArtColor) {
    let ((r1, g1, b1), (r2, g2, b2)) = band_colors(temp);
    (ArtColor::rgb(r1, g1, b1), ArtColor::rgb(r2, g2, b2))
}

/// Horizontal gradient whose ends trade places over one animation cycle.
fn header_fill(colors: (ArtColor, ArtColor), phase: f32) -> Fill {
    let t = 1.0 - (2.0 * phase.rem_euclid(1.0) - 1.0).abs();
    let start = colors.0.interpolate(colors.1, t);
    let end = colors.1.interpolate(colors.0, t);
    Fill::Linear(LinearGradient::horizontal(start, end))
}

fn animated_phase(tick_count: u32) -> f32 {
    let steps = LOADING_ANIM_CYCLE_TICKS.max(1);
    (tick_count % steps) as f32 / steps as f32
}

impl Component<Action> for LocationHeader {
    type Props<'a> = LocationHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet place name
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Country
        ])
        .split(area);

        let colors = gradient_colors(props.temperature);
        let phase = if props.is_animating {
            animated_phase(props.tick_count)
        } else {
            0.0
        };
        let fill = header_fill(colors, phase);

        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(fill);

        frame.render_widget(ArtBox::new(&renderer, props.name), chunks[0]);

        if !props.subtitle.is_empty() {
            let subtitle = Line::from(vec![Span::styled(
                props.subtitle.to_string(),
                Style::default().fg(Color::DarkGray),
            )])
            .centered();
            frame.render_widget(Paragraph::new(subtitle), chunks[2]);
        }
    }
}
