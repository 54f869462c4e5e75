use artbox::{
    Alignment as ArtAlignment, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use tui_dispatch::DataResource;

use super::location_header::{HEADER_OVERHEAD, gradient_colors};
use super::{Component, ERROR_ICON, LocationHeader, LocationHeaderProps};
use crate::action::Action;
use crate::sprites::{self, SpriteSize};
use crate::state::{AppState, WeatherReport};

pub struct WeatherBody;

pub struct WeatherBodyProps<'a> {
    pub state: &'a AppState,
}

pub const IDLE_MESSAGE: &str = "Search for a city to get the latest weather forecast.";
pub const LOADING_MESSAGE: &str = "Fetching weather data...";

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// Animation ticks per spinner frame
const SPINNER_TICKS_PER_FRAME: u32 = 5;

/// Fixed rows: blank + blank + description + blank + details (label, value).
const LAYOUT_FIXED: u16 = 6;

/// Text cap tiers: (header_cap, temp_cap).
/// terminus(6), miniwi(4), plain(1), with HEADER_OVERHEAD added to header.
const TEXT_TIERS: [(u16, u16); 3] = [
    (6 + HEADER_OVERHEAD, 6),
    (4 + HEADER_OVERHEAD, 4),
    (1 + HEADER_OVERHEAD, 1),
];

fn font_stack() -> Vec<artbox::Font> {
    fonts::stack(&["terminus", "miniwi"])
}

struct LayoutSizing {
    sprite: Option<SpriteSize>,
    sprite_h: u16,
    header_cap: u16,
    temp_cap: u16,
}

/// Try to fit the largest sprite by progressively shrinking text caps.
/// Only falls to emoji when no sprite fits even with plain text.
fn compute_layout(area_height: u16) -> LayoutSizing {
    for &(hcap, tcap) in &TEXT_TIERS {
        let budget = area_height.saturating_sub(hcap + tcap + LAYOUT_FIXED);
        if let Some(size) = SpriteSize::for_height(budget) {
            return LayoutSizing {
                sprite: Some(size),
                sprite_h: size.height(),
                header_cap: hcap,
                temp_cap: tcap,
            };
        }
    }
    let (hcap, tcap) = TEXT_TIERS[0];
    LayoutSizing {
        sprite: None,
        sprite_h: 1,
        header_cap: hcap,
        temp_cap: tcap,
    }
}

// ============================================================================
// Component
// ============================================================================

impl Component<Action> for WeatherBody {
    type Props<'a> = WeatherBodyProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        match WeatherView::from_state(props.state) {
            WeatherView::Error(error) => render_error(frame, area, error),
            WeatherView::Ready(report) => {
                let sizing = compute_layout(area.height);
                render_ready(frame, area, props.state, report, &sizing);
            }
            WeatherView::Loading => render_loading(frame, area, props.state),
            WeatherView::Idle => render_idle(frame, area),
        }
    }
}

fn render_ready(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    report: &WeatherReport,
    sizing: &LayoutSizing,
) {
    let chunks = Layout::vertical([
        Constraint::Max(sizing.header_cap),
        Constraint::Length(1),
        Constraint::Length(sizing.sprite_h),
        Constraint::Length(1),
        Constraint::Max(sizing.temp_cap),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(2),
    ])
    .flex(Flex::Center)
    .split(area);

    let temperature = report.temp_c.trim().parse::<f32>().ok();

    let mut header = LocationHeader;
    header.render(
        frame,
        chunks[0],
        LocationHeaderProps {
            name: &report.area_name,
            subtitle: &report.country,
            temperature,
            is_animating: state.loading_anim_active(),
            tick_count: state.tick_count,
        },
    );

    // Sprite or emoji
    let icon = report.icon();
    match sizing.sprite {
        Some(size) => {
            let art = sprites::get_sprite(icon, size);
            frame.render_widget(
                Paragraph::new(art).alignment(Alignment::Center),
                chunks[2],
            );
        }
        None => {
            let emoji = Line::from(icon.emoji()).centered();
            frame.render_widget(Paragraph::new(emoji), chunks[2]);
        }
    }

    // Temperature
    let temp_text = format!("{}°C", report.temp_c);
    let renderer = Renderer::new(font_stack())
        .with_plain_fallback()
        .with_alignment(ArtAlignment::Center)
        .with_fill(temperature_fill(temperature));
    frame.render_widget(ArtBox::new(&renderer, &temp_text), chunks[4]);

    // Description
    let desc = Line::from(vec![Span::styled(
        report.description.clone(),
        Style::default().fg(Color::Gray),
    )])
    .centered();
    frame.render_widget(Paragraph::new(desc), chunks[5]);

    render_details(frame, chunks[7], report);
}

/// Feels like / wind / humidity, three centered columns
fn render_details(frame: &mut Frame, area: Rect, report: &WeatherReport) {
    let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);
    let details = [
        ("Feels Like", format!("{}°", report.feels_like_c)),
        ("Wind", format!("{} km/h", report.windspeed_kmph)),
        ("Humidity", format!("{}%", report.humidity)),
    ];

    for (column, (label, value)) in columns.iter().zip(details) {
        let lines = vec![
            Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))).centered(),
            Line::from(Span::styled(
                value,
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .centered(),
        ];
        frame.render_widget(Paragraph::new(lines), *column);
    }
}

fn render_loading(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::vertical([
        Constraint::Max(TEXT_TIERS[0].0),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .flex(Flex::Center)
    .split(area);

    let mut header = LocationHeader;
    header.render(
        frame,
        chunks[0],
        LocationHeaderProps {
            name: &state.city,
            subtitle: "",
            temperature: None,
            is_animating: true,
            tick_count: state.tick_count,
        },
    );

    let frame_idx = (state.tick_count / SPINNER_TICKS_PER_FRAME) as usize % SPINNER_FRAMES.len();
    frame.render_widget(
        Paragraph::new(
            Line::from(Span::styled(
                SPINNER_FRAMES[frame_idx],
                Style::default().fg(Color::Cyan).bold(),
            ))
            .centered(),
        ),
        chunks[2],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(Span::styled(LOADING_MESSAGE, Style::default().fg(Color::Gray)))
                .centered(),
        ),
        chunks[4],
    );
}

fn render_idle(frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .flex(Flex::Center)
    .split(area);

    frame.render_widget(
        Paragraph::new(
            Line::from(Span::styled(IDLE_MESSAGE, Style::default().fg(Color::Gray)))
                .centered(),
        ),
        chunks[0],
    );
    frame.render_widget(Paragraph::new(key_hint("/", "to search")), chunks[2]);
}

fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // blank
        Constraint::Length(1), // icon
        Constraint::Length(1), // "Error"
        Constraint::Length(1), // message
        Constraint::Length(1), // blank
        Constraint::Length(1), // hint
    ])
    .flex(Flex::Center)
    .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(ERROR_ICON).centered()),
        chunks[1],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![Span::styled(
                "Error",
                Style::default().fg(Color::Red).bold(),
            )])
            .centered(),
        ),
        chunks[2],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![Span::styled(
                error.to_string(),
                Style::default().fg(Color::Rgb(252, 165, 165)),
            )])
            .centered(),
        ),
        chunks[3],
    );
    frame.render_widget(Paragraph::new(key_hint("r", "to retry")), chunks[5]);
}

fn key_hint(key: &'static str, text: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled(key, Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!(" {text}"), Style::default().fg(Color::DarkGray)),
    ])
    .centered()
}

// ============================================================================
// Helpers
// ============================================================================

enum WeatherView<'a> {
    Error(&'a str),
    Ready(&'a WeatherReport),
    Loading,
    Idle,
}

impl<'a> WeatherView<'a> {
    fn from_state(state: &'a AppState) -> Self {
        match &state.weather {
            DataResource::Failed(error) => WeatherView::Error(error),
            DataResource::Loaded(report) => WeatherView::Ready(report),
            DataResource::Loading => WeatherView::Loading,
            DataResource::Empty => WeatherView::Idle,
        }
    }
}

fn temperature_fill(celsius: Option<f32>) -> Fill {
    let (start, end) = gradient_colors(celsius);
    Fill::Linear(LinearGradient::horizontal(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_layout_prefers_large_sprite() {
        let sizing = compute_layout(40);
        assert_eq!(sizing.sprite, Some(SpriteSize::Large));
        assert_eq!(sizing.header_cap, TEXT_TIERS[0].0);
    }

    #[test]
    fn test_compute_layout_shrinks_text_before_dropping_sprite() {
        // 3 + 1 + 6 = 10 rows of text leaves exactly a small sprite
        let sizing = compute_layout(15);
        assert_eq!(sizing.sprite, Some(SpriteSize::Small));
        assert_eq!(sizing.temp_cap, 1);
    }

    #[test]
    fn test_compute_layout_falls_back_to_emoji() {
        let sizing = compute_layout(6);
        assert_eq!(sizing.sprite, None);
        assert_eq!(sizing.sprite_h, 1);
    }
}
