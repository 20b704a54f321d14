//! Home view: model selection.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::config::ClientConfig;
use crate::domain::{Feature, ModelKind};
use crate::tui::styles::MedicalTheme;

/// Home screen state.
#[derive(Debug, Default)]
pub struct HomeState {
    pub selected: usize,
}

impl HomeState {
    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % ModelKind::ALL.len();
    }

    pub fn prev(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(ModelKind::ALL.len() - 1);
    }

    #[must_use]
    pub fn selected_model(&self) -> ModelKind {
        ModelKind::ALL[self.selected % ModelKind::ALL.len()]
    }
}

/// Render the model selection screen.
pub fn render_home(f: &mut Frame, area: Rect, state: &HomeState, config: &ClientConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Intro
            Constraint::Min(0),    // Model cards
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_intro(f, chunks[1]);
    render_model_cards(f, chunks[2], state, config);
    render_footer(f, chunks[3]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Diabetes Prediction", MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled("Remote ML classifiers", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_intro(f: &mut Frame, area: Rect) {
    let features = Feature::ALL
        .iter()
        .map(|feature| feature.label())
        .collect::<Vec<_>>()
        .join(", ");

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "Predict diabetes from eight clinical measurements. Choose a model to start.",
            MedicalTheme::text(),
        )),
        Line::from(Span::styled(features, MedicalTheme::text_muted())),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::NONE));

    f.render_widget(intro, area);
}

fn render_model_cards(f: &mut Frame, area: Rect, state: &HomeState, config: &ClientConfig) {
    let constraints: Vec<Constraint> = ModelKind::ALL
        .iter()
        .map(|_| Constraint::Length(6))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    for (i, model) in ModelKind::ALL.iter().enumerate() {
        let is_selected = i == state.selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let card = Paragraph::new(vec![
            Line::from(Span::styled(model.description(), MedicalTheme::text())),
            Line::from(""),
            Line::from(vec![
                Span::styled("Endpoint: ", MedicalTheme::text_muted()),
                Span::styled(config.endpoint(*model).to_string(), MedicalTheme::text_secondary()),
            ]),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(format!(" {} ", model.display_name()), title_style))
                .borders(Borders::ALL)
                .border_style(border_style),
        );

        f.render_widget(card, chunks[i]);
    }
}

fn render_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[↑↓] ", MedicalTheme::key_hint()),
        Span::styled("Select ", MedicalTheme::key_desc()),
        Span::styled("[Enter] ", MedicalTheme::key_hint()),
        Span::styled("Open ", MedicalTheme::key_desc()),
        Span::styled("[Q] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
