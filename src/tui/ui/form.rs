//! Prediction form: quick input plus the eight feature fields.

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::application::PredictionSession;
use crate::domain::{Feature, FEATURE_COUNT};
use crate::tui::styles::MedicalTheme;

/// Which input has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormFocus {
    #[default]
    QuickInput,
    Field(Feature),
}

impl FormFocus {
    fn position(self) -> usize {
        match self {
            Self::QuickInput => 0,
            Self::Field(feature) => feature.index() + 1,
        }
    }

    fn from_position(pos: usize) -> Self {
        match pos % (FEATURE_COUNT + 1) {
            0 => Self::QuickInput,
            n => Self::Field(Feature::ALL[n - 1]),
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::from_position(self.position() + 1)
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::from_position(self.position() + FEATURE_COUNT)
    }
}

/// UI-only state of a prediction screen.
#[derive(Debug, Default)]
pub struct FormState {
    pub focus: FormFocus,
    /// Set while a request is outstanding
    pub sending_since: Option<Instant>,
}

/// Render the prediction form for one model.
pub fn render_prediction_form(
    f: &mut Frame,
    area: Rect,
    session: &PredictionSession,
    state: &FormState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // Quick input
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], session);
    render_quick_input(f, chunks[1], session, state);
    render_form_fields(f, chunks[2], session, state);
    render_form_footer(f, chunks[3], session, state);
}

fn render_form_header(f: &mut Frame, area: Rect, session: &PredictionSession) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(
            format!("Diabetes Prediction with {}", session.model()),
            MedicalTheme::title(),
        ),
        Span::styled(" │ Enter the patient's measurements", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_quick_input(f: &mut Frame, area: Rect, session: &PredictionSession, state: &FormState) {
    let is_selected = state.focus == FormFocus::QuickInput;

    let value = if session.quick_input().is_empty() {
        Span::styled("e.g. 2, 120, 70, 30, 150, 28.5, 0.6, 45", MedicalTheme::text_muted())
    } else {
        Span::styled(session.quick_input(), MedicalTheme::text())
    };

    let order = Feature::ALL
        .iter()
        .map(|feature| feature.label())
        .collect::<Vec<_>>()
        .join(", ");

    let content = Paragraph::new(vec![
        Line::from(vec![Span::raw(" "), value, cursor(is_selected)]),
        Line::from(Span::styled(format!(" Order: {order}"), MedicalTheme::text_muted())),
    ])
    .block(field_block(
        " Quick Input (comma or space separated) ",
        is_selected,
    ));

    f.render_widget(content, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, session: &PredictionSession, state: &FormState) {
    // Create a two-column layout
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (FEATURE_COUNT + 1) / 2;

    render_field_column(f, columns[0], &Feature::ALL[..mid], session, state);
    render_field_column(f, columns[1], &Feature::ALL[mid..], session, state);
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    features: &[Feature],
    session: &PredictionSession,
    state: &FormState,
) {
    let constraints: Vec<Constraint> = features
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, feature) in features.iter().enumerate() {
        let is_selected = state.focus == FormFocus::Field(*feature);
        let raw = session.form().get(*feature);

        let value_display = if raw.is_empty() {
            Span::styled(feature.hint(), MedicalTheme::text_muted())
        } else {
            Span::styled(raw, MedicalTheme::text())
        };

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            value_display,
            cursor(is_selected),
        ]))
        .block(field_block(&format!(" {} ", feature.label()), is_selected));

        f.render_widget(content, chunks[i]);
    }
}

fn field_block(title: &str, is_selected: bool) -> Block<'static> {
    let (border_style, title_style) = if is_selected {
        (MedicalTheme::border_focused(), MedicalTheme::focused())
    } else {
        (MedicalTheme::border(), MedicalTheme::text_secondary())
    };

    Block::default()
        .title(Span::styled(title.to_string(), title_style))
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn cursor(is_selected: bool) -> Span<'static> {
    if is_selected {
        Span::styled("▌", Style::default().fg(MedicalTheme::PRIMARY_LIGHT))
    } else {
        Span::raw("")
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, session: &PredictionSession, state: &FormState) {
    let content = if let Some(err) = session.error() {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.to_string(), MedicalTheme::danger()),
        ])
    } else if let Some(since) = state.sending_since {
        Line::from(vec![Span::styled(
            format!(
                "Processing with {}... {:.1}s",
                session.model(),
                since.elapsed().as_secs_f64()
            ),
            MedicalTheme::info(),
        )])
    } else {
        let enter_action = match state.focus {
            FormFocus::QuickInput => "Fill Fields ",
            FormFocus::Field(_) => "Predict ",
        };
        Line::from(vec![
            Span::styled("[Tab/↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled(enter_action, MedicalTheme::key_desc()),
            Span::styled("[F5] ", MedicalTheme::key_hint()),
            Span::styled("Predict ", MedicalTheme::key_desc()),
            Span::styled("[Ctrl+S] ", MedicalTheme::key_hint()),
            Span::styled("Sample ", MedicalTheme::key_desc()),
            Span::styled("[Ctrl+R] ", MedicalTheme::key_hint()),
            Span::styled("Reset ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Back", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycles_through_all_inputs() {
        let mut focus = FormFocus::default();
        let mut seen = vec![focus];
        for _ in 0..FEATURE_COUNT {
            focus = focus.next();
            seen.push(focus);
        }
        assert_eq!(seen[1], FormFocus::Field(Feature::Pregnancies));
        assert_eq!(seen[FEATURE_COUNT], FormFocus::Field(Feature::Age));
        assert_eq!(focus.next(), FormFocus::QuickInput);
    }

    #[test]
    fn test_focus_prev_wraps() {
        assert_eq!(FormFocus::QuickInput.prev(), FormFocus::Field(Feature::Age));
        assert_eq!(
            FormFocus::Field(Feature::Pregnancies).prev(),
            FormFocus::QuickInput
        );
    }
}
