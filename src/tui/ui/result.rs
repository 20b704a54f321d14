//! Prediction result popup.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::domain::{AccuracySplit, PredictionResult};
use crate::tui::styles::MedicalTheme;

use super::centered_rect;

const POPUP_WIDTH: u16 = 64;
const POPUP_HEIGHT: u16 = 24;

/// Render the result popup over `area`.
pub fn render_result_popup(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let popup = centered_rect(POPUP_WIDTH, POPUP_HEIGHT, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} Prediction Result ", result.model),
            MedicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Classification badge
            Constraint::Length(11), // Accuracy chart + text
            Constraint::Length(3),  // Precision / recall / F1
            Constraint::Min(0),     // Timestamp + keys
        ])
        .margin(1)
        .split(inner);

    render_classification(f, chunks[0], result);
    render_accuracy(f, chunks[1], result);
    render_metrics(f, chunks[2], result);
    render_result_footer(f, chunks[3], result);
}

fn render_classification(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let badge = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("  {}  ", result.classification),
            MedicalTheme::classification(result.classification),
        )),
        Line::from(Span::styled(
            result.classification.description(),
            MedicalTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center);

    f.render_widget(badge, area);
}

fn render_accuracy(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_accuracy_chart(f, columns[0], result.metrics.accuracy_split());

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled("Model Accuracy", MedicalTheme::text_secondary())),
        Line::from(Span::styled(
            result.metrics.accuracy_display(),
            MedicalTheme::success().add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(text, columns[1]);
}

/// Two bars: share of correct vs. incorrect test predictions.
fn render_accuracy_chart(f: &mut Frame, area: Rect, split: AccuracySplit) {
    let block = Block::default()
        .title(Span::styled(" Proportion ", MedicalTheme::text_secondary()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    if split.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No accuracy reported", MedicalTheme::text_muted())),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let bars = [
        chart_bar("Correct", split.correct).style(MedicalTheme::chart_correct()),
        chart_bar("Incorrect", split.incorrect).style(MedicalTheme::chart_incorrect()),
    ];

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(11)
        .bar_gap(3)
        .max(10_000)
        .value_style(MedicalTheme::title());

    f.render_widget(chart, area);
}

fn chart_bar(label: &'static str, percent: f64) -> Bar<'static> {
    Bar::default()
        .label(Line::from(label))
        .value(bar_value(percent))
        .text_value(format!("{percent:.2}%"))
}

/// Bars hold hundredths of a percent so two decimals survive the `u64`.
fn bar_value(percent: f64) -> u64 {
    (percent.clamp(0.0, 100.0) * 100.0).round() as u64
}

fn render_metrics(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let metrics = [
        ("Precision", &result.metrics.precision),
        ("Recall", &result.metrics.recall),
        ("F1-Score", &result.metrics.f1_score),
    ];

    for (column, (name, value)) in columns.iter().zip(metrics) {
        let cell = Paragraph::new(vec![
            Line::from(Span::styled(name, MedicalTheme::text_muted())),
            Line::from(Span::styled(value.as_str(), MedicalTheme::text())),
        ])
        .alignment(Alignment::Center);
        f.render_widget(cell, *column);
    }
}

fn render_result_footer(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let footer = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(
                "Received {}",
                result.received_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            MedicalTheme::text_muted(),
        )),
        Line::from(vec![
            Span::styled("[Enter/Esc] ", MedicalTheme::key_hint()),
            Span::styled("Close", MedicalTheme::key_desc()),
        ]),
    ])
    .alignment(Alignment::Center);

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_value_keeps_two_decimals() {
        assert_eq!(bar_value(95.0), 9_500);
        assert_eq!(bar_value(77.92), 7_792);
        assert_eq!(bar_value(-3.0), 0);
        assert_eq!(bar_value(120.0), 10_000);
    }
}
