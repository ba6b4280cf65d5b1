//! UI rendering logic
//!
//! Handles layout and rendering of the viewer using Ratatui.
//! Layout structure:
//! - Title bar (1 line, fixed)
//! - Rendered exercise content (responsive height)
//! - Score / examples panel (fixed height, optional)
//! - Status line (1 line, fixed)

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use perseus_core::types::PerseusScore;
use perseus_core::Element;

use super::model::{ChoiceDisplay, Model, WidgetDisplay};

/// Minimum terminal width required for the UI
const MIN_TERMINAL_WIDTH: u16 = 40;
/// Height of the score/examples panel
const PANEL_HEIGHT: u16 = 6;
/// Height of the status line
const STATUS_LINE_HEIGHT: u16 = 1;

/// Render the entire UI
pub fn render(frame: &mut Frame, model: &Model, file_name: &str) {
    let size = frame.area();

    if size.width < MIN_TERMINAL_WIDTH {
        render_error_too_narrow(frame, size);
        return;
    }

    let panel_height = if model.show_score_panel {
        PANEL_HEIGHT
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(panel_height),
            Constraint::Length(STATUS_LINE_HEIGHT),
        ])
        .split(size);

    render_title_bar(frame, chunks[0], file_name);
    render_content(frame, chunks[1], model);
    if model.show_score_panel {
        render_panel(frame, chunks[2], model);
    }
    render_status_line(frame, chunks[3], model);
}

fn render_error_too_narrow(frame: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal too narrow: {} < {} chars",
        area.width, MIN_TERMINAL_WIDTH
    );
    let paragraph =
        Paragraph::new(msg).style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    frame.render_widget(paragraph, area);
}

fn render_title_bar(frame: &mut Frame, area: Rect, file_name: &str) {
    let title = format!("perseus:: {}", file_name);
    let paragraph = Paragraph::new(title).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(paragraph, area);
}

fn render_content(frame: &mut Frame, area: Rect, model: &Model) {
    let block = Block::default().borders(Borders::ALL).title("Exercise");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(content_lines(model)).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

/// Flattens the rendered element tree into terminal lines.
pub fn content_lines(model: &Model) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for element in &model.rendered().elements {
        push_block(element, model, &mut lines);
        lines.push(Line::default());
    }
    lines
}

fn push_block(element: &Element, model: &Model, lines: &mut Vec<Line<'static>>) {
    match element {
        Element::Paragraph {
            centered, children, ..
        } => {
            let mut spans = Vec::new();
            for child in children {
                push_inline(child, model, &mut spans, lines);
            }
            if !spans.is_empty() {
                let mut line = Line::from(spans);
                if *centered {
                    line = line.centered();
                }
                lines.push(line);
            }
        }
        Element::Heading { level, children } => {
            let mut spans = vec![Span::raw("#".repeat(*level as usize) + " ")];
            for child in children {
                push_inline(child, model, &mut spans, lines);
            }
            lines.push(Line::from(spans).style(Style::default().add_modifier(Modifier::BOLD)));
        }
        Element::List { ordered, items } => {
            for (i, item) in items.iter().enumerate() {
                let marker = if *ordered {
                    format!("{}. ", i + 1)
                } else {
                    "• ".to_string()
                };
                let mut spans = vec![Span::raw(marker)];
                for child in item {
                    push_inline(child, model, &mut spans, lines);
                }
                lines.push(Line::from(spans));
            }
        }
        Element::Table { header, rows, .. } => {
            lines.push(table_row(header, model));
            lines.push(Line::from(Span::raw("—".repeat(16))));
            for row in rows {
                lines.push(table_row(row, model));
            }
        }
        Element::Columns { columns } => {
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    lines.push(Line::from(Span::styled(
                        "── column ──",
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                for child in column {
                    push_block(child, model, lines);
                }
            }
        }
        Element::CodeBlock { content, .. } => {
            for code_line in content.lines() {
                lines.push(Line::from(Span::styled(
                    format!("    {code_line}"),
                    Style::default().fg(Color::Green),
                )));
            }
        }
        Element::JiptPlaceholder { content, .. } => {
            lines.push(Line::from(Span::styled(
                content.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }
        other => {
            let mut spans = Vec::new();
            push_inline(other, model, &mut spans, lines);
            if !spans.is_empty() {
                lines.push(Line::from(spans));
            }
        }
    }
}

fn table_row(cells: &[Vec<Element>], model: &Model) -> Line<'static> {
    let mut spans = vec![Span::raw("| ")];
    let mut scratch = Vec::new();
    for cell in cells {
        for child in cell {
            push_inline(child, model, &mut spans, &mut scratch);
        }
        spans.push(Span::raw(" | "));
    }
    Line::from(spans)
}

fn push_inline(
    element: &Element,
    model: &Model,
    spans: &mut Vec<Span<'static>>,
    lines: &mut Vec<Line<'static>>,
) {
    match element {
        Element::Text { content } => spans.push(Span::raw(content.clone())),
        Element::Math { tex, .. } => spans.push(Span::styled(
            format!("${tex}$"),
            Style::default().fg(Color::Cyan),
        )),
        Element::Image { src, alt, .. } => {
            let label = alt.clone().unwrap_or_else(|| src.clone());
            spans.push(Span::styled(
                format!("[image: {label}]"),
                Style::default().fg(Color::Magenta),
            ));
        }
        Element::Widget {
            id, highlighted, ..
        } => push_widget(id, *highlighted, model, spans, lines),
        Element::WidgetError { message, .. } => spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Element::Placeholder { label } => spans.push(Span::styled(
            format!("[{label}]"),
            Style::default().fg(Color::DarkGray),
        )),
        Element::Lint {
            message, child, ..
        } => {
            push_inline(child, model, spans, lines);
            spans.push(Span::styled(
                format!(" ⚠ {message}"),
                Style::default().fg(Color::Yellow),
            ));
        }
        // Block elements nested in inline position get their own lines.
        other => push_block(other, model, lines),
    }
}

fn push_widget(
    id: &str,
    highlighted: bool,
    model: &Model,
    spans: &mut Vec<Span<'static>>,
    lines: &mut Vec<Line<'static>>,
) {
    match model.widget_display(id) {
        WidgetDisplay::InputNumber { value, focused } => {
            let mut style = Style::default().fg(Color::Black).bg(Color::Gray);
            if focused {
                style = Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD);
            }
            if highlighted {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            spans.push(Span::styled(format!("[ {value} ]"), style));
        }
        WidgetDisplay::Radio { choices, focused } => {
            for (i, choice) in choices.iter().enumerate() {
                lines.push(choice_line(i, choice, focused));
            }
        }
        WidgetDisplay::Unknown { widget_type } => {
            spans.push(Span::styled(
                format!("[unsupported widget: {widget_type}]"),
                Style::default().fg(Color::Red),
            ));
        }
    }
}

fn choice_line(index: usize, choice: &ChoiceDisplay, focused: bool) -> Line<'static> {
    let marker = if choice.selected { "(•)" } else { "( )" };
    let mut style = Style::default();
    if focused {
        style = style.fg(Color::Yellow);
    }
    let mut spans = vec![Span::styled(
        format!(" {} {marker} {}", index + 1, choice.content),
        style,
    )];
    if let Some(rationale) = &choice.rationale {
        if choice.selected {
            spans.push(Span::styled(
                format!("  — {rationale}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    Line::from(spans)
}

fn render_panel(frame: &mut Frame, area: Rect, model: &Model) {
    let block = Block::default().borders(Borders::ALL).title("Score");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    match &model.score {
        Some(PerseusScore::Points { earned, total, message }) => {
            lines.push(Line::from(Span::styled(
                format!("{earned} / {total}"),
                Style::default()
                    .fg(if earned == total {
                        Color::Green
                    } else {
                        Color::Red
                    })
                    .add_modifier(Modifier::BOLD),
            )));
            if let Some(message) = message {
                lines.push(Line::from(Span::raw(message.clone())));
            }
        }
        Some(PerseusScore::Invalid { message }) => {
            let message = message
                .clone()
                .unwrap_or_else(|| "Some answers are missing or malformed".to_string());
            lines.push(Line::from(Span::styled(
                message,
                Style::default().fg(Color::Yellow),
            )));
            if !model.empty_widgets.is_empty() {
                lines.push(Line::from(Span::raw(format!(
                    "Unanswered: {}",
                    model.empty_widgets.join(", ")
                ))));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Press Enter to grade",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    if model.show_examples {
        if let Some(examples) = model.examples() {
            if let Some(first) = examples.first() {
                let rest = examples[1..].join("; ");
                lines.push(Line::from(Span::styled(
                    format!("{first}{rest}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

fn render_status_line(frame: &mut Frame, area: Rect, model: &Model) {
    let mode = if model.focused_takes_text() {
        "typing"
    } else {
        "navigating"
    };
    let status = format!(
        " {mode} | Tab/Shift-Tab inputs | 1-9 choices | Enter grade | Esc blur | q quit"
    );
    let paragraph =
        Paragraph::new(status).style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(paragraph, area);
}
