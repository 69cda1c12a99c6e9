pub mod create;
pub mod detail;
pub mod list;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::styles;

/// Shared render for a query that has no data yet: the
/// "... loading" / "error" placeholders.
pub(crate) fn render_placeholder(frame: &mut Frame, area: Rect, title: &str, text: &str, error: bool) {
    let style = if error {
        styles::error_style()
    } else {
        styles::muted_style()
    };
    let block = Block::default()
        .title(title.to_string())
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", text), style)),
    ])
    .block(block);
    frame.render_widget(paragraph, area);
}

/// Render one form field as `Label: [buffer▌]` with an optional
/// validation error line below it.
pub(crate) fn form_field_lines<'a>(
    label: &'a str,
    value: &'a str,
    focused: bool,
    error: Option<&'static str>,
) -> Vec<Line<'a>> {
    let field_style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };

    let mut lines = vec![Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<13}", format!("{}:", label)), styles::muted_style()),
        Span::styled("[", styles::muted_style()),
        Span::styled(format!("{}{}", value, cursor), field_style),
        Span::styled("]", styles::muted_style()),
    ])];

    if let Some(message) = error {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::raw(" ".repeat(13)),
            Span::styled(message, styles::error_style()),
        ]));
    }

    lines
}
