use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, FormField};
use crate::ui::styles;

/// Render the Add tab - the create form.
///
/// Submitting keeps the entered values; only the outcome message
/// changes.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let create = &app.create;

    let mut lines: Vec<Line> = vec![Line::from("")];

    lines.extend(super::form_field_lines(
        "Title",
        &create.draft.title,
        create.field == FormField::Title,
        create.errors.title,
    ));
    lines.push(Line::from(""));
    lines.extend(super::form_field_lines(
        "Description",
        &create.draft.description,
        create.field == FormField::Description,
        create.errors.description,
    ));

    lines.push(Line::from(""));
    lines.push(submit_button(create.field == FormField::Save));

    if let Some(ref message) = create.message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", message),
            styles::success_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("Tab", styles::help_key_style()),
        Span::styled(" next field | ", styles::muted_style()),
        Span::styled("Enter", styles::help_key_style()),
        Span::styled(" on Submit to save | ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" back to list", styles::muted_style()),
    ]));

    let block = Block::default()
        .title(" Add Tutorial ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn submit_button(focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let label = if focused { " ▶ Submit ◀ " } else { "   Submit   " };
    Line::from(vec![
        Span::raw("  ["),
        Span::styled(label.to_string(), style),
        Span::raw("]"),
    ])
}
