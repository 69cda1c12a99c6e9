use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, EditView, FormField};
use crate::cache::{QueryKey, QueryState};
use crate::ui::styles;

/// Render the edit view for the record opened from the list.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(edit) = app.edit.as_ref() else {
        return;
    };

    let title = format!(" Edit Tutorial #{} ", edit.id);

    // Tri-state render driven by the record's query lifecycle. A seeded
    // form keeps rendering through a background re-fetch.
    if !edit.seeded {
        match app.store.state(QueryKey::Tutorial(edit.id)) {
            QueryState::Loading | QueryState::Idle => {
                super::render_placeholder(frame, area, &title, "... loading", false);
                return;
            }
            QueryState::Error(_) => {
                super::render_placeholder(frame, area, &title, "error", true);
                return;
            }
            QueryState::Success(_) => {}
        }
    }

    let mut lines: Vec<Line> = vec![Line::from("")];

    lines.extend(super::form_field_lines(
        "Title",
        &edit.draft.title,
        edit.field == FormField::Title,
        edit.errors.title,
    ));
    lines.push(Line::from(""));
    lines.extend(super::form_field_lines(
        "Description",
        &edit.draft.description,
        edit.field == FormField::Description,
        edit.errors.description,
    ));

    lines.push(Line::from(""));
    lines.push(status_line(edit));
    lines.push(Line::from(""));
    lines.push(save_button(edit.field == FormField::Save));

    if let Some(ref message) = edit.message {
        let style = if message.contains("failed") {
            styles::error_style()
        } else {
            styles::success_style()
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", message), style)));
    }

    lines.push(Line::from(""));
    lines.push(hint_line(edit));

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn status_line(edit: &EditView) -> Line<'static> {
    let (text, style) = if edit.published {
        ("Published", styles::success_style())
    } else {
        ("Unpublished", styles::muted_style())
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<13}", "Status:"), styles::muted_style()),
        Span::styled(text, style),
    ])
}

fn save_button(focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let label = if focused { " ▶ Save ◀ " } else { "   Save   " };
    Line::from(vec![
        Span::raw("  ["),
        Span::styled(label.to_string(), style),
        Span::raw("]"),
    ])
}

fn hint_line(edit: &EditView) -> Line<'static> {
    let toggle = if edit.published {
        "unpublish"
    } else {
        "publish"
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled("Ctrl+P", styles::help_key_style()),
        Span::styled(format!(" {} | ", toggle), styles::muted_style()),
        Span::styled("Ctrl+D", styles::help_key_style()),
        Span::styled(" delete | ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" back to list", styles::muted_style()),
    ])
}
