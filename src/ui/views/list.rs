use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, AppState};
use crate::cache::QueryState;
use crate::ui::styles;
use crate::utils::truncate;

/// Render the Tutorials tab - filterable table with a preview panel
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_table(frame, app, chunks[0]);
    render_preview(frame, app, chunks[1]);
}

fn block_title(app: &App) -> String {
    let source = if app.list.published_only {
        "Published"
    } else {
        "Tutorials"
    };
    let count = app.list.filtered_indices().len();
    let filter = if app.list.filter.is_empty() && !matches!(app.state, AppState::Filtering) {
        String::new()
    } else {
        format!(" /{}", app.list.filter)
    };
    format!(
        " {} ({}){} - [/]filter [p]ublished [D]elete all ",
        source, count, filter
    )
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    match app.store.state(app.list_key()) {
        QueryState::Loading | QueryState::Idle => {
            super::render_placeholder(frame, area, &block_title(app), "... loading", false);
            return;
        }
        QueryState::Error(_) => {
            super::render_placeholder(frame, area, &block_title(app), "error", true);
            return;
        }
        QueryState::Success(_) => {}
    }

    let items = if app.list.published_only {
        app.store.published()
    } else {
        app.store.tutorials()
    }
    .unwrap_or(&[]);

    let header = Row::new([Cell::from("Title"), Cell::from("Status")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = app
        .list
        .filtered_indices()
        .iter()
        .filter_map(|&index| items.get(index))
        .map(|tutorial| {
            let status_style = if tutorial.published {
                styles::success_style()
            } else {
                styles::muted_style()
            };
            Row::new(vec![
                Cell::from(tutorial.title.clone()),
                Cell::from(Span::styled(tutorial.status(), status_style)),
            ])
        })
        .collect();

    let widths = [Constraint::Fill(3), Constraint::Length(12)];

    let filtering = matches!(app.state, AppState::Filtering);
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(block_title(app))
                .title_style(if filtering {
                    styles::filter_style()
                } else {
                    styles::muted_style()
                })
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !app.list.filtered_indices().is_empty() {
        state.select(Some(app.list.selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let content = match app.selected_tutorial() {
        Some(tutorial) => {
            let status_style = if tutorial.published {
                styles::success_style()
            } else {
                styles::muted_style()
            };
            vec![
                Line::from(Span::styled("Tutorial", styles::title_style())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Title:       ", styles::muted_style()),
                    Span::raw(tutorial.title.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Description: ", styles::muted_style()),
                    Span::raw(truncate(&tutorial.description, 60)),
                ]),
                Line::from(vec![
                    Span::styled("Status:      ", styles::muted_style()),
                    Span::styled(tutorial.status(), status_style),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Press ", styles::muted_style()),
                    Span::styled("Enter", styles::help_key_style()),
                    Span::styled(" to edit", styles::muted_style()),
                ]),
            ]
        }
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Please select a tutorial...",
                styles::muted_style(),
            )),
        ],
    };

    let block = Block::default()
        .title(" Preview ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}
