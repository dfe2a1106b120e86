use super::view::{field_rows, progress_stages, Controls, StageState};
use crate::application::{App, AppMode, ServiceStatus};
use crate::domain::{Record, SubjectField, WorkflowStep};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_progress(f, app, chunks[1]);
    match app.step() {
        WorkflowStep::Upload => render_upload_step(f, app, chunks[2]),
        WorkflowStep::SelectSubject => render_selection_step(f, app, chunks[2]),
        WorkflowStep::Review => render_review_step(f, app, chunks[2]),
    }
    render_error_banner(f, app, chunks[3]);
    render_status_bar(f, app, chunks[4]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let (status, color) = match &app.service_status {
        ServiceStatus::Unknown => ("service: unknown".to_string(), Color::DarkGray),
        ServiceStatus::Connected => ("service: connected".to_string(), Color::Green),
        ServiceStatus::Unreachable(_) => ("service: unreachable".to_string(), Color::Red),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled("formpilot - W-7 Form Filler | ", Style::default().fg(Color::Cyan)),
        Span::styled(status, Style::default().fg(color)),
    ]));
    f.render_widget(header, area);
}

fn render_progress(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for (i, stage) in progress_stages(app.step()).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  →  ", Style::default().fg(Color::DarkGray)));
        }
        let (marker, style) = match stage.state {
            StageState::Done => ("✓", Style::default().fg(Color::Green)),
            StageState::Active => (
                "●",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            StageState::Pending => ("○", Style::default().fg(Color::DarkGray)),
        };
        spans.push(Span::styled(
            format!("{} {}. {}", marker, stage.number, stage.label),
            style,
        ));
    }

    let progress = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Progress"));
    f.render_widget(progress, area);
}

fn render_upload_step(f: &mut Frame, app: &App, area: Rect) {
    let store = app.workflow.store();
    let file = store
        .file()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "no file selected".to_string());

    let lines = vec![
        Line::from("Select a spreadsheet (.xlsx or .xls) describing one or more clients."),
        Line::from(""),
        Line::from(vec![
            Span::raw("File: "),
            Span::styled(file, Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
        Line::from(action_hint("o", "choose file", Controls::derive(app).select_file)),
        Line::from(action_hint("u", "upload", Controls::derive(app).upload)),
    ];

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("1. Upload File"));
    f.render_widget(body, area);
}

fn render_selection_step(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    render_name_fields(f, app, chunks[0]);
    render_candidates(f, app, chunks[1]);
}

fn render_name_fields(f: &mut Frame, app: &App, area: Rect) {
    let subject = app.workflow.store().subject();
    let editing = matches!(app.mode, AppMode::NameEntry);

    let field_line = |field: SubjectField, key: &str| {
        let focused = editing && app.focused_field == field;
        let style = if focused {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(vec![
            Span::styled(
                format!("[{}] {:<11}", key, field.label()),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(format!(" {} ", subject.field(field)), style),
        ])
    };

    let lines = vec![
        field_line(SubjectField::FirstName, "f"),
        field_line(SubjectField::LastName, "l"),
    ];
    let fields = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("2. Select Client"));
    f.render_widget(fields, area);
}

fn render_candidates(f: &mut Frame, app: &App, area: Rect) {
    let store = app.workflow.store();
    let subject = store.subject();

    let items: Vec<ListItem> = store
        .candidates()
        .iter()
        .map(|candidate| {
            if candidate.matches(subject) {
                ListItem::new(format!("✓ {}", candidate.full_name))
                    .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else {
                ListItem::new(format!("  {}", candidate.full_name))
            }
        })
        .collect();

    let title = format!("Clients found ({})", store.candidates().len());
    if items.is_empty() {
        let empty = Paragraph::new("No clients listed. Enter a name with f / l.")
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(empty, area);
        return;
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.candidate_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_review_step(f: &mut Frame, app: &App, area: Rect) {
    let store = app.workflow.store();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);
    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    render_field_table(f, store.record(), "Spreadsheet Data", app.table_scroll, tables[0]);
    render_field_table(f, store.mapped(), "Form Fields (mapped)", app.table_scroll, tables[1]);

    let controls = Controls::derive(app);
    let subject = store.subject();
    let who = if subject.is_empty() {
        "single client".to_string()
    } else {
        subject.full_name()
    };
    let pdf = if store.pdf_ready() { "PDF ready" } else { "PDF not generated" };

    let mut spans = vec![Span::styled(
        format!("{} | {} | ", who, pdf),
        Style::default().fg(Color::Cyan),
    )];
    spans.extend(action_hint("g", "generate", controls.generate));
    spans.push(Span::raw("  "));
    spans.extend(action_hint("d", "download", controls.download));
    spans.push(Span::raw("  "));
    spans.extend(action_hint("b", "back to clients", controls.return_to_selection));

    let actions = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("3. Review & Generate"));
    f.render_widget(actions, chunks[1]);
}

fn render_field_table(
    f: &mut Frame,
    record: Option<&Record>,
    title: &str,
    scroll: usize,
    area: Rect,
) {
    let rows: Vec<Row> = record
        .map(field_rows)
        .unwrap_or_default()
        .into_iter()
        .skip(scroll)
        .map(|(label, value)| {
            let value_style = if value == super::view::MISSING_VALUE {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(label).style(Style::default().fg(Color::Yellow)),
                Cell::from(value).style(value_style),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(45), Constraint::Percentage(55)])
        .header(
            Row::new(vec!["FIELD", "VALUE"]).style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_error_banner(f: &mut Frame, app: &App, area: Rect) {
    if let Some(error) = app.workflow.store().error() {
        let banner = Paragraph::new(format!(" ✗ {}", error))
            .style(Style::default().fg(Color::White).bg(Color::Red));
        f.render_widget(banner, area);
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                match app.step() {
                    WorkflowStep::Upload => {
                        "o: choose file | u: upload | ?: help | q: quit".to_string()
                    }
                    WorkflowStep::SelectSubject => concat!(
                        "↑↓: move | Enter: process client | Space: pick | f/l: edit name | ",
                        "p: process typed name | o: new file | q: quit"
                    )
                    .to_string(),
                    WorkflowStep::Review => concat!(
                        "g: generate | d: download | b: back | ↑↓: scroll | ",
                        "o: new file | q: quit"
                    )
                    .to_string(),
                }
            }
        }
        AppMode::FilePath => format!(
            "Spreadsheet path: {} (Enter to select, Esc to cancel)",
            app.filename_input
        ),
        AppMode::NameEntry => format!(
            "Editing {}: {} (Tab to switch field, Enter to process, Esc to finish)",
            app.focused_field.label(),
            app.focused_value()
        ),
        AppMode::Help => {
            "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string()
        }
    };

    let title = if app.is_busy() { "Status (working)" } else { "Status" };
    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(match app.mode {
            _ if app.is_busy() => Style::default().fg(Color::Yellow),
            AppMode::Normal => Style::default(),
            AppMode::FilePath => Style::default().fg(Color::Yellow),
            AppMode::NameEntry => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
        });
    f.render_widget(input, area);
}

fn action_hint(key: &str, label: &str, enabled: bool) -> Vec<Span<'static>> {
    let style = if enabled {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    vec![Span::styled(format!("[{}] {}", key, label), style)]
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("formpilot Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"FORMPILOT KEY REFERENCE

=== WORKFLOW ===
1. Upload File          Choose a spreadsheet and send it to the form service
2. Select Client        Pick the person whose row fills the form
3. Review & Generate    Check extracted and mapped fields, then build the PDF

=== ANY STEP ===
o / Ctrl+O      Choose a spreadsheet (.xlsx or .xls); resets the workflow
F1 or ?         Show this help
q               Quit

=== UPLOAD ===
u / Enter       Upload the selected spreadsheet

=== SELECT CLIENT ===
↑↓ or j/k       Move through the client list
Space           Copy the highlighted client into the name fields
Enter           Process the highlighted client
f / l           Edit first / last name by hand
p               Process the typed name
                Names must match the spreadsheet exactly, including case

=== NAME ENTRY ===
Tab             Switch between first and last name
Enter           Finish and process when both names are filled
Esc             Finish without processing

=== REVIEW ===
g               Generate the filled PDF
d               Download the PDF into the download directory
b / Esc         Back to the client list
↑↓ PgUp/PgDn    Scroll the field tables
                Empty values are shown as N/A

Only one request runs at a time; keys are ignored until it completes.
Errors appear in the red banner and clear on the next action."#;
