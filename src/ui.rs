//! Rendering. Everything here reads `App` state; nothing mutates it.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::block::{Position, Title};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap};

use crate::app::{App, Modal};
use crate::catalog::Catalog;
use crate::config::{PanelPlacement, PanelPosition};
use crate::dialogs::{Form, Message, Picker};
use crate::launcher::Launch;
use crate::theme::Theme;

const GRID_COLUMNS: u16 = 4;
const BUTTON_HEIGHT: u16 = 3;
const DOCKED_HEIGHT: u16 = 12;
const SIDE_MIN_WIDTH: u16 = 24;
const FLOAT_SIZE: (u16, u16) = (48, 16);
const HINT: &str = " ←→ section · ↑↓ item · ⏎ launch · a/e/d item · A/E/D section · q quit ";

/// The rectangle the panel occupies on a `screen`-sized terminal.
pub fn panel_area(placement: PanelPlacement, screen: Rect) -> Rect {
    match placement {
        PanelPlacement::Docked(position) => {
            let height = DOCKED_HEIGHT.min(screen.height);
            let width = (screen.width / 3).max(SIDE_MIN_WIDTH).min(screen.width);
            match position {
                PanelPosition::Top => Rect::new(screen.x, screen.y, screen.width, height),
                PanelPosition::Bottom => Rect::new(
                    screen.x,
                    screen.y + screen.height - height,
                    screen.width,
                    height,
                ),
                PanelPosition::Left => Rect::new(screen.x, screen.y, width, screen.height),
                PanelPosition::Right => Rect::new(
                    screen.x + screen.width - width,
                    screen.y,
                    width,
                    screen.height,
                ),
            }
        }
        PanelPlacement::Floating { x, y } => {
            let width = FLOAT_SIZE.0.min(screen.width);
            let height = FLOAT_SIZE.1.min(screen.height);
            let x = clamp_offset(x, screen.width - width);
            let y = clamp_offset(y, screen.height - height);
            Rect::new(screen.x + x, screen.y + y, width, height)
        }
    }
}

fn clamp_offset(value: i32, max: u16) -> u16 {
    value.clamp(0, i32::from(max)) as u16
}

/// Tabs when docked along a horizontal edge, toolbox otherwise.
fn uses_tabs(placement: PanelPlacement) -> bool {
    matches!(placement, PanelPlacement::Docked(p) if p.is_horizontal())
}

pub fn render<L: Launch>(frame: &mut Frame, app: &App<L>) {
    let screen = frame.size();
    let theme = app.theme();
    let area = panel_area(app.placement(), screen);

    if !app.is_visible() {
        let hint = Paragraph::new(" Launcher hidden · Tab to show ")
            .style(Style::default().fg(theme.muted).bg(theme.background));
        frame.render_widget(hint, Rect::new(area.x, area.y, area.width, 1.min(area.height)));
        return;
    }

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Launcher ")
        .title(
            Title::from(Span::styled(HINT, Style::default().fg(theme.muted)))
                .position(Position::Bottom)
                .alignment(Alignment::Center),
        )
        .style(Style::default().fg(theme.text).bg(theme.background))
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    if uses_tabs(app.placement()) {
        render_tabs(frame, chunks[0], app);
    } else {
        render_toolbox(frame, chunks[0], app);
    }

    let status = Paragraph::new(app.status_text()).style(Style::default().fg(theme.muted));
    frame.render_widget(status, chunks[1]);

    if let Some(modal) = app.modal() {
        render_modal(frame, screen, modal, theme);
    }
}

fn render_tabs<L: Launch>(frame: &mut Frame, area: Rect, app: &App<L>) {
    let theme = app.theme();
    let catalog = app.catalog();
    if catalog.is_empty() {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let titles: Vec<Line> = catalog
        .sections()
        .iter()
        .map(|g| Line::from(format!(" {} ", g.name)))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.selected_section())
        .style(Style::default().fg(theme.muted))
        .highlight_style(
            Style::default()
                .fg(theme.text)
                .bg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        )
        .divider("│");
    frame.render_widget(tabs, chunks[0]);

    let Some(group) = catalog.sections().get(app.selected_section()) else {
        return;
    };
    if group.collapsed {
        let folded = Paragraph::new(" (collapsed, Space to expand)")
            .style(Style::default().fg(theme.muted));
        frame.render_widget(folded, chunks[1]);
        return;
    }

    let grid = chunks[1];
    if grid.height < BUTTON_HEIGHT || grid.width < GRID_COLUMNS {
        return;
    }
    let visible_rows = (grid.height / BUTTON_HEIGHT) as usize;
    let selected_row = app.selected_item() / GRID_COLUMNS as usize;
    let first_row = selected_row.saturating_sub(visible_rows - 1);
    let cell_width = grid.width / GRID_COLUMNS;

    for (idx, entry) in group.entries.iter().enumerate() {
        let row = idx / GRID_COLUMNS as usize;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = (idx % GRID_COLUMNS as usize) as u16;
        let cell = Rect::new(
            grid.x + col * cell_width,
            grid.y + (row - first_row) as u16 * BUTTON_HEIGHT,
            cell_width,
            BUTTON_HEIGHT,
        );
        let selected = idx == app.selected_item();
        let style = if selected {
            Style::default()
                .fg(theme.text)
                .bg(theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text).bg(theme.surface)
        };
        let button = Paragraph::new(entry.item.name.as_str())
            .alignment(Alignment::Center)
            .style(style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme.accent)),
            );
        frame.render_widget(button, cell);
    }
}

/// One line per section header, plus the items of expanded sections.
/// Returns the lines and the index of the highlighted one.
pub fn toolbox_lines(
    catalog: &Catalog,
    section: usize,
    item: usize,
) -> (Vec<(String, bool)>, usize) {
    let mut lines = Vec::new();
    let mut cursor = 0;
    for (s_idx, group) in catalog.sections().iter().enumerate() {
        let marker = if group.collapsed { '▸' } else { '▾' };
        let header_selected = s_idx == section && (group.collapsed || group.entries.is_empty());
        if header_selected {
            cursor = lines.len();
        }
        lines.push((format!("{marker} {} ({})", group.name, group.entries.len()), true));
        if group.collapsed {
            continue;
        }
        for (i_idx, entry) in group.entries.iter().enumerate() {
            if s_idx == section && i_idx == item {
                cursor = lines.len();
            }
            lines.push((format!("    {}", entry.item.name), false));
        }
    }
    (lines, cursor)
}

fn render_toolbox<L: Launch>(frame: &mut Frame, area: Rect, app: &App<L>) {
    let theme = app.theme();
    let (lines, cursor) = toolbox_lines(app.catalog(), app.selected_section(), app.selected_item());
    let text: Vec<Line> = lines
        .into_iter()
        .enumerate()
        .map(|(idx, (text, header))| {
            let mut style = if header {
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            if idx == cursor && !app.catalog().is_empty() {
                style = style.bg(theme.highlight).add_modifier(Modifier::REVERSED);
            }
            Line::styled(text, style)
        })
        .collect();
    let offset = cursor.saturating_sub(area.height.saturating_sub(1) as usize) as u16;
    frame.render_widget(Paragraph::new(text).scroll((offset, 0)), area);
}

fn centered(screen: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(screen.width);
    let height = height.min(screen.height);
    Rect::new(
        screen.x + (screen.width - width) / 2,
        screen.y + (screen.height - height) / 2,
        width,
        height,
    )
}

fn modal_block<'a>(title: String, theme: &Theme, is_error: bool) -> Block<'a> {
    let border = if is_error { theme.error } else { theme.accent };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {title} "))
        .style(Style::default().fg(theme.text).bg(theme.surface))
        .border_style(Style::default().fg(border))
}

fn render_modal(frame: &mut Frame, screen: Rect, modal: &Modal, theme: &Theme) {
    match modal {
        Modal::Section { form, .. } => render_form(frame, screen, form, theme),
        Modal::Item { form, .. } => render_form(frame, screen, form, theme),
        Modal::Confirm { picker, .. } => render_picker(frame, screen, picker, theme),
        Modal::Message(message) => render_message(frame, screen, message, theme),
    }
}

fn render_form(frame: &mut Frame, screen: Rect, form: &dyn Form, theme: &Theme) {
    let rows = form.rows();
    let area = centered(screen, 60, rows.len() as u16 + 4);
    let mut lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let focused = idx == form.focus();
            let value = match (row.choice, focused) {
                (true, true) => format!("◂ {} ▸", row.value),
                (false, true) => format!("{}▏", row.value),
                _ => row.value.clone(),
            };
            let style = if focused {
                Style::default().bg(theme.highlight).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{:>12}: ", row.label), Style::default().fg(theme.muted)),
                Span::styled(value, style),
            ])
        })
        .collect();
    lines.push(Line::default());
    lines.push(Line::styled(
        "Tab next field · Enter OK · Esc cancel",
        Style::default().fg(theme.muted),
    ));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(modal_block(form.title().to_string(), theme, false)),
        area,
    );
}

fn render_picker(frame: &mut Frame, screen: Rect, picker: &Picker, theme: &Theme) {
    let area = centered(screen, 50, picker.options.len() as u16 + 5);
    let mut lines = vec![Line::from(picker.label.clone()), Line::default()];
    lines.extend(picker.options.iter().enumerate().map(|(idx, option)| {
        if idx == picker.cursor {
            Line::styled(
                format!("› {option}"),
                Style::default().bg(theme.highlight).add_modifier(Modifier::BOLD),
            )
        } else {
            Line::from(format!("  {option}"))
        }
    }));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(modal_block(picker.title.clone(), theme, false)),
        area,
    );
}

fn render_message(frame: &mut Frame, screen: Rect, message: &Message, theme: &Theme) {
    let body_lines = message.body.lines().count() as u16;
    let area = centered(screen, 56, body_lines + 5);
    let mut lines: Vec<Line> = message.body.lines().map(|l| Line::from(l.to_string())).collect();
    lines.push(Line::default());
    lines.push(Line::styled("Press any key", Style::default().fg(theme.muted)));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(modal_block(message.title.clone(), theme, message.is_error)),
        area,
    );
}
