mod clipboard;
mod editor;
mod help;
mod state;

use crate::app::AppState;
use crate::cli::Cli;
use crate::error::SaveError;
use crate::model::{OptionFlag, OrderingPolicy};
use crate::preferences::{self, Preferences};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use editor::Editor;
use help::draw_help;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use state::{PromptKind, UiState, TAB_EDITOR, TAB_HELP, TAB_OPTIONS, TAB_TITLES};
use std::{io, path::Path, time::Duration};

type Session = AppState<Editor>;

pub fn run(args: Cli) -> Result<()> {
    let mut ui = UiState::default();

    let mut prefs = match preferences::load(&args.settings) {
        Ok(prefs) => prefs,
        Err(e) => {
            ui.show_error(
                "File error",
                format!(
                    "Error loading settings file \"{}\".\n\nMessage:\n{e}\n\n\
                     Defaults are in use and the file is rewritten on exit.",
                    display_name(e.path())
                ),
            );
            Preferences::default()
        }
    };
    args.apply_overrides(&mut prefs);

    let mut app = AppState::new(Editor::default(), prefs);
    if let Some(path) = args.file.as_deref() {
        open_file(&mut app, &mut ui, path);
    }

    // Terminal setup
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let res = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(mut terminal) => {
            terminal.clear().ok();
            let res = event_loop(&mut terminal, &mut app, &mut ui);
            terminal.show_cursor().ok();
            res
        }
        Err(e) => Err(anyhow::Error::new(e).context("create terminal")),
    };

    // Restore terminal
    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen).ok();

    // Settings are written once, at the end of the session, even if the loop failed.
    let saved = app
        .shutdown(&args.settings)
        .context("Error saving settings file");
    res.and(saved)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut Session,
    ui: &mut UiState,
) -> Result<()> {
    let poll_rate = Duration::from_millis(100);

    while !ui.quit {
        terminal.draw(|f| draw(f, app, ui)).context("draw frame")?;

        // Input
        if event::poll(poll_rate).context("poll input")? {
            if let Event::Key(k) = event::read().context("read input")? {
                if k.kind == KeyEventKind::Press {
                    handle_key(app, ui, k);
                }
            }
        }
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn open_file(app: &mut Session, ui: &mut UiState, path: &Path) {
    match app.open(path) {
        Ok(Some(policy)) => {
            ui.info = format!("Opened {} ({policy} applied)", display_name(path));
        }
        Ok(None) => ui.info = format!("Opened {}", display_name(path)),
        Err(e) => ui.show_error(
            "Open file error",
            format!("Error when opening \"{}\":\n{e}", display_name(path)),
        ),
    }
}

fn save_file(app: &mut Session, ui: &mut UiState) {
    match app.save() {
        Ok(path) => ui.info = format!("Saved: {}", path.display()),
        Err(SaveError::NoPath) => ui.open_prompt(PromptKind::SaveAs, String::new()),
        Err(SaveError::Storage(e)) => ui.show_error("Save file error", e.to_string()),
    }
}

fn apply_policy(app: &mut Session, ui: &mut UiState, policy: OrderingPolicy) {
    let before = app.line_count();
    app.apply(policy);
    ui.info = format!("{policy}: {before} -> {} lines", app.line_count());
}

fn toggle_option(app: &mut Session, ui: &mut UiState, flag: OptionFlag) {
    let value = app.toggle(flag);
    ui.info = format!("{}: {}", flag.label(), if value { "on" } else { "off" });
}

fn copy_text(ui: &mut UiState, text: String) {
    let lines = text.lines().count().max(1);
    let queued = clipboard::copy_to_clipboard(&text);
    ui.register = Some(text);
    ui.info = match queued {
        Ok(()) => format!("Copied {lines} line(s)"),
        Err(e) => format!("Copied {lines} line(s) internally ({e:#})"),
    };
}

fn paste_text(app: &mut Session, ui: &mut UiState) {
    let text = match clipboard::paste_from_clipboard() {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::debug!("system clipboard read failed: {e:#}");
            ui.register.clone()
        }
    };
    match text {
        Some(text) => app.buffer.paste(&text),
        None => ui.info = "Clipboard is empty".into(),
    }
}

fn handle_key(app: &mut Session, ui: &mut UiState, k: KeyEvent) {
    // Modal popup swallows the key that dismisses it
    if ui.popup.is_some() {
        ui.popup = None;
        return;
    }
    // Path prompt owns the keyboard until Enter or Esc
    if ui.prompt.is_some() {
        handle_prompt_key(app, ui, k);
        return;
    }

    // Global keys, active on every tab
    let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);
    match k.code {
        KeyCode::Char('q') if ctrl => {
            ui.quit = true;
            return;
        }
        KeyCode::Char('n') if ctrl => {
            app.new_document();
            ui.info = "New document".into();
            return;
        }
        KeyCode::Char('o') if ctrl => {
            ui.open_prompt(PromptKind::Open, String::new());
            return;
        }
        KeyCode::Char('s') if ctrl => {
            save_file(app, ui);
            return;
        }
        KeyCode::F(12) => {
            let current = app
                .file_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            ui.open_prompt(PromptKind::SaveAs, current);
            return;
        }
        // F5..F8 map onto OrderingPolicy::ALL in order
        KeyCode::F(n @ 5..=8) => {
            apply_policy(app, ui, OrderingPolicy::ALL[usize::from(n - 5)]);
            return;
        }
        KeyCode::F(1) => {
            ui.tab = TAB_HELP;
            return;
        }
        KeyCode::F(2) => {
            ui.tab = TAB_OPTIONS;
            return;
        }
        _ => {}
    }

    // Everything else goes to the active tab
    match ui.tab {
        TAB_EDITOR => handle_editor_key(app, ui, k),
        TAB_OPTIONS => handle_options_key(app, ui, k),
        _ => handle_panel_key(ui, k),
    }
}

fn handle_prompt_key(app: &mut Session, ui: &mut UiState, k: KeyEvent) {
    let Some(prompt) = ui.prompt.as_mut() else {
        return;
    };
    match k.code {
        KeyCode::Esc => ui.prompt = None,
        KeyCode::Backspace => {
            prompt.input.pop();
        }
        KeyCode::Char(c) if !k.modifiers.contains(KeyModifiers::CONTROL) => prompt.input.push(c),
        KeyCode::Enter => {
            // Blank input cancels like Esc
            let kind = prompt.kind;
            let input = prompt.input.trim().to_string();
            ui.prompt = None;
            if input.is_empty() {
                return;
            }
            let path = Path::new(&input);
            match kind {
                PromptKind::Open => open_file(app, ui, path),
                PromptKind::SaveAs => match app.save_as(path) {
                    Ok(()) => ui.info = format!("Saved: {}", path.display()),
                    Err(e) => ui.show_error("Save file error", e.to_string()),
                },
            }
        }
        _ => {}
    }
}

fn handle_editor_key(app: &mut Session, ui: &mut UiState, k: KeyEvent) {
    let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);
    let alt = k.modifiers.contains(KeyModifiers::ALT);
    let buffer = &mut app.buffer;
    match k.code {
        KeyCode::Char('a') if ctrl => buffer.select_all(),
        KeyCode::Char('c') if ctrl => {
            if let Some(text) = buffer.selected_text() {
                copy_text(ui, text);
            }
        }
        KeyCode::Char('x') if ctrl => {
            if let Some(text) = buffer.cut() {
                copy_text(ui, text);
            }
        }
        KeyCode::Char('v') if ctrl => paste_text(app, ui),
        KeyCode::Char(c) if !ctrl && !alt => buffer.insert_char(c),
        KeyCode::Tab => buffer.insert_char('\t'),
        KeyCode::Enter => buffer.insert_newline(),
        KeyCode::Backspace => buffer.backspace(),
        KeyCode::Delete => buffer.delete(),
        KeyCode::Left => buffer.move_left(),
        KeyCode::Right => buffer.move_right(),
        KeyCode::Up => buffer.move_up(1),
        KeyCode::Down => buffer.move_down(1),
        KeyCode::PageUp => buffer.page_up(),
        KeyCode::PageDown => buffer.page_down(),
        KeyCode::Home => buffer.home(),
        KeyCode::End => buffer.end(),
        KeyCode::Esc => buffer.deselect(),
        _ => {}
    }
}

fn handle_options_key(app: &mut Session, ui: &mut UiState, k: KeyEvent) {
    match k.code {
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            ui.options_selected = idx;
            toggle_option(app, ui, OptionFlag::ALL[idx]);
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            let flag = ui.selected_option();
            toggle_option(app, ui, flag);
        }
        KeyCode::Up | KeyCode::Char('k') => ui.select_prev_option(),
        KeyCode::Down | KeyCode::Char('j') => ui.select_next_option(),
        _ => handle_panel_key(ui, k),
    }
}

fn handle_panel_key(ui: &mut UiState, k: KeyEvent) {
    match k.code {
        KeyCode::Esc => ui.tab = TAB_EDITOR,
        KeyCode::Tab => ui.tab = (ui.tab + 1) % TAB_TITLES.len(),
        _ => {}
    }
}

fn draw(f: &mut Frame, app: &mut Session, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Tabs
                Constraint::Length(3), // Action keys
                Constraint::Min(0),    // Buffer / Options / Help
                Constraint::Length(4), // Status
            ]
            .as_ref(),
        )
        .split(f.area());

    // Header
    let mut title = String::from("TextLiner");
    if app.prefs.always_on_top {
        title.push_str(" [always on top]");
    }
    let tabs = Tabs::new(TAB_TITLES.iter().map(|t| Line::from(*t)).collect::<Vec<_>>())
        .select(ui.tab)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    draw_actions(chunks[1], f, app);

    // Main area
    match ui.tab {
        TAB_EDITOR => draw_editor(chunks[2], f, app, ui),
        TAB_OPTIONS => draw_options(chunks[2], f, app, ui),
        _ => draw_help(chunks[2], f),
    }

    draw_status(chunks[3], f, app, ui);

    // Overlays, drawn last so they sit on top
    if let Some(prompt) = ui.prompt.as_ref() {
        let area = centered_rect(60, 5, f.area());
        let p = Paragraph::new(vec![
            Line::from(prompt.input.as_str()),
            Line::from(Span::styled(
                "Enter to confirm, Esc to cancel",
                Style::default().fg(Color::Gray),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(prompt.kind.title()),
        );
        f.render_widget(Clear, area);
        f.render_widget(p, area);
        // Cursor after the typed path, kept inside the border
        let x = area.x + 1 + (prompt.input.chars().count() as u16).min(area.width.saturating_sub(3));
        f.set_cursor_position((x, area.y + 1));
    }

    if let Some(popup) = ui.popup.as_ref() {
        let area = centered_rect(60, 9, f.area());
        let mut lines: Vec<Line> = popup.message.lines().map(Line::from).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press any key",
            Style::default().fg(Color::Gray),
        )));
        let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(popup.title.as_str()),
        );
        f.render_widget(Clear, area);
        f.render_widget(p, area);
    }
}

fn draw_actions(area: Rect, f: &mut Frame, app: &Session) {
    let mut spans = Vec::new();
    for (i, policy) in OrderingPolicy::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        // Highlight the remembered action
        let label_style = if *policy == app.prefs.last_action {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(
            format!("F{}", i + 5),
            Style::default().fg(Color::Magenta),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(policy.label(), label_style));
    }
    let p = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Actions"));
    f.render_widget(p, area);
}

/// Visible slice of a line, tabs shown as single spaces so columns match
/// cursor positions.
fn visible_text(line: &str, skip: usize, width: usize) -> String {
    line.chars()
        .skip(skip)
        .take(width)
        .map(|c| if c == '\t' { ' ' } else { c })
        .collect()
}

fn draw_editor(area: Rect, f: &mut Frame, app: &mut Session, ui: &UiState) {
    let buffer = &mut app.buffer;
    let title = if buffer.is_all_selected() {
        "Buffer (all selected)"
    } else {
        "Buffer"
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    let (height, width) = (inner.height as usize, inner.width as usize);
    // Scroll before slicing so the cursor row/column is always visible
    buffer.scroll_to_cursor(height, width);
    let (scroll_row, scroll_col) = buffer.scroll();

    let style = if buffer.is_all_selected() {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    let lines: Vec<Line> = buffer
        .raw_lines()
        .iter()
        .skip(scroll_row)
        .take(height)
        .map(|l| Line::styled(visible_text(l, scroll_col, width), style))
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);

    // Overlays hide the editor cursor
    if ui.prompt.is_none() && ui.popup.is_none() && height > 0 && width > 0 {
        let (row, col) = buffer.cursor();
        let x = inner.x + (col.saturating_sub(scroll_col)) as u16;
        let y = inner.y + (row.saturating_sub(scroll_row)) as u16;
        f.set_cursor_position((x, y));
    }
}

fn draw_options(area: Rect, f: &mut Frame, app: &Session, ui: &UiState) {
    let mut lines = vec![Line::from("")];
    for (i, flag) in OptionFlag::ALL.iter().enumerate() {
        let checked = app.prefs.flag(*flag);
        let marker = if checked { "[x]" } else { "[ ]" };
        let row_style = if i == ui.options_selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{}", i + 1), Style::default().fg(Color::Magenta)),
            Span::raw("  "),
            Span::styled(format!("{marker} {}", flag.label()), row_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Trim and blank removal run before every action. Options are saved on exit.",
        Style::default().fg(Color::Gray),
    )));
    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Options"));
    f.render_widget(p, area);
}

fn draw_status(area: Rect, f: &mut Frame, app: &Session, ui: &UiState) {
    let label = Style::default().fg(Color::Gray);
    let p = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Lines: ", label),
            Span::raw(app.line_count().to_string()),
            Span::raw(" / "),
            Span::styled("Last: ", label),
            Span::raw(app.last_label()),
            Span::raw(" / "),
            Span::styled("File: ", label),
            Span::raw(app.file_name()),
        ]),
        Line::from(ui.info.as_str()),
    ])
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}

fn centered_rect(width_pct: u16, height: u16, r: Rect) -> Rect {
    let width = ((u32::from(r.width) * u32::from(width_pct) / 100) as u16)
        .max(20)
        .min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LineBuffer;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn session(lines: &[&str]) -> Session {
        let mut editor = Editor::default();
        editor.set_lines(lines.iter().map(|s| s.to_string()).collect());
        AppState::new(editor, Preferences::default())
    }

    fn type_str(app: &mut Session, ui: &mut UiState, s: &str) {
        for c in s.chars() {
            handle_key(app, ui, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn function_keys_apply_policies() {
        let mut app = session(&["a", "ccc", "", "bb"]);
        let mut ui = UiState::default();

        handle_key(&mut app, &mut ui, key(KeyCode::F(6)));
        assert_eq!(app.buffer.lines(), vec!["ccc", "bb", "a"]);
        assert_eq!(app.last_label(), "Max. length");
        assert_eq!(ui.info, "Max. length: 4 -> 3 lines");

        handle_key(&mut app, &mut ui, key(KeyCode::F(7)));
        assert_eq!(app.buffer.lines(), vec!["a", "bb", "ccc"]);
        assert_eq!(app.prefs.last_action, OrderingPolicy::LexicographicAscending);
    }

    #[test]
    fn typing_edits_the_buffer() {
        let mut app = session(&[]);
        let mut ui = UiState::default();
        type_str(&mut app, &mut ui, "hi");
        handle_key(&mut app, &mut ui, key(KeyCode::Enter));
        type_str(&mut app, &mut ui, "there");
        assert_eq!(app.buffer.lines(), vec!["hi", "there"]);
        assert_eq!(app.line_count(), 2);
    }

    #[test]
    fn open_prompt_loads_file_and_applies_last() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "bb\na\n\nccc\n").unwrap();

        let mut app = session(&[]);
        let mut ui = UiState::default();
        handle_key(&mut app, &mut ui, ctrl('o'));
        assert!(ui.prompt.is_some());
        type_str(&mut app, &mut ui, &path.display().to_string());
        handle_key(&mut app, &mut ui, key(KeyCode::Enter));

        assert!(ui.prompt.is_none());
        assert!(ui.popup.is_none());
        assert_eq!(app.buffer.lines(), vec!["a", "bb", "ccc"]);
        assert_eq!(app.file_name(), "words.txt");
        assert_eq!(ui.info, "Opened words.txt (Min. length applied)");
    }

    #[test]
    fn failed_open_shows_popup_until_a_key_is_pressed() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = session(&["keep"]);
        let mut ui = UiState::default();

        open_file(&mut app, &mut ui, &dir.path().join("missing.txt"));
        let popup = ui.popup.clone().unwrap();
        assert_eq!(popup.title, "Open file error");
        assert!(popup.message.contains("missing.txt"));

        // The dismissing key is swallowed.
        handle_key(&mut app, &mut ui, key(KeyCode::Char('z')));
        assert!(ui.popup.is_none());
        assert_eq!(app.buffer.lines(), vec!["keep"]);
    }

    #[test]
    fn save_without_path_prompts_for_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.txt");
        let mut app = session(&["x", "y"]);
        let mut ui = UiState::default();

        handle_key(&mut app, &mut ui, ctrl('s'));
        assert_eq!(ui.prompt.as_ref().map(|p| p.kind), Some(PromptKind::SaveAs));
        type_str(&mut app, &mut ui, &path.display().to_string());
        handle_key(&mut app, &mut ui, key(KeyCode::Enter));

        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);
        assert_eq!(app.file_name(), "saved.txt");
    }

    #[test]
    fn escape_cancels_prompt() {
        let mut app = session(&["x"]);
        let mut ui = UiState::default();
        handle_key(&mut app, &mut ui, key(KeyCode::F(12)));
        type_str(&mut app, &mut ui, "nowhere.txt");
        handle_key(&mut app, &mut ui, key(KeyCode::Esc));
        assert!(ui.prompt.is_none());
        assert!(app.file_path.is_none());
    }

    #[test]
    fn options_panel_toggles_flags() {
        let mut app = session(&[]);
        let mut ui = UiState::default();
        handle_key(&mut app, &mut ui, key(KeyCode::F(2)));
        assert_eq!(ui.tab, TAB_OPTIONS);

        handle_key(&mut app, &mut ui, key(KeyCode::Char('4')));
        assert!(app.prefs.trim_lines);
        assert_eq!(ui.info, "Trim lines: on");

        handle_key(&mut app, &mut ui, key(KeyCode::Up));
        handle_key(&mut app, &mut ui, key(KeyCode::Char(' ')));
        assert!(!app.prefs.remove_blank_lines);

        handle_key(&mut app, &mut ui, key(KeyCode::Esc));
        assert_eq!(ui.tab, TAB_EDITOR);
    }

    #[test]
    fn new_and_quit() {
        let mut app = session(&["x"]);
        let mut ui = UiState::default();
        handle_key(&mut app, &mut ui, ctrl('n'));
        assert_eq!(app.line_count(), 0);
        assert_eq!(app.file_name(), "Not set");

        handle_key(&mut app, &mut ui, ctrl('q'));
        assert!(ui.quit);
    }

    #[test]
    fn visible_text_scrolls_and_expands_tabs() {
        assert_eq!(visible_text("a\tbcdef", 1, 3), " bc");
        assert_eq!(visible_text("short", 10, 5), "");
    }

    #[test]
    fn centered_rect_fits_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let r = centered_rect(60, 9, outer);
        assert_eq!(r.width, 60);
        assert_eq!(r.height, 9);
        assert_eq!(r.x, 20);
        assert_eq!(r.y, 15);
    }
}
