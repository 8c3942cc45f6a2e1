use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const LINKS: [(&str, &str); 3] = [
    ("Free Releases", "https://publicdomain.is"),
    (
        "Original thread",
        "https://www.donationcoder.com/forum/index.php?topic=43525.0",
    ),
    ("Source code", "https://github.com/publicdomain/text-liner"),
];

fn key_line(key: &'static str, pad: usize, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad.saturating_sub(key.chars().count()))),
        Span::raw(what),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let mut lines = vec![
        Line::from("Actions:"),
        key_line("F5", 12, "Min. length"),
        key_line("F6", 12, "Max. length"),
        key_line("F7", 12, "Ascending"),
        key_line("F8", 12, "Descending"),
        Line::from(""),
        Line::from("File:"),
        key_line("Ctrl-N", 12, "New"),
        key_line("Ctrl-O", 12, "Open"),
        key_line("Ctrl-S", 12, "Save"),
        key_line("F12", 12, "Save as"),
        key_line("Ctrl-Q", 12, "Exit"),
        Line::from(""),
        Line::from("Edit:"),
        key_line("Ctrl-X", 12, "Cut (line, or all when selected)"),
        key_line("Ctrl-C", 12, "Copy"),
        key_line("Ctrl-V", 12, "Paste"),
        key_line("Ctrl-A", 12, "Select all"),
        Line::from(""),
        Line::from("Panels:"),
        key_line("F1", 12, "Help"),
        key_line("F2", 12, "Options (1-4 or Space to toggle)"),
        key_line("Esc", 12, "Back to editor"),
        Line::from(""),
        Line::from("Links:"),
    ];
    for (label, url) in LINKS {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
            Span::styled(url, Style::default().fg(Color::Cyan)),
        ]));
    }

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
