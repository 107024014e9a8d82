use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use sorcerer_engine::{
    BlockType, ContentBlock, EditorState, StyleAttributes, StyleColor, StyleSet, resolve_styles,
};

pub const TITLE: &str = "Sorcerer";
const PLACEHOLDER: &str = "Start typing here...";

/// Message shown under the editor
pub enum Status {
    Idle,
    Info(String),
    Error(String),
}

fn color(color: StyleColor) -> Color {
    match color {
        StyleColor::Red => Color::Red,
        StyleColor::Yellow => Color::Yellow,
        StyleColor::Black => Color::Black,
    }
}

fn inline_style(attrs: StyleAttributes) -> Style {
    let mut style = Style::default();
    if attrs.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if attrs.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if let Some(fg) = attrs.foreground {
        style = style.fg(color(fg));
    }
    if let Some(bg) = attrs.background {
        style = style.bg(color(bg));
    }
    style
}

fn block_style(block_type: &BlockType) -> (Style, &'static str) {
    match block_type {
        BlockType::Header(_) => (
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            "",
        ),
        BlockType::CodeBlock => (Style::default().bg(Color::DarkGray), ""),
        BlockType::Blockquote => (Style::default().add_modifier(Modifier::ITALIC), "│ "),
        BlockType::UnorderedListItem => (Style::default(), "• "),
        BlockType::OrderedListItem => (Style::default(), "1. "),
        _ => (Style::default(), ""),
    }
}

/// One rendered block plus the screen column of every caret offset
struct RenderedBlock {
    line: Line<'static>,
    columns: Vec<u16>,
}

/// Render a block, highlighting characters in `selected`
///
/// Runs of identically styled characters become one span; padded styles get
/// blank cells on both sides of their run.
fn render_block(block: &ContentBlock, selected: Option<(usize, usize)>) -> RenderedBlock {
    let (base, marker) = block_style(block.block_type());
    let mut spans = vec![Span::styled(marker, base)];
    let mut column = Span::raw(marker).width() as u16;
    let mut columns = Vec::with_capacity(block.len() + 1);

    let chars: Vec<char> = block.text().chars().collect();
    let mut start = 0;
    while start < chars.len() {
        let is_selected = |i: usize| selected.is_some_and(|(from, to)| i >= from && i < to);
        let style_of = |i: usize| -> (StyleSet, bool) {
            (block.characters()[i].style.clone(), is_selected(i))
        };

        let run_key = style_of(start);
        let mut end = start + 1;
        while end < chars.len() && style_of(end) == run_key {
            end += 1;
        }

        let attrs = resolve_styles(&run_key.0);
        let mut style = base.patch(inline_style(attrs));
        if run_key.1 {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let pad = " ".repeat(usize::from(attrs.padding));

        if !pad.is_empty() {
            spans.push(Span::styled(pad.clone(), style));
            column += attrs.padding;
        }
        for c in &chars[start..end] {
            columns.push(column);
            column += Span::raw(c.to_string()).width() as u16;
        }
        spans.push(Span::styled(chars[start..end].iter().collect::<String>(), style));
        if !pad.is_empty() {
            spans.push(Span::styled(pad, style));
            column += attrs.padding;
        }

        start = end;
    }
    columns.push(column);

    RenderedBlock {
        line: Line::from(spans).style(base),
        columns,
    }
}

/// Character range of `block` covered by the selection, if any
fn selected_range(state: &EditorState, index: usize) -> Option<(usize, usize)> {
    let selection = state.selection();
    if selection.is_collapsed() {
        return None;
    }
    let content = state.content();
    let start_index = content.block_index(&selection.start().key)?;
    let end_index = content.block_index(&selection.end().key)?;
    if index < start_index || index > end_index {
        return None;
    }
    let block = &content.blocks()[index];
    let from = if index == start_index {
        selection.start().offset
    } else {
        0
    };
    let to = if index == end_index {
        selection.end().offset
    } else {
        block.len()
    };
    Some((from, to))
}

/// Scroll offset that keeps `caret_row` within `visible_rows`
fn follow_caret(caret_row: u16, scroll: u16, visible_rows: u16) -> u16 {
    if caret_row < scroll {
        caret_row
    } else if visible_rows > 0 && caret_row >= scroll.saturating_add(visible_rows) {
        caret_row.saturating_add(1).saturating_sub(visible_rows)
    } else {
        scroll
    }
}

pub fn draw(f: &mut Frame, state: &EditorState, status: &Status, scroll: &mut u16) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    let title = Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    f.render_widget(title, chunks[0]);

    // Editor panel
    let content = state.content();
    let focus = state.selection().focus();
    let is_blank = content.blocks().len() == 1 && content.first_block().is_empty();

    let mut lines = Vec::with_capacity(content.blocks().len());
    let mut caret = (0u16, 0u16);
    for (index, block) in content.blocks().iter().enumerate() {
        let rendered = render_block(block, selected_range(state, index));
        if block.key() == &focus.key {
            let column = rendered
                .columns
                .get(focus.offset)
                .or(rendered.columns.last())
                .copied()
                .unwrap_or(0);
            caret = (column, u16::try_from(index).unwrap_or(u16::MAX));
        }
        lines.push(rendered.line);
    }
    if is_blank {
        lines = vec![Line::from(Span::styled(
            PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))];
    }

    let editor_area = chunks[1];
    let visible_rows = editor_area.height.saturating_sub(2);
    *scroll = follow_caret(caret.1, *scroll, visible_rows);

    let editor = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .scroll((*scroll, 0));
    f.render_widget(editor, editor_area);
    f.set_cursor_position((
        editor_area.x.saturating_add(1).saturating_add(caret.0),
        editor_area
            .y
            .saturating_add(1)
            .saturating_add(caret.1.saturating_sub(*scroll)),
    ));

    let status_line = match status {
        Status::Idle => Line::from(""),
        Status::Info(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Green),
        )),
        Status::Error(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )),
    };
    f.render_widget(Paragraph::new(status_line), chunks[2]);

    let help_text = Line::from(vec![
        Span::raw("Ctrl+S: Save | "),
        Span::raw("Ctrl+Z/Ctrl+Y: Undo/Redo | "),
        Span::raw("Esc/Ctrl+Q: Quit"),
    ]);
    f.render_widget(Paragraph::new(help_text), chunks[3]);
}
