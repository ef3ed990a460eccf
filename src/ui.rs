use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{app::App, input::CharClass, session::Status, timer::PRESET_SECS};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// Greedily pack words into lines of at most `width` columns.
/// Returns the word indices on each line. A word wider than the line gets a
/// line of its own.
pub fn layout_lines(words: &[String], width: usize) -> Vec<Vec<usize>> {
    let mut lines: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut used = 0;

    for (i, word) in words.iter().enumerate() {
        let w = word.width();
        let needed = if current.is_empty() { w } else { used + 1 + w };
        if !current.is_empty() && needed > width {
            lines.push(std::mem::take(&mut current));
            used = w;
        } else {
            used = needed;
        }
        current.push(i);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn class_style(class: CharClass) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match class {
        CharClass::Correct => bold.fg(Color::Green),
        CharClass::Incorrect => bold.fg(Color::Red),
        CharClass::Untyped => bold.add_modifier(Modifier::DIM),
    }
}

impl App {
    fn grid_lines(&self, width: u16, height: u16) -> Vec<Line<'static>> {
        let controller = &self.controller;
        let words = controller.words();
        let lines = layout_lines(words, width.max(1) as usize);
        let current_word = controller.cursor().word_index;

        let current_line = lines
            .iter()
            .position(|line| line.contains(&current_word))
            .unwrap_or(0);
        // keep one line of context above the word being typed
        let first = current_line.saturating_sub(1);

        lines
            .iter()
            .skip(first)
            .take(height as usize)
            .map(|line| {
                let mut spans = Vec::new();
                for (n, &w) in line.iter().enumerate() {
                    if n > 0 {
                        spans.push(Span::raw(" "));
                    }
                    for (pos, ch) in words[w].chars().enumerate() {
                        let mut style = class_style(controller.classify(w, pos, ch));
                        if w == current_word {
                            style = style.add_modifier(Modifier::UNDERLINED);
                        }
                        spans.push(Span::styled(ch.to_string(), style));
                    }
                }
                Line::from(spans)
            })
            .collect()
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.controller.session();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2), // countdown
                Constraint::Length(1), // duration presets
                Constraint::Length(3), // input
                Constraint::Min(1),    // word grid / results
                Constraint::Length(1), // legend
            ])
            .split(area);

        let countdown = Paragraph::new(vec![
            Line::from(Span::styled(
                session.remaining_secs.to_string(),
                bold_style.fg(Color::Yellow),
            )),
            Line::from(Span::styled("Time", dim_style)),
        ])
        .alignment(Alignment::Center);
        countdown.render(chunks[0], buf);

        let mut presets = Vec::new();
        for (i, secs) in PRESET_SECS.iter().enumerate() {
            if i > 0 {
                presets.push(Span::raw("   "));
            }
            let style = if *secs == session.duration_secs {
                bold_style.fg(Color::Cyan).add_modifier(Modifier::REVERSED)
            } else {
                dim_style
            };
            presets.push(Span::styled(format!("({}) {}s", i + 1, secs), style));
        }
        Paragraph::new(Line::from(presets))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let input_style = if session.is_started() {
            bold_style
        } else {
            dim_style
        };
        Paragraph::new(Span::styled(self.controller.typed().to_string(), input_style))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(input_style)
                    .title(if session.is_started() { "type" } else { "disabled" }),
            )
            .render(chunks[2], buf);

        match session.status {
            Status::Started => {
                let grid = self.grid_lines(chunks[3].width, chunks[3].height);
                Paragraph::new(grid).render(chunks[3], buf);
            }
            Status::Finished => {
                let results = self.controller.results();
                let panel = Paragraph::new(vec![
                    Line::from(vec![
                        Span::styled("WPM ", dim_style),
                        Span::styled(results.wpm.to_string(), bold_style.fg(Color::Green)),
                        Span::raw("      "),
                        Span::styled("Accuracy ", dim_style),
                        Span::styled(
                            format!("{}%", results.accuracy),
                            bold_style.fg(Color::Magenta),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!(
                            "{} correct / {} incorrect",
                            results.tally.correct, results.tally.incorrect
                        ),
                        italic_style,
                    )),
                ])
                .block(Block::default().borders(Borders::ALL).title("results"))
                .alignment(Alignment::Center);
                panel.render(chunks[3], buf);
            }
            Status::Waiting => {
                let message = if self.words_pending {
                    "fetching quote...".to_string()
                } else if self.controller.words().is_empty() {
                    "no quote available".to_string()
                } else {
                    format!("{} words ready", self.controller.words().len())
                };
                Paragraph::new(Span::styled(message, italic_style))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .render(chunks[3], buf);
            }
        }

        let legend = match session.status {
            Status::Started => "(tab) restart / (esc)ape",
            Status::Waiting => "(1-4) duration / (enter) start / (tab) restart / (q)uit",
            Status::Finished => "(1-4) duration / (enter) start / (r)estart / (q)uit",
        };
        Paragraph::new(Span::styled(legend, italic_style)).render(chunks[4], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SessionController;
    use crate::input::Key;
    use crate::runtime::AppEvent;
    use std::time::Instant;

    fn create_test_app(words: &[&str]) -> App {
        let mut app = App::new(SessionController::default(), 10);
        let words = words.iter().map(|w| w.to_string()).collect();
        app.on_event(AppEvent::Words(words), Instant::now());
        app
    }

    fn render_to_string(app: &App, area: Rect) -> (Buffer, String) {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let rendered = buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        (buffer, rendered)
    }

    fn owned(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn layout_packs_words_greedily() {
        let words = owned(&["the", "quick", "brown", "fox"]);
        assert_eq!(layout_lines(&words, 9), vec![vec![0, 1], vec![2, 3]]);
        assert_eq!(layout_lines(&words, 100), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn layout_gives_oversized_words_their_own_line() {
        let words = owned(&["a", "extraordinarily", "b"]);
        assert_eq!(layout_lines(&words, 5), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn layout_of_nothing_is_empty() {
        assert!(layout_lines(&[], 10).is_empty());
    }

    #[test]
    fn waiting_screen_shows_countdown_and_presets() {
        let app = create_test_app(&["hello", "world"]);
        let (_, rendered) = render_to_string(&app, Rect::new(0, 0, 80, 20));
        assert!(rendered.contains("10"));
        assert!(rendered.contains("(4) 120s"));
        assert!(rendered.contains("2 words ready"));
        assert!(!rendered.contains("hello"));
    }

    #[test]
    fn pending_fetch_is_reported() {
        let app = App::new(SessionController::default(), 10);
        let (_, rendered) = render_to_string(&app, Rect::new(0, 0, 80, 20));
        assert!(rendered.contains("fetching quote"));
    }

    #[test]
    fn started_screen_shows_word_grid_with_classes() {
        let mut app = create_test_app(&["hello", "world"]);
        app.controller.start(Instant::now());
        app.controller.handle_key(Key::Char('h'));
        app.controller.handle_key(Key::Char('x'));

        let area = Rect::new(0, 0, 80, 20);
        let (buffer, rendered) = render_to_string(&app, area);
        assert!(rendered.contains("hello world"));

        // locate the grid row and check the styling of the typed characters
        let row = (0..area.height)
            .find(|&y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .contains("hello world")
            })
            .unwrap();
        let col = (0..area.width).find(|&x| buffer[(x, row)].symbol() == "h").unwrap();
        assert_eq!(buffer[(col, row)].fg, Color::Green);
        assert_eq!(buffer[(col + 1, row)].fg, Color::Red);
    }

    #[test]
    fn finished_screen_shows_results() {
        let mut app = create_test_app(&["a", "b"]);
        app.controller.set_duration(1).unwrap();
        app.controller.start(Instant::now());
        app.controller.handle_key(Key::Char('a'));
        app.controller.handle_key(Key::Space);
        app.controller.handle_key(Key::Char('c'));
        app.controller.handle_key(Key::Space);
        app.controller.tick();

        let (_, rendered) = render_to_string(&app, Rect::new(0, 0, 80, 20));
        assert!(rendered.contains("WPM 1"));
        assert!(rendered.contains("Accuracy 50%"));
    }

    #[test]
    fn finished_with_no_words_committed_shows_zero_percent() {
        let mut app = create_test_app(&["a"]);
        app.controller.set_duration(1).unwrap();
        app.controller.start(Instant::now());
        app.controller.tick();

        let (_, rendered) = render_to_string(&app, Rect::new(0, 0, 80, 20));
        assert!(rendered.contains("Accuracy 0%"));
        assert!(!rendered.contains("NaN"));
    }

    #[test]
    fn empty_word_list_renders_empty_grid() {
        let mut app = create_test_app(&[]);
        app.controller.start(Instant::now());
        app.controller.handle_key(Key::Char('z'));
        let area = Rect::new(0, 0, 40, 12);
        let (buffer, _) = render_to_string(&app, area);
        assert!(*buffer.area() == area);
    }

    #[test]
    fn legend_lists_restart_and_quit_bindings() {
        let mut app = create_test_app(&["a"]);
        let area = Rect::new(0, 0, 100, 20);
        let (_, rendered) = render_to_string(&app, area);
        assert!(rendered.contains("(q)uit"));
        assert!(rendered.contains("(tab) restart"));

        app.controller.start(Instant::now());
        let (_, rendered) = render_to_string(&app, area);
        assert!(rendered.contains("(tab) restart"));
        assert!(rendered.contains("(esc)ape"));
    }

    #[test]
    fn small_area_does_not_panic() {
        let app = create_test_app(&["hello"]);
        let area = Rect::new(0, 0, 20, 5);
        let (buffer, _) = render_to_string(&app, area);
        assert!(*buffer.area() == area);
    }
}
