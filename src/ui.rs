// 🖥️ Terminal Form - bill amount + service → tip amount
// The form owns the mutable text; every keystroke feeds a fresh TipInput to the calculator.

use crate::calculator::{Tip, TipCalculator, TipInput};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use tracing::debug;

/// Longest text a field accepts
const MAX_FIELD_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Amount,
    TipPercent,
}

impl Field {
    pub fn label(&self) -> &str {
        match self {
            Field::Amount => "Bill Amount",
            Field::TipPercent => "How was the service?",
        }
    }
}

pub struct App {
    calculator: TipCalculator,
    pub amount_input: String,
    pub tip_input: String,
    /// `None` once the user is "done" (keyboard dismissed)
    pub focus: Option<Field>,
    pub should_quit: bool,
}

impl App {
    pub fn new(calculator: TipCalculator) -> Self {
        Self {
            calculator,
            amount_input: String::new(),
            tip_input: String::new(),
            focus: Some(Field::Amount),
            should_quit: false,
        }
    }

    /// Snapshot of both fields
    pub fn input(&self) -> TipInput {
        TipInput::new(self.amount_input.clone(), self.tip_input.clone())
    }

    pub fn tip(&self) -> Tip {
        self.calculator.calculate(&self.input())
    }

    pub fn calculator(&self) -> &TipCalculator {
        &self.calculator
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Amount => &mut self.amount_input,
            Field::TipPercent => &mut self.tip_input,
        }
    }

    pub fn field_text(&self, field: Field) -> &str {
        match field {
            Field::Amount => &self.amount_input,
            Field::TipPercent => &self.tip_input,
        }
    }

    /// Numeric keyboard: only characters that can appear in a number
    pub fn push_char(&mut self, c: char) {
        let Some(field) = self.focus else {
            return;
        };
        if !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')) {
            return;
        }
        let text = self.field_mut(field);
        if text.len() < MAX_FIELD_LEN {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.focus {
            self.field_mut(field).pop();
        }
    }

    /// "Next" action: amount → tip
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Some(Field::Amount) => Some(Field::TipPercent),
            Some(Field::TipPercent) => Some(Field::TipPercent),
            None => Some(Field::Amount),
        };
    }

    pub fn focus_previous(&mut self) {
        self.focus = match self.focus {
            Some(Field::TipPercent) => Some(Field::Amount),
            Some(Field::Amount) => Some(Field::Amount),
            None => Some(Field::TipPercent),
        };
    }

    /// "Done" action: drop focus
    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Enter => match self.focus {
                Some(Field::Amount) => self.focus_next(),
                Some(Field::TipPercent) => self.clear_focus(),
                None => self.focus_next(),
            },
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_previous(),
            KeyCode::Esc => {
                if self.focus.is_some() {
                    self.clear_focus();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('q') if self.focus.is_none() => self.should_quit = true,
            KeyCode::Char(c) => {
                if self.focus.is_none() && c.is_ascii_digit() {
                    // Typing with no focus starts editing the amount again
                    self.focus = Some(Field::Amount);
                }
                self.push_char(c);
            }
            KeyCode::Backspace => self.backspace(),
            _ => {}
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key);
            debug!(amount = %app.amount_input, tip = %app.tip_input, "Form updated");
        }
    }
    Ok(())
}

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // Bill amount
            Constraint::Length(1),
            Constraint::Length(3), // Service
            Constraint::Length(1),
            Constraint::Length(2), // Tip amount
            Constraint::Min(0),
            Constraint::Length(1), // Key hints
        ])
        .split(f.size());

    let title = Paragraph::new(Line::from(Span::styled(
        "Calculate Tip",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    f.render_widget(title, chunks[0]);

    render_field(f, chunks[1], app, Field::Amount);
    render_field(f, chunks[3], app, Field::TipPercent);
    render_tip(f, chunks[5], app);
    render_status_bar(f, chunks[7], app);
}

fn render_field(f: &mut Frame, area: Rect, app: &App, field: Field) {
    let focused = app.focus == Some(field);
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text = app.field_text(field);
    let paragraph = Paragraph::new(text.to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", field.label())),
    );
    f.render_widget(paragraph, area);

    if focused {
        let x = area.x + 1 + text.chars().count() as u16;
        f.set_cursor(x.min(area.right().saturating_sub(2)), area.y + 1);
    }
}

fn render_tip(f: &mut Frame, area: Rect, app: &App) {
    let tip = app.tip();
    let line = Line::from(vec![
        Span::raw("Tip Amount: "),
        Span::styled(
            tip.formatted,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let hint = |key: &'static str| Span::styled(key, Style::default().fg(Color::Yellow));

    let mut spans = vec![Span::styled(
        format!(" {} ", app.calculator().currency_format().locale),
        Style::default().fg(Color::Cyan),
    )];
    spans.push(Span::raw("| "));
    spans.push(hint("Enter"));
    spans.push(Span::raw(if app.focus == Some(Field::Amount) { " Next | " } else { " Done | " }));
    spans.push(hint("↑/↓"));
    spans.push(Span::raw(" Field | "));
    spans.push(hint("Esc"));
    spans.push(Span::raw(if app.focus.is_some() { " Close keyboard" } else { " Quit" }));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyFormat;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(TipCalculator::new(CurrencyFormat::lookup("en_US").unwrap()))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &App) -> String {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_starts_on_amount_field() {
        let app = app();
        assert_eq!(app.focus, Some(Field::Amount));
        assert_eq!(app.tip().formatted, "$0.00");
    }

    #[test]
    fn test_next_then_done_flow() {
        let mut app = app();
        type_text(&mut app, "50");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Some(Field::TipPercent));

        type_text(&mut app, "15");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, None);

        assert_eq!(app.input(), TipInput::new("50", "15"));
        assert_eq!(app.tip().formatted, "$7.50");
    }

    #[test]
    fn test_tip_recomputed_per_keystroke() {
        let mut app = app();
        type_text(&mut app, "100");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "2");
        assert_eq!(app.tip().formatted, "$2.00");
        type_text(&mut app, "0");
        assert_eq!(app.tip().formatted, "$20.00");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.tip().formatted, "$2.00");
    }

    #[test]
    fn test_non_numeric_keys_ignored() {
        let mut app = app();
        type_text(&mut app, "4a2,x.5");
        assert_eq!(app.amount_input, "42.5");
    }

    #[test]
    fn test_field_length_capped() {
        let mut app = app();
        type_text(&mut app, &"9".repeat(MAX_FIELD_LEN + 10));
        assert_eq!(app.amount_input.len(), MAX_FIELD_LEN);
    }

    #[test]
    fn test_navigation_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        assert_eq!(app.focus, Some(Field::TipPercent));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.focus, Some(Field::Amount));

        // 'q' is not a number, and with focus it does nothing
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.amount_input, "");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, None);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_while_editing() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_digit_without_focus_resumes_amount() {
        let mut app = app();
        app.clear_focus();
        press(&mut app, KeyCode::Char('7'));
        assert_eq!(app.focus, Some(Field::Amount));
        assert_eq!(app.amount_input, "7");
    }

    #[test]
    fn test_render_shows_form_and_tip() {
        let mut app = app();
        type_text(&mut app, "33.33");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "18");

        let text = screen(&app);
        assert!(text.contains("Calculate Tip"));
        assert!(text.contains("Bill Amount"));
        assert!(text.contains("How was the service?"));
        assert!(text.contains("Tip Amount: $6.00"));
    }
}
