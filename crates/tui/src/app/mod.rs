use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::warn;

use opcon_core::{ConsoleHandle, ConsoleMsg, Dispatcher, InputLine, Transcript};
use opcon_host::{ConsoleComponent, HostConfig, LocalHost, PublishObserver};

use crate::persist;

pub mod commands;

/// Console messages drained per tick; keeps one chatty observer from
/// starving input handling.
const DRAIN_BATCH: usize = 64;
/// Loopback events pumped per tick.
const PUMP_BATCH: usize = 16;

pub struct App {
    pub input: InputLine,
    pub transcript: Transcript,
    pub dispatcher: Dispatcher,
    pub console: ConsoleHandle,
    console_rx: Receiver<ConsoleMsg>,
    pub host: LocalHost,
    pub config: HostConfig,
    pub component_running: bool,
    pub visible: bool,
    pub input_enabled: bool,
    pub should_quit: bool,
    pub dirty: bool,
    pub show_help: bool,
    pub transcript_area: Option<Rect>,
}

impl App {
    pub fn new() -> anyhow::Result<Self> {
        let config = HostConfig::from_env_and_file()?;
        let history = persist::load_history().unwrap_or_default();
        Self::with_parts(config, history)
    }

    /// Build the console, its dispatcher, and a loopback host wired to a
    /// single console component, then start the component.
    pub fn with_parts(config: HostConfig, history: Vec<String>) -> anyhow::Result<Self> {
        let (console, console_rx) = ConsoleHandle::channel();
        let dispatcher = Dispatcher::new(config.queue_capacity)?;
        let mut host = LocalHost::new();
        dispatcher.register(Arc::new(PublishObserver::new(
            config.publish_event_id,
            host.outbound_sender(),
        )));
        host.add_component(Box::new(ConsoleComponent::new(
            console.clone(),
            config.clone(),
        )));

        let mut app = Self {
            input: InputLine::with_history(history),
            transcript: Transcript::new(),
            dispatcher,
            console,
            console_rx,
            host,
            config,
            component_running: false,
            visible: false,
            input_enabled: false,
            should_quit: false,
            dirty: true,
            show_help: false,
            transcript_area: None,
        };
        app.start_component();
        Ok(app)
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.show_help {
            match key.code {
                KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') => self.show_help = false,
                _ => {}
            }
            self.dirty = true;
            return;
        }

        if !self.visible {
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.should_quit = true;
                }
                KeyCode::Esc => self.should_quit = true,
                KeyCode::F(1) => self.show_help = true,
                KeyCode::F(2) => self.toggle_component(),
                _ => {}
            }
            self.dirty = true;
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::F(1) => self.show_help = true,
            KeyCode::F(2) => self.toggle_component(),
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.transcript.clear();
                self.input.end_navigation();
            }

            // Transcript scrolling. These are not history navigation, so
            // they end any navigation session, like every other keystroke.
            KeyCode::PageUp => {
                self.transcript.scroll_up(self.transcript.viewport().max(1));
                self.input.end_navigation();
            }
            KeyCode::PageDown => {
                self.transcript
                    .scroll_down(self.transcript.viewport().max(1));
                self.input.end_navigation();
            }
            KeyCode::Home if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.transcript.scroll_to_top();
                self.input.end_navigation();
            }
            KeyCode::End if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.transcript.scroll_to_bottom();
                self.input.end_navigation();
            }
            KeyCode::Up if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.transcript.scroll_up(1);
                self.input.end_navigation();
            }
            KeyCode::Down if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.transcript.scroll_down(1);
                self.input.end_navigation();
            }

            KeyCode::Enter if self.input_enabled => self.submit(),
            KeyCode::Up if self.input_enabled => self.input.navigate_up(),
            KeyCode::Down if self.input_enabled => self.input.navigate_down(),
            KeyCode::Backspace if self.input_enabled => self.input.delete_left_grapheme(),
            KeyCode::Delete if self.input_enabled => self.input.delete_right_grapheme(),
            KeyCode::Left
                if key.modifiers.contains(KeyModifiers::CONTROL) && self.input_enabled =>
            {
                self.input.move_cursor_word_left();
            }
            KeyCode::Right
                if key.modifiers.contains(KeyModifiers::CONTROL) && self.input_enabled =>
            {
                self.input.move_cursor_word_right();
            }
            KeyCode::Left if self.input_enabled => self.input.move_cursor_left(),
            KeyCode::Right if self.input_enabled => self.input.move_cursor_right(),
            KeyCode::Home if self.input_enabled => self.input.move_cursor_line_start(),
            KeyCode::End if self.input_enabled => self.input.move_cursor_line_end(),
            KeyCode::Char('w')
                if key.modifiers.contains(KeyModifiers::CONTROL) && self.input_enabled =>
            {
                self.input.delete_prev_word();
            }
            KeyCode::Char('u')
                if key.modifiers.contains(KeyModifiers::CONTROL) && self.input_enabled =>
            {
                self.input.kill_to_line_start();
            }
            KeyCode::Char('k')
                if key.modifiers.contains(KeyModifiers::CONTROL) && self.input_enabled =>
            {
                self.input.kill_to_line_end();
            }
            KeyCode::Char('a')
                if key.modifiers.contains(KeyModifiers::CONTROL) && self.input_enabled =>
            {
                self.input.move_cursor_line_start();
            }
            KeyCode::Char('e')
                if key.modifiers.contains(KeyModifiers::CONTROL) && self.input_enabled =>
            {
                self.input.move_cursor_line_end();
            }
            KeyCode::Char(ch)
                if self.input_enabled && !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                let mut buf = [0u8; 4];
                self.input.insert_text(ch.encode_utf8(&mut buf));
            }
            _ => self.input.end_navigation(),
        }
        self.dirty = true;
    }

    pub fn on_paste(&mut self, s: &str) {
        if !self.input_enabled {
            return;
        }
        // Single-line input: pasted newlines flatten to spaces.
        let flat = s.replace(['\r', '\n'], " ");
        self.input.insert_text(&flat);
        self.dirty = true;
    }

    pub fn on_mouse(&mut self, me: MouseEvent) {
        let Some(area) = self.transcript_area else {
            return;
        };
        let inside = me.column >= area.x
            && me.column < area.x + area.width
            && me.row >= area.y
            && me.row < area.y + area.height;
        if !inside {
            return;
        }
        match me.kind {
            MouseEventKind::ScrollUp => {
                self.transcript.scroll_up(3);
                self.dirty = true;
            }
            MouseEventKind::ScrollDown => {
                self.transcript.scroll_down(3);
                self.dirty = true;
            }
            _ => {}
        }
    }

    /// Apply pending console messages and loopback traffic. Runs once per
    /// event-loop pass; everything that crosses a thread lands here.
    pub fn on_tick(&mut self) {
        for _ in 0..DRAIN_BATCH {
            match self.console_rx.try_recv() {
                Ok(ConsoleMsg::Line(line)) => {
                    self.transcript.push(&line);
                    self.dirty = true;
                }
                Ok(ConsoleMsg::Show) => {
                    self.visible = true;
                    self.input_enabled = true;
                    self.dirty = true;
                }
                Ok(ConsoleMsg::Hide) => {
                    self.visible = false;
                    self.input_enabled = false;
                    self.dirty = true;
                }
                Err(_) => break,
            }
        }
        if self.host.pump_loopback(PUMP_BATCH) > 0 {
            self.dirty = true;
        }
    }

    /// Persist history and shut the dispatcher down (disposing observers).
    /// Called once the event loop has exited and the terminal is restored.
    pub fn finish(&mut self) {
        if let Err(e) = persist::save_history(self.input.history()) {
            warn!(target: "tui", "failed to save history: {e}");
        }
        self.dispatcher.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn app() -> App {
        App::with_parts(HostConfig::default(), Vec::new()).expect("app")
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_line(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
        press(app, KeyCode::Enter);
    }

    fn tick_until(app: &mut App, mut done: impl FnMut(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(app) {
            assert!(Instant::now() < deadline, "timed out waiting for app state");
            app.on_tick();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn has_line(app: &App, wanted: &str) -> bool {
        app.transcript.lines().iter().any(|l| l == wanted)
    }

    #[test]
    fn startup_shows_console_and_prints_banner() {
        let mut app = app();
        tick_until(&mut app, |a| a.visible && !a.transcript.is_empty());
        assert!(app.input_enabled);
        assert_eq!(app.transcript.lines()[0], "console ready");
    }

    #[test]
    fn submitted_line_loops_back_as_host_event() {
        let mut app = app();
        tick_until(&mut app, |a| a.input_enabled);
        type_line(&mut app, "hello");
        assert_eq!(app.input.history(), ["hello"]);
        assert_eq!(app.input.buffer(), "");
        tick_until(&mut app, |a| has_line(a, "recv [1]: hello"));
    }

    #[test]
    fn emit_command_injects_an_inbound_event() {
        let mut app = app();
        tick_until(&mut app, |a| a.input_enabled);
        type_line(&mut app, "/emit 7 probe");
        tick_until(&mut app, |a| has_line(a, "recv [7]: probe"));
        // The command went to history but not to observers.
        assert_eq!(app.input.history(), ["/emit 7 probe"]);
    }

    #[test]
    fn unknown_command_reports_an_error_line() {
        let mut app = app();
        tick_until(&mut app, |a| a.input_enabled);
        type_line(&mut app, "/bogus");
        tick_until(&mut app, |a| has_line(a, "ERROR: unknown command: /bogus"));
    }

    #[test]
    fn stop_hides_console_and_f2_restarts() {
        let mut app = app();
        tick_until(&mut app, |a| a.input_enabled);
        type_line(&mut app, "/stop");
        tick_until(&mut app, |a| !a.visible);
        assert!(!app.input_enabled);
        assert!(!app.component_running);

        press(&mut app, KeyCode::F(2));
        tick_until(&mut app, |a| a.visible && a.input_enabled);
        assert!(app.component_running);
    }

    #[test]
    fn keys_are_ignored_while_input_is_disabled() {
        let mut app = app();
        tick_until(&mut app, |a| a.input_enabled);
        type_line(&mut app, "/stop");
        tick_until(&mut app, |a| !a.visible);

        type_line(&mut app, "ghost");
        assert_eq!(app.input.buffer(), "");
        assert_eq!(app.input.history(), ["/stop"]);
    }

    #[test]
    fn clear_command_empties_the_transcript() {
        let mut app = app();
        tick_until(&mut app, |a| a.input_enabled && !a.transcript.is_empty());
        type_line(&mut app, "/clear");
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn empty_submission_is_suppressed() {
        let mut app = app();
        tick_until(&mut app, |a| a.input_enabled);
        press(&mut app, KeyCode::Enter);
        assert!(app.input.history().is_empty());
    }

    #[test]
    fn pasted_newlines_flatten_to_spaces() {
        let mut app = app();
        tick_until(&mut app, |a| a.input_enabled);
        app.on_paste("two\nwords");
        assert_eq!(app.input.buffer(), "two words");
    }
}
