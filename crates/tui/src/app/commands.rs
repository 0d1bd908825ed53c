use opcon_core::Event;
use tracing::info;

use super::App;

impl App {
    /// Submit the pending line: record it in history, run it as an operator
    /// command if it starts with `/`, otherwise hand it to the dispatcher.
    pub(crate) fn submit(&mut self) {
        let Some(line) = self.input.submit() else {
            return;
        };
        info!(target: "tui", chars = line.len(), "submit");
        if self.try_handle_command(&line) {
            return;
        }
        if let Err(e) = self.dispatcher.submit(line) {
            self.console.write_error(format!("dispatch: {e}"));
        }
    }

    // Operator commands are consumed here; they never reach observers.
    pub(crate) fn try_handle_command(&mut self, text: &str) -> bool {
        let s = text.trim();
        if !s.starts_with('/') {
            return false;
        }
        let rest = &s[1..];
        let mut parts = rest.splitn(2, char::is_whitespace);
        let cmd = parts.next().unwrap_or("").to_lowercase();
        let arg = parts.next().unwrap_or("").trim();
        match cmd.as_str() {
            "clear" => {
                self.transcript.clear();
                true
            }
            "start" => {
                self.start_component();
                true
            }
            "stop" => {
                self.stop_component();
                true
            }
            "help" => {
                self.show_help = true;
                true
            }
            "emit" => {
                let mut it = arg.splitn(2, char::is_whitespace);
                match it.next().unwrap_or("").parse::<u16>() {
                    Ok(id) => {
                        let text = it.next().unwrap_or("").trim();
                        self.host.deliver(&Event::text(id, text));
                    }
                    Err(_) => self.console.write_error("usage: /emit <id> <text>"),
                }
                true
            }
            _ => {
                self.console.write_error(format!("unknown command: /{cmd}"));
                true
            }
        }
    }

    pub(crate) fn toggle_component(&mut self) {
        if self.component_running {
            self.stop_component();
        } else {
            self.start_component();
        }
    }

    pub(crate) fn start_component(&mut self) {
        if self.component_running {
            self.console.write("component already running");
            return;
        }
        self.host.start_all();
        self.component_running = true;
        info!(target: "tui", "component started");
    }

    pub(crate) fn stop_component(&mut self) {
        if !self.component_running {
            return;
        }
        self.host.stop_all();
        self.component_running = false;
        info!(target: "tui", "component stopped");
    }
}
