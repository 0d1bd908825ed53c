use opcon_core::{ConsoleHandle, Event};
use tracing::{debug, info};

use crate::config::HostConfig;

/// The hooks a host runtime drives on a component: two lifecycle
/// transitions and one inbound-event delivery. The runtime itself stays an
/// opaque collaborator; anything that can call these three methods can host
/// a component.
pub trait Component {
    fn on_start(&mut self);
    fn on_stop(&mut self);
    fn on_receive(&mut self, event: &Event);
}

/// Console-backed component: starting it shows the console and prints a
/// banner, stopping hides it, and received events are printed when their id
/// matches the configured watch id (every id when unset).
pub struct ConsoleComponent {
    console: ConsoleHandle,
    config: HostConfig,
    running: bool,
}

impl ConsoleComponent {
    pub fn new(console: ConsoleHandle, config: HostConfig) -> Self {
        Self {
            console,
            config,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn watches(&self, id: u16) -> bool {
        self.config.watch_event_id.map_or(true, |watch| watch == id)
    }
}

impl Component for ConsoleComponent {
    fn on_start(&mut self) {
        self.running = true;
        self.console.show();
        self.console.write(self.config.banner.clone());
        info!(target: "host", "console component started");
    }

    fn on_stop(&mut self) {
        self.running = false;
        self.console.hide();
        info!(target: "host", "console component stopped");
    }

    fn on_receive(&mut self, event: &Event) {
        if !self.watches(event.id) {
            debug!(target: "host", id = event.id, "event ignored");
            return;
        }
        self.console
            .write(format!("recv [{}]: {}", event.id, event.payload_text()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opcon_core::ConsoleMsg;

    fn component_with_watch(
        watch: Option<u16>,
    ) -> (ConsoleComponent, std::sync::mpsc::Receiver<ConsoleMsg>) {
        let (console, rx) = ConsoleHandle::channel();
        let config = HostConfig {
            watch_event_id: watch,
            banner: "up".to_string(),
            ..HostConfig::default()
        };
        (ConsoleComponent::new(console, config), rx)
    }

    #[test]
    fn start_shows_console_then_prints_banner() {
        let (mut comp, rx) = component_with_watch(None);
        comp.on_start();
        assert!(comp.is_running());
        assert_eq!(rx.try_recv(), Ok(ConsoleMsg::Show));
        assert_eq!(rx.try_recv(), Ok(ConsoleMsg::Line("up".into())));
    }

    #[test]
    fn stop_hides_console() {
        let (mut comp, rx) = component_with_watch(None);
        comp.on_start();
        comp.on_stop();
        assert!(!comp.is_running());
        let mut msgs = Vec::new();
        while let Ok(m) = rx.try_recv() {
            msgs.push(m);
        }
        assert_eq!(msgs.last(), Some(&ConsoleMsg::Hide));
    }

    #[test]
    fn matching_event_is_printed() {
        let (mut comp, rx) = component_with_watch(Some(4242));
        comp.on_receive(&Event::text(4242, "inquiry"));
        assert_eq!(
            rx.try_recv(),
            Ok(ConsoleMsg::Line("recv [4242]: inquiry".into()))
        );
    }

    #[test]
    fn non_matching_event_is_ignored() {
        let (mut comp, rx) = component_with_watch(Some(4242));
        comp.on_receive(&Event::text(7, "noise"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unset_watch_prints_everything() {
        let (mut comp, rx) = component_with_watch(None);
        comp.on_receive(&Event::text(7, "a"));
        comp.on_receive(&Event::text(9, "b"));
        assert_eq!(rx.try_recv(), Ok(ConsoleMsg::Line("recv [7]: a".into())));
        assert_eq!(rx.try_recv(), Ok(ConsoleMsg::Line("recv [9]: b".into())));
    }
}
