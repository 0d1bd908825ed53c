use std::sync::mpsc::{self, Receiver, Sender};

use opcon_core::{Event, LineObserver};
use tracing::debug;

use crate::component::Component;

/// In-process stand-in for an external component runtime.
///
/// Owns registered components, drives their lifecycle transitions and
/// inbound deliveries serially on the caller's thread, and collects
/// outbound events on a queue. A caller that feeds the outbound queue back
/// through [`deliver`](Self::deliver) gets a loopback host.
pub struct LocalHost {
    components: Vec<Box<dyn Component + Send>>,
    outbound_tx: Sender<Event>,
    outbound_rx: Receiver<Event>,
}

impl Default for LocalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalHost {
    pub fn new() -> Self {
        let (outbound_tx, outbound_rx) = mpsc::channel();
        Self {
            components: Vec::new(),
            outbound_tx,
            outbound_rx,
        }
    }

    pub fn add_component(&mut self, component: Box<dyn Component + Send>) {
        self.components.push(component);
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Sender for the outbound queue; clone it into observers that publish
    /// events on behalf of components.
    pub fn outbound_sender(&self) -> Sender<Event> {
        self.outbound_tx.clone()
    }

    pub fn start_all(&mut self) {
        for component in &mut self.components {
            component.on_start();
        }
    }

    pub fn stop_all(&mut self) {
        for component in &mut self.components {
            component.on_stop();
        }
    }

    /// Deliver one inbound event to every component, in registration order.
    pub fn deliver(&mut self, event: &Event) {
        debug!(target: "host", id = event.id, "deliver");
        for component in &mut self.components {
            component.on_receive(event);
        }
    }

    /// Feed up to `max` queued outbound events back in as inbound
    /// deliveries. Returns how many were moved.
    pub fn pump_loopback(&mut self, max: usize) -> usize {
        let mut moved = 0;
        while moved < max {
            match self.outbound_rx.try_recv() {
                Ok(event) => {
                    self.deliver(&event);
                    moved += 1;
                }
                Err(_) => break,
            }
        }
        moved
    }
}

/// Observer that republishes every submitted console line as an outbound
/// host event with a fixed id.
pub struct PublishObserver {
    event_id: u16,
    outbound: Sender<Event>,
}

impl PublishObserver {
    pub fn new(event_id: u16, outbound: Sender<Event>) -> Self {
        Self { event_id, outbound }
    }
}

impl LineObserver for PublishObserver {
    fn handle_input(&self, line: &str) {
        debug!(target: "host", id = self.event_id, chars = line.len(), "publish");
        let _ = self.outbound.send(Event::text(self.event_id, line));
    }

    fn dispose(&self) {
        debug!(target: "host", "publish observer disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex, PoisonError};

    #[derive(Clone, Default)]
    struct Probe {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Probe {
        fn log(&self) -> Vec<String> {
            self.log
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        fn record(&self, entry: String) {
            self.log
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(entry);
        }
    }

    struct ProbeComponent(Probe);

    impl Component for ProbeComponent {
        fn on_start(&mut self) {
            self.0.record("start".into());
        }

        fn on_stop(&mut self) {
            self.0.record("stop".into());
        }

        fn on_receive(&mut self, event: &Event) {
            self.0.record(format!("recv {} {}", event.id, event.payload_text()));
        }
    }

    #[test]
    fn lifecycle_and_delivery_run_in_order() {
        let probe = Probe::default();
        let mut host = LocalHost::new();
        host.add_component(Box::new(ProbeComponent(probe.clone())));
        host.start_all();
        host.deliver(&Event::text(3, "x"));
        host.stop_all();
        assert_eq!(probe.log(), ["start", "recv 3 x", "stop"]);
    }

    #[test]
    fn publish_observer_loops_back_through_the_host() {
        let probe = Probe::default();
        let mut host = LocalHost::new();
        host.add_component(Box::new(ProbeComponent(probe.clone())));

        let publisher = PublishObserver::new(9, host.outbound_sender());
        publisher.handle_input("hello");
        publisher.handle_input("world");

        assert_eq!(host.pump_loopback(16), 2);
        assert_eq!(probe.log(), ["recv 9 hello", "recv 9 world"]);
    }

    #[test]
    fn pump_respects_the_batch_limit() {
        let mut host = LocalHost::new();
        let probe = Probe::default();
        host.add_component(Box::new(ProbeComponent(probe.clone())));
        let tx = host.outbound_sender();
        for i in 0..5 {
            tx.send(Event::text(1, &i.to_string())).expect("send");
        }
        assert_eq!(host.pump_loopback(3), 3);
        assert_eq!(host.pump_loopback(16), 2);
    }
}
