use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::task::JoinHandle;

use crate::events::{BracketGeneratedEvent, EventHandler, EventProducer, Handler, SlotResolvedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub slot_resolved_producer: Vec<EventProducer<SlotResolvedEvent>>,
    pub bracket_generated_producer: Vec<EventProducer<BracketGeneratedEvent>>,
}

impl EventProducers {
    pub async fn publish_slot_resolved(&self, event: SlotResolvedEvent) {
        for producer in &self.slot_resolved_producer {
            producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_bracket_generated(&self, event: BracketGeneratedEvent) {
        for producer in &self.bracket_generated_producer {
            producer.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_slot_resolved: Option<EventHandler<SlotResolvedEvent>>,
    pub on_bracket_generated: Option<EventHandler<BracketGeneratedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_slot_resolved = hooks.on_slot_resolved.map(|f| EventHandler::new(buffer_size, f));
        let on_bracket_generated = hooks.on_bracket_generated.map(|f| EventHandler::new(buffer_size, f));
        Self { on_slot_resolved, on_bracket_generated }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_slot_resolved {
            result.slot_resolved_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_bracket_generated {
            result.bracket_generated_producer.push(handler.subscribe());
        }
        result
    }

    /// Spawns a task per configured hook. Each task ends once all of its producers have been dropped, so awaiting the
    /// returned handles after dropping the APIs waits for every event to be handled.
    pub fn start_handlers(self) -> Vec<JoinHandle<()>> {
        let mut tasks = Vec::with_capacity(2);
        if let Some(handler) = self.on_slot_resolved {
            tasks.push(tokio::spawn(handler.start_handler()));
        }
        if let Some(handler) = self.on_bracket_generated {
            tasks.push(tokio::spawn(handler.start_handler()));
        }
        tasks
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_slot_resolved: Option<Handler<SlotResolvedEvent>>,
    pub on_bracket_generated: Option<Handler<BracketGeneratedEvent>>,
}

impl EventHooks {
    pub fn on_slot_resolved<F>(&mut self, f: F) -> &mut Self
    where F: Fn(SlotResolvedEvent) -> BoxFuture<'static, ()> + Send + Sync + 'static {
        self.on_slot_resolved = Some(Arc::new(f));
        self
    }

    pub fn on_bracket_generated<F>(&mut self, f: F) -> &mut Self
    where F: Fn(BracketGeneratedEvent) -> BoxFuture<'static, ()> + Send + Sync + 'static {
        self.on_bracket_generated = Some(Arc::new(f));
        self
    }
}
