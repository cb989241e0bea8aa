/// Background service worker: wires tab lifecycle events into the pipeline

use crate::bridge::{self, ActionBadge, ChromeAi, ChromeStorage, ChromeTabs, JsTimer};
use crate::pipeline::TabPipeline;
use crate::registry::TabRegistry;
use crate::settings::Settings;
use crate::tab_data::{TabId, TabInfo};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

type ChromePipeline = TabPipeline<ChromeStorage, ChromeTabs, ChromeAi, ActionBadge, JsTimer>;

#[derive(Debug, Clone, PartialEq)]
pub enum TabEvent {
    Updated(TabInfo),
    Removed(TabId),
}

/// Holds tab events that arrive while the pipeline is still being built,
/// then hands them over in arrival order.
pub struct StartupGate<P> {
    target: RefCell<Option<Rc<P>>>,
    held: RefCell<Vec<TabEvent>>,
}

impl<P> Default for StartupGate<P> {
    fn default() -> Self {
        StartupGate {
            target: RefCell::new(None),
            held: RefCell::new(Vec::new()),
        }
    }
}

impl<P> StartupGate<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The target to dispatch to, or None if the event was held
    pub fn admit(&self, event: TabEvent) -> Option<(Rc<P>, TabEvent)> {
        match self.target.borrow().as_ref() {
            Some(target) => Some((target.clone(), event)),
            None => {
                self.held.borrow_mut().push(event);
                None
            }
        }
    }

    /// Opens the gate and returns everything held so far
    pub fn open(&self, target: Rc<P>) -> Vec<TabEvent> {
        *self.target.borrow_mut() = Some(target);
        self.held.borrow_mut().drain(..).collect()
    }

    pub fn is_open(&self) -> bool {
        self.target.borrow().is_some()
    }
}

/// Listeners go in before the first await so a waking worker sees its event
pub fn start() {
    let gate: Rc<StartupGate<ChromePipeline>> = Rc::new(StartupGate::new());

    {
        let gate = gate.clone();
        bridge::on_tab_updated(move |tab| dispatch(&gate, TabEvent::Updated(tab)));
    }
    {
        let gate = gate.clone();
        bridge::on_tab_removed(move |tab_id| dispatch(&gate, TabEvent::Removed(tab_id)));
    }
    bridge::on_action_clicked(|| {
        spawn_local(async {
            if let Err(e) = bridge::open_dashboard().await {
                log::error!("{}", e);
            }
        });
    });

    spawn_local(async move {
        let store = ChromeStorage;
        let settings = Settings::load(&store).await;
        log::info!("Background started with {:?}", settings);

        let pipeline = Rc::new(TabPipeline::new(
            Rc::new(TabRegistry::new(store)),
            ChromeTabs,
            ChromeAi,
            ActionBadge,
            JsTimer,
            settings,
        ));

        for event in gate.open(pipeline.clone()) {
            handle(pipeline.clone(), event);
        }
        pipeline.refresh_badge().await;
    });
}

fn dispatch(gate: &StartupGate<ChromePipeline>, event: TabEvent) {
    if let Some((pipeline, event)) = gate.admit(event) {
        handle(pipeline, event);
    }
}

fn handle(pipeline: Rc<ChromePipeline>, event: TabEvent) {
    spawn_local(async move {
        match event {
            TabEvent::Updated(tab) => {
                pipeline.run_pipeline(tab).await;
            }
            TabEvent::Removed(tab_id) => {
                // Failures are logged inside; nothing else to do here
                let _ = pipeline.handle_removed(tab_id).await;
            }
        }
    });
}
