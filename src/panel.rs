//! Side panel driver.
//!
//! Owns the engine and serializes everything that touches it: UI gestures
//! arrive on one channel, provider notifications on another, and debounce
//! deadlines fire in between. After every reaction the driver publishes a
//! fresh frame on a watch channel for the presentation layer to render.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::time::{self, Instant};

use crate::engine::reorder::{DragSession, DropGeometry};
use crate::engine::TabEngine;
use crate::provider::TabStripProvider;
use crate::types::events::TabStripEvent;
use crate::types::render::RenderItem;
use crate::types::settings::PanelSettings;
use crate::types::tab::{GroupId, Tab, TabId};

/// One UI gesture delivered to the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelGesture {
    Hover(TabId),
    HoverEnd,
    Click(TabId),
    CloseTab(TabId),
    GroupToggle(GroupId),
    DragStart(String),
    DragOver(Option<String>),
    DragEnd {
        active: String,
        over: Option<String>,
        geometry: Option<DropGeometry>,
    },
    Refresh,
    SettingsChanged(PanelSettings),
}

/// Everything the presentation layer needs to draw one panel state.
#[derive(Debug, Clone, Default)]
pub struct PanelFrame {
    pub items: Vec<RenderItem>,
    pub original_tab: Option<Tab>,
    pub preview_tab_id: Option<TabId>,
    pub drag: DragSession,
}

/// Cheap cloneable sender for feeding gestures into a running panel.
#[derive(Debug, Clone)]
pub struct SidePanelHandle {
    tx: UnboundedSender<PanelGesture>,
}

impl SidePanelHandle {
    pub fn send(&self, gesture: PanelGesture) {
        let _ = self.tx.send(gesture);
    }

    pub fn hover(&self, tab_id: TabId) {
        self.send(PanelGesture::Hover(tab_id));
    }

    pub fn hover_end(&self) {
        self.send(PanelGesture::HoverEnd);
    }

    pub fn click(&self, tab_id: TabId) {
        self.send(PanelGesture::Click(tab_id));
    }

    pub fn close_tab(&self, tab_id: TabId) {
        self.send(PanelGesture::CloseTab(tab_id));
    }

    pub fn toggle_group(&self, group_id: GroupId) {
        self.send(PanelGesture::GroupToggle(group_id));
    }

    pub fn drag_start(&self, key: &str) {
        self.send(PanelGesture::DragStart(key.to_string()));
    }

    pub fn drag_over(&self, key: Option<&str>) {
        self.send(PanelGesture::DragOver(key.map(str::to_string)));
    }

    pub fn drag_end(&self, active: &str, over: Option<&str>, geometry: Option<DropGeometry>) {
        self.send(PanelGesture::DragEnd {
            active: active.to_string(),
            over: over.map(str::to_string),
            geometry,
        });
    }

    pub fn refresh(&self) {
        self.send(PanelGesture::Refresh);
    }
}

/// The panel task: engine plus its input and output channels.
pub struct SidePanel<P: TabStripProvider> {
    engine: TabEngine<P>,
    gestures: UnboundedReceiver<PanelGesture>,
    events: UnboundedReceiver<TabStripEvent>,
    frames: watch::Sender<PanelFrame>,
}

impl<P: TabStripProvider> SidePanel<P> {
    /// Wires a panel to a provider. Returns the panel (to be driven with
    /// [`run`](Self::run)), the gesture handle and the frame receiver.
    pub fn new(
        provider: Arc<P>,
        settings: &PanelSettings,
    ) -> (Self, SidePanelHandle, watch::Receiver<PanelFrame>) {
        let events = provider.subscribe();
        let engine = TabEngine::new(provider, settings);
        let (gesture_tx, gesture_rx) = mpsc::unbounded_channel();
        let (frame_tx, frame_rx) = watch::channel(PanelFrame::default());
        (
            Self {
                engine,
                gestures: gesture_rx,
                events,
                frames: frame_tx,
            },
            SidePanelHandle { tx: gesture_tx },
            frame_rx,
        )
    }

    /// Drives the panel until the gesture handle or the provider's
    /// notification stream goes away.
    pub async fn run(mut self) {
        self.engine.initialize().await;
        self.publish();
        loop {
            let deadline = self.engine.next_deadline();
            tokio::select! {
                gesture = self.gestures.recv() => {
                    let Some(gesture) = gesture else { break };
                    self.apply_gesture(gesture).await;
                }
                event = self.events.recv() => {
                    let Some(event) = event else { break };
                    self.engine.apply_event(event).await;
                }
                _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.engine.handle_deadline(Instant::now()).await;
                }
            }
            self.publish();
        }
    }

    async fn apply_gesture(&mut self, gesture: PanelGesture) {
        match gesture {
            PanelGesture::Hover(tab_id) => self.engine.on_hover(tab_id).await,
            PanelGesture::HoverEnd => self.engine.on_hover_end().await,
            PanelGesture::Click(tab_id) => self.engine.on_click(tab_id),
            PanelGesture::CloseTab(tab_id) => self.engine.on_close_tab(tab_id).await,
            PanelGesture::GroupToggle(group_id) => self.engine.on_group_toggle(group_id).await,
            PanelGesture::DragStart(key) => self.engine.on_drag_start(&key),
            PanelGesture::DragOver(key) => self.engine.on_drag_over(key.as_deref()),
            PanelGesture::DragEnd {
                active,
                over,
                geometry,
            } => {
                self.engine
                    .on_drag_end(&active, over.as_deref(), geometry)
                    .await;
            }
            PanelGesture::Refresh => self.engine.full_refresh().await,
            PanelGesture::SettingsChanged(settings) => self.engine.set_settings(&settings),
        }
    }

    fn publish(&self) {
        let frame = PanelFrame {
            items: self.engine.render_list(),
            original_tab: self.engine.original_tab().cloned(),
            preview_tab_id: self.engine.preview_tab_id(),
            drag: self.engine.drag_session().clone(),
        };
        let _ = self.frames.send(frame);
    }
}
