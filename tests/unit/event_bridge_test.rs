use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use tabdeck::engine::TabEngine;
use tabdeck::provider::memory::MemoryTabStrip;
use tabdeck::provider::TabStripProvider;
use tabdeck::types::events::{TabDelta, TabStripEvent};
use tabdeck::types::settings::PanelSettings;
use tabdeck::types::tab::{GroupColor, Tab, TabId, TabStatus};

async fn engine_for(
    strip: &Arc<MemoryTabStrip>,
) -> (TabEngine<MemoryTabStrip>, UnboundedReceiver<TabStripEvent>) {
    let events = strip.subscribe();
    let mut engine = TabEngine::new(strip.clone(), &PanelSettings::default());
    engine.initialize().await;
    (engine, events)
}

async fn pump(engine: &mut TabEngine<MemoryTabStrip>, events: &mut UnboundedReceiver<TabStripEvent>) {
    while let Ok(event) = events.try_recv() {
        engine.apply_event(event).await;
    }
}

fn tab_order(engine: &TabEngine<MemoryTabStrip>) -> Vec<TabId> {
    engine.tabs().iter().map(|t| t.id).collect()
}

fn foreign_tab(id: TabId) -> Tab {
    Tab {
        id,
        title: "Foreign".to_string(),
        url: "https://elsewhere.test".to_string(),
        favicon: None,
        status: TabStatus::Complete,
        last_accessed: None,
        group_id: None,
    }
}

#[tokio::test]
async fn test_tab_created_refreshes_snapshot() {
    let strip = Arc::new(MemoryTabStrip::new(1));
    strip.add_tab("One", "https://one.test");
    let (mut engine, mut events) = engine_for(&strip).await;

    strip.add_tab("Two", "https://two.test");
    pump(&mut engine, &mut events).await;

    assert_eq!(tab_order(&engine), vec![1, 2]);
}

#[tokio::test]
async fn test_tab_removed_patches_without_refresh() {
    let strip = Arc::new(MemoryTabStrip::new(1));
    strip.add_tab("One", "https://one.test");
    strip.add_tab("Two", "https://two.test");
    let (mut engine, mut events) = engine_for(&strip).await;

    strip.user_closes_tab(2);
    pump(&mut engine, &mut events).await;

    assert_eq!(tab_order(&engine), vec![1]);
}

#[tokio::test]
async fn test_irrelevant_delta_is_skipped() {
    let strip = Arc::new(MemoryTabStrip::new(1));
    strip.add_tab("One", "https://one.test");
    let (mut engine, _events) = engine_for(&strip).await;

    // Access-time churn alone is not worth a snapshot write
    engine
        .apply_event(TabStripEvent::TabUpdated {
            tab_id: 1,
            delta: TabDelta {
                last_accessed: Some(42),
                ..TabDelta::default()
            },
        })
        .await;

    assert_ne!(engine.tabs()[0].last_accessed, Some(42));
}

#[tokio::test]
async fn test_relevant_delta_merges_into_snapshot_and_original() {
    let strip = Arc::new(MemoryTabStrip::new(1));
    strip.add_tab("One", "https://one.test");
    let (mut engine, mut events) = engine_for(&strip).await;

    strip.navigate(1, "https://moved.test");
    pump(&mut engine, &mut events).await;

    assert_eq!(engine.tabs()[0].url, "https://moved.test");
    assert_eq!(engine.tabs()[0].status, TabStatus::Loading);
    // Tab 1 is the recorded original; a later restore must use current data
    assert_eq!(
        engine.original_tab().map(|t| t.url.clone()),
        Some("https://moved.test".to_string())
    );
}

#[tokio::test]
async fn test_membership_delta_refreshes_groups() {
    let strip = Arc::new(MemoryTabStrip::new(1));
    strip.add_tab("One", "https://one.test");
    let (mut engine, mut events) = engine_for(&strip).await;

    let g = strip.spawn_group("Work", GroupColor::Blue);
    strip.group_tab(1, g).await.unwrap();
    pump(&mut engine, &mut events).await;

    assert_eq!(engine.tabs()[0].group_id, Some(g));
    let keys: Vec<String> = engine.render_list().iter().map(|i| i.key()).collect();
    assert_eq!(keys, vec!["group-100", "tab-1"]);
}

#[tokio::test]
async fn test_tab_replaced_repoints_original() {
    let strip = Arc::new(MemoryTabStrip::new(1));
    strip.add_tab("One", "https://one.test");
    strip.add_tab("Two", "https://two.test");
    let (mut engine, mut events) = engine_for(&strip).await;
    assert_eq!(engine.original_tab().map(|t| t.id), Some(1));

    let new_id = strip.replace_tab(1).unwrap();
    pump(&mut engine, &mut events).await;

    assert_eq!(engine.original_tab().map(|t| t.id), Some(new_id));
    assert_eq!(engine.original_tab().map(|t| t.title.clone()), Some("One".to_string()));
    assert_eq!(tab_order(&engine), vec![new_id, 2]);
}

#[tokio::test]
async fn test_foreign_window_events_are_dropped() {
    let strip = Arc::new(MemoryTabStrip::new(1));
    strip.add_tab("One", "https://one.test");
    strip.add_tab("Two", "https://two.test");
    strip.add_tab("Three", "https://three.test");
    let (mut engine, mut events) = engine_for(&strip).await;

    // The strip reorders but the panel misses that notification
    strip.user_moves_tab(3, 0);
    let _ = events.try_recv();
    assert_eq!(tab_order(&engine), vec![1, 2, 3]);

    // A sibling window's event must not trigger the catch-up refresh
    engine
        .apply_event(TabStripEvent::TabCreated {
            tab: foreign_tab(9),
            window_id: 7,
        })
        .await;
    assert_eq!(tab_order(&engine), vec![1, 2, 3]);

    // The same event for this window does
    engine
        .apply_event(TabStripEvent::TabCreated {
            tab: foreign_tab(9),
            window_id: 1,
        })
        .await;
    assert_eq!(tab_order(&engine), vec![3, 1, 2]);
}

#[tokio::test]
async fn test_window_focus_triggers_refresh() {
    let strip = Arc::new(MemoryTabStrip::new(1));
    strip.add_tab("One", "https://one.test");
    strip.add_tab("Two", "https://two.test");
    let (mut engine, mut events) = engine_for(&strip).await;

    strip.user_moves_tab(2, 0);
    let _ = events.try_recv();
    assert_eq!(tab_order(&engine), vec![1, 2]);

    strip.focus_window(1);
    pump(&mut engine, &mut events).await;
    assert_eq!(tab_order(&engine), vec![2, 1]);
}

#[tokio::test]
async fn test_external_fold_hides_members() {
    let strip = Arc::new(MemoryTabStrip::new(1));
    let g = strip.spawn_group("Work", GroupColor::Cyan);
    strip.add_tab_in_group("One", "https://one.test", g);
    strip.add_tab("Two", "https://two.test");
    let (mut engine, mut events) = engine_for(&strip).await;

    strip.fold_group(g, true);
    pump(&mut engine, &mut events).await;

    let keys: Vec<String> = engine.render_list().iter().map(|i| i.key()).collect();
    assert_eq!(keys, vec!["group-100", "tab-2"]);
}

#[tokio::test]
async fn test_panel_toggle_override_yields_once_strip_agrees() {
    let strip = Arc::new(MemoryTabStrip::new(1));
    let g = strip.spawn_group("Work", GroupColor::Orange);
    strip.add_tab_in_group("One", "https://one.test", g);
    let (mut engine, mut events) = engine_for(&strip).await;

    // Panel collapses the group; the override applies instantly
    engine.on_group_toggle(g).await;
    assert_eq!(engine.effective_expansion().get(&g), Some(&false));

    // The strip confirms, which retires the override
    pump(&mut engine, &mut events).await;
    assert_eq!(engine.effective_expansion().get(&g), Some(&false));

    // A later external expand must now win
    strip.fold_group(g, false);
    pump(&mut engine, &mut events).await;
    assert_eq!(engine.effective_expansion().get(&g), Some(&true));
}

#[tokio::test]
async fn test_group_removal_reaches_render_list() {
    let strip = Arc::new(MemoryTabStrip::new(1));
    let g = strip.spawn_group("Work", GroupColor::Yellow);
    strip.add_tab_in_group("One", "https://one.test", g);
    let (mut engine, mut events) = engine_for(&strip).await;

    // Ungrouping the lone member sweeps the group away
    strip.ungroup_tab(1).await.unwrap();
    pump(&mut engine, &mut events).await;

    assert!(engine.groups().is_empty());
    let keys: Vec<String> = engine.render_list().iter().map(|i| i.key()).collect();
    assert_eq!(keys, vec!["tab-1"]);
}
