use tokio::sync::mpsc::UnboundedReceiver;

use tabdeck::provider::memory::{MemoryTabStrip, RecordedCall};
use tabdeck::provider::TabStripProvider;
use tabdeck::types::events::TabStripEvent;
use tabdeck::types::tab::{GroupColor, TabId};

fn drain(rx: &mut UnboundedReceiver<TabStripEvent>) -> Vec<TabStripEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn tab_order(strip: &MemoryTabStrip) -> Vec<TabId> {
    strip.tabs().iter().map(|t| t.id).collect()
}

#[tokio::test]
async fn test_join_group_relocates_to_run_end() {
    let strip = MemoryTabStrip::new(1);
    let t1 = strip.add_tab("One", "https://one.test");
    let g = strip.spawn_group("Work", GroupColor::Blue);
    let t2 = strip.add_tab_in_group("Two", "https://two.test", g);
    let t3 = strip.add_tab_in_group("Three", "https://three.test", g);
    let t4 = strip.add_tab("Four", "https://four.test");

    // Joining from above the run: the tab lands after the last member
    strip.group_tab(t1, g).await.unwrap();

    assert_eq!(tab_order(&strip), vec![t2, t3, t1, t4]);
    assert_eq!(strip.tabs()[2].group_id, Some(g));
}

#[tokio::test]
async fn test_join_group_from_below_lands_after_run() {
    let strip = MemoryTabStrip::new(1);
    let g = strip.spawn_group("Work", GroupColor::Green);
    let t1 = strip.add_tab_in_group("One", "https://one.test", g);
    let t2 = strip.add_tab_in_group("Two", "https://two.test", g);
    let t3 = strip.add_tab("Three", "https://three.test");
    let t4 = strip.add_tab("Four", "https://four.test");

    strip.group_tab(t4, g).await.unwrap();

    assert_eq!(tab_order(&strip), vec![t1, t2, t4, t3]);
}

#[tokio::test]
async fn test_ungroup_last_member_sweeps_group() {
    let strip = MemoryTabStrip::new(1);
    let g = strip.spawn_group("Work", GroupColor::Red);
    let t1 = strip.add_tab_in_group("One", "https://one.test", g);
    let mut rx = strip.subscribe();

    strip.ungroup_tab(t1).await.unwrap();

    assert!(strip.groups().is_empty());
    let events = drain(&mut rx);
    assert!(matches!(events[0], TabStripEvent::TabUpdated { tab_id, .. } if tab_id == t1));
    assert!(matches!(events[1], TabStripEvent::GroupRemoved { group_id } if group_id == g));
}

#[tokio::test]
async fn test_close_active_tab_activates_slid_in_neighbor() {
    let strip = MemoryTabStrip::new(1);
    let t1 = strip.add_tab("One", "https://one.test");
    let t2 = strip.add_tab("Two", "https://two.test");
    let t3 = strip.add_tab("Three", "https://three.test");
    strip.user_activates(t2);

    strip.close_tab(t2).await.unwrap();

    // The tab that slid into the closed slot becomes active
    assert_eq!(tab_order(&strip), vec![t1, t3]);
    assert_eq!(strip.active_tab_id(), Some(t3));
}

#[tokio::test]
async fn test_close_active_last_tab_activates_new_last() {
    let strip = MemoryTabStrip::new(1);
    let t1 = strip.add_tab("One", "https://one.test");
    let t2 = strip.add_tab("Two", "https://two.test");
    strip.user_activates(t2);

    strip.close_tab(t2).await.unwrap();

    assert_eq!(strip.active_tab_id(), Some(t1));
}

#[tokio::test]
async fn test_close_only_tab_leaves_no_active() {
    let strip = MemoryTabStrip::new(1);
    let t1 = strip.add_tab("One", "https://one.test");

    strip.close_tab(t1).await.unwrap();

    assert!(strip.tabs().is_empty());
    assert_eq!(strip.active_tab_id(), None);
}

#[tokio::test]
async fn test_move_tab_clamps_index() {
    let strip = MemoryTabStrip::new(1);
    let t1 = strip.add_tab("One", "https://one.test");
    let t2 = strip.add_tab("Two", "https://two.test");
    let t3 = strip.add_tab("Three", "https://three.test");

    strip.move_tab(t1, 99).await.unwrap();

    assert_eq!(tab_order(&strip), vec![t2, t3, t1]);
}

#[tokio::test]
async fn test_replace_tab_keeps_position_and_fields() {
    let strip = MemoryTabStrip::new(1);
    let t1 = strip.add_tab("One", "https://one.test");
    let t2 = strip.add_tab("Two", "https://two.test");
    let t3 = strip.add_tab("Three", "https://three.test");
    strip.user_activates(t2);
    let mut rx = strip.subscribe();

    let new_id = strip.replace_tab(t2).unwrap();

    assert_ne!(new_id, t2);
    assert_eq!(tab_order(&strip), vec![t1, new_id, t3]);
    assert_eq!(strip.tabs()[1].title, "Two");
    // The active slot follows the identity swap
    assert_eq!(strip.active_tab_id(), Some(new_id));
    let events = drain(&mut rx);
    assert!(matches!(
        events[0],
        TabStripEvent::TabReplaced { added_tab_id, removed_tab_id }
            if added_tab_id == new_id && removed_tab_id == t2
    ));
}

#[tokio::test]
async fn test_activate_unknown_tab_errors() {
    let strip = MemoryTabStrip::new(1);
    strip.add_tab("One", "https://one.test");

    let result = strip.activate(99).await;

    assert!(result.is_err());
    // The attempt is still visible as provider traffic
    assert_eq!(strip.take_calls(), vec![RecordedCall::Activate(99)]);
}

#[tokio::test]
async fn test_activate_already_active_emits_no_event() {
    let strip = MemoryTabStrip::new(1);
    let t1 = strip.add_tab("One", "https://one.test");
    let mut rx = strip.subscribe();

    strip.activate(t1).await.unwrap();

    assert!(drain(&mut rx).is_empty());
    assert_eq!(strip.active_tab_id(), Some(t1));
}

#[tokio::test]
async fn test_take_calls_drains_in_order() {
    let strip = MemoryTabStrip::new(1);
    let t1 = strip.add_tab("One", "https://one.test");
    let t2 = strip.add_tab("Two", "https://two.test");

    strip.activate(t2).await.unwrap();
    strip.move_tab(t1, 1).await.unwrap();

    assert_eq!(
        strip.take_calls(),
        vec![RecordedCall::Activate(t2), RecordedCall::Move(t1, 1)]
    );
    assert!(strip.take_calls().is_empty());
}

#[tokio::test]
async fn test_list_tabs_filters_foreign_window() {
    let strip = MemoryTabStrip::new(1);
    strip.add_tab("One", "https://one.test");

    let tabs = strip.list_tabs(2).await.unwrap();

    assert!(tabs.is_empty());
}
