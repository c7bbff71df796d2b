//! Property-based tests for the render-list projection.
//!
//! These tests verify the projection order invariant: for any strip made of
//! contiguous group runs and loose tabs, the projected list preserves strip
//! order, weaves each group header in exactly once before its first member,
//! and hides exactly the members of collapsed groups.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use tabdeck::engine::projector::project;
use tabdeck::types::render::RenderItem;
use tabdeck::types::tab::{GroupColor, GroupId, Tab, TabGroup, TabId, TabStatus};

/// One contiguous span of the generated strip.
#[derive(Debug, Clone)]
enum Segment {
    /// A run of ungrouped tabs.
    Loose(usize),
    /// A group and its member run; may own zero tabs.
    Grouped { members: usize, collapsed: bool },
}

/// Strategy for generating a strip layout. Groups are kept contiguous, as
/// the real strip keeps them.
fn arb_segments() -> impl Strategy<Value = Vec<Segment>> {
    prop::collection::vec(
        prop_oneof![
            2 => (1..4usize).prop_map(Segment::Loose),
            3 => (0..4usize, any::<bool>())
                .prop_map(|(members, collapsed)| Segment::Grouped { members, collapsed }),
        ],
        1..8,
    )
}

fn make_tab(id: TabId, group_id: Option<GroupId>) -> Tab {
    Tab {
        id,
        title: format!("Tab {}", id),
        url: format!("https://example.com/{}", id),
        favicon: None,
        status: TabStatus::Complete,
        last_accessed: None,
        group_id,
    }
}

fn build_strip(segments: &[Segment]) -> (Vec<Tab>, Vec<TabGroup>) {
    let mut tabs = Vec::new();
    let mut groups = Vec::new();
    let mut next_tab: TabId = 1;
    let mut next_group: GroupId = 100;
    for segment in segments {
        match segment {
            Segment::Loose(count) => {
                for _ in 0..*count {
                    tabs.push(make_tab(next_tab, None));
                    next_tab += 1;
                }
            }
            Segment::Grouped { members, collapsed } => {
                let group_id = next_group;
                next_group += 1;
                groups.push(TabGroup {
                    id: group_id,
                    title: format!("Group {}", group_id),
                    color: GroupColor::Grey,
                    collapsed: *collapsed,
                    window_id: 1,
                });
                for _ in 0..*members {
                    tabs.push(make_tab(next_tab, Some(group_id)));
                    next_tab += 1;
                }
            }
        }
    }
    (tabs, groups)
}

/// The expansion the engine derives when no per-group override is recorded.
fn strip_expansion(groups: &[TabGroup]) -> HashMap<GroupId, bool> {
    groups.iter().map(|g| (g.id, !g.collapsed)).collect()
}

fn header_ids(items: &[RenderItem]) -> Vec<GroupId> {
    items.iter().filter_map(|i| i.as_group().map(|g| g.id)).collect()
}

fn visible_tab_ids(items: &[RenderItem]) -> Vec<TabId> {
    items.iter().filter_map(|i| i.as_tab().map(|t| t.id)).collect()
}

// **Property 1: strip order survives projection**
//
// *For any* strip, the tabs in the projected list SHALL be exactly the
// strip's tabs minus collapsed members, in unchanged relative order.
//
// **Property 2: every header exactly once, before its first member**
//
// *For any* strip, each group SHALL appear in the projection exactly once,
// and ahead of every one of its member rows. Keys SHALL be unique.
//
// **Property 3: collapse hides members only**
//
// *For any* strip, collapsing groups SHALL change nothing but the presence
// of their member rows: headers and loose tabs match the fully expanded
// projection.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn projection_preserves_strip_order(segments in arb_segments()) {
        let (tabs, groups) = build_strip(&segments);
        let expansion = strip_expansion(&groups);
        let items = project(&tabs, &groups, &expansion);

        let expected: Vec<TabId> = tabs
            .iter()
            .filter(|t| {
                t.group_id
                    .map(|g| expansion.get(&g).copied().unwrap_or(true))
                    .unwrap_or(true)
            })
            .map(|t| t.id)
            .collect();
        let visible = visible_tab_ids(&items);
        prop_assert_eq!(
            &visible,
            &expected,
            "visible tabs {:?} diverged from strip order {:?}",
            visible,
            expected
        );
    }

    #[test]
    fn headers_are_unique_and_precede_members(segments in arb_segments()) {
        let (tabs, groups) = build_strip(&segments);
        let expansion = strip_expansion(&groups);
        let items = project(&tabs, &groups, &expansion);

        let keys: Vec<String> = items.iter().map(|i| i.key()).collect();
        let unique: HashSet<&String> = keys.iter().collect();
        prop_assert_eq!(unique.len(), keys.len(), "duplicate keys in {:?}", keys);

        for group in &groups {
            let header_pos = items
                .iter()
                .position(|i| i.as_group().map(|g| g.id) == Some(group.id));
            prop_assert!(header_pos.is_some(), "group {} missing a header", group.id);

            let first_member = items
                .iter()
                .position(|i| i.as_tab().and_then(|t| t.group_id) == Some(group.id));
            if let Some(member_pos) = first_member {
                prop_assert!(
                    header_pos.unwrap() < member_pos,
                    "group {} header at {:?} behind its first member at {}",
                    group.id,
                    header_pos,
                    member_pos
                );
            }
        }
    }

    #[test]
    fn collapse_hides_members_only(segments in arb_segments()) {
        let (tabs, groups) = build_strip(&segments);
        let expansion = strip_expansion(&groups);
        let all_expanded: HashMap<GroupId, bool> =
            groups.iter().map(|g| (g.id, true)).collect();

        let actual = project(&tabs, &groups, &expansion);
        let full = project(&tabs, &groups, &all_expanded);

        prop_assert_eq!(
            header_ids(&actual),
            header_ids(&full),
            "collapse moved or dropped headers"
        );

        let loose = |items: &[RenderItem]| -> Vec<TabId> {
            items
                .iter()
                .filter_map(|i| i.as_tab())
                .filter(|t| t.group_id.is_none())
                .map(|t| t.id)
                .collect()
        };
        prop_assert_eq!(
            loose(&actual),
            loose(&full),
            "collapse touched ungrouped tabs"
        );

        let shown: HashSet<TabId> = visible_tab_ids(&actual).into_iter().collect();
        for tab in &tabs {
            if !shown.contains(&tab.id) {
                let collapsed_member = tab
                    .group_id
                    .map(|g| !expansion.get(&g).copied().unwrap_or(true))
                    .unwrap_or(false);
                prop_assert!(
                    collapsed_member,
                    "tab {} hidden without being in a collapsed group",
                    tab.id
                );
            }
        }
    }
}
