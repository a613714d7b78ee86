use super::*;

fn ids(selection: &ScreenSelection) -> Vec<&str> {
    selection.iter().collect()
}

#[test]
fn toggle_adds_then_removes() {
    let mut selection = ScreenSelection::new();
    assert!(selection.toggle("a1"));
    assert!(selection.contains("a1"));
    assert!(!selection.toggle("a1"));
    assert!(selection.is_empty());
}

#[test]
fn toggle_keeps_first_selection_order() {
    let mut selection = ScreenSelection::new();
    selection.toggle("a2");
    selection.toggle("a1");
    selection.toggle("a3");
    assert_eq!(ids(&selection), vec!["a2", "a1", "a3"]);
}

#[test]
fn reselected_ad_moves_to_end() {
    let mut selection = ScreenSelection::new();
    selection.toggle("a1");
    selection.toggle("a2");
    selection.toggle("a1");
    selection.toggle("a1");
    assert_eq!(ids(&selection), vec!["a2", "a1"]);
}

#[test]
fn toggle_sequence_keeps_ads_toggled_odd_number_of_times() {
    let sequence = ["a1", "a2", "a3", "a1", "a2", "a2", "a4", "a4", "a4", "a5", "a5"];
    let selection: ScreenSelection = sequence.iter().collect();

    for ad in ["a1", "a2", "a3", "a4", "a5"] {
        let count = sequence.iter().filter(|id| **id == ad).count();
        assert_eq!(selection.contains(ad), count % 2 == 1, "ad {ad} toggled {count} times");
    }
    assert_eq!(selection.len(), 3);
}

#[test]
fn screens_are_independent() {
    let mut selection = AssignmentSelection::new();
    selection.toggle("a1", Screen::Top);
    selection.toggle("a1", Screen::Bottom);
    selection.toggle("a1", Screen::Top);
    assert!(!selection.is_selected("a1", Screen::Top));
    assert!(selection.is_selected("a1", Screen::Bottom));
}

#[test]
fn build_tags_only_premium_ad() {
    let mut selection = AssignmentSelection::new();
    selection.toggle("A1", Screen::Top);
    selection.toggle("A2", Screen::Top);
    selection.set_premium(Some("A2"));

    assert_eq!(
        selection.build(),
        vec![
            Assignment { ad_id: "A1".into(), screen: Screen::Top, priority: Priority::Normal },
            Assignment { ad_id: "A2".into(), screen: Screen::Top, priority: Priority::Premium },
        ]
    );
}

#[test]
fn build_serializes_to_wire_shape() {
    let mut selection = AssignmentSelection::new();
    selection.toggle("A1", Screen::Top);
    selection.toggle("A2", Screen::Top);
    selection.set_premium(Some("A2"));

    let body = serde_json::to_value(AssignRequest { ads: selection.build() }).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "ads": [
                { "adId": "A1", "screen": 0, "priority": "normal" },
                { "adId": "A2", "screen": 0, "priority": "premium" }
            ]
        })
    );
}

#[test]
fn build_covers_every_pair_once() {
    let top: ScreenSelection = ["a1", "a2", "a3"].into_iter().collect();
    let bottom: ScreenSelection = ["a3", "a4"].into_iter().collect();
    let built = build_assignments(&top, &bottom, Some("a3"));

    assert_eq!(built.len(), top.len() + bottom.len());
    for (ad, screen) in [
        ("a1", Screen::Top),
        ("a2", Screen::Top),
        ("a3", Screen::Top),
        ("a3", Screen::Bottom),
        ("a4", Screen::Bottom),
    ] {
        let hits = built.iter().filter(|a| a.ad_id == ad && a.screen == screen).count();
        assert_eq!(hits, 1, "({ad}, {screen:?})");
    }
    for assignment in &built {
        let expected = if assignment.ad_id == "a3" { Priority::Premium } else { Priority::Normal };
        assert_eq!(assignment.priority, expected);
    }
}

#[test]
fn premium_not_selected_on_any_screen_tags_nothing() {
    let top: ScreenSelection = ["a1"].into_iter().collect();
    let built = build_assignments(&top, &ScreenSelection::new(), Some("zz"));
    assert!(built.iter().all(|a| a.priority == Priority::Normal));
}

#[test]
fn empty_premium_id_clears_choice() {
    let mut selection = AssignmentSelection::new();
    selection.set_premium(Some("a1"));
    selection.set_premium(Some(""));
    assert_eq!(selection.premium(), None);
}

#[test]
fn clear_discards_everything() {
    let mut selection = AssignmentSelection::new();
    selection.toggle("a1", Screen::Top);
    selection.toggle("a2", Screen::Bottom);
    selection.set_premium(Some("a1"));
    selection.clear();
    assert_eq!(selection, AssignmentSelection::new());
    assert!(selection.build().is_empty());
}

#[test]
fn screen_rejects_out_of_range_index() {
    assert_eq!(Screen::try_from(1), Ok(Screen::Bottom));
    assert_eq!(Screen::try_from(2), Err(ScreenError::InvalidIndex(2)));
    assert!(serde_json::from_str::<Screen>("3").is_err());
}
