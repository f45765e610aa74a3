use serde::Serialize;
use shared::{GeoPoint, SelectionPhase, Slot};

use crate::{config::ThirdClickPolicy, store::RouteEndpointStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "slot", rename_all = "snake_case")]
pub enum ClickOutcome {
    Assigned(Slot),
    Ignored,
}

/// Assigns map clicks to endpoint slots.
///
/// The slot is picked from the occupancy of the store at the time of the
/// click: an empty `start` always takes the click, otherwise it goes to `end`
/// (or nowhere, once both are set and the policy is [`ThirdClickPolicy::Ignore`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct MapClickReconciler {
    policy: ThirdClickPolicy,
}

impl MapClickReconciler {
    pub fn new(policy: ThirdClickPolicy) -> Self {
        Self { policy }
    }

    pub fn target_slot(&self, phase: SelectionPhase) -> Option<Slot> {
        match phase {
            SelectionPhase::Empty | SelectionPhase::EndSet => Some(Slot::Start),
            SelectionPhase::StartSet => Some(Slot::End),
            SelectionPhase::BothSet => match self.policy {
                ThirdClickPolicy::OverwriteEnd => Some(Slot::End),
                ThirdClickPolicy::Ignore => None,
            },
        }
    }

    pub fn handle_click(&self, store: &mut RouteEndpointStore, point: GeoPoint) -> ClickOutcome {
        let phase = store.selection().phase();
        let Some(slot) = self.target_slot(phase) else {
            tracing::debug!(?phase, "map click ignored, both endpoints already set");
            return ClickOutcome::Ignored;
        };

        tracing::debug!(
            "map click lat={:.5} lon={:.5} -> {slot:?} (phase {phase:?})",
            point.lat,
            point.lon
        );
        match slot {
            Slot::Start => store.set_start(point),
            Slot::End => store.set_end(point),
        }
        ClickOutcome::Assigned(slot)
    }
}

#[cfg(test)]
mod tests {
    use shared::RouteSelection;

    use super::*;

    #[test]
    fn test_first_click_start_second_click_end() {
        let mut store = RouteEndpointStore::new();
        let clicks = MapClickReconciler::default();
        let a = GeoPoint::new(17.385, 78.487);
        let b = GeoPoint::new(17.4, 78.5);

        assert_eq!(clicks.handle_click(&mut store, a), ClickOutcome::Assigned(Slot::Start));
        assert_eq!(clicks.handle_click(&mut store, b), ClickOutcome::Assigned(Slot::End));
        assert_eq!(store.selection(), RouteSelection::empty().with_start(a).with_end(b));
    }

    #[test]
    fn test_third_click_overwrites_end_by_default() {
        let mut store = RouteEndpointStore::new();
        let clicks = MapClickReconciler::default();
        let a = GeoPoint::new(1.0, 1.0);
        clicks.handle_click(&mut store, a);
        clicks.handle_click(&mut store, GeoPoint::new(2.0, 2.0));

        let c = GeoPoint::new(3.0, 3.0);
        assert_eq!(clicks.handle_click(&mut store, c), ClickOutcome::Assigned(Slot::End));
        assert_eq!(store.selection().start, Some(a));
        assert_eq!(store.selection().end, Some(c));
    }

    #[test]
    fn test_third_click_ignored_when_configured() {
        let mut store = RouteEndpointStore::new();
        let clicks = MapClickReconciler::new(ThirdClickPolicy::Ignore);
        clicks.handle_click(&mut store, GeoPoint::new(1.0, 1.0));
        clicks.handle_click(&mut store, GeoPoint::new(2.0, 2.0));
        let before = store.selection();

        assert_eq!(
            clicks.handle_click(&mut store, GeoPoint::new(3.0, 3.0)),
            ClickOutcome::Ignored
        );
        assert_eq!(store.selection(), before);
    }

    #[test]
    fn test_click_fills_missing_start_after_manual_end() {
        let mut store = RouteEndpointStore::new();
        let end = GeoPoint::new(2.0, 2.0);
        store.set_end(end);

        let start = GeoPoint::new(1.0, 1.0);
        let outcome = MapClickReconciler::default().handle_click(&mut store, start);
        assert_eq!(outcome, ClickOutcome::Assigned(Slot::Start));
        assert_eq!(store.selection().endpoints(), Some((start, end)));
    }

    #[test]
    fn test_slot_depends_only_on_phase() {
        let clicks = MapClickReconciler::default();
        assert_eq!(clicks.target_slot(SelectionPhase::Empty), Some(Slot::Start));
        assert_eq!(clicks.target_slot(SelectionPhase::EndSet), Some(Slot::Start));
        assert_eq!(clicks.target_slot(SelectionPhase::StartSet), Some(Slot::End));
        assert_eq!(clicks.target_slot(SelectionPhase::BothSet), Some(Slot::End));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_point() -> impl Strategy<Value = GeoPoint> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lon)| GeoPoint { lat, lon })
        }

        proptest! {
            #[test]
            fn prop_two_clicks_fill_start_then_end(a in any_point(), b in any_point()) {
                let mut store = RouteEndpointStore::new();
                let clicks = MapClickReconciler::default();
                clicks.handle_click(&mut store, a);
                clicks.handle_click(&mut store, b);
                prop_assert_eq!(store.selection().start, Some(a));
                prop_assert_eq!(store.selection().end, Some(b));
            }

            #[test]
            fn prop_identical_clicks_fill_both_slots(a in any_point()) {
                let mut store = RouteEndpointStore::new();
                let clicks = MapClickReconciler::default();
                clicks.handle_click(&mut store, a);
                clicks.handle_click(&mut store, a);
                prop_assert_eq!(store.selection().endpoints(), Some((a, a)));
            }

            #[test]
            fn prop_clicks_never_set_end_without_start(
                points in prop::collection::vec(any_point(), 0..8)
            ) {
                let mut store = RouteEndpointStore::new();
                let clicks = MapClickReconciler::default();
                for point in points {
                    clicks.handle_click(&mut store, point);
                    let selection = store.selection();
                    prop_assert!(selection.end.is_none() || selection.start.is_some());
                }
            }
        }
    }
}
