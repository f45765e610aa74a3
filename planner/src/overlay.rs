use shared::GeoPoint;

use crate::{
    store::{Mutation, SelectionChange, SelectionObserver},
    view::MapHandle,
};

/// External engine that computes and draws a route on a map surface.
///
/// The planner never inspects the outcome: a failed route is the engine's
/// business.
pub trait RoutingEngine {
    fn render(&mut self, map: &MapHandle, start: GeoPoint, end: GeoPoint);
    fn clear(&mut self, map: &MapHandle);
}

/// Decides when the routing engine draws and when it tears down.
///
/// Renders whenever the selection becomes ready with a pair different from
/// the one on screen, and clears after a reset. A stable selection never
/// triggers a second render.
pub struct RouteOverlayBridge<E> {
    engine: E,
    map: MapHandle,
    rendered: Option<(GeoPoint, GeoPoint)>,
}

impl<E: RoutingEngine> RouteOverlayBridge<E> {
    pub fn new(engine: E, map: MapHandle) -> Self {
        Self {
            engine,
            map,
            rendered: None,
        }
    }

    fn show(&mut self, start: GeoPoint, end: GeoPoint) {
        if self.rendered == Some((start, end)) {
            return;
        }
        if self.rendered.take().is_some() {
            self.engine.clear(&self.map);
        }
        tracing::debug!(?start, ?end, map = self.map.as_str(), "requesting route overlay");
        self.engine.render(&self.map, start, end);
        self.rendered = Some((start, end));
    }

    fn hide(&mut self, mutation: Mutation) {
        let had_overlay = self.rendered.take().is_some();
        if had_overlay || mutation == Mutation::Reset {
            tracing::debug!(map = self.map.as_str(), had_overlay, "clearing route overlay");
            self.engine.clear(&self.map);
        }
    }
}

impl<E: RoutingEngine> SelectionObserver for RouteOverlayBridge<E> {
    fn selection_changed(&mut self, change: &SelectionChange) {
        match change.current.endpoints() {
            Some((start, end)) => self.show(start, end),
            None => self.hide(change.mutation),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use shared::RouteSelection;

    use super::*;
    use crate::store::RouteEndpointStore;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Render(GeoPoint, GeoPoint),
        Clear,
    }

    #[derive(Clone, Default)]
    struct Engine(Rc<RefCell<Vec<Call>>>);

    impl RoutingEngine for Engine {
        fn render(&mut self, map: &MapHandle, start: GeoPoint, end: GeoPoint) {
            assert_eq!(map.as_str(), "map");
            self.0.borrow_mut().push(Call::Render(start, end));
        }

        fn clear(&mut self, _map: &MapHandle) {
            self.0.borrow_mut().push(Call::Clear);
        }
    }

    fn wired() -> (RouteEndpointStore, Engine) {
        let engine = Engine::default();
        let mut store = RouteEndpointStore::new();
        store.subscribe(RouteOverlayBridge::new(engine.clone(), MapHandle::new("map")));
        (store, engine)
    }

    const A: GeoPoint = GeoPoint::new(17.385, 78.487);
    const B: GeoPoint = GeoPoint::new(17.4, 78.5);
    const C: GeoPoint = GeoPoint::new(17.5, 78.6);

    #[test]
    fn test_no_render_with_single_endpoint() {
        let (mut store, engine) = wired();
        store.set_start(A);
        store.set_start(B);
        assert!(engine.0.borrow().is_empty());
    }

    #[test]
    fn test_renders_once_when_ready() {
        let (mut store, engine) = wired();
        store.set_start(A);
        store.set_end(B);
        assert_eq!(*engine.0.borrow(), vec![Call::Render(A, B)]);
    }

    #[test]
    fn test_unchanged_pair_is_not_rendered_again() {
        let (mut store, engine) = wired();
        store.set_start(A);
        store.set_end(B);
        store.set_end(B);
        store.set_start(A);
        assert_eq!(*engine.0.borrow(), vec![Call::Render(A, B)]);
    }

    #[test]
    fn test_changed_pair_replaces_overlay() {
        let (mut store, engine) = wired();
        store.set_start(A);
        store.set_end(B);
        store.set_end(C);
        assert_eq!(
            *engine.0.borrow(),
            vec![Call::Render(A, B), Call::Clear, Call::Render(A, C)]
        );
    }

    #[test]
    fn test_reset_clears_overlay() {
        let (mut store, engine) = wired();
        store.set_start(A);
        store.set_end(B);
        store.reset();
        assert_eq!(*engine.0.borrow(), vec![Call::Render(A, B), Call::Clear]);
    }

    #[test]
    fn test_reset_without_overlay_still_clears() {
        let (mut store, engine) = wired();
        store.set_start(A);
        store.reset();
        assert_eq!(*engine.0.borrow(), vec![Call::Clear]);
    }

    #[test]
    fn test_ready_again_after_reset_renders() {
        let (mut store, engine) = wired();
        store.set_start(A);
        store.set_end(B);
        store.reset();
        store.set_start(A);
        store.set_end(B);
        assert_eq!(
            *engine.0.borrow(),
            vec![Call::Render(A, B), Call::Clear, Call::Render(A, B)]
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Start(GeoPoint),
            End(GeoPoint),
            Reset,
        }

        fn any_op() -> impl Strategy<Value = Op> {
            let point = (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lon)| GeoPoint { lat, lon });
            prop_oneof![
                point.clone().prop_map(Op::Start),
                point.prop_map(Op::End),
                Just(Op::Reset),
            ]
        }

        proptest! {
            #[test]
            fn prop_render_iff_ready(ops in prop::collection::vec(any_op(), 0..16)) {
                let (mut store, engine) = wired();
                let mut shown: Option<(GeoPoint, GeoPoint)> = None;

                for op in ops {
                    let before = engine.0.borrow().len();
                    match op {
                        Op::Start(p) => store.set_start(p),
                        Op::End(p) => store.set_end(p),
                        Op::Reset => store.reset(),
                    }
                    let selection: RouteSelection = store.selection();
                    let calls = engine.0.borrow()[before..].to_vec();

                    match selection.endpoints() {
                        Some(pair) if shown == Some(pair) => prop_assert!(calls.is_empty()),
                        Some((s, e)) => {
                            prop_assert_eq!(calls.last(), Some(&Call::Render(s, e)));
                            shown = Some((s, e));
                        }
                        None => {
                            prop_assert!(calls.iter().all(|c| *c == Call::Clear));
                            if shown.take().is_some() {
                                prop_assert_eq!(calls, vec![Call::Clear]);
                            }
                        }
                    }
                }
            }
        }
    }
}
