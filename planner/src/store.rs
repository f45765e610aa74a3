use shared::{GeoPoint, RouteSelection};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mutation {
    SetStart(GeoPoint),
    SetEnd(GeoPoint),
    Reset,
}

/// Notification delivered to observers after every store mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionChange {
    pub mutation: Mutation,
    pub current: RouteSelection,
}

pub trait SelectionObserver {
    fn selection_changed(&mut self, change: &SelectionChange);
}

/// Owner of the current endpoint pair.
///
/// `set_start`, `set_end` and `reset` are the only ways to change it. Each one
/// swaps in a new [`RouteSelection`] and notifies every observer before
/// returning, even when the new selection equals the old one.
#[derive(Default)]
pub struct RouteEndpointStore {
    selection: RouteSelection,
    observers: Vec<Box<dyn SelectionObserver>>,
}

impl RouteEndpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl SelectionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn selection(&self) -> RouteSelection {
        self.selection
    }

    pub fn set_start(&mut self, point: GeoPoint) {
        let next = self.selection.with_start(point);
        self.commit(Mutation::SetStart(point), next);
    }

    pub fn set_end(&mut self, point: GeoPoint) {
        let next = self.selection.with_end(point);
        self.commit(Mutation::SetEnd(point), next);
    }

    pub fn reset(&mut self) {
        self.commit(Mutation::Reset, RouteSelection::empty());
    }

    fn commit(&mut self, mutation: Mutation, next: RouteSelection) {
        self.selection = next;
        let change = SelectionChange {
            mutation,
            current: next,
        };
        tracing::debug!(?mutation, phase = ?next.phase(), "route selection updated");
        for observer in &mut self.observers {
            observer.selection_changed(&change);
        }
    }
}
