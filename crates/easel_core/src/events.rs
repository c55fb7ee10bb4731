//! Component lifecycle notifications.
//!
//! Every entity owns an explicit [`ObserverList`]. Callers subscribe a
//! closure and receive a synchronous [`ComponentEvent`] whenever a component
//! is attached to or removed from that entity. There is no deferred queue
//! and no delivery thread; the observer runs inside the attach/remove call.

use std::fmt;

use crate::component::{Capability, Component};
use crate::entity::EntityId;

/// A component lifecycle notification carrying the affected component.
#[derive(Clone, Copy)]
pub enum ComponentEvent<'a> {
    /// A component was attached. Fired after the component is in the map, so
    /// observers see the entity in its post-attach shape.
    Added {
        /// The entity the component was attached to.
        entity: EntityId,
        /// The capability slot it occupies.
        capability: Capability,
        /// The newly attached component.
        component: &'a dyn Component,
    },
    /// A component was removed. A silently replaced component (same-tag
    /// attach) does not fire this.
    Removed {
        /// The entity the component was removed from.
        entity: EntityId,
        /// The capability slot it vacated.
        capability: Capability,
        /// The removed component, already detached.
        component: &'a dyn Component,
    },
}

impl ComponentEvent<'_> {
    /// The entity the event concerns.
    #[must_use]
    pub fn entity(&self) -> EntityId {
        match self {
            Self::Added { entity, .. } | Self::Removed { entity, .. } => *entity,
        }
    }

    /// The capability slot the event concerns.
    #[must_use]
    pub fn capability(&self) -> Capability {
        match self {
            Self::Added { capability, .. } | Self::Removed { capability, .. } => *capability,
        }
    }

    /// The affected component.
    #[must_use]
    pub fn component(&self) -> &dyn Component {
        match self {
            Self::Added { component, .. } | Self::Removed { component, .. } => *component,
        }
    }
}

impl fmt::Debug for ComponentEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added {
                entity, capability, ..
            } => write!(f, "Added({entity}, {capability:?})"),
            Self::Removed {
                entity, capability, ..
            } => write!(f, "Removed({entity}, {capability:?})"),
        }
    }
}

type ObserverFn = Box<dyn FnMut(&ComponentEvent<'_>)>;

/// Handle returned by [`ObserverList::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// The subscriber registry owned by one entity.
#[derive(Default)]
pub struct ObserverList {
    next_id: u64,
    observers: Vec<(ObserverId, ObserverFn)>,
}

impl ObserverList {
    /// Create an empty observer list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            observers: Vec::new(),
        }
    }

    /// Register an observer. Observers are notified in subscription order.
    pub fn subscribe(&mut self, observer: impl FnMut(&ComponentEvent<'_>) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Drop an observer. Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    /// Deliver an event to every observer, synchronously and in order.
    pub fn notify(&mut self, event: &ComponentEvent<'_>) {
        for (_, observer) in &mut self.observers {
            observer(event);
        }
    }

    /// Number of subscribed observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns `true` if no observers are subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::component::ComponentState;

    #[derive(Debug, Default)]
    struct Marker {
        state: ComponentState,
    }

    impl Component for Marker {
        fn kind() -> Capability {
            Capability::GuiElement
        }
        fn state(&self) -> &ComponentState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut ComponentState {
            &mut self.state
        }
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    }

    #[test]
    fn test_notify_reaches_all_observers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut list = ObserverList::new();

        let a = Rc::clone(&seen);
        list.subscribe(move |_| a.borrow_mut().push("first"));
        let b = Rc::clone(&seen);
        list.subscribe(move |_| b.borrow_mut().push("second"));

        let marker = Marker::default();
        list.notify(&ComponentEvent::Added {
            entity: EntityId::from_raw(1),
            capability: Capability::GuiElement,
            component: &marker,
        });

        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut list = ObserverList::new();

        let c = Rc::clone(&count);
        let id = list.subscribe(move |_| *c.borrow_mut() += 1);

        let marker = Marker::default();
        let event = ComponentEvent::Removed {
            entity: EntityId::from_raw(2),
            capability: Capability::GuiElement,
            component: &marker,
        };

        list.notify(&event);
        assert!(list.unsubscribe(id));
        list.notify(&event);

        assert_eq!(*count.borrow(), 1);
        assert!(!list.unsubscribe(id));
    }

    #[test]
    fn test_event_accessors() {
        let marker = Marker::default();
        let event = ComponentEvent::Added {
            entity: EntityId::from_raw(3),
            capability: Capability::GuiElement,
            component: &marker,
        };
        assert_eq!(event.entity(), EntityId::from_raw(3));
        assert_eq!(event.capability(), Capability::GuiElement);
        assert!(event.component().is_dirty());
    }
}
