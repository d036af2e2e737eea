//! Selection events and the observer registry that carries them.

use std::fmt;

use serde::Serialize;

/// Payload of a timecourse activation. Which variant is emitted depends on
/// whether the chart currently encodes one dimension or two.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionEvent {
    TopicOnly { topic: String },
    TissueTopic { tissue: String, topic: String },
}

impl SelectionEvent {
    pub fn topic_only(topic: impl Into<String>) -> Self {
        SelectionEvent::TopicOnly {
            topic: topic.into(),
        }
    }

    pub fn tissue_topic(tissue: impl Into<String>, topic: impl Into<String>) -> Self {
        SelectionEvent::TissueTopic {
            tissue: tissue.into(),
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        match self {
            SelectionEvent::TopicOnly { topic } | SelectionEvent::TissueTopic { topic, .. } => topic,
        }
    }

    pub fn tissue(&self) -> Option<&str> {
        match self {
            SelectionEvent::TopicOnly { .. } => None,
            SelectionEvent::TissueTopic { tissue, .. } => Some(tissue),
        }
    }
}

impl fmt::Display for SelectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionEvent::TopicOnly { topic } => write!(f, "{topic}"),
            SelectionEvent::TissueTopic { tissue, topic } => write!(f, "{tissue}/{topic}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = Box<dyn FnMut(&E)>;

/// Synchronous observer list. Handlers run in subscription order on the
/// emitting thread.
pub struct EventSource<E> {
    handlers: Vec<(SubscriptionId, Handler<E>)>,
    next_id: u64,
}

impl<E> EventSource<E> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }

    /// Deliver `event` to every handler; returns how many were called.
    pub fn emit(&mut self, event: &E) -> usize {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
        self.handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl<E> Default for EventSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventSource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emits_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut source = EventSource::new();
        for n in 0..3 {
            let seen = Rc::clone(&seen);
            source.subscribe(move |e: &SelectionEvent| {
                seen.borrow_mut().push(format!("{n}:{e}"));
            });
        }

        assert_eq!(source.emit(&SelectionEvent::tissue_topic("liver", "k3")), 3);
        assert_eq!(
            *seen.borrow(),
            vec!["0:liver/k3", "1:liver/k3", "2:liver/k3"]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut source = EventSource::new();
        let c = Rc::clone(&count);
        let id = source.subscribe(move |_: &SelectionEvent| *c.borrow_mut() += 1);

        source.emit(&SelectionEvent::topic_only("k1"));
        assert!(source.unsubscribe(id));
        assert!(!source.unsubscribe(id));
        source.emit(&SelectionEvent::topic_only("k1"));

        assert_eq!(*count.borrow(), 1);
        assert_eq!(source.subscriber_count(), 0);
    }

    #[test]
    fn accessors_cover_both_arities() {
        let one = SelectionEvent::topic_only("k2");
        let two = SelectionEvent::tissue_topic("lung", "k2");
        assert_eq!(one.topic(), two.topic());
        assert_eq!(one.tissue(), None);
        assert_eq!(two.tissue(), Some("lung"));
    }
}
