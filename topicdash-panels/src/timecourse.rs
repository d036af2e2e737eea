//! The topic-weight timecourse and the selection events it fires.
//!
//! The chart encodes either two dimensions (one facet per tissue, activation
//! emits `TissueTopic`) or one (all tissues pooled, activation emits
//! `TopicOnly`).

use serde::Serialize;
use tracing::debug;

use topicdash_core::{OrdinalLabel, TopicTimecourse};

use crate::events::{EventSource, SelectionEvent, SubscriptionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartEncoding {
    /// One facet per tissue.
    TissueTopic,
    /// Tissues pooled into a single facet.
    TopicOnly,
}

impl ChartEncoding {
    pub fn toggled(self) -> Self {
        match self {
            ChartEncoding::TissueTopic => ChartEncoding::TopicOnly,
            ChartEncoding::TopicOnly => ChartEncoding::TissueTopic,
        }
    }
}

/// A bar segment the user can activate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartElement {
    pub tissue: Option<String>,
    pub timepoint: OrdinalLabel,
    pub topic: OrdinalLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackSegment {
    pub topic: OrdinalLabel,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackColumn {
    pub timepoint: OrdinalLabel,
    pub segments: Vec<StackSegment>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facet {
    /// `None` for the pooled facet.
    pub tissue: Option<String>,
    pub columns: Vec<StackColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimecourseView {
    pub encoding: ChartEncoding,
    pub topics: Vec<OrdinalLabel>,
    pub timepoints: Vec<OrdinalLabel>,
    pub facets: Vec<Facet>,
    /// Tallest stack over all facets, for a shared y axis.
    pub max_total: f64,
}

#[derive(Debug)]
pub struct TimecoursePanel {
    data: TopicTimecourse,
    encoding: ChartEncoding,
    selection_changed: EventSource<SelectionEvent>,
}

impl TimecoursePanel {
    pub fn new(data: TopicTimecourse) -> Self {
        Self {
            data,
            encoding: ChartEncoding::TissueTopic,
            selection_changed: EventSource::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&SelectionEvent) + 'static) -> SubscriptionId {
        self.selection_changed.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.selection_changed.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.selection_changed.subscriber_count()
    }

    pub fn encoding(&self) -> ChartEncoding {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: ChartEncoding) {
        self.encoding = encoding;
    }

    pub fn toggle_encoding(&mut self) -> ChartEncoding {
        self.encoding = self.encoding.toggled();
        self.encoding
    }

    pub fn data(&self) -> &TopicTimecourse {
        &self.data
    }

    /// The event activating `element` would fire under the current encoding,
    /// or `None` if the element is not on the chart.
    pub fn event_for(&self, element: &ChartElement) -> Option<SelectionEvent> {
        if !self.data.has_topic(element.topic.as_str())
            || !self.data.timepoints().contains(&element.timepoint)
        {
            return None;
        }
        match self.encoding {
            ChartEncoding::TopicOnly => Some(SelectionEvent::topic_only(element.topic.as_str())),
            ChartEncoding::TissueTopic => {
                let tissue = element.tissue.as_deref().filter(|t| self.data.has_tissue(t))?;
                Some(SelectionEvent::tissue_topic(tissue, element.topic.as_str()))
            }
        }
    }

    /// Fire `selection_changed` for `element`. Returns the emitted event.
    pub fn activate(&mut self, element: &ChartElement) -> Option<SelectionEvent> {
        let Some(event) = self.event_for(element) else {
            debug!(topic = %element.topic, timepoint = %element.timepoint, "activation ignored: not on chart");
            return None;
        };
        let delivered = self.selection_changed.emit(&event);
        debug!(event = %event, delivered, "selection_changed emitted");
        Some(event)
    }

    pub fn view(&self) -> TimecourseView {
        let facet_tissues: Vec<Option<&str>> = match self.encoding {
            ChartEncoding::TissueTopic => self.data.tissues().iter().map(|t| Some(t.as_str())).collect(),
            ChartEncoding::TopicOnly => vec![None],
        };

        let facets: Vec<Facet> = facet_tissues
            .into_iter()
            .map(|tissue| Facet {
                tissue: tissue.map(String::from),
                columns: self
                    .data
                    .timepoints()
                    .iter()
                    .map(|tp| {
                        let segments: Vec<StackSegment> = self
                            .data
                            .stack(tissue, tp)
                            .into_iter()
                            .map(|(topic, weight)| StackSegment { topic, weight })
                            .collect();
                        StackColumn {
                            timepoint: tp.clone(),
                            total: segments.iter().map(|s| s.weight).sum(),
                            segments,
                        }
                    })
                    .collect(),
            })
            .collect();

        let max_total = facets
            .iter()
            .flat_map(|f| f.columns.iter().map(|c| c.total))
            .fold(0.0, f64::max);

        TimecourseView {
            encoding: self.encoding,
            topics: self.data.topics().to_vec(),
            timepoints: self.data.timepoints().to_vec(),
            facets,
            max_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const TOPICS: &str = "sample,k1,k2\n\
liver_d1_m1,0.6,0.4\n\
liver_d7_m1,0.2,0.8\n\
lung_d1_m1,0.5,0.5\n";

    fn panel() -> TimecoursePanel {
        TimecoursePanel::new(TopicTimecourse::from_reader(TOPICS.as_bytes(), "topics").unwrap())
    }

    fn element(tissue: Option<&str>, tp: &str, topic: &str) -> ChartElement {
        ChartElement {
            tissue: tissue.map(String::from),
            timepoint: OrdinalLabel::new(tp),
            topic: OrdinalLabel::new(topic),
        }
    }

    #[test]
    fn faceted_activation_emits_tissue_topic() {
        let mut panel = panel();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        panel.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        let event = panel.activate(&element(Some("lung"), "d1", "k2"));
        assert_eq!(event, Some(SelectionEvent::tissue_topic("lung", "k2")));
        assert_eq!(*seen.borrow(), vec![SelectionEvent::tissue_topic("lung", "k2")]);
    }

    #[test]
    fn pooled_activation_emits_topic_only() {
        let mut panel = panel();
        assert_eq!(panel.toggle_encoding(), ChartEncoding::TopicOnly);
        let event = panel.activate(&element(None, "d7", "k1"));
        assert_eq!(event, Some(SelectionEvent::topic_only("k1")));
    }

    #[test]
    fn off_chart_elements_emit_nothing() {
        let mut panel = panel();
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        panel.subscribe(move |_| *c.borrow_mut() += 1);

        assert_eq!(panel.activate(&element(Some("heart"), "d1", "k1")), None);
        assert_eq!(panel.activate(&element(Some("liver"), "d1", "k9")), None);
        assert_eq!(panel.activate(&element(None, "d1", "k1")), None);
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn faceted_view_has_one_facet_per_tissue() {
        let view = panel().view();
        assert_eq!(view.facets.len(), 2);
        assert_eq!(view.facets[0].tissue.as_deref(), Some("liver"));
        // lung has no d7 samples
        assert!(view.facets[1].columns[1].segments.is_empty());
        assert!((view.max_total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pooled_view_averages_tissues() {
        let mut panel = panel();
        panel.set_encoding(ChartEncoding::TopicOnly);
        let view = panel.view();
        assert_eq!(view.facets.len(), 1);
        let d1 = &view.facets[0].columns[0];
        assert!((d1.segments[0].weight - 0.55).abs() < 1e-12);
    }
}
