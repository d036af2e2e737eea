//! Scope strategies: how a gene table maps selections to score keys.
//!
//! A panel is built over exactly one strategy. The global scope ranks genes
//! per topic and follows the topic of any selection; the tissue scope ranks
//! per (tissue, topic) and only follows selections that name a tissue.

use std::fmt;
use std::sync::Arc;

use topicdash_core::{DataError, RankedScoreList, ScoreKey, ScoreScope, ScoreStore, Sign};

use crate::error::PanelError;
use crate::events::SelectionEvent;

pub trait ScopeStrategy: fmt::Debug {
    /// Short name for logs and status lines.
    fn label(&self) -> &'static str;

    fn ranked_list(&self, key: &ScoreKey, sign: Sign) -> Result<&RankedScoreList, DataError>;

    fn contains_key(&self, key: &ScoreKey) -> bool;

    fn title(&self, key: &ScoreKey) -> String;

    /// Candidate key for a selection event, or `None` if this scope cannot
    /// represent it. The candidate still has to pass `contains_key`.
    fn key_for_event(&self, event: &SelectionEvent) -> Option<ScoreKey>;

    /// Key shown at startup: the preferred topic when loaded, else the first key.
    fn default_key(&self, preferred_topic: Option<&str>) -> Option<ScoreKey>;

    /// Tissue the second mini-chart of each row is filtered to.
    fn tissue_filter<'a>(&self, key: &'a ScoreKey) -> Option<&'a str>;

    fn keys(&self) -> &[ScoreKey];
}

fn check_store(
    label: &'static str,
    store: &ScoreStore,
    expected: ScoreScope,
) -> Result<(), PanelError> {
    if store.scope() != expected {
        return Err(PanelError::ScopeMismatch {
            scope: label,
            expected,
            actual: store.scope(),
        });
    }
    if store.keys().is_empty() {
        return Err(PanelError::EmptyScores(label));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct GlobalScope {
    store: Arc<ScoreStore>,
}

impl GlobalScope {
    pub fn new(store: Arc<ScoreStore>) -> Result<Self, PanelError> {
        check_store("global", &store, ScoreScope::Global)?;
        Ok(Self { store })
    }
}

impl ScopeStrategy for GlobalScope {
    fn label(&self) -> &'static str {
        "global"
    }

    fn ranked_list(&self, key: &ScoreKey, sign: Sign) -> Result<&RankedScoreList, DataError> {
        self.store.ranked_list(key, sign)
    }

    fn contains_key(&self, key: &ScoreKey) -> bool {
        self.store.contains_key(key)
    }

    fn title(&self, key: &ScoreKey) -> String {
        format!("Genes Correlated with {}", key.topic)
    }

    /// Both arities project onto their topic.
    fn key_for_event(&self, event: &SelectionEvent) -> Option<ScoreKey> {
        Some(ScoreKey::global(event.topic()))
    }

    fn default_key(&self, preferred_topic: Option<&str>) -> Option<ScoreKey> {
        preferred_topic
            .map(ScoreKey::global)
            .filter(|k| self.store.contains_key(k))
            .or_else(|| self.store.keys().first().cloned())
    }

    fn tissue_filter<'a>(&self, _key: &'a ScoreKey) -> Option<&'a str> {
        None
    }

    fn keys(&self) -> &[ScoreKey] {
        self.store.keys()
    }
}

#[derive(Debug, Clone)]
pub struct TissueScope {
    store: Arc<ScoreStore>,
}

impl TissueScope {
    pub fn new(store: Arc<ScoreStore>) -> Result<Self, PanelError> {
        check_store("tissue", &store, ScoreScope::TissueScoped)?;
        Ok(Self { store })
    }
}

impl ScopeStrategy for TissueScope {
    fn label(&self) -> &'static str {
        "tissue"
    }

    fn ranked_list(&self, key: &ScoreKey, sign: Sign) -> Result<&RankedScoreList, DataError> {
        self.store.ranked_list(key, sign)
    }

    fn contains_key(&self, key: &ScoreKey) -> bool {
        self.store.contains_key(key)
    }

    fn title(&self, key: &ScoreKey) -> String {
        match &key.tissue {
            Some(tissue) => format!("Genes Correlated with {} in {}", key.topic, tissue),
            None => format!("Genes Correlated with {}", key.topic),
        }
    }

    /// Topic-only selections carry no tissue and are ignored.
    fn key_for_event(&self, event: &SelectionEvent) -> Option<ScoreKey> {
        match event {
            SelectionEvent::TopicOnly { .. } => None,
            SelectionEvent::TissueTopic { tissue, topic } => {
                Some(ScoreKey::tissue(tissue.as_str(), topic.as_str()))
            }
        }
    }

    fn default_key(&self, preferred_topic: Option<&str>) -> Option<ScoreKey> {
        let keys = self.store.keys();
        preferred_topic
            .and_then(|t| keys.iter().find(|k| k.topic == t))
            .or_else(|| keys.first())
            .cloned()
    }

    fn tissue_filter<'a>(&self, key: &'a ScoreKey) -> Option<&'a str> {
        key.tissue.as_deref()
    }

    fn keys(&self) -> &[ScoreKey] {
        self.store.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global_store() -> Arc<ScoreStore> {
        let csv = "gene,k1,k2\nA,1.0,-1.0\nB,2.0,0.5\n";
        Arc::new(ScoreStore::from_reader(csv.as_bytes(), "g", ScoreScope::Global).unwrap())
    }

    fn tissue_store() -> Arc<ScoreStore> {
        let csv = "tissue,gene,k1,k2\nliver,A,1.0,-1.0\nlung,B,2.0,0.5\n";
        Arc::new(ScoreStore::from_reader(csv.as_bytes(), "t", ScoreScope::TissueScoped).unwrap())
    }

    #[test]
    fn constructors_check_store_shape() {
        assert!(GlobalScope::new(tissue_store()).is_err());
        assert!(matches!(
            TissueScope::new(global_store()),
            Err(PanelError::ScopeMismatch { .. })
        ));
    }

    #[test]
    fn global_projects_both_arities_to_topic() {
        let scope = GlobalScope::new(global_store()).unwrap();
        let k = ScoreKey::global("k2");
        assert_eq!(scope.key_for_event(&SelectionEvent::topic_only("k2")), Some(k.clone()));
        assert_eq!(
            scope.key_for_event(&SelectionEvent::tissue_topic("liver", "k2")),
            Some(k)
        );
    }

    #[test]
    fn tissue_ignores_topic_only() {
        let scope = TissueScope::new(tissue_store()).unwrap();
        assert_eq!(scope.key_for_event(&SelectionEvent::topic_only("k1")), None);
        assert_eq!(
            scope.key_for_event(&SelectionEvent::tissue_topic("lung", "k1")),
            Some(ScoreKey::tissue("lung", "k1"))
        );
    }

    #[test]
    fn titles_name_topic_and_tissue() {
        let g = GlobalScope::new(global_store()).unwrap();
        let t = TissueScope::new(tissue_store()).unwrap();
        assert_eq!(g.title(&ScoreKey::global("k1")), "Genes Correlated with k1");
        assert_eq!(
            t.title(&ScoreKey::tissue("liver", "k1")),
            "Genes Correlated with k1 in liver"
        );
    }

    #[test]
    fn default_key_prefers_requested_topic() {
        let g = GlobalScope::new(global_store()).unwrap();
        assert_eq!(g.default_key(Some("k2")), Some(ScoreKey::global("k2")));
        assert_eq!(g.default_key(Some("k99")), Some(ScoreKey::global("k1")));

        let t = TissueScope::new(tissue_store()).unwrap();
        assert_eq!(t.default_key(Some("k2")), Some(ScoreKey::tissue("liver", "k2")));
        assert_eq!(t.default_key(None), Some(ScoreKey::tissue("liver", "k1")));
    }

    #[test]
    fn only_tissue_scope_filters_charts() {
        let key = ScoreKey::tissue("liver", "k1");
        assert_eq!(GlobalScope::new(global_store()).unwrap().tissue_filter(&key), None);
        assert_eq!(
            TissueScope::new(tissue_store()).unwrap().tissue_filter(&key),
            Some("liver")
        );
    }
}
