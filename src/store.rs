//! In-memory scenario list plus the comparison selection.
//!
//! Scenarios are kept newest first. Selection is a set of ids; reads always
//! report it in store order so the comparison view is stable.

use std::collections::HashSet;

use crate::scenario::Scenario;

/// Comparing needs at least this many selected scenarios.
pub const MIN_COMPARE: usize = 2;

#[derive(Debug, Default)]
pub struct ScenarioStore {
    scenarios: Vec<Scenario>,
    selected: HashSet<String>,
}

impl ScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend; an entry with the same id is replaced.
    pub fn add(&mut self, scenario: Scenario) {
        self.scenarios.retain(|s| s.id != scenario.id);
        self.scenarios.insert(0, scenario);
    }

    pub fn remove(&mut self, id: &str) {
        self.scenarios.retain(|s| s.id != id);
        self.selected.remove(id);
    }

    /// Unknown ids are ignored.
    pub fn toggle_select(&mut self, id: &str) {
        if self.get(id).is_none() {
            return;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn can_compare(&self) -> bool {
        self.selected.len() >= MIN_COMPARE
    }

    pub fn selected(&self) -> Vec<&Scenario> {
        self.scenarios
            .iter()
            .filter(|s| self.selected.contains(&s.id))
            .collect()
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected().into_iter().map(|s| s.id.clone()).collect()
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
