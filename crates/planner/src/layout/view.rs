//! The sequence of built map layers and which one is visible.

use super::page::MapLayer;
use serde::Serialize;

/// The visible layer and where it sits in the sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    /// Zero-based position of the visible layer
    pub index: usize,
    /// Layers built so far
    pub total: usize,
    pub layer: MapLayer,
}

/// Result of a navigation request, as reported to the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    /// A layer is now visible
    Shown(PageView),
    /// Already on the first layer; nothing changed
    AtStart(PageView),
    /// The server has no further option; the visible layer is unchanged
    NoMoreOptions(PageView),
    /// The server found no combination for the requested courses
    NoCombinations,
    /// No schedule has been built yet
    NoSchedule,
}

/// What a navigation step needs from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The cursor moved to this index
    Moved(usize),
    /// Backward request on the first layer
    AtStart,
    /// Forward request past the last cached layer
    NeedsFetch,
    /// Nothing has been built
    Empty,
}

/// Built layers plus the cursor of the visible one.
///
/// Layers are only ever appended; navigation moves the cursor. Building a
/// new schedule replaces the sequence and bumps the generation, so a fetch
/// started for the old schedule cannot append to the new one.
#[derive(Debug, Default)]
pub struct ScheduleViewState {
    layers: Vec<MapLayer>,
    cursor: usize,
    generation: u64,
}

impl ScheduleViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current(&self) -> Option<PageView> {
        self.layers.get(self.cursor).map(|layer| PageView {
            index: self.cursor,
            total: self.layers.len(),
            layer: layer.clone(),
        })
    }

    /// Starts a new schedule with `first` as the only, visible layer.
    pub fn reset(&mut self, first: MapLayer) -> PageView {
        self.generation += 1;
        self.layers = vec![first];
        self.cursor = 0;
        PageView {
            index: 0,
            total: 1,
            layer: self.layers[0].clone(),
        }
    }

    /// Drops every layer, e.g. when a rebuild found no combination.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.layers.clear();
        self.cursor = 0;
    }

    pub fn back(&mut self) -> Step {
        if self.layers.is_empty() {
            Step::Empty
        } else if self.cursor == 0 {
            Step::AtStart
        } else {
            self.cursor -= 1;
            Step::Moved(self.cursor)
        }
    }

    pub fn forward(&mut self) -> Step {
        if self.layers.is_empty() {
            Step::Empty
        } else if self.cursor + 1 < self.layers.len() {
            self.cursor += 1;
            Step::Moved(self.cursor)
        } else {
            Step::NeedsFetch
        }
    }

    /// Appends a fetched layer and shows it.
    ///
    /// Returns `None` when the schedule was rebuilt since `generation` was
    /// read; the layer is dropped in that case.
    pub fn append(&mut self, generation: u64, layer: MapLayer) -> Option<PageView> {
        if generation != self.generation || self.layers.is_empty() {
            return None;
        }
        self.layers.push(layer);
        self.cursor = self.layers.len() - 1;
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(header: &str) -> MapLayer {
        MapLayer {
            header: header.to_string(),
            markers: Vec::new(),
            unplotted: Vec::new(),
            fetched_at: None,
        }
    }

    #[test]
    fn test_empty_view() {
        let mut view = ScheduleViewState::new();
        assert_eq!(view.forward(), Step::Empty);
        assert_eq!(view.back(), Step::Empty);
        assert!(view.current().is_none());
    }

    #[test]
    fn test_back_at_start_is_noop() {
        let mut view = ScheduleViewState::new();
        view.reset(layer("first"));

        assert_eq!(view.back(), Step::AtStart);
        assert_eq!(view.cursor(), 0);
        assert_eq!(view.current().unwrap().layer.header, "first");
    }

    #[test]
    fn test_forward_walks_cache_before_fetching() {
        let mut view = ScheduleViewState::new();
        view.reset(layer("one"));
        assert_eq!(view.forward(), Step::NeedsFetch);

        let generation = view.generation();
        let shown = view.append(generation, layer("two")).unwrap();
        assert_eq!((shown.index, shown.total), (1, 2));

        assert_eq!(view.back(), Step::Moved(0));
        assert_eq!(view.forward(), Step::Moved(1));
        assert_eq!(view.forward(), Step::NeedsFetch);
        assert_eq!(view.cursor(), 1);
    }

    #[test]
    fn test_stale_append_is_dropped() {
        let mut view = ScheduleViewState::new();
        view.reset(layer("old"));
        let stale = view.generation();

        view.reset(layer("new"));
        assert!(view.append(stale, layer("late")).is_none());
        assert_eq!(view.len(), 1);
        assert_eq!(view.current().unwrap().layer.header, "new");
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let mut view = ScheduleViewState::new();
        let shown = view.reset(layer("CSE351 A"));

        let json = serde_json::to_value(PageOutcome::AtStart(shown)).unwrap();
        assert_eq!(json["status"], "at_start");
        assert_eq!(json["index"], 0);
        assert_eq!(json["layer"]["header"], "CSE351 A");

        let json = serde_json::to_value(PageOutcome::NoCombinations).unwrap();
        assert_eq!(json["status"], "no_combinations");
    }
}
