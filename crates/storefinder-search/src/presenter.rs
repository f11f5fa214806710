//! Presenter contract for search results.
//!
//! A [`MarkerBoard`] owns the markers a rendering surface shows for the
//! current result list. Replacing the list removes every previous marker
//! first; dropping the board removes whatever is left.

use storefinder_core::{Coordinate, Store};

/// One map marker, keyed by [`Store::key`].
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub key: String,
    pub title: String,
    pub address: String,
    pub coordinate: Coordinate,
}

impl From<&Store> for Marker {
    fn from(store: &Store) -> Self {
        Self {
            key: store.key(),
            title: store.name.clone(),
            address: store.address.clone(),
            coordinate: store.coordinate(),
        }
    }
}

/// Rendering backend driven by a [`MarkerBoard`].
pub trait MarkerSurface {
    fn center_on(&mut self, center: Coordinate);
    fn add_marker(&mut self, marker: &Marker);
    fn remove_marker(&mut self, key: &str);
    fn highlight(&mut self, marker: &Marker);
}

pub struct MarkerBoard<S: MarkerSurface> {
    surface: S,
    markers: Vec<Marker>,
    selected: Option<String>,
}

impl<S: MarkerSurface> MarkerBoard<S> {
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            markers: Vec::new(),
            selected: None,
        }
    }

    /// Swap the displayed result list. The selection is cleared.
    pub fn replace_all(&mut self, center: Coordinate, stores: &[Store]) {
        self.clear();
        self.surface.center_on(center);
        self.markers = stores.iter().map(Marker::from).collect();
        for marker in &self.markers {
            self.surface.add_marker(marker);
        }
    }

    /// Highlight the marker for `key`. Returns `false` for an unknown key.
    pub fn select(&mut self, key: &str) -> bool {
        let Some(marker) = self.markers.iter().find(|m| m.key == key) else {
            return false;
        };
        self.surface.highlight(marker);
        self.selected = Some(key.to_string());
        true
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    fn clear(&mut self) {
        for marker in self.markers.drain(..) {
            self.surface.remove_marker(&marker.key);
        }
        self.selected = None;
    }
}

impl<S: MarkerSurface> Drop for MarkerBoard<S> {
    fn drop(&mut self) {
        self.clear();
    }
}
