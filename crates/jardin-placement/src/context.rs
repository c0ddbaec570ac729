use jardin_scene::ModelHandle;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CatalogCategory {
    #[default]
    Vegetation,
    Surfaces,
    Decoration,
}

#[derive(Clone, Debug)]
struct CatalogSelection {
    model: ModelHandle,
    selected_at: f64,
}

/// Catalog panel state and the model picked from it.
#[derive(Clone, Debug, Default)]
pub struct CatalogState {
    panel_open: bool,
    category: CatalogCategory,
    selection: Option<CatalogSelection>,
}

impl CatalogState {
    pub fn open_panel(&mut self) {
        self.panel_open = true;
        self.category = CatalogCategory::Vegetation;
        info!(category = ?self.category, "catalog opened");
    }

    pub fn close_panel(&mut self) {
        if self.panel_open {
            info!("catalog closed");
        }
        self.panel_open = false;
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn show_category(&mut self, category: CatalogCategory) {
        self.category = category;
    }

    pub fn category(&self) -> CatalogCategory {
        self.category
    }

    /// Records the model as ready to place and closes the panel.
    pub fn select_model(&mut self, model: ModelHandle, now: f64) {
        info!(item = %model.item_name, "model selected");
        self.selection = Some(CatalogSelection {
            model,
            selected_at: now,
        });
        self.close_panel();
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn current_selected_model(&self) -> Option<&ModelHandle> {
        self.selection.as_ref().map(|selection| &selection.model)
    }

    pub fn time_since_selection(&self, now: f64) -> Option<f64> {
        self.selection
            .as_ref()
            .map(|selection| now - selection.selected_at)
    }
}

/// Application-wide UI state the placement core reads every frame.
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub catalog: CatalogState,
    save_panel_open: bool,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_save_panel(&mut self) {
        self.catalog.close_panel();
        self.save_panel_open = true;
    }

    pub fn close_save_panel(&mut self) {
        self.save_panel_open = false;
    }

    pub fn is_save_panel_open(&self) -> bool {
        self.save_panel_open
    }

    /// Accepts a design name and closes the save panel. A blank name keeps
    /// the panel open.
    pub fn confirm_save(&mut self, name: &str) -> Option<String> {
        if name.trim().is_empty() {
            warn!("design name must not be empty");
            return None;
        }
        self.close_save_panel();
        Some(name.to_string())
    }

    /// While true every touch belongs to the UI.
    pub fn is_selection_ui_open(&self) -> bool {
        self.catalog.is_panel_open() || self.save_panel_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jardin_base::EntityId;

    #[test]
    fn selecting_a_model_closes_the_catalog() {
        let mut context = AppContext::new();
        context.catalog.open_panel();
        context.catalog.show_category(CatalogCategory::Decoration);
        assert!(context.is_selection_ui_open());

        context
            .catalog
            .select_model(ModelHandle::new("Farol", EntityId::new()), 4.0);
        assert!(!context.is_selection_ui_open());
        assert_eq!(
            context.catalog.current_selected_model().map(|m| m.item_name.as_str()),
            Some("Farol")
        );
        assert_eq!(context.catalog.time_since_selection(4.25), Some(0.25));
    }

    #[test]
    fn reopening_shows_vegetation_first() {
        let mut catalog = CatalogState::default();
        catalog.open_panel();
        catalog.show_category(CatalogCategory::Surfaces);
        catalog.close_panel();
        catalog.open_panel();
        assert_eq!(catalog.category(), CatalogCategory::Vegetation);
    }

    #[test]
    fn save_panel_replaces_catalog() {
        let mut context = AppContext::new();
        context.catalog.open_panel();
        context.open_save_panel();
        assert!(!context.catalog.is_panel_open());
        assert!(context.is_save_panel_open());
        assert!(context.is_selection_ui_open());
    }

    #[test]
    fn blank_design_name_keeps_panel_open() {
        let mut context = AppContext::new();
        context.open_save_panel();
        assert_eq!(context.confirm_save("   "), None);
        assert!(context.is_save_panel_open());

        assert_eq!(context.confirm_save("Patio"), Some("Patio".to_string()));
        assert!(!context.is_selection_ui_open());
    }

    #[test]
    fn no_selection_means_no_age() {
        let catalog = CatalogState::default();
        assert!(catalog.current_selected_model().is_none());
        assert!(catalog.time_since_selection(10.0).is_none());
    }
}
