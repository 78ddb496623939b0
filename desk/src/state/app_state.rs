// Application state for the desk front-end: the client context plus the
// saved view of every list page.
//
// A view (column visibility + filters, sort and page) is stored in the
// preferences file under `view.<resource>` and reconciled against the
// configured columns on load, so presets can change without breaking
// saved views.

use crate::config::AppConfig;
use client::error::ClientError;
use client::prefs::Preferences;
use client::AppContext;
use serde::{Deserialize, Serialize};
use shared::catalog::Resource;
use shared::models::ColumnDescriptor;
use shared::table::TableQuery;

pub const VIEW_KEY_PREFIX: &str = "view.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub query: TableQuery,
}

impl ViewState {
    pub fn new(columns: Vec<ColumnDescriptor>, per_page: usize) -> Self {
        let mut query = TableQuery::default();
        query.pagination.per_page = per_page;
        Self { columns, query }
    }

    // Keeps the configured column order and labels; only visibility is
    // taken from the saved view.
    fn reconcile(mut self, configured: &[ColumnDescriptor]) -> Self {
        self.columns = configured
            .iter()
            .map(|c| {
                let visible = self
                    .columns
                    .iter()
                    .find(|saved| saved.name == c.name)
                    .map_or(c.visible, |saved| saved.visible);
                ColumnDescriptor {
                    visible,
                    ..c.clone()
                }
            })
            .collect();
        self
    }
}

pub fn view_key(resource: Resource) -> String {
    format!("{}{}", VIEW_KEY_PREFIX, resource.path())
}

pub struct AppState {
    pub config: AppConfig,
    pub ctx: AppContext,
}

impl AppState {
    pub fn new(config: AppConfig, ctx: AppContext) -> Self {
        Self { config, ctx }
    }

    /// Opens the preferences file named in the config and builds the
    /// context. The configured language applies until the user picks one.
    pub fn init(config: AppConfig, prefs: Preferences) -> Result<Self, ClientError> {
        let mut ctx = AppContext::init(&config.api, prefs)?;
        if ctx.prefs().get(client::prefs::LANGUAGE_KEY).is_none()
            && ctx.translator().language() != config.app.language
        {
            if let Err(e) = ctx.use_language(&config.app.language) {
                tracing::warn!(language = %config.app.language, error = %e, "Configured language unavailable");
            }
        }
        Ok(Self::new(config, ctx))
    }

    pub fn view(&self, resource: Resource) -> ViewState {
        let configured = self.config.columns_for(resource);
        let fresh = || ViewState::new(configured.clone(), self.config.table.per_page);
        match self.ctx.prefs().get(&view_key(resource)) {
            None => fresh(),
            Some(text) => match serde_json::from_str::<ViewState>(text) {
                Ok(saved) => saved.reconcile(&configured),
                Err(e) => {
                    tracing::warn!(resource = %resource, error = %e, "Saved view unreadable; using defaults");
                    fresh()
                }
            },
        }
    }

    pub fn save_view(&mut self, resource: Resource, view: &ViewState) -> Result<(), ClientError> {
        let text = serde_json::to_string(view)?;
        self.ctx.prefs_mut().set(&view_key(resource), text)?;
        tracing::debug!(resource = %resource, "View saved");
        Ok(())
    }

    /// Forgets the saved view. Returns whether one existed.
    pub fn reset_view(&mut self, resource: Resource) -> Result<bool, ClientError> {
        Ok(self.ctx.prefs_mut().remove(&view_key(resource))?.is_some())
    }

    pub fn saved_views(&self) -> Vec<Resource> {
        self.ctx
            .prefs()
            .keys_with_prefix(VIEW_KEY_PREFIX)
            .filter_map(|k| k[VIEW_KEY_PREFIX.len()..].parse().ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::prefs::LANGUAGE_KEY;
    use shared::models::SortDirection;

    fn state() -> AppState {
        let config = AppConfig::load_default().unwrap();
        AppState::init(config, Preferences::in_memory()).unwrap()
    }

    #[test]
    fn test_fresh_view_uses_configured_columns() {
        let state = state();
        let view = state.view(Resource::Branches);
        assert_eq!(view.columns, Resource::Branches.default_columns());
        assert_eq!(view.query.pagination.per_page, 10);
        assert!(view.query.filters.is_empty());
    }

    #[test]
    fn test_saved_view_round_trips_through_prefs() {
        let mut state = state();
        let mut view = state.view(Resource::Vendors);
        view.query.set_filter("category", "Electrical");
        view.query.sort.set("name", SortDirection::Desc);
        view.columns[1].visible = false;
        state.save_view(Resource::Vendors, &view).unwrap();

        assert_eq!(state.view(Resource::Vendors), view);
        assert_eq!(state.saved_views(), vec![Resource::Vendors]);

        assert!(state.reset_view(Resource::Vendors).unwrap());
        assert!(!state.reset_view(Resource::Vendors).unwrap());
        assert!(state.view(Resource::Vendors).columns[1].visible);
    }

    #[test]
    fn test_reconcile_keeps_only_configured_columns() {
        let mut state = state();
        state
            .ctx
            .prefs_mut()
            .set(
                &view_key(Resource::Roles),
                r#"{"columns":[{"label":"x","name":"gone","visible":true},{"label":"x","name":"description","visible":false}]}"#,
            )
            .unwrap();

        let view = state.view(Resource::Roles);
        let names: Vec<&str> = view.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "description"]);
        assert!(!view.columns[2].visible);
        assert_eq!(view.columns[2].label, "columns.description");
    }

    #[test]
    fn test_configured_language_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut config = AppConfig::load_default().unwrap();
        config.app.language = "es".to_string();
        let mut state = AppState::init(config, Preferences::load(&path).unwrap()).unwrap();
        assert_eq!(state.ctx.translator().language(), "es");
        assert_eq!(state.ctx.prefs().get(LANGUAGE_KEY), None);
        assert!(state.ctx.notices().entries().is_empty());
        let view = state.view(Resource::Roles);
        state.save_view(Resource::Roles, &view).unwrap();

        // A later config change still applies while the user has not chosen.
        let config = AppConfig::load_default().unwrap();
        let state = AppState::init(config, Preferences::load(&path).unwrap()).unwrap();
        assert_eq!(state.ctx.translator().language(), "en");
        assert_eq!(state.saved_views(), vec![Resource::Roles]);
    }

    #[test]
    fn test_stored_language_wins_over_config() {
        let mut prefs = Preferences::in_memory();
        prefs.set(LANGUAGE_KEY, "en").unwrap();
        let mut config = AppConfig::load_default().unwrap();
        config.app.language = "es".to_string();
        let state = AppState::init(config, prefs).unwrap();
        assert_eq!(state.ctx.translator().language(), "en");
    }

    #[test]
    fn test_corrupt_view_falls_back_to_defaults() {
        let mut state = state();
        state.ctx.prefs_mut().set(&view_key(Resource::Users), "not json").unwrap();
        assert_eq!(state.view(Resource::Users).columns, Resource::Users.default_columns());
    }
}
