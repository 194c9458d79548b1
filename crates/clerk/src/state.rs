//! Application state and shared resources.

use std::sync::Arc;

use crate::captcha::TileSet;
use crate::config::AppConfig;
use crate::form::RequiredRegion;
use crate::routes::page::render_form_page;
use crate::sessions::{SessionSettings, SessionStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Live form sessions (in memory only)
    pub sessions: SessionStore,

    /// Region a map pin must land in
    pub region: Arc<RequiredRegion>,

    /// Captcha tiles, drawn once at startup
    pub tiles: Arc<TileSet>,

    /// Rendered form page
    pub page: Arc<str>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let sessions = SessionStore::new(SessionSettings {
            timings: config.captcha.timings(),
            birth_color: config.session.birth_color.clone(),
            outbox_capacity: config.session.outbox_capacity,
        });
        let region = Arc::new(RequiredRegion::from(&config.region));
        let tiles = Arc::new(TileSet::render());
        let page = Arc::from(render_form_page(config));

        Self {
            sessions,
            region,
            tiles,
            page,
        }
    }
}
