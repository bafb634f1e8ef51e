// Dashboard page domain model
use serde::Serialize;

use super::chart::RenderedView;
use super::kpi::TileData;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub selected: String,
    pub tiles: Vec<TileData>,
    pub view: RenderedView,
}

impl Dashboard {
    pub fn new(title: String, selected: String, tiles: Vec<TileData>, view: RenderedView) -> Self {
        Self {
            title,
            selected,
            tiles,
            view,
        }
    }
}
