use crate::engine::Size;
use crate::error::SceneError;
use crate::scroll::{Ease, ScrollEnd, ScrollRange};
use crate::sprite::state::ActionTable;
use serde::{Deserialize, Serialize};

/// Everything the scene is built from. Every field has a default, so a
/// partial JS object (or none at all) is a valid config.
///
/// TABLE:
/// ┌────────────────────┬─────────────────────────────────────┐
/// │ Field              │ Default                             │
/// ├────────────────────┼─────────────────────────────────────┤
/// │ view               │ 800 x 600                           │
/// │ world              │ 2000 x 2000                         │
/// │ background         │ "#ffffff"                           │
/// │ canvas             │ "#app"                              │
/// │ trigger            │ "#app" (pinned while scrubbing)     │
/// │ sprite_sheet       │ "/assets/character/testsprite.json" │
/// │ floor_height       │ 50                                  │
/// │ gradient_quality   │ world width                         │
/// │ scroll_start       │ 0                                   │
/// │ scroll_end         │ "+=2000"                            │
/// │ scroll_end_delay   │ 150 ms                              │
/// │ ease               │ power1_out                          │
/// │ actions            │ stand1 500ms, walk1 200ms           │
/// └────────────────────┴─────────────────────────────────────┘
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub view: Size,
    pub world: Size,
    pub background: String,
    pub canvas: String,
    pub trigger: String,
    pub sprite_sheet: String,
    pub floor_height: f64,
    pub gradient_quality: Option<u32>,
    pub scroll_start: f64,
    pub scroll_end: String,
    pub scroll_end_delay: f64,
    pub ease: Ease,
    pub actions: ActionTable,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            view: Size {
                width: 800.0,
                height: 600.0,
            },
            world: Size {
                width: 2000.0,
                height: 2000.0,
            },
            background: "#ffffff".to_string(),
            canvas: "#app".to_string(),
            trigger: "#app".to_string(),
            sprite_sheet: "/assets/character/testsprite.json".to_string(),
            floor_height: 50.0,
            gradient_quality: None,
            scroll_start: 0.0,
            scroll_end: "+=2000".to_string(),
            scroll_end_delay: 150.0,
            ease: Ease::default(),
            actions: ActionTable::default(),
        }
    }
}

impl SceneConfig {
    pub fn scroll_range(&self) -> Result<ScrollRange, SceneError> {
        // an end that is not a number is reported against the real start
        let end: ScrollEnd = self
            .scroll_end
            .parse()
            .map_err(|_| SceneError::BindingRange {
                start: self.scroll_start,
                end: f64::NAN,
            })?;
        ScrollRange::new(self.scroll_start, end)
    }

    /// Pixels in the floor texture; one per world unit unless overridden
    pub fn gradient_quality(&self) -> u32 {
        self.gradient_quality
            .unwrap_or(self.world.width.max(1.0) as u32)
    }
}
