// TABLE:
// ┌──────────────────────────────────────────────────────────────────────────┐
// │                      Directory Structure                                 │
// ├───────────────────┬──────────────────────────────────────────────────────┤
// │ sprite/           │                                                      │
// │ ├── mod.rs        │ Sprite sheet descriptor + AnimatedSprite playback    │
// │ ├── state.rs      │ CharacterState + Action Table (delays / speeds)      │
// │ └── character.rs  │ Character record and its stand/walk swap             │
// └───────────────────┴──────────────────────────────────────────────────────┘
pub mod character;
pub mod state;

use crate::engine::{Rect, Size};
use crate::error::SceneError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sprite sheet descriptor in the TexturePacker "JSON hash" layout
/// - frames     : frame name -> pixel rect inside the sheet image
/// - animations : animation name -> ordered frame names
/// - meta.image : sheet image, relative to the descriptor
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Sheet {
    pub frames: HashMap<String, Cell>,
    #[serde(default)]
    pub animations: HashMap<String, Vec<String>>,
    pub meta: SheetMeta,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Cell {
    pub frame: SheetRect,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct SheetRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SheetMeta {
    pub image: String,
}

impl From<SheetRect> for Rect {
    fn from(rect: SheetRect) -> Self {
        Rect::new_from_x_y(rect.x, rect.y, rect.w, rect.h)
    }
}

impl Sheet {
    /// Resolves every frame of the named animation
    /// - unknown animation or a dangling frame name -> InvalidState
    pub fn animation(&self, name: &str) -> Result<Vec<Rect>, SceneError> {
        let frame_names = self
            .animations
            .get(name)
            .filter(|frames| !frames.is_empty())
            .ok_or_else(|| SceneError::InvalidState(name.to_string()))?;

        frame_names
            .iter()
            .map(|frame_name| {
                self.frames
                    .get(frame_name)
                    .map(|cell| cell.frame.into())
                    .ok_or_else(|| SceneError::InvalidState(name.to_string()))
            })
            .collect()
    }

    /// Path of the sheet image, resolved against the descriptor path
    pub fn image_path(&self, sheet_path: &str) -> String {
        match sheet_path.rfind('/') {
            Some(index) => format!("{}/{}", &sheet_path[..index], self.meta.image),
            None => self.meta.image.clone(),
        }
    }
}

/// Frame playback over one named animation
/// - current_frame is fractional : speed < 1 holds a frame for several ticks
#[derive(Debug, Clone)]
pub struct AnimatedSprite {
    frames: Vec<Rect>,
    current_frame: f64,
    pub animation_speed: f64,
    pub looping: bool,
    playing: bool,
}

impl AnimatedSprite {
    pub fn new(frames: Vec<Rect>) -> Self {
        AnimatedSprite {
            frames,
            current_frame: 0.0,
            animation_speed: 1.0,
            looping: true,
            playing: false,
        }
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advance playback by `ticks` loop ticks
    pub fn update(&mut self, ticks: f64) {
        if !self.playing || self.frames.is_empty() {
            return;
        }
        let total = self.frames.len() as f64;
        self.current_frame += self.animation_speed * ticks;

        if self.looping {
            self.current_frame = self.current_frame.rem_euclid(total);
        } else if self.current_frame >= total - 1.0 {
            self.current_frame = total - 1.0;
            self.playing = false;
        }
    }

    pub fn frame_index(&self) -> usize {
        (self.current_frame.floor() as usize).min(self.frames.len().saturating_sub(1))
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Source rect of the frame currently on screen
    pub fn current_frame(&self) -> Option<&Rect> {
        self.frames.get(self.frame_index())
    }

    pub fn size(&self) -> Size {
        self.current_frame()
            .map(|rect| rect.size)
            .unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Three standing frames (40x60) and two walking frames (50x64)
    pub(crate) fn test_sheet() -> Sheet {
        let frame = |x: f64, w: f64, h: f64| Cell {
            frame: SheetRect { x, y: 0.0, w, h },
        };
        Sheet {
            frames: HashMap::from([
                ("stand_0.png".to_string(), frame(0.0, 40.0, 60.0)),
                ("stand_1.png".to_string(), frame(40.0, 40.0, 60.0)),
                ("stand_2.png".to_string(), frame(80.0, 40.0, 60.0)),
                ("walk_0.png".to_string(), frame(120.0, 50.0, 64.0)),
                ("walk_1.png".to_string(), frame(170.0, 50.0, 64.0)),
            ]),
            animations: HashMap::from([
                (
                    "stand1".to_string(),
                    vec![
                        "stand_0.png".to_string(),
                        "stand_1.png".to_string(),
                        "stand_2.png".to_string(),
                    ],
                ),
                (
                    "walk1".to_string(),
                    vec!["walk_0.png".to_string(), "walk_1.png".to_string()],
                ),
            ]),
            meta: SheetMeta {
                image: "testsprite.png".to_string(),
            },
        }
    }

    #[test]
    fn resolves_animation_frames_in_order() {
        let frames = test_sheet().animation("walk1").unwrap();
        assert_eq!(frames.len(), 2);
        assert_relative_eq!(frames[0].x(), 120.0);
        assert_relative_eq!(frames[1].x(), 170.0);
    }

    #[test]
    fn unknown_animation_is_invalid_state() {
        assert_eq!(
            test_sheet().animation("run1").unwrap_err(),
            SceneError::InvalidState("run1".into())
        );
    }

    #[test]
    fn dangling_frame_name_is_invalid_state() {
        let mut sheet = test_sheet();
        sheet
            .animations
            .insert("ghost".into(), vec!["missing.png".into()]);
        assert!(sheet.animation("ghost").is_err());
    }

    #[test]
    fn image_path_sits_next_to_descriptor() {
        let sheet = test_sheet();
        assert_eq!(
            sheet.image_path("/assets/character/testsprite.json"),
            "/assets/character/testsprite.png"
        );
        assert_eq!(sheet.image_path("testsprite.json"), "testsprite.png");
    }

    #[test]
    fn slow_speed_holds_frames_and_loops() {
        let mut sprite = AnimatedSprite::new(test_sheet().animation("walk1").unwrap());
        sprite.animation_speed = 0.25;
        sprite.play();

        sprite.update(3.0);
        assert_eq!(sprite.frame_index(), 0);
        sprite.update(1.0);
        assert_eq!(sprite.frame_index(), 1);
        sprite.update(4.0);
        assert_eq!(sprite.frame_index(), 0);
        assert!(sprite.is_playing());
    }

    #[test]
    fn non_looping_stops_on_last_frame() {
        let mut sprite = AnimatedSprite::new(test_sheet().animation("stand1").unwrap());
        sprite.looping = false;
        sprite.play();
        sprite.update(10.0);
        assert_eq!(sprite.frame_index(), 2);
        assert!(!sprite.is_playing());
    }

    #[test]
    fn sprite_does_not_advance_until_played() {
        let mut sprite = AnimatedSprite::new(test_sheet().animation("stand1").unwrap());
        sprite.update(5.0);
        assert_eq!(sprite.frame_index(), 0);
        assert_relative_eq!(sprite.size().width, 40.0);
    }
}
