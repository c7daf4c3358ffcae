//! Animation states the character can be in and how fast each one plays.
//!
//! ┌─────────── Action Table ───────────┐
//! │  State    Name      Delay   Speed  │
//! ├────────────────────────────────────┤
//! │  Stand1   "stand1"  500ms   0.032  │
//! │  Walk1    "walk1"   200ms   0.080  │
//! └────────────────────────────────────┘
//! speed = 1 / (delay / 16), i.e. frames advanced per 16ms tick

use crate::error::SceneError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// one tick of a 60fps loop, in milliseconds (rounded the way the sheet
// timings were authored)
const TICK_MS: f64 = 16.0;
const FALLBACK_DELAY_MS: f64 = 200.0;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterState {
    #[default]
    #[serde(rename = "stand1")]
    Stand1,
    #[serde(rename = "walk1")]
    Walk1,
}

impl CharacterState {
    /// Name of the matching animation in the sprite sheet
    pub fn name(&self) -> &'static str {
        match self {
            CharacterState::Stand1 => "stand1",
            CharacterState::Walk1 => "walk1",
        }
    }
}

impl fmt::Display for CharacterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterState {
    type Err = SceneError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "stand1" => Ok(CharacterState::Stand1),
            "walk1" => Ok(CharacterState::Walk1),
            _ => Err(SceneError::InvalidState(name.to_string())),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub delay: f64,
}

impl Action {
    /// Frames advanced per tick
    pub fn animation_speed(&self) -> f64 {
        1.0 / (self.delay / TICK_MS)
    }
}

/// Read-only mapping from state to playback delay.
/// Deserializing merges the listed states over the default table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ActionTable {
    actions: HashMap<CharacterState, Action>,
}

impl ActionTable {
    pub fn new(actions: HashMap<CharacterState, Action>) -> Self {
        ActionTable { actions }
    }

    /// Looks up the action for `state`, falling back to a 200ms delay when
    /// the table does not list it
    pub fn action(&self, state: CharacterState) -> Action {
        self.actions.get(&state).copied().unwrap_or(Action {
            delay: FALLBACK_DELAY_MS,
        })
    }

    pub fn animation_speed(&self, state: CharacterState) -> f64 {
        self.action(state).animation_speed()
    }

    /// Default table with `overrides` replacing the states they name
    pub fn with_overrides(overrides: HashMap<CharacterState, Action>) -> Self {
        let mut table = ActionTable::default();
        table.actions.extend(overrides);
        table
    }
}

impl<'de> Deserialize<'de> for ActionTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        HashMap::deserialize(deserializer).map(ActionTable::with_overrides)
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        ActionTable::new(HashMap::from([
            (CharacterState::Stand1, Action { delay: 500.0 }),
            (CharacterState::Walk1, Action { delay: 200.0 }),
        ]))
    }
}
