use crate::engine::{Point, Rect, Size};
use crate::error::SceneError;
use crate::scroll::{Direction, Property, Tweenable};
use crate::sprite::state::{ActionTable, CharacterState};
use crate::sprite::{AnimatedSprite, Sheet};

/// ELI5:
/// ┌──────────── State Transition Flow ─────────────┐
/// │  From State  →  Event        →  To State       │
/// ├────────────────────────────────────────────────┤
/// │  Stand1      →  ScrollStart  →  Walk1          │
/// │  Walk1       →  ScrollEnd    →  Stand1         │
/// └────────────────────────────────────────────────┘
/// The swap is destructive : the old AnimatedSprite is dropped and the new
/// one starts from its first frame.
#[derive(Debug, Clone)]
pub struct Character {
    state: CharacterState,
    position: Point,
    // facing follows scroll direction; drawn mirrored as scale_x = -flip
    flip: Direction,
    animation: AnimatedSprite,
}

impl Character {
    pub fn new(sheet: &Sheet, actions: &ActionTable) -> Result<Self, SceneError> {
        let state = CharacterState::default();
        Ok(Character {
            state,
            position: Point::default(),
            flip: Direction::Forward,
            animation: Self::animation_for(sheet, actions, state)?,
        })
    }

    /// Swaps the visible animation for `state`
    /// - state missing from the sheet -> InvalidState, character unchanged
    pub fn set_state(
        &mut self,
        sheet: &Sheet,
        actions: &ActionTable,
        state: CharacterState,
    ) -> Result<(), SceneError> {
        let animation = Self::animation_for(sheet, actions, state)?;
        self.state = state;
        self.animation = animation;
        Ok(())
    }

    /// Same as set_state, addressed by animation name
    pub fn set_state_named(
        &mut self,
        sheet: &Sheet,
        actions: &ActionTable,
        name: &str,
    ) -> Result<(), SceneError> {
        self.set_state(sheet, actions, name.parse()?)
    }

    fn animation_for(
        sheet: &Sheet,
        actions: &ActionTable,
        state: CharacterState,
    ) -> Result<AnimatedSprite, SceneError> {
        let mut animation = AnimatedSprite::new(sheet.animation(state.name())?);
        animation.looping = true;
        animation.animation_speed = actions.animation_speed(state);
        animation.play();
        Ok(animation)
    }

    pub fn update(&mut self) {
        self.animation.update(1.0);
    }

    pub fn state(&self) -> CharacterState {
        self.state
    }

    pub fn animation(&self) -> &AnimatedSprite {
        &self.animation
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn flip(&self) -> Direction {
        self.flip
    }

    pub fn face(&mut self, direction: Direction) {
        self.flip = direction;
    }

    pub fn scale_x(&self) -> f64 {
        -self.flip.sign()
    }

    /// Size on screen, always positive whatever the flip
    pub fn size(&self) -> Size {
        self.animation.size()
    }

    /// Source frame and world destination for the current animation frame
    pub fn draw_rects(&self) -> Option<(Rect, Rect)> {
        self.animation
            .current_frame()
            .map(|frame| (*frame, Rect::new(self.position, frame.size)))
    }
}

impl Tweenable for Character {
    fn property(&self, property: Property) -> f64 {
        match property {
            Property::X => self.position.x,
            Property::Y => self.position.y,
        }
    }

    fn set_property(&mut self, property: Property, value: f64) {
        match property {
            Property::X => self.position.x = value,
            Property::Y => self.position.y = value,
        }
    }
}
