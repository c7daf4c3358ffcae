use crate::camera::WorldCamera;
use crate::config::SceneConfig;
use crate::engine::{Point, Rect, Viewport};
use crate::error::SceneError;
use crate::scroll::{
    PinPlacement, Property, ScrollActivity, ScrollBinding, ScrollEvent, ScrollTrigger,
    ScrollUpdate,
};
use crate::sprite::character::Character;
use crate::sprite::state::CharacterState;
use crate::sprite::Sheet;
use std::rc::Rc;

/// Scene state once assets are in : everything the scroll position drives,
/// free of any DOM handle so it runs the same natively and in the browser.
///
/// TABLE
/// ┌────────────────── Scroll -> World ─────────────────────────────────┐
/// │  first scroll after idle  ─► ScrollStart ─► character = walk1      │
/// │  every scroll             ─► progress p                            │
/// │                              ├─► camera.x    = 0 → world - view    │
/// │                              └─► character.x = 0 → world - 2·width │
/// │                                  + face scroll direction           │
/// │  quiet for end delay      ─► ScrollEnd   ─► character = stand1     │
/// └────────────────────────────────────────────────────────────────────┘
pub struct World {
    config: SceneConfig,
    sheet: Rc<Sheet>,
    camera: WorldCamera,
    floor: Rect,
    character: Character,
    trigger: ScrollTrigger,
    activity: ScrollActivity,
    camera_binding: ScrollBinding<WorldCamera>,
    character_binding: ScrollBinding<Character>,
}

impl World {
    pub fn new(config: SceneConfig, sheet: Rc<Sheet>) -> Result<Self, SceneError> {
        // fail at load time, not on the first scroll
        for state in [CharacterState::Stand1, CharacterState::Walk1] {
            sheet.animation(state.name())?;
        }
        let range = config.scroll_range()?;

        let camera = WorldCamera::new(Viewport::new(config.view, config.world));

        let floor = Rect::new_from_x_y(
            0.0,
            config.view.height - config.floor_height,
            config.world.width,
            config.floor_height,
        );

        let mut character = Character::new(&sheet, &config.actions)?;
        stand_on(&mut character, &floor);

        let pan = camera.viewport().world_size().width - camera.viewport().screen_size().width;
        let camera_binding = ScrollBinding::bind(
            &camera,
            range,
            &[(Property::X, pan)],
            config.ease,
            None,
        );
        let character_binding = ScrollBinding::bind(
            &character,
            range,
            &[(
                Property::X,
                config.world.width - character.size().width.abs() * 2.0,
            )],
            config.ease,
            Some(Box::new(|character: &mut Character, update: &ScrollUpdate| {
                character.face(update.direction);
            })),
        );

        Ok(World {
            activity: ScrollActivity::new(config.scroll_end_delay),
            trigger: ScrollTrigger::new(range),
            config,
            sheet,
            camera,
            floor,
            character,
            camera_binding,
            character_binding,
        })
    }

    /// A scroll offset arrived from the page at time `now`
    pub fn on_scroll(&mut self, scroll: f64, now: f64) -> Result<(), SceneError> {
        if let Some(event) = self.activity.on_scroll(now) {
            self.on_scroll_event(event)?;
        }
        self.sync_scroll(scroll);
        Ok(())
    }

    /// Moves everything the scroll offset drives without counting it as
    /// scroll activity. Used for the offset the page already has at load.
    pub fn sync_scroll(&mut self, scroll: f64) {
        if let Some(update) = self.trigger.scroll_to(scroll) {
            // both bindings share one trigger so they move in lockstep
            self.camera_binding.apply(&mut self.camera, &update);
            self.character_binding.apply(&mut self.character, &update);
        }
    }

    pub fn on_scroll_event(&mut self, event: ScrollEvent) -> Result<(), SceneError> {
        let state = match event {
            ScrollEvent::ScrollStart => CharacterState::Walk1,
            ScrollEvent::ScrollEnd => CharacterState::Stand1,
        };
        log!("{:?} -> {}", event, state);
        self.character
            .set_state(&self.sheet, &self.config.actions, state)?;
        // frames of different heights must still stand on the floor
        stand_on(&mut self.character, &self.floor);
        Ok(())
    }

    /// One fixed loop tick
    pub fn tick(&mut self, now: f64) -> Result<(), SceneError> {
        if let Some(event) = self.activity.tick(now) {
            self.on_scroll_event(event)?;
        }
        self.character.update();
        Ok(())
    }

    pub fn pin_placement(&self, scroll: f64) -> PinPlacement {
        self.trigger.pin_placement(scroll)
    }

    pub fn pin_spacing(&self) -> f64 {
        self.trigger.pin_spacing()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn camera(&self) -> &WorldCamera {
        &self.camera
    }

    pub fn floor(&self) -> &Rect {
        &self.floor
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn is_scrolling(&self) -> bool {
        self.activity.is_scrolling()
    }
}

fn stand_on(character: &mut Character, floor: &Rect) {
    let x = character.position().x;
    character.set_position(Point {
        x,
        y: floor.y() - character.size().height,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::{Direction, Ease};
    use crate::sprite::tests::test_sheet;
    use approx::assert_relative_eq;

    fn world(config: SceneConfig) -> World {
        World::new(config, Rc::new(test_sheet())).unwrap()
    }

    #[test]
    fn bootstrap_places_everything() {
        let world = world(SceneConfig::default());
        assert_eq!(world.character().state(), CharacterState::Stand1);
        assert_eq!(world.camera().position(), Point { x: 0.0, y: 0.0 });
        assert_eq!(*world.floor(), Rect::new_from_x_y(0.0, 550.0, 2000.0, 50.0));
        // flush on the floor
        assert_relative_eq!(
            world.character().position().y + world.character().size().height,
            world.floor().y()
        );
        assert_relative_eq!(world.character().position().x, 0.0);
        assert_relative_eq!(world.character().scale_x(), -1.0);
    }

    #[test]
    fn scroll_walk_scenario() {
        let mut world = world(SceneConfig::default());
        let stand_width = world.character().size().width;

        world.on_scroll(10.0, 0.0).unwrap();
        assert_eq!(world.character().state(), CharacterState::Walk1);

        for (i, scroll) in (1..=20).map(|step| step as f64 * 100.0).enumerate() {
            world.on_scroll(scroll, 16.0 * (i + 1) as f64).unwrap();
            world.tick(16.0 * (i + 1) as f64).unwrap();
        }
        assert_eq!(world.character().state(), CharacterState::Walk1);
        assert_relative_eq!(world.camera().x(), 1200.0);
        assert_relative_eq!(world.camera().y(), 0.0);
        assert_relative_eq!(world.character().position().x, 2000.0 - 2.0 * stand_width);

        world.tick(1000.0).unwrap();
        assert_eq!(world.character().state(), CharacterState::Stand1);
        assert!(!world.is_scrolling());
    }

    #[test]
    fn camera_x_is_monotonic_over_progress() {
        for ease in [Ease::Linear, Ease::Power1Out] {
            let mut world = world(SceneConfig {
                ease,
                ..SceneConfig::default()
            });
            let mut last = world.camera().x();
            assert_relative_eq!(last, 0.0);
            for step in 1..=200 {
                world.on_scroll(step as f64 * 10.0, 0.0).unwrap();
                assert!(world.camera().x() >= last);
                last = world.camera().x();
            }
            assert_relative_eq!(last, 1200.0);
        }
    }

    #[test]
    fn character_faces_scroll_direction() {
        let mut world = world(SceneConfig::default());
        world.on_scroll(600.0, 0.0).unwrap();
        assert_eq!(world.character().flip(), Direction::Forward);
        assert_relative_eq!(world.character().scale_x(), -1.0);

        world.on_scroll(300.0, 10.0).unwrap();
        assert_eq!(world.character().flip(), Direction::Backward);
        assert_relative_eq!(world.character().scale_x(), 1.0);
    }

    #[test]
    fn scrolling_back_reverses_exactly() {
        let mut world = world(SceneConfig::default());
        world.on_scroll(700.0, 0.0).unwrap();
        let camera_at_700 = world.camera().x();
        let character_at_700 = world.character().position().x;

        world.on_scroll(1900.0, 10.0).unwrap();
        world.on_scroll(700.0, 20.0).unwrap();
        assert_relative_eq!(world.camera().x(), camera_at_700);
        assert_relative_eq!(world.character().position().x, character_at_700);
    }

    #[test]
    fn missing_walk_animation_fails_bootstrap() {
        let mut sheet = test_sheet();
        sheet.animations.remove("walk1");
        let result = World::new(SceneConfig::default(), Rc::new(sheet));
        assert!(matches!(result, Err(SceneError::InvalidState(name)) if name == "walk1"));
    }

    #[test]
    fn inverted_range_fails_bootstrap() {
        let config = SceneConfig {
            scroll_end: "+=0".to_string(),
            ..SceneConfig::default()
        };
        assert!(matches!(
            World::new(config, Rc::new(test_sheet())),
            Err(SceneError::BindingRange { .. })
        ));
    }

    #[test]
    fn character_stays_on_floor_across_state_swaps() {
        let mut world = world(SceneConfig::default());
        world.on_scroll(500.0, 0.0).unwrap();
        assert_eq!(world.character().state(), CharacterState::Walk1);
        assert_relative_eq!(world.character().size().height, 64.0);
        let walking = world.character().position();
        assert_relative_eq!(walking.y + 64.0, world.floor().y());

        world.tick(1000.0).unwrap();
        assert_eq!(world.character().state(), CharacterState::Stand1);
        assert_relative_eq!(
            world.character().position().y + world.character().size().height,
            world.floor().y()
        );
        assert_relative_eq!(world.character().position().x, walking.x);
    }

    #[test]
    fn sync_scroll_moves_scene_without_walking() {
        let mut world = world(SceneConfig {
            ease: Ease::Linear,
            ..SceneConfig::default()
        });
        world.sync_scroll(1000.0);
        assert_relative_eq!(world.camera().x(), 600.0);
        assert!(world.character().position().x > 0.0);
        assert_eq!(world.character().state(), CharacterState::Stand1);
        assert!(!world.is_scrolling());

        // the next real scroll still starts the walk
        world.on_scroll(1100.0, 0.0).unwrap();
        assert_eq!(world.character().state(), CharacterState::Walk1);
    }

    #[test]
    fn pin_follows_range() {
        let world = world(SceneConfig::default());
        assert_relative_eq!(world.pin_spacing(), 2000.0);
        assert_eq!(
            world.pin_placement(500.0),
            PinPlacement::Pinned { offset: 500.0 }
        );
        assert_eq!(
            world.pin_placement(2500.0),
            PinPlacement::After { offset: 2000.0 }
        );
    }
}
