use crate::browser;
use crate::config::SceneConfig;
use crate::engine::gradient::Gradient;
use crate::engine::input::ScrollInput;
use crate::engine::{self, Game, Renderer};
use crate::error::SceneError;
use crate::scroll::PinPlacement;
use crate::sprite::Sheet;
use crate::world::World;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::rc::Rc;
use web_sys::{HtmlCanvasElement, HtmlElement, HtmlImageElement};

/// TABLE
/// ┌──────────────────── Scene Bootstrap ────────────────────────┐
/// │                                                             │
/// │  Uninitialized ──init()──► Loading ──initialize()──► Ready  │
/// │                              │                              │
/// │                              ├─► fetch sprite sheet JSON    │
/// │                              └─► load sheet image           │
/// │                                                             │
/// │  Ready persists for the page lifetime                       │
/// └─────────────────────────────────────────────────────────────┘
pub enum ScrollWalk {
    Uninitialized(SceneConfig),
    Loading(SceneConfig),
    Ready(Box<Walk>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SceneStatus {
    Uninitialized,
    Loading,
    Ready,
}

impl ScrollWalk {
    pub fn new(config: SceneConfig) -> Self {
        ScrollWalk::Uninitialized(config)
    }

    pub fn status(&self) -> SceneStatus {
        match self {
            ScrollWalk::Uninitialized(_) => SceneStatus::Uninitialized,
            ScrollWalk::Loading(_) => SceneStatus::Loading,
            ScrollWalk::Ready(_) => SceneStatus::Ready,
        }
    }

    /// Requests the assets; the load itself happens in `initialize`
    pub fn init(self) -> Result<Self> {
        match self {
            ScrollWalk::Uninitialized(config) => {
                log!("Loading sprite sheet from : {}", config.sprite_sheet);
                Ok(ScrollWalk::Loading(config))
            }
            _ => Err(anyhow!("Scene is already initialized")),
        }
    }

    async fn load_sprite_sheet(path: &str) -> Result<Sheet, SceneError> {
        browser::fetch_json::<Sheet>(path)
            .await
            .map_err(|err| SceneError::asset_load(path, format!("{:#}", err)))
    }

    async fn load_sprite_image(path: &str) -> Result<HtmlImageElement, SceneError> {
        engine::load_image(path)
            .await
            .map_err(|err| SceneError::asset_load(path, format!("{:#}", err)))
    }
}

#[async_trait(?Send)]
impl Game for ScrollWalk {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            ScrollWalk::Loading(config) => {
                // the image path lives inside the sheet, so these two are
                // sequential
                let sheet = Self::load_sprite_sheet(&config.sprite_sheet).await?;
                let image_path = sheet.image_path(&config.sprite_sheet);
                let image = Self::load_sprite_image(&image_path).await?;

                let floor_texture = Gradient::floor()
                    .texture(config.gradient_quality())
                    .context("Failed to build floor texture")?;
                let trigger = browser::element(&config.trigger)
                    .with_context(|| format!("Scroll trigger '{}' not found", config.trigger))?;

                let mut world = World::new(config.clone(), Rc::new(sheet))?;
                let mut pin = Pin::new(trigger, world.pin_spacing())?;

                // a reload can restore the page mid-range
                let scroll = browser::scroll_y()?;
                pin.place(world.pin_placement(scroll))?;
                world.sync_scroll(scroll);
                log!("Scene ready");
                Ok(Box::new(ScrollWalk::Ready(Box::new(Walk {
                    world,
                    image,
                    floor_texture,
                    pin,
                }))))
            }
            ScrollWalk::Uninitialized(_) => Err(anyhow!("Scene assets were never requested")),
            ScrollWalk::Ready(_) => Err(anyhow!("Scene is already initialized")),
        }
    }

    fn update(&mut self, input: &ScrollInput) {
        if let ScrollWalk::Ready(walk) = self {
            if let Some(scroll) = input.position {
                if let Err(err) = walk.pin.place(walk.world.pin_placement(scroll)) {
                    error!("{:#}", err);
                }
                if let Err(err) = walk.world.on_scroll(scroll, input.now) {
                    error!("{}", err);
                }
            }
            if let Err(err) = walk.world.tick(input.now) {
                error!("{}", err);
            }
        }
    }

    fn draw(&mut self, renderer: &Renderer) {
        if let ScrollWalk::Ready(walk) = self {
            walk.draw(renderer);
        }
    }
}

pub struct Walk {
    world: World,
    image: HtmlImageElement,
    floor_texture: HtmlCanvasElement,
    pin: Pin,
}

impl Walk {
    fn draw(&self, renderer: &Renderer) {
        let config = self.world.config();
        renderer.fill_background(&config.background, config.view);
        renderer.apply_viewport(self.world.camera().viewport());

        // Draw order matters : floor -> character
        renderer.draw_canvas(&self.floor_texture, self.world.floor());

        let character = self.world.character();
        if let Some((frame, destination)) = character.draw_rects() {
            renderer.draw_image_flipped(&self.image, &frame, &destination, character.scale_x());
        }
    }
}

/// Keeps the trigger element on screen while its scroll range is active
/// - pin spacing : bottom margin so the document is tall enough to scroll
///   through the whole range
/// - pinned      : translated down by exactly the distance scrolled
struct Pin {
    element: HtmlElement,
    placement: Option<PinPlacement>,
}

impl Pin {
    fn new(element: HtmlElement, spacing: f64) -> Result<Self> {
        browser::set_style(&element, "margin-bottom", &format!("{}px", spacing))?;
        let mut pin = Pin {
            element,
            placement: None,
        };
        pin.place(PinPlacement::Before)?;
        Ok(pin)
    }

    fn place(&mut self, placement: PinPlacement) -> Result<()> {
        if self.placement == Some(placement) {
            return Ok(());
        }
        browser::set_style(
            &self.element,
            "transform",
            &format!("translateY({}px)", placement.offset()),
        )?;
        self.placement = Some(placement);
        Ok(())
    }
}
