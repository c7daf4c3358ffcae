pub mod gradient;
pub mod input;

use crate::browser;
use anyhow::{anyhow, Error, Result};
// ELI5: web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use input::ScrollInput;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref (unsafe) cast from Javascript type to Rust type
    // - because we control the closure creation and specify the expected type,
    // in principle this should be generally safe (unsafe) code
    JsCast,
    JsValue,
};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// ┌──────────────────────── Frame Flow ─────────────────────────┐
/// │  requestAnimationFrame                                      │
/// │    ├─► drain scroll channel -> ScrollInput                  │
/// │    ├─► update() once per FRAME_SIZE of elapsed time         │
/// │    └─► draw() once per animation frame                      │
/// └─────────────────────────────────────────────────────────────┘
#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    fn update(&mut self, input: &ScrollInput);
    fn draw(&mut self, renderer: &Renderer);
}

// length of a frame in milliseconds
pub const FRAME_SIZE: f64 = 1.0 / 60.0 * 1000.0;

pub struct GameLoop {
    last_frame: f64,
    accumulated_delta: f64,
    // newest offset not yet handed to an update
    pending_scroll: Option<f64>,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub fn new(now: f64) -> Self {
        GameLoop {
            last_frame: now,
            accumulated_delta: 0.0,
            pending_scroll: None,
        }
    }

    pub async fn start(game: impl Game + 'static, canvas: HtmlCanvasElement) -> Result<()> {
        let mut scroll_receiver = input::prepare_input()?;
        let mut game = game.initialize().await?;
        let mut game_loop = GameLoop::new(browser::now()?);
        let renderer = Renderer {
            context: browser::context(&canvas)?,
        };
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            let scroll = input::latest_scroll(&mut scroll_receiver);
            game_loop.advance(perf, scroll, |input| game.update(input));
            game.draw(&renderer);
            if let Some(closure) = f.borrow().as_ref() {
                let _ = browser::request_animation_frame(closure);
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }

    /// Runs one fixed-step `update` per FRAME_SIZE elapsed up to `perf`.
    /// The newest scroll offset is delivered to the first update that runs,
    /// which may be on a later frame when this one owes no update.
    pub fn advance(&mut self, perf: f64, scroll: Option<f64>, mut update: impl FnMut(&ScrollInput)) {
        if scroll.is_some() {
            self.pending_scroll = scroll;
        }
        self.accumulated_delta += perf - self.last_frame;
        while self.accumulated_delta > FRAME_SIZE {
            self.accumulated_delta -= FRAME_SIZE;
            let mut input = ScrollInput::new(self.pending_scroll.take());
            input.now = perf - self.accumulated_delta;
            update(&input);
        }
        self.last_frame = perf;
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }

    pub fn new_from_x_y(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect::new(Point { x, y }, Size { width, height })
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn right(&self) -> f64 {
        self.position.x + self.size.width
    }

    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.height
    }
}

/// Pannable, zoomable window onto a world larger than the screen
/// - screen : size of the canvas in pixels
/// - world  : size of the scene in world units
/// - left/top : world coordinate shown at the canvas origin
///
/// Panning is never clamped to the world; whoever moves the viewport decides
/// how far it may go.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    screen: Size,
    world: Size,
    scale: f64,
    left: f64,
    top: f64,
}

impl Viewport {
    pub fn new(screen: Size, world: Size) -> Self {
        Viewport {
            screen,
            world,
            scale: 1.0,
            left: 0.0,
            top: 0.0,
        }
    }

    pub fn screen_size(&self) -> Size {
        self.screen
    }

    pub fn world_size(&self) -> Size {
        self.world
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Width of the world currently on screen
    pub fn world_screen_width(&self) -> f64 {
        self.screen.width / self.scale
    }

    pub fn world_screen_height(&self) -> f64 {
        self.screen.height / self.scale
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.left + self.world_screen_width() / 2.0,
            y: self.top + self.world_screen_height() / 2.0,
        }
    }

    pub fn move_center(&mut self, x: f64, y: f64) {
        self.left = x - self.world_screen_width() / 2.0;
        self.top = y - self.world_screen_height() / 2.0;
    }

    /// Zoom around the current center
    pub fn set_zoom(&mut self, scale: f64) {
        let center = self.center();
        self.scale = scale;
        self.move_center(center.x, center.y);
    }

    /// World rect currently on screen
    pub fn visible_bounds(&self) -> Rect {
        Rect::new_from_x_y(
            self.left,
            self.top,
            self.world_screen_width(),
            self.world_screen_height(),
        )
    }
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    /// Resets the transform and fills the whole canvas
    pub fn fill_background(&self, color: &str, size: Size) {
        if let Err(err) = self.context.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0) {
            error!("Error resetting transform : {:#?}", err);
        }
        self.context.set_fill_style_str(color);
        self.context.fill_rect(0.0, 0.0, size.width, size.height);
    }

    /// World -> screen transform for everything drawn after this call
    pub fn apply_viewport(&self, viewport: &Viewport) {
        let bounds = viewport.visible_bounds();
        let scale = viewport.scale();
        if let Err(err) = self.context.set_transform(
            scale,
            0.0,
            0.0,
            scale,
            -bounds.x() * scale,
            -bounds.y() * scale,
        ) {
            error!("Error applying viewport transform : {:#?}", err);
        }
    }

    pub fn draw_image(&self, image: &HtmlImageElement, frame: &Rect, destination: &Rect) {
        if let Err(err) = self
            .context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                frame.x(),
                frame.y(),
                frame.size.width,
                frame.size.height,
                destination.x(),
                destination.y(),
                destination.size.width,
                destination.size.height,
            )
        {
            error!("Error drawing image : {:#?}", err);
        }
    }

    /// Draws a sprite frame mirrored horizontally around its own center
    /// when `scale_x` is negative
    pub fn draw_image_flipped(
        &self,
        image: &HtmlImageElement,
        frame: &Rect,
        destination: &Rect,
        scale_x: f64,
    ) {
        let half_width = destination.size.width / 2.0;
        self.context.save();
        let _ = self
            .context
            .translate(destination.x() + half_width, destination.y());
        let _ = self.context.scale(scale_x, 1.0);
        self.draw_image(
            image,
            frame,
            &Rect::new_from_x_y(
                -half_width,
                0.0,
                destination.size.width,
                destination.size.height,
            ),
        );
        self.context.restore();
    }

    pub fn draw_canvas(&self, canvas: &HtmlCanvasElement, destination: &Rect) {
        if let Err(err) = self
            .context
            .draw_image_with_html_canvas_element_and_dw_and_dh(
                canvas,
                destination.x(),
                destination.y(),
                destination.size.width,
                destination.size.height,
            )
        {
            error!("Error drawing canvas : {:#?}", err);
        }
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::new_image()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "[engine.rs::load_image] Error loading image: {:#?}",
                err
            )));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // ?? - double unwrap because Result<Result<(), Error>, oneshot::Canceled>
    // - first unwrap yields channel result : Result<(), Error>
    // - second unwrap yields image load result : () or propagating Error
    rx.await??;

    Ok(image)
}
