use crate::browser;
use anyhow::{anyhow, Result};
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use wasm_bindgen::JsCast;

/// What the game sees of the page scroll during one update tick
/// - position : vertical scroll offset, Some only when the page scrolled
///   since the previous frame
/// - now      : timestamp of the tick (performance.now() milliseconds)
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ScrollInput {
    pub position: Option<f64>,
    pub now: f64,
}

impl ScrollInput {
    pub fn new(position: Option<f64>) -> Self {
        ScrollInput { position, now: 0.0 }
    }
}

/// Registers a window scroll listener that forwards every scroll offset
/// into a channel the game loop drains once per frame
pub fn prepare_input() -> Result<UnboundedReceiver<f64>> {
    let (scroll_sender, scroll_receiver) = unbounded();
    let window = browser::window()?;

    let onscroll = browser::closure_wrap(Box::new(move |_event: web_sys::Event| {
        match browser::scroll_y() {
            Ok(offset) => {
                let _ = scroll_sender.unbounded_send(offset);
            }
            Err(err) => error!("Could not read scroll offset : {:#?}", err),
        }
    }) as Box<dyn FnMut(web_sys::Event)>);

    window
        .add_event_listener_with_callback("scroll", onscroll.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Could not add scroll listener : {:#?}", err))?;

    // listener lives for the whole page
    onscroll.forget();

    Ok(scroll_receiver)
}

/// Drains everything queued since the last frame, keeping the newest offset
pub fn latest_scroll(receiver: &mut UnboundedReceiver<f64>) -> Option<f64> {
    let mut latest = None;
    while let Ok(Some(offset)) = receiver.try_next() {
        latest = Some(offset);
    }
    latest
}
