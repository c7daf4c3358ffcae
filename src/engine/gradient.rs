//! Horizontal color ramp baked into a 1×N texture for the floor.

use crate::browser;
use anyhow::{anyhow, Result};
use wasm_bindgen::Clamped;
use web_sys::{HtmlCanvasElement, ImageData};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    fn lerp(&self, other: &Rgba, t: f64) -> Rgba {
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    fn to_bytes(self) -> [u8; 4] {
        [
            self.r.round().clamp(0.0, 255.0) as u8,
            self.g.round().clamp(0.0, 255.0) as u8,
            self.b.round().clamp(0.0, 255.0) as u8,
            (self.a * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }
}

/// Transparent white -> cyan -> red
pub const FLOOR_STOPS: [(f64, Rgba); 3] = [
    (0.0, Rgba::new(255.0, 255.0, 255.0, 0.0)),
    (0.5, Rgba::new(0.0, 255.0, 255.0, 1.0)),
    (1.0, Rgba::new(255.0, 0.0, 0.0, 1.0)),
];

/// Color stops sorted by offset in [0, 1]
#[derive(Debug, Clone)]
pub struct Gradient {
    stops: Vec<(f64, Rgba)>,
}

impl Gradient {
    pub fn new(stops: &[(f64, Rgba)]) -> Self {
        let mut stops = stops.to_vec();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Gradient { stops }
    }

    pub fn floor() -> Self {
        Gradient::new(&FLOOR_STOPS)
    }

    /// Color at offset `t`, clamped to the first and last stop
    pub fn sample(&self, t: f64) -> Rgba {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Rgba::new(0.0, 0.0, 0.0, 0.0),
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }
        self.stops
            .windows(2)
            .find(|pair| t >= pair[0].0 && t <= pair[1].0)
            .map(|pair| {
                let span = pair[1].0 - pair[0].0;
                if span <= 0.0 {
                    pair[1].1
                } else {
                    pair[0].1.lerp(&pair[1].1, (t - pair[0].0) / span)
                }
            })
            .unwrap_or(last.1)
    }

    /// RGBA bytes of a `quality`×1 strip, sampling each pixel at its center
    pub fn pixels(&self, quality: u32) -> Vec<u8> {
        (0..quality)
            .flat_map(|i| {
                let t = (f64::from(i) + 0.5) / f64::from(quality);
                self.sample(t).to_bytes()
            })
            .collect()
    }

    /// Bakes the ramp into an offscreen canvas usable as a texture
    pub fn texture(&self, quality: u32) -> Result<HtmlCanvasElement> {
        let quality = quality.max(1);
        let canvas = browser::new_canvas(quality, 1)?;
        let pixels = self.pixels(quality);
        let image_data =
            ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels.as_slice()), quality, 1)
                .map_err(|err| anyhow!("Could not create gradient ImageData : {:#?}", err))?;
        browser::context(&canvas)?
            .put_image_data(&image_data, 0.0, 0.0)
            .map_err(|err| anyhow!("Could not write gradient pixels : {:#?}", err))?;
        Ok(canvas)
    }
}
