//! Drawing surface abstraction.
//!
//! Entities draw through [`Surface`] so the gallery can render to the browser canvas
//! and to a recording surface under native tests. Images are optional handles: a
//! sprite that has not finished decoding is passed as `None` and every draw path has
//! a plain-shape fallback for it.

use std::f64::consts::TAU;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

pub trait Surface {
    type Image: ?Sized;

    /// Wipe the whole surface to transparent.
    fn clear(&mut self, width: f64, height: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    fn set_alpha(&mut self, alpha: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str);
    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str);
    fn draw_image(&mut self, image: &Self::Image, x: f64, y: f64, w: f64, h: f64);
}

/// Decoded sprites available this frame.
pub struct Sprites<'a, I: ?Sized> {
    pub target: Option<&'a I>,
    pub crosshair: Option<&'a I>,
}

impl<I: ?Sized> Sprites<'_, I> {
    /// No images decoded yet; everything draws with fallback shapes.
    pub fn none() -> Self {
        Self { target: None, crosshair: None }
    }
}

impl<I: ?Sized> Clone for Sprites<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: ?Sized> Copy for Sprites<'_, I> {}

impl Surface for CanvasRenderingContext2d {
    type Image = HtmlImageElement;

    fn clear(&mut self, width: f64, height: f64) {
        self.clear_rect(0.0, 0.0, width, height);
    }

    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn translate(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::translate(self, x, y).ok();
    }

    fn rotate(&mut self, angle: f64) {
        CanvasRenderingContext2d::rotate(self, angle).ok();
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.set_global_alpha(alpha);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.set_fill_style_str(color);
        CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        self.begin_path();
        self.set_fill_style_str(color);
        self.arc(x, y, radius, 0.0, TAU).ok();
        self.fill();
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str) {
        self.set_stroke_style_str(color);
        self.begin_path();
        self.move_to(x1, y1);
        self.line_to(x2, y2);
        self.stroke();
    }

    fn draw_image(&mut self, image: &HtmlImageElement, x: f64, y: f64, w: f64, h: f64) {
        self.draw_image_with_html_image_element_and_dw_and_dh(image, x, y, w, h)
            .ok();
    }
}

/// True once the browser has fully decoded the image. A broken or still-loading
/// image reports `complete()` with zero natural width, so both are checked.
pub fn image_ready(image: &HtmlImageElement) -> bool {
    image.complete() && image.natural_width() > 0
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Surface;

    /// One recorded drawing call.
    #[derive(Clone, Debug, PartialEq)]
    pub enum Op {
        Clear,
        Save,
        Restore,
        Translate(f64, f64),
        Rotate(f64),
        Alpha(f64),
        Rect { x: f64, y: f64, w: f64, h: f64, color: String },
        Circle { x: f64, y: f64, r: f64, color: String },
        Line { color: String },
        Image { name: &'static str, x: f64, y: f64, w: f64, h: f64 },
    }

    /// Stand-in image handle; the name identifies which sprite was blitted.
    pub struct FakeImage(pub &'static str);

    #[derive(Default)]
    pub struct Recorder {
        pub ops: Vec<Op>,
    }

    impl Recorder {
        pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
            self.ops.iter().filter(|op| pred(op)).count()
        }
    }

    impl Surface for Recorder {
        type Image = FakeImage;

        fn clear(&mut self, _width: f64, _height: f64) {
            self.ops.push(Op::Clear);
        }
        fn save(&mut self) {
            self.ops.push(Op::Save);
        }
        fn restore(&mut self) {
            self.ops.push(Op::Restore);
        }
        fn translate(&mut self, x: f64, y: f64) {
            self.ops.push(Op::Translate(x, y));
        }
        fn rotate(&mut self, angle: f64) {
            self.ops.push(Op::Rotate(angle));
        }
        fn set_alpha(&mut self, alpha: f64) {
            self.ops.push(Op::Alpha(alpha));
        }
        fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
            self.ops.push(Op::Rect { x, y, w, h, color: color.to_string() });
        }
        fn fill_circle(&mut self, x: f64, y: f64, r: f64, color: &str) {
            self.ops.push(Op::Circle { x, y, r, color: color.to_string() });
        }
        fn stroke_line(&mut self, _x1: f64, _y1: f64, _x2: f64, _y2: f64, color: &str) {
            self.ops.push(Op::Line { color: color.to_string() });
        }
        fn draw_image(&mut self, image: &FakeImage, x: f64, y: f64, w: f64, h: f64) {
            self.ops.push(Op::Image { name: image.0, x, y, w, h });
        }
    }
}
