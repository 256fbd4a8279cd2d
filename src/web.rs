//! Browser glue: DOM lookup, listeners, canvas sizing, score text and the
//! `requestAnimationFrame` loop around a [`Gallery`] session.
//!
//! The page is expected to provide `#game` (canvas), `#hits`, `#misses` and
//! `#restart`; anything missing is created with a minimal inline style. Sprites are
//! loaded from `crosshair.webp` and `laptop.png` next to the page.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, AudioContext, CanvasRenderingContext2d, Document, Element, Event,
    EventTarget, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent, TouchEvent,
    Window, window,
};

use crate::audio::Synth;
use crate::config::GalleryConfig;
use crate::error::GalleryError;
use crate::gallery::{CancelToken, FrameClock, Gallery, InputEvent, Point, Viewport};
use crate::render::{Sprites, image_ready};

const CANVAS_ID: &str = "game";
const HITS_ID: &str = "hits";
const MISSES_ID: &str = "misses";
const RESTART_ID: &str = "restart";
const CROSSHAIR_SRC: &str = "crosshair.webp";
const TARGET_SRC: &str = "laptop.png";

/// Everything the browser loop needs besides the gallery itself.
struct WebSession {
    gallery: Gallery,
    synth: Synth<AudioContext>,
    window: Window,
    ctx: CanvasRenderingContext2d,
    crosshair: HtmlImageElement,
    target_sprite: HtmlImageElement,
    hits_el: Element,
    misses_el: Element,
    clock: FrameClock,
    cancel: CancelToken,
    /// Last counters written to the page.
    shown: Option<(u32, u32)>,
}

impl WebSession {
    fn frame(&mut self, now: f64) {
        // Window size is read every frame so relaunches always use the live viewport.
        self.gallery.resize(window_viewport(&self.window));
        let dt = self.clock.tick(now);
        let sprites = Sprites {
            target: image_ready(&self.target_sprite).then_some(&self.target_sprite),
            crosshair: image_ready(&self.crosshair).then_some(&self.crosshair),
        };
        self.gallery.tick(dt, &mut self.ctx, sprites);
    }

    fn input(&mut self, event: InputEvent) {
        self.gallery.handle_input(&event, &mut self.synth);
        self.sync_scores();
    }

    fn sync_scores(&mut self) {
        let now = (self.gallery.hits(), self.gallery.misses());
        if self.shown == Some(now) {
            return;
        }
        self.hits_el.set_text_content(Some(&now.0.to_string()));
        self.misses_el.set_text_content(Some(&now.1.to_string()));
        self.shown = Some(now);
    }
}

thread_local! {
    static SESSION: RefCell<Option<WebSession>> = RefCell::new(None);
    static LISTENING: Cell<bool> = Cell::new(false);
}

fn with_session<R>(f: impl FnOnce(&mut WebSession) -> R) -> Option<R> {
    SESSION.with(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Build a session on the current page and start its frame loop. Calling it again
/// replaces the running session.
pub fn start(config: GalleryConfig) -> Result<(), GalleryError> {
    config.validate()?;
    let win = window().ok_or(GalleryError::NoWindow)?;
    let doc = win.document().ok_or(GalleryError::NoDocument)?;

    let canvas = ensure_canvas(&doc)?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(GalleryError::NoContext)?
        .dyn_into()
        .map_err(|_| GalleryError::NoContext)?;
    fit_canvas(&win, &canvas, &ctx)?;

    let hits_el = ensure_element(&doc, HITS_ID, "span", "position:fixed; top:10px; left:12px; font-family:monospace; font-size:18px; z-index:10;", "0")?;
    let misses_el = ensure_element(&doc, MISSES_ID, "span", "position:fixed; top:10px; left:90px; font-family:monospace; font-size:18px; color:#c62828; z-index:10;", "0")?;
    let restart_el = ensure_element(&doc, RESTART_ID, "button", "position:fixed; top:8px; right:12px; z-index:10;", "Restart")?;

    let crosshair = load_image(CROSSHAIR_SRC)?;
    let target_sprite = load_image(TARGET_SRC)?;

    let viewport = window_viewport(&win);
    let synth = if config.sound { Synth::new() } else { Synth::muted() };
    let now = win.performance().map(|p| p.now()).unwrap_or(0.0);
    let clock = FrameClock::starting_at(now, config.max_frame_dt_ms);
    let gallery = Gallery::new(config, viewport);
    log::info!(
        "gallery starting: {}x{} viewport, {} targets",
        viewport.width,
        viewport.height,
        gallery.targets().len()
    );

    let cancel = CancelToken::new();
    let mut session = WebSession {
        gallery,
        synth,
        window: win.clone(),
        ctx,
        crosshair,
        target_sprite,
        hits_el,
        misses_el,
        clock,
        cancel: cancel.clone(),
        shown: None,
    };
    session.sync_scores();

    let previous = SESSION.with(|cell| cell.replace(Some(session)));
    if let Some(old) = previous {
        old.cancel.cancel();
    }

    if !LISTENING.with(|l| l.replace(true)) {
        install_listeners(&win, &canvas, &restart_el)?;
    }
    start_loop(cancel);
    Ok(())
}

pub fn restart() {
    with_session(|s| s.input(InputEvent::Restart));
}

/// Stop the frame loop. Listeners stay attached but find no session.
pub fn stop() {
    let session = SESSION.with(|cell| cell.borrow_mut().take());
    if let Some(s) = session {
        s.cancel.cancel();
        log::info!("gallery stopped after {} hits / {} misses", s.gallery.hits(), s.gallery.misses());
    }
}

pub fn scores() -> Option<(u32, u32)> {
    with_session(|s| (s.gallery.hits(), s.gallery.misses()))
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_loop(cancel: CancelToken) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        if cancel.is_cancelled() {
            // Dropping the closure breaks the Rc cycle and ends the loop.
            let _ = f.borrow_mut().take();
            return;
        }
        with_session(|s| s.frame(ts));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn install_listeners(win: &Window, canvas: &HtmlCanvasElement, restart_el: &Element) -> Result<(), GalleryError> {
    listen(canvas, "mousemove", None, |evt| {
        let evt: MouseEvent = evt.unchecked_into();
        with_session(|s| s.input(InputEvent::PointerMove(client_point(&evt))));
    })?;
    listen(canvas, "mousedown", None, |evt| {
        let evt: MouseEvent = evt.unchecked_into();
        with_session(|s| s.input(InputEvent::PointerDown(client_point(&evt))));
    })?;
    listen(canvas, "touchmove", Some(false), |evt| {
        let evt: TouchEvent = evt.unchecked_into();
        if let Some(p) = first_touch(&evt) {
            with_session(|s| s.input(InputEvent::TouchMove(p)));
        }
    })?;
    listen(canvas, "touchstart", Some(false), |evt| {
        evt.prevent_default();
        let evt: TouchEvent = evt.unchecked_into();
        if let Some(p) = first_touch(&evt) {
            with_session(|s| s.input(InputEvent::TouchStart(p)));
        }
    })?;
    listen(win, "keydown", None, |evt| {
        let evt: KeyboardEvent = evt.unchecked_into();
        with_session(|s| s.input(InputEvent::KeyDown { code: evt.code() }));
    })?;
    listen(restart_el, "click", None, |_evt| {
        with_session(|s| s.input(InputEvent::Restart));
    })?;

    let resize_win = win.clone();
    let resize_canvas = canvas.clone();
    listen(win, "resize", None, move |_evt| {
        with_session(|s| {
            fit_canvas(&resize_win, &resize_canvas, &s.ctx).ok();
            s.gallery.resize(window_viewport(&resize_win));
        });
    })?;
    Ok(())
}

fn listen(
    target: &EventTarget,
    kind: &str,
    passive: Option<bool>,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), GalleryError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    match passive {
        Some(passive) => {
            let opts = AddEventListenerOptions::new();
            opts.set_passive(passive);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &opts,
            )?;
        }
        None => target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?,
    }
    closure.forget();
    Ok(())
}

fn client_point(evt: &MouseEvent) -> Point {
    Point::new(evt.client_x() as f64, evt.client_y() as f64)
}

fn first_touch(evt: &TouchEvent) -> Option<Point> {
    evt.touches()
        .get(0)
        .map(|t| Point::new(t.client_x() as f64, t.client_y() as f64))
}

fn window_viewport(win: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(dim(win.inner_width()), dim(win.inner_height()))
}

/// Size the backing store to the device pixel ratio and draw in CSS pixels.
fn fit_canvas(win: &Window, canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d) -> Result<(), GalleryError> {
    let dpr = win.device_pixel_ratio().max(1.0);
    let Viewport { width, height } = window_viewport(win);
    canvas.set_width((width * dpr).floor() as u32);
    canvas.set_height((height * dpr).floor() as u32);
    let style = canvas.style();
    style.set_property("width", &format!("{}px", width))?;
    style.set_property("height", &format!("{}px", height))?;
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    Ok(())
}

fn ensure_canvas(doc: &Document) -> Result<HtmlCanvasElement, GalleryError> {
    if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        return el
            .dyn_into()
            .map_err(|_| GalleryError::WrongElement { id: CANVAS_ID, expected: "canvas" });
    }
    let c: HtmlCanvasElement = doc
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| GalleryError::WrongElement { id: CANVAS_ID, expected: "canvas" })?;
    c.set_id(CANVAS_ID);
    c.set_attribute("style", "position:fixed; left:0; top:0; display:block; cursor:none; touch-action:none;").ok();
    doc.body().ok_or(GalleryError::NoBody)?.append_child(&c)?;
    Ok(c)
}

fn ensure_element(doc: &Document, id: &'static str, tag: &str, style: &str, text: &str) -> Result<Element, GalleryError> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element(tag)?;
    el.set_id(id);
    el.set_text_content(Some(text));
    el.set_attribute("style", style).ok();
    doc.body().ok_or(GalleryError::NoBody)?.append_child(&el)?;
    Ok(el)
}

fn load_image(src: &str) -> Result<HtmlImageElement, GalleryError> {
    let img = HtmlImageElement::new()?;
    img.set_src(src);
    Ok(img)
}
