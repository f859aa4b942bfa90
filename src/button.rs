//! The clickable button widget.
//!
//! A [`Button`] is placed in window pixels and converted to normalized
//! device coordinates against the viewport it is handed — never against a
//! cached window size. Its body is a rounded rectangle drawn as a
//! triangle list, with an optional line-loop outline, through the
//! unscaled widget shader (the geometry already encodes absolute
//! offsets, so there is nothing for a scale uniform to do).
//!
//! # Interaction
//!
//! Pointer events drive a small state machine over `hovered` and
//! `pressed`:
//!
//! - A cursor move recomputes `hovered` against the bounding box. Gaining
//!   hover fires `on_hover`; losing it restores the base color.
//! - A primary-button press while hovered sets `pressed` and fires
//!   `on_press`. Presses elsewhere, and every other mouse button, are
//!   ignored.
//! - A primary-button release while pressed *and still hovered* fires
//!   `on_click`, clears `pressed`, and then re-evaluates hover against
//!   the event's cursor position: a click handler may have moved or
//!   resized the widget, and stale hover or visual state must not
//!   survive it. Any other release just clears `pressed` (a press that
//!   began elsewhere, or a drag that left the widget, never clicks).
//!
//! Every event is processed synchronously and completely before the next
//! is accepted; callbacks see a fully consistent widget.
//!
//! The hit region is the axis-aligned bounding box — rounded corners are
//! not carved out of it.

use glow::HasContext;

use crate::buffer::VertexBuffer;
use crate::capability::GlslTier;
use crate::coords::Viewport;
use crate::error::Error;
use crate::geometry::{self, RoundedRect};
use crate::input::{ButtonAction, MouseButton, PointerButtonEvent, PointerMoveEvent};
use crate::scene::{Drawable, Interactive, Lifecycle};
use crate::shaders::{ShaderProgram, WIDGET_SOURCE};

/// Arc samples per rounded corner.
const CORNER_SEGMENTS: u32 = 8;

/// Fill color buttons start with.
pub const DEFAULT_COLOR: [f32; 3] = [0.5, 0.5, 0.5];

/// A widget callback. Receives the button's mutable state and the
/// viewport current at the triggering event, so handlers can recolor,
/// move, or resize the widget with fresh coordinate conversions.
pub type ButtonCallback = Box<dyn FnMut(&mut ButtonState, Viewport)>;

#[derive(Default)]
struct Handlers {
    on_hover: Option<ButtonCallback>,
    on_press: Option<ButtonCallback>,
    on_click: Option<ButtonCallback>,
}

/// Everything about a button except its name, handlers, and GPU
/// resources: placement, colors, label, and the interaction flags.
///
/// This is the view handlers receive. Visual fields are public — the
/// state machine only decides *when* callbacks run, not what feedback
/// they apply; the one hardwired behavior is restoring
/// [`base_color`](Self::base_color) when hover is lost.
pub struct ButtonState {
    /// Displayed fill color.
    pub color: [f32; 3],
    /// Fill color restored when the pointer leaves.
    pub base_color: [f32; 3],
    /// Outline color, drawn when [`outline_width`](Self::outline_width)
    /// is positive.
    pub outline_color: [f32; 3],
    /// Outline width in pixels; zero disables the outline.
    pub outline_width: f32,
    /// Opaque label text. Carried, not rendered.
    pub label: String,

    /// Center in normalized device coordinates.
    position: [f32; 3],
    /// Half extents in normalized device units.
    half_extent: [f32; 2],
    /// Size in pixels, the unit placement calls use.
    pixel_size: (f32, f32),
    /// Corner radius in pixels, clamped to half the short side.
    corner_radius: f32,

    hovered: bool,
    pressed: bool,

    geometry: RoundedRect,
    geometry_dirty: bool,
}

impl ButtonState {
    fn new(viewport: Viewport, x: f32, y: f32, width: f32, height: f32) -> Self {
        let (nx, ny) = viewport.point_to_ndc(x, y);
        let (nw, nh) = viewport.extent_to_ndc(width, height);
        let mut state = Self {
            color: DEFAULT_COLOR,
            base_color: DEFAULT_COLOR,
            outline_color: [0.0; 3],
            outline_width: 0.0,
            label: String::new(),
            position: [nx, ny, 0.0],
            half_extent: [nw / 2.0, nh / 2.0],
            pixel_size: (width, height),
            corner_radius: 0.0,
            hovered: false,
            pressed: false,
            geometry: RoundedRect {
                fill: Vec::new(),
                outline: Vec::new(),
            },
            geometry_dirty: false,
        };
        state.rebuild_geometry();
        state
    }

    /// Center in normalized device coordinates.
    #[must_use]
    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    /// Half extents in normalized device units.
    #[must_use]
    pub fn half_extent(&self) -> [f32; 2] {
        self.half_extent
    }

    /// Size in pixels.
    #[must_use]
    pub fn pixel_size(&self) -> (f32, f32) {
        self.pixel_size
    }

    /// Corner radius in pixels.
    #[must_use]
    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    /// Whether the pointer was inside at the last processed event.
    #[must_use]
    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// Whether a primary-button press is in flight.
    #[must_use]
    pub fn pressed(&self) -> bool {
        self.pressed
    }

    /// Place the button's center at a pixel position, converting against
    /// the viewport's size as of this call.
    pub fn set_pixel_position(&mut self, viewport: Viewport, x: f32, y: f32) {
        let (nx, ny) = viewport.point_to_ndc(x, y);
        self.position[0] = nx;
        self.position[1] = ny;

        // The same pixel size maps to different device extents if the
        // window changed; refresh them while we hold a current viewport.
        let (nw, nh) = viewport.extent_to_ndc(self.pixel_size.0, self.pixel_size.1);
        let half = [nw / 2.0, nh / 2.0];
        if half != self.half_extent {
            self.half_extent = half;
            self.rebuild_geometry();
        }
    }

    /// Resize the button in pixels and rebuild its geometry.
    pub fn set_pixel_size(&mut self, viewport: Viewport, width: f32, height: f32) {
        self.pixel_size = (width.max(0.0), height.max(0.0));
        self.corner_radius = clamp_radius(self.corner_radius, self.pixel_size);
        let (nw, nh) = viewport.extent_to_ndc(self.pixel_size.0, self.pixel_size.1);
        self.half_extent = [nw / 2.0, nh / 2.0];
        self.rebuild_geometry();
    }

    /// Set the corner radius in pixels, clamped to half the short side.
    pub fn set_corner_radius(&mut self, radius: f32) {
        self.corner_radius = clamp_radius(radius, self.pixel_size);
        self.rebuild_geometry();
    }

    /// Set the resting fill color. The displayed color follows along
    /// unless a hover or press is showing feedback right now.
    pub fn set_base_color(&mut self, color: [f32; 3]) {
        self.base_color = color;
        if !self.hovered && !self.pressed {
            self.color = color;
        }
    }

    /// Bounding-box hit test in normalized device coordinates, edges
    /// inclusive.
    #[must_use]
    pub fn hit_test(&self, nx: f32, ny: f32) -> bool {
        let [cx, cy, _] = self.position;
        let [hx, hy] = self.half_extent;
        nx >= cx - hx && nx <= cx + hx && ny >= cy - hy && ny <= cy + hy
    }

    fn rebuild_geometry(&mut self) {
        let width = self.half_extent[0] * 2.0;
        let height = self.half_extent[1] * 2.0;
        let min_px = self.pixel_size.0.min(self.pixel_size.1);
        // Express the pixel radius in device units along the short side.
        let radius = if min_px > 0.0 {
            self.corner_radius / min_px * width.min(height)
        } else {
            0.0
        };
        self.geometry = geometry::rounded_rect(width, height, radius, CORNER_SEGMENTS);
        self.geometry_dirty = true;
    }
}

fn clamp_radius(radius: f32, (width, height): (f32, f32)) -> f32 {
    radius.clamp(0.0, width.min(height) / 2.0)
}

/// GPU half of a button: one program, body and outline buffers.
struct ButtonGpu {
    shader: ShaderProgram,
    fill: VertexBuffer,
    outline: VertexBuffer,
}

impl ButtonGpu {
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    unsafe fn create(
        gl: &glow::Context,
        tier: GlslTier,
        geometry: &RoundedRect,
    ) -> Result<Self, Error> {
        let shader = unsafe { ShaderProgram::compile(gl, &WIDGET_SOURCE, tier) }?;

        let fill = match unsafe { VertexBuffer::upload(gl, &geometry.fill) } {
            Ok(fill) => fill,
            Err(err) => {
                unsafe { shader.destroy(gl) };
                return Err(err);
            }
        };
        let outline = match unsafe { VertexBuffer::upload(gl, &geometry.outline) } {
            Ok(outline) => outline,
            Err(err) => {
                unsafe {
                    fill.destroy(gl);
                    shader.destroy(gl);
                }
                return Err(err);
            }
        };

        Ok(Self {
            shader,
            fill,
            outline,
        })
    }

    /// # Safety
    ///
    /// Requires the same context the resources were created on.
    unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe {
            self.shader.destroy(gl);
            self.fill.destroy(gl);
            self.outline.destroy(gl);
        }
    }
}

/// A clickable rounded-rectangle widget.
pub struct Button {
    name: String,
    state: ButtonState,
    handlers: Handlers,
    gpu: Option<ButtonGpu>,
    lifecycle: Lifecycle,
}

impl Button {
    /// Create a button centered at pixel `(x, y)` with the given pixel
    /// size, converting placement against `viewport`.
    ///
    /// Geometry and colors are built immediately; GPU resources wait for
    /// [`Drawable::initialize`].
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        viewport: Viewport,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            name: name.into(),
            state: ButtonState::new(viewport, x, y, width, height),
            handlers: Handlers::default(),
            gpu: None,
            lifecycle: Lifecycle::Created,
        }
    }

    /// Set the resting fill color.
    #[must_use]
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.state.color = color;
        self.state.base_color = color;
        self
    }

    /// Enable an outline with the given color and pixel width.
    #[must_use]
    pub fn with_outline(mut self, color: [f32; 3], width: f32) -> Self {
        self.state.outline_color = color;
        self.state.outline_width = width.max(0.0);
        self
    }

    /// Set the corner radius in pixels, clamped to half the short side.
    #[must_use]
    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.state.set_corner_radius(radius);
        self
    }

    /// Set the label text.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.state.label = label.into();
        self
    }

    /// Run `handler` when the pointer enters the button.
    #[must_use]
    pub fn on_hover(mut self, handler: impl FnMut(&mut ButtonState, Viewport) + 'static) -> Self {
        self.handlers.on_hover = Some(Box::new(handler));
        self
    }

    /// Run `handler` when the primary button is pressed on the button.
    #[must_use]
    pub fn on_press(mut self, handler: impl FnMut(&mut ButtonState, Viewport) + 'static) -> Self {
        self.handlers.on_press = Some(Box::new(handler));
        self
    }

    /// Run `handler` when a press completes with a release inside the
    /// button.
    #[must_use]
    pub fn on_click(mut self, handler: impl FnMut(&mut ButtonState, Viewport) + 'static) -> Self {
        self.handlers.on_click = Some(Box::new(handler));
        self
    }

    /// The widget's state: placement, colors, interaction flags.
    #[must_use]
    pub fn state(&self) -> &ButtonState {
        &self.state
    }

    /// Mutable access to the widget's state.
    pub fn state_mut(&mut self) -> &mut ButtonState {
        &mut self.state
    }

    fn fire(handler: &mut Option<ButtonCallback>, state: &mut ButtonState, viewport: Viewport) {
        if let Some(handler) = handler {
            handler(state, viewport);
        }
    }

    fn pointer_moved(&mut self, viewport: Viewport, event: PointerMoveEvent) {
        let (nx, ny) = viewport.point_to_ndc(event.x, event.y);
        let was_hovered = self.state.hovered;
        self.state.hovered = self.state.hit_test(nx, ny);

        if self.state.hovered && !was_hovered {
            Self::fire(&mut self.handlers.on_hover, &mut self.state, viewport);
        } else if !self.state.hovered && was_hovered {
            self.state.color = self.state.base_color;
        }
    }

    fn pointer_button(&mut self, viewport: Viewport, event: PointerButtonEvent) {
        if event.button != MouseButton::Left {
            return;
        }

        let (nx, ny) = viewport.point_to_ndc(event.x, event.y);
        self.state.hovered = self.state.hit_test(nx, ny);

        match event.action {
            ButtonAction::Press => {
                if self.state.hovered {
                    self.state.pressed = true;
                    Self::fire(&mut self.handlers.on_press, &mut self.state, viewport);
                }
            }
            ButtonAction::Release if self.state.pressed && self.state.hovered => {
                Self::fire(&mut self.handlers.on_click, &mut self.state, viewport);
                self.state.pressed = false;

                // The click handler may have moved or resized the widget;
                // recheck the same cursor position against the new bounds
                // so no stale hover or feedback color survives.
                self.state.hovered = self.state.hit_test(nx, ny);
                if self.state.hovered {
                    Self::fire(&mut self.handlers.on_hover, &mut self.state, viewport);
                } else {
                    self.state.color = self.state.base_color;
                }
            }
            ButtonAction::Release => {
                // A press that began elsewhere, or a drag that left the
                // widget. Never a click.
                self.state.pressed = false;
            }
        }
    }
}

impl Drawable for Button {
    fn name(&self) -> &str {
        &self.name
    }

    unsafe fn initialize(&mut self, gl: &glow::Context, tier: GlslTier) -> Result<(), Error> {
        self.lifecycle.assert_created(&self.name);
        self.gpu = Some(unsafe { ButtonGpu::create(gl, tier, &self.state.geometry) }?);
        self.state.geometry_dirty = false;
        self.lifecycle = Lifecycle::Live;
        Ok(())
    }

    unsafe fn render(&mut self, gl: &glow::Context) {
        self.lifecycle.assert_live(&self.name);
        let Some(gpu) = &mut self.gpu else { return };

        if self.state.geometry_dirty {
            // Geometry changed since the last upload (a resize); buffers
            // are static, so replace them outright.
            let fresh = unsafe {
                match VertexBuffer::upload(gl, &self.state.geometry.fill) {
                    Ok(fill) => match VertexBuffer::upload(gl, &self.state.geometry.outline) {
                        Ok(outline) => Ok((fill, outline)),
                        Err(err) => {
                            fill.destroy(gl);
                            Err(err)
                        }
                    },
                    Err(err) => Err(err),
                }
            };
            match fresh {
                Ok((fill, outline)) => unsafe {
                    gpu.fill.destroy(gl);
                    gpu.outline.destroy(gl);
                    gpu.fill = fill;
                    gpu.outline = outline;
                },
                Err(err) => {
                    log::error!("button {:?}: geometry re-upload failed: {err}", self.name);
                }
            }
            self.state.geometry_dirty = false;
        }

        unsafe {
            gpu.shader.bind(gl);
            gpu.shader.set_position(gl, self.state.position);
            gpu.shader.set_color(gl, self.state.color);

            gpu.fill.bind(gl);
            gl.draw_arrays(glow::TRIANGLES, 0, gpu.fill.vertex_count());
            gpu.fill.unbind(gl);

            if self.state.outline_width > 0.0 {
                gpu.shader.set_color(gl, self.state.outline_color);
                gl.line_width(self.state.outline_width);

                gpu.outline.bind(gl);
                gl.draw_arrays(glow::LINE_LOOP, 0, gpu.outline.vertex_count());
                gpu.outline.unbind(gl);
            }

            gl.use_program(None);
        }
    }

    unsafe fn cleanup(&mut self, gl: &glow::Context) {
        self.lifecycle.assert_cleanable(&self.name);
        if let Some(gpu) = self.gpu.take() {
            unsafe { gpu.destroy(gl) };
        }
        self.lifecycle = Lifecycle::Destroyed;
    }

    fn position(&self) -> [f32; 3] {
        self.state.position
    }

    fn set_position(&mut self, position: [f32; 3]) {
        self.state.position = position;
    }

    fn color(&self) -> [f32; 3] {
        self.state.color
    }

    fn set_color(&mut self, color: [f32; 3]) {
        self.state.set_base_color(color);
    }

    fn interaction(&mut self) -> Option<&mut dyn Interactive> {
        Some(self)
    }
}

impl Interactive for Button {
    fn handle_pointer_move(&mut self, viewport: Viewport, event: PointerMoveEvent) {
        self.pointer_moved(viewport, event);
    }

    fn handle_pointer_button(&mut self, viewport: Viewport, event: PointerButtonEvent) {
        self.pointer_button(viewport, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const HOVER_COLOR: [f32; 3] = [1.0, 0.0, 0.0];
    const BASE_COLOR: [f32; 3] = [0.5, 0.0, 0.0];

    fn viewport() -> Viewport {
        Viewport::new(800, 600)
    }

    struct Counters {
        hover: Rc<Cell<usize>>,
        press: Rc<Cell<usize>>,
        click: Rc<Cell<usize>>,
    }

    /// The test widget from the interaction scenarios: centered at
    /// (400, 300), 200×100 pixels, recoloring itself on hover.
    fn counting_button() -> (Button, Counters) {
        let counters = Counters {
            hover: Rc::new(Cell::new(0)),
            press: Rc::new(Cell::new(0)),
            click: Rc::new(Cell::new(0)),
        };

        let hover = Rc::clone(&counters.hover);
        let press = Rc::clone(&counters.press);
        let click = Rc::clone(&counters.click);

        let button = Button::new("test_button", viewport(), 400.0, 300.0, 200.0, 100.0)
            .with_color(BASE_COLOR)
            .on_hover(move |state, _| {
                hover.set(hover.get() + 1);
                state.color = HOVER_COLOR;
            })
            .on_press(move |_, _| press.set(press.get() + 1))
            .on_click(move |_, _| click.set(click.get() + 1));

        (button, counters)
    }

    fn move_to(button: &mut Button, x: f32, y: f32) {
        button.handle_pointer_move(viewport(), PointerMoveEvent { x, y });
    }

    fn primary(button: &mut Button, action: ButtonAction, x: f32, y: f32) {
        button.handle_pointer_button(
            viewport(),
            PointerButtonEvent {
                button: MouseButton::Left,
                action,
                x,
                y,
            },
        );
    }

    #[test]
    fn hover_press_click_and_leave() {
        let (mut button, counters) = counting_button();

        move_to(&mut button, 400.0, 300.0);
        assert!(button.state().hovered());
        assert_eq!(counters.hover.get(), 1);
        assert_eq!(button.state().color, HOVER_COLOR);

        primary(&mut button, ButtonAction::Press, 400.0, 300.0);
        assert!(button.state().pressed());
        assert_eq!(counters.press.get(), 1);

        primary(&mut button, ButtonAction::Release, 400.0, 300.0);
        assert_eq!(counters.click.get(), 1);
        assert!(!button.state().pressed());
        // Still under the cursor afterwards, so the hover handler runs
        // again as part of the post-click re-evaluation.
        assert_eq!(counters.hover.get(), 2);
        assert!(button.state().hovered());

        move_to(&mut button, 10.0, 10.0);
        assert!(!button.state().hovered());
        assert_eq!(button.state().color, BASE_COLOR);
    }

    #[test]
    fn drag_out_cancels_the_click() {
        let (mut button, counters) = counting_button();

        move_to(&mut button, 400.0, 300.0);
        primary(&mut button, ButtonAction::Press, 400.0, 300.0);
        assert!(button.state().pressed());

        move_to(&mut button, 10.0, 10.0);
        assert!(!button.state().hovered());
        assert!(button.state().pressed(), "drag-out keeps the press alive");

        primary(&mut button, ButtonAction::Release, 10.0, 10.0);
        assert_eq!(counters.click.get(), 0);
        assert!(!button.state().pressed());
    }

    #[test]
    fn drag_out_and_back_still_clicks() {
        let (mut button, counters) = counting_button();

        move_to(&mut button, 400.0, 300.0);
        primary(&mut button, ButtonAction::Press, 400.0, 300.0);
        move_to(&mut button, 10.0, 10.0);
        move_to(&mut button, 400.0, 300.0);
        assert!(button.state().pressed());

        primary(&mut button, ButtonAction::Release, 400.0, 300.0);
        assert_eq!(counters.click.get(), 1);
    }

    #[test]
    fn press_outside_never_clicks() {
        let (mut button, counters) = counting_button();

        primary(&mut button, ButtonAction::Press, 10.0, 10.0);
        assert!(!button.state().pressed());

        // Release over the widget without a press that started on it.
        primary(&mut button, ButtonAction::Release, 400.0, 300.0);
        assert_eq!(counters.click.get(), 0);
        assert_eq!(counters.press.get(), 0);
    }

    #[test]
    fn secondary_buttons_are_ignored() {
        let (mut button, counters) = counting_button();
        move_to(&mut button, 400.0, 300.0);

        button.handle_pointer_button(
            viewport(),
            PointerButtonEvent {
                button: MouseButton::Right,
                action: ButtonAction::Press,
                x: 400.0,
                y: 300.0,
            },
        );
        assert!(!button.state().pressed());
        assert_eq!(counters.press.get(), 0);
    }

    #[test]
    fn click_handler_relocation_clears_stale_hover() {
        let hover = Rc::new(Cell::new(0));
        let hover_in_handler = Rc::clone(&hover);

        let mut button = Button::new("mover", viewport(), 400.0, 300.0, 200.0, 100.0)
            .with_color(BASE_COLOR)
            .on_hover(move |state, _| {
                hover_in_handler.set(hover_in_handler.get() + 1);
                state.color = HOVER_COLOR;
            })
            .on_click(|state, viewport| {
                // Jump far away from the cursor.
                state.set_pixel_position(viewport, 100.0, 100.0);
            });

        move_to(&mut button, 400.0, 300.0);
        assert_eq!(hover.get(), 1);

        primary(&mut button, ButtonAction::Press, 400.0, 300.0);
        primary(&mut button, ButtonAction::Release, 400.0, 300.0);

        // The widget moved out from under the cursor during the click:
        // hover must be re-evaluated against the new bounds, and the
        // feedback color must not linger.
        assert!(!button.state().hovered());
        assert_eq!(hover.get(), 1);
        assert_eq!(button.state().color, BASE_COLOR);
    }

    #[test]
    fn hit_test_includes_the_edges() {
        let (mut button, _) = counting_button();

        // Exactly the left edge of the 200×100 region around (400, 300).
        // 300/800 and 200/800 are exact in f32, so the comparison is on
        // the boundary rather than one rounding step off it.
        move_to(&mut button, 300.0, 300.0);
        assert!(button.state().hovered());

        move_to(&mut button, 299.0, 300.0);
        assert!(!button.state().hovered());
    }

    #[test]
    fn corner_radius_clamps_to_half_the_short_side() {
        let button = Button::new("b", viewport(), 400.0, 300.0, 200.0, 100.0)
            .with_corner_radius(1000.0);
        assert_eq!(button.state().corner_radius(), 50.0);
    }

    #[test]
    fn resize_rebuilds_geometry() {
        let mut button = Button::new("b", viewport(), 400.0, 300.0, 200.0, 100.0)
            .with_corner_radius(10.0);
        let rounded_fill = button.state().geometry.fill.len();
        assert_eq!(
            rounded_fill,
            3 * 4 * (CORNER_SEGMENTS as usize + 1),
            "rounded body fans through every outline point"
        );

        button.state_mut().set_corner_radius(0.0);
        assert_eq!(button.state().geometry.fill.len(), 6);
        assert!(button.state().geometry_dirty);
    }

    #[test]
    fn moving_without_resizing_keeps_geometry() {
        let mut button = Button::new("b", viewport(), 400.0, 300.0, 200.0, 100.0);
        button.state_mut().geometry_dirty = false;

        button.state_mut().set_pixel_position(viewport(), 200.0, 200.0);
        assert!(!button.state().geometry_dirty, "same extents, no rebuild");

        let (nx, ny) = viewport().point_to_ndc(200.0, 200.0);
        let pos = button.state().position();
        assert!((pos[0] - nx).abs() < 1e-6);
        assert!((pos[1] - ny).abs() < 1e-6);
    }
}
