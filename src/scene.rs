//! The scene graph: named drawables rendered in insertion order.
//!
//! A [`Scene`] owns a set of uniquely named [`Drawable`]s and fans out
//! rendering, input, and cleanup to them. Render order is insertion
//! order — later additions draw on top — and names are fixed once an
//! entry is added.
//!
//! Interaction is a capability, not a downcast: drawables that react to
//! the pointer expose an [`Interactive`] view through
//! [`Drawable::interaction`], and the scene forwards events only through
//! that trait. Shapes simply return `None` and never see input.

use glow::HasContext;

use crate::capability::GlslTier;
use crate::coords::Viewport;
use crate::error::Error;
use crate::input::{PointerButtonEvent, PointerMoveEvent};

/// Lifecycle guard shared by all drawables.
///
/// GPU resources exist only between `initialize` and `cleanup`; using a
/// drawable outside that window is a programming error and panics rather
/// than silently misrendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    /// Constructed; CPU-side state only.
    Created,
    /// GPU resources are live.
    Live,
    /// GPU resources have been released.
    Destroyed,
}

impl Lifecycle {
    /// Assert the drawable may be initialized. The caller transitions to
    /// `Live` only after its GPU resources actually exist, so a failed
    /// initialization can be retried.
    pub(crate) fn assert_created(self, name: &str) {
        match self {
            Self::Created => {}
            Self::Live => panic!("drawable {name:?} initialized twice"),
            Self::Destroyed => panic!("drawable {name:?} initialized after cleanup"),
        }
    }

    /// Assert the drawable is usable for rendering.
    pub(crate) fn assert_live(self, name: &str) {
        match self {
            Self::Live => {}
            Self::Created => panic!("drawable {name:?} rendered before initialize"),
            Self::Destroyed => panic!("drawable {name:?} rendered after cleanup"),
        }
    }

    /// Assert the drawable holds live resources to release.
    pub(crate) fn assert_cleanable(self, name: &str) {
        match self {
            Self::Live => {}
            Self::Created => panic!("drawable {name:?} cleaned up before initialize"),
            Self::Destroyed => panic!("drawable {name:?} cleaned up twice"),
        }
    }
}

/// A scene entry: anything that can be initialized, rendered, and
/// cleaned up, with a stable name and shared transform/color state.
///
/// Construction is CPU-only so placement and geometry are computable
/// before a GL context exists; [`initialize`](Self::initialize) is the
/// single point that touches the driver and may fail.
pub trait Drawable {
    /// The entry's name, unique within its scene and immutable after
    /// insertion.
    fn name(&self) -> &str;

    /// Create GPU resources (program, buffers) for this drawable.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// Shader or resource construction failures; the drawable stays
    /// uninitialized.
    ///
    /// # Panics
    ///
    /// Panics if called twice or after [`cleanup`](Self::cleanup).
    unsafe fn initialize(&mut self, gl: &glow::Context, tier: GlslTier) -> Result<(), Error>;

    /// Draw this entry into the current framebuffer.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Panics
    ///
    /// Panics if called before [`initialize`](Self::initialize) or after
    /// [`cleanup`](Self::cleanup).
    unsafe fn render(&mut self, gl: &glow::Context);

    /// Release this entry's GPU resources.
    ///
    /// # Safety
    ///
    /// Requires the same context the resources were created on.
    ///
    /// # Panics
    ///
    /// Panics if called twice or before [`initialize`](Self::initialize).
    unsafe fn cleanup(&mut self, gl: &glow::Context);

    /// Center position in normalized device coordinates.
    fn position(&self) -> [f32; 3];

    /// Move the drawable to a normalized-device position.
    fn set_position(&mut self, position: [f32; 3]);

    /// Current fill color.
    fn color(&self) -> [f32; 3];

    /// Set the fill color.
    fn set_color(&mut self, color: [f32; 3]);

    /// The interactive view of this drawable, if it reacts to input.
    ///
    /// The default is `None`: plain shapes never see events.
    fn interaction(&mut self) -> Option<&mut dyn Interactive> {
        None
    }
}

/// Capability interface for drawables that consume pointer input.
pub trait Interactive {
    /// The cursor moved. `viewport` is the window's size right now.
    fn handle_pointer_move(&mut self, viewport: Viewport, event: PointerMoveEvent);

    /// A mouse button changed state. `viewport` is the window's size
    /// right now.
    fn handle_pointer_button(&mut self, viewport: Viewport, event: PointerButtonEvent);
}

/// Per-frame scene callback, run by [`Scene::update`].
pub type UpdateFn = Box<dyn FnMut(&mut Scene)>;

/// An insertion-ordered collection of uniquely named drawables.
pub struct Scene {
    entries: Vec<Box<dyn Drawable>>,
    updater: Option<UpdateFn>,
    clear_color: [f32; 4],
    tier: Option<GlslTier>,
    cleaned: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Background color frames are cleared to before drawing.
    pub const CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];

    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            updater: None,
            clear_color: Self::CLEAR_COLOR,
            tier: None,
            cleaned: false,
        }
    }

    /// Override the background clear color.
    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    /// Add a drawable at the end of the render order.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateName`] if an entry with the same name already
    /// exists; the existing entry is untouched.
    pub fn add(&mut self, drawable: impl Drawable + 'static) -> Result<(), Error> {
        if self.entries.iter().any(|d| d.name() == drawable.name()) {
            return Err(Error::DuplicateName(drawable.name().to_owned()));
        }
        self.entries.push(Box::new(drawable));
        Ok(())
    }

    /// Look up an entry by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Drawable> {
        self.entries
            .iter()
            .find(|d| d.name() == name)
            .map(|d| &**d)
    }

    /// Look up an entry by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Drawable + 'static)> {
        self.entries
            .iter_mut()
            .find(|d| d.name() == name)
            .map(|d| &mut **d)
    }

    /// Entry names in render order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.name())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the scene has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Install the per-frame callback run by [`update`](Self::update).
    pub fn set_updater(&mut self, updater: impl FnMut(&mut Scene) + 'static) {
        self.updater = Some(Box::new(updater));
    }

    /// Run the per-frame callback, if one is installed.
    ///
    /// The frame driver calls this once per iteration, before
    /// [`render`](Self::render).
    pub fn update(&mut self) {
        if let Some(mut updater) = self.updater.take() {
            updater(self);
            // Keep the callback unless it replaced itself.
            if self.updater.is_none() {
                self.updater = Some(updater);
            }
        }
    }

    /// Probe the context's capability tier once and initialize every
    /// drawable against it.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// The first drawable initialization failure aborts setup and is
    /// returned to the caller.
    pub unsafe fn initialize(&mut self, gl: &glow::Context) -> Result<(), Error> {
        let tier = unsafe { GlslTier::detect(gl) };
        self.tier = Some(tier);
        log::info!(
            "initializing scene: {} drawable(s), {tier:?} shader dialect",
            self.entries.len()
        );

        for entry in &mut self.entries {
            unsafe { entry.initialize(gl, tier) }?;
        }
        Ok(())
    }

    /// The tier detected by [`initialize`](Self::initialize), if it ran.
    #[must_use]
    pub fn tier(&self) -> Option<GlslTier> {
        self.tier
    }

    /// Clear the framebuffer to the background color and render every
    /// entry in insertion order.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Panics
    ///
    /// Panics if any entry has not been initialized or was cleaned up.
    pub unsafe fn render(&mut self, gl: &glow::Context) {
        let [r, g, b, a] = self.clear_color;
        unsafe {
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }

        for entry in &mut self.entries {
            unsafe { entry.render(gl) };
        }
    }

    /// Forward a cursor move to every interactive entry.
    pub fn handle_pointer_move(&mut self, viewport: Viewport, event: PointerMoveEvent) {
        for entry in &mut self.entries {
            if let Some(widget) = entry.interaction() {
                widget.handle_pointer_move(viewport, event);
            }
        }
    }

    /// Forward a button change to every interactive entry.
    pub fn handle_pointer_button(&mut self, viewport: Viewport, event: PointerButtonEvent) {
        for entry in &mut self.entries {
            if let Some(widget) = entry.interaction() {
                widget.handle_pointer_button(viewport, event);
            }
        }
    }

    /// Release every entry's GPU resources.
    ///
    /// # Safety
    ///
    /// Requires the same context the resources were created on.
    ///
    /// # Panics
    ///
    /// Panics on a second call, or if any entry was never initialized.
    pub unsafe fn cleanup(&mut self, gl: &glow::Context) {
        assert!(!self.cleaned, "scene cleaned up twice");
        for entry in &mut self.entries {
            unsafe { entry.cleanup(gl) };
        }
        self.cleaned = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Square};

    #[test]
    fn duplicate_names_are_rejected() {
        let mut scene = Scene::new();
        let mut first = Square::new("player");
        first.set_color([0.0, 1.0, 0.0]);
        scene.add(first).expect("first insert");

        let err = scene.add(Square::new("player")).expect_err("second insert");
        assert!(matches!(err, Error::DuplicateName(name) if name == "player"));

        // The first entry survives untouched.
        assert_eq!(scene.len(), 1);
        let kept = scene.get("player").expect("entry present");
        assert_eq!(kept.color(), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn render_order_is_insertion_order() {
        let mut scene = Scene::new();
        scene.add(Square::new("backdrop")).expect("add");
        scene.add(Circle::new("puck")).expect("add");
        scene.add(Square::new("overlay")).expect("add");

        let names: Vec<_> = scene.names().collect();
        assert_eq!(names, ["backdrop", "puck", "overlay"]);
    }

    #[test]
    fn entries_are_addressable_by_name() {
        let mut scene = Scene::new();
        scene.add(Circle::new("puck")).expect("add");

        let puck = scene.get_mut("puck").expect("entry present");
        puck.set_position([0.25, -0.5, 0.0]);
        assert_eq!(puck.position(), [0.25, -0.5, 0.0]);

        assert!(scene.get("missing").is_none());
    }

    #[test]
    fn updater_runs_against_the_scene() {
        let mut scene = Scene::new();
        scene.add(Square::new("pulse")).expect("add");

        let mut ticks = 0.0_f32;
        scene.set_updater(move |scene| {
            ticks += 1.0;
            if let Some(square) = scene.get_mut("pulse") {
                square.set_position([ticks.sin() * 0.5, 0.0, 0.0]);
            }
        });

        scene.update();
        scene.update();
        let pos = scene.get("pulse").expect("entry present").position();
        assert!((pos[0] - (2.0_f32).sin() * 0.5).abs() < 1e-6);
    }
}
