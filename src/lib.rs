//! A minimal 2D scene and widget renderer on OpenGL via [glow].
//!
//! The crate manages a scene graph of uniquely named drawables —
//! [`Square`], [`Circle`], and the clickable [`Button`] widget — on top
//! of a GL context somebody else owns. It compiles the right shader
//! dialect for the detected driver capability, uploads procedural
//! geometry into vertex buffers, and turns raw cursor/button events into
//! hover, press, and click callbacks.
//!
//! # Features
//!
//! - **Two shading-language dialects**: contexts reporting GL 3.x+ get
//!   GLSL 330 core with explicit attribute locations; older profiles get
//!   GLSL 120 with pre-link attribute binding. One probe per context,
//!   via [`GlslTier`].
//! - **Probed vertex-array support**: VAO creation is attempted and
//!   verified through the error flag; contexts that export the entry
//!   points without honoring them fall back to re-declaring the
//!   attribute layout around every draw.
//! - **Procedural widget geometry**: rounded-rectangle bodies and
//!   outlines are synthesized on the CPU as four quarter-circle arcs
//!   plus a center fan, before any context exists.
//! - **Pixel-space placement**: widgets are positioned and hit-tested in
//!   window pixels, converted to normalized device coordinates against
//!   the window size current at each call.
//!
//! # What the host provides
//!
//! Window and context creation, the event pump, and the frame loop stay
//! outside: the host makes a context current before touching anything
//! here, supplies its window size as a [`Viewport`] per call, forwards
//! raw pointer events, and drives [`Scene::update`] / [`Scene::render`]
//! once per frame. All of it on one thread — GL objects are tied to
//! their context and nothing in this crate is `Send`.
//!
//! # Safety
//!
//! Every function that issues GL calls is `unsafe` and requires a valid,
//! current OpenGL context, exactly like the underlying [glow] API.
//!
//! # Example
//!
//! ```no_run
//! # fn example(gl: &glow::Context) -> Result<(), alpenglow::Error> {
//! use alpenglow::{Button, Scene, Square, Viewport};
//!
//! let viewport = Viewport::new(800, 600);
//!
//! let mut scene = Scene::new();
//! scene.add(Square::new("backdrop"))?;
//! scene.add(
//!     Button::new("quit", viewport, 400.0, 300.0, 200.0, 100.0)
//!         .with_color([0.5, 0.0, 0.0])
//!         .with_outline([1.0, 1.0, 1.0], 3.0)
//!         .with_corner_radius(20.0)
//!         .on_click(|_, _| println!("clicked")),
//! )?;
//!
//! // With a current GL context:
//! unsafe { scene.initialize(gl) }?;
//!
//! // Each frame:
//! scene.update();
//! unsafe { scene.render(gl) };
//! # Ok(())
//! # }
//! ```
//!
//! [glow]: https://docs.rs/glow

pub mod buffer;
pub mod button;
pub mod capability;
pub mod coords;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod scene;
pub mod shaders;
pub mod shapes;

pub use button::{Button, ButtonState};
pub use capability::GlslTier;
pub use coords::Viewport;
pub use error::{Error, ShaderStage};
pub use input::{ButtonAction, MouseButton, PointerButtonEvent, PointerMoveEvent};
pub use logging::init_logging;
pub use scene::{Drawable, Interactive, Scene};
pub use shapes::{Circle, Square};
