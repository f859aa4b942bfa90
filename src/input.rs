//! Raw pointer-event vocabulary.
//!
//! The host owns the window and its event pump; it translates whatever its
//! platform layer delivers into these types and forwards them through
//! [`Scene::handle_pointer_move`] / [`Scene::handle_pointer_button`].
//! Both event kinds carry the cursor position in window pixels — button
//! events included, so widgets never have to ask the platform where the
//! pointer currently is.
//!
//! [`Scene::handle_pointer_move`]: crate::Scene::handle_pointer_move
//! [`Scene::handle_pointer_button`]: crate::Scene::handle_pointer_button

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The primary button. The only one widgets react to.
    Left,
    /// The secondary button.
    Right,
    /// The middle button or wheel click.
    Middle,
    /// Any other button, by platform code.
    Other(u16),
}

/// What happened to a mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// The button went down.
    Press,
    /// The button came up.
    Release,
}

/// The cursor moved to a new window-pixel position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMoveEvent {
    /// Cursor X in pixels, from the window's left edge.
    pub x: f32,
    /// Cursor Y in pixels, from the window's top edge.
    pub y: f32,
}

/// A mouse button changed state at the given window-pixel position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerButtonEvent {
    /// Which button changed.
    pub button: MouseButton,
    /// Whether it was pressed or released.
    pub action: ButtonAction,
    /// Cursor X in pixels at the time of the event.
    pub x: f32,
    /// Cursor Y in pixels at the time of the event.
    pub y: f32,
}
