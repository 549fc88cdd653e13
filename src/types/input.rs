/// Keyboard modifier state captured with an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// A mouse event in grid-body pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseInput {
    pub x: f32,
    pub y: f32,
    pub button: MouseButton,
    /// Whether the primary button is held (relevant for move events).
    pub pressed: bool,
    pub modifiers: Modifiers,
}

impl MouseInput {
    /// A primary-button press at the given body position.
    pub fn primary(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            button: MouseButton::Primary,
            pressed: true,
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn released(mut self) -> Self {
        self.pressed = false;
        self
    }
}

/// A keyboard event. `key` follows the DOM `KeyboardEvent.key` naming
/// (`"ArrowDown"`, `"Enter"`, `"c"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
