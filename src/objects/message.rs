/// Mouse buttons as reported by the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Plain movement with nothing held.
    NoButton,
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Pressed,
    Released,
    Dragged,
    Moved,
}

/// Input delivered to a being from outside the simulation.
///
/// Routing (who subscribes to what) belongs to the embedding application;
/// the core only hands a message to [`Being::receive`](crate::objects::Being::receive).
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Key {
        key: char,
        pressed: bool,
    },
    Mouse {
        button: MouseButton,
        action: MouseAction,
        x: i32,
        y: i32,
    },
    /// Positive amounts scroll towards the user.
    MouseWheel {
        amount: i32,
    },
    /// Address-routed message, e.g. from an OSC bridge.
    Custom {
        address: String,
        args: Vec<f64>,
    },
}

impl Message {
    pub fn key(key: char, pressed: bool) -> Self {
        Message::Key { key, pressed }
    }

    pub fn custom(address: impl Into<String>, args: Vec<f64>) -> Self {
        Message::Custom { address: address.into(), args }
    }
}
