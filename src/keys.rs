#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Increment,
    ResetSession,
}

impl KeyCommand {
    /// Maps a key-press event (`KeyboardEvent.code` and `.key`) to a command.
    pub fn from_key(code: &str, key: &str) -> Option<Self> {
        if code == "Space" || key == "+" {
            Some(Self::Increment)
        } else if key == "r" {
            Some(Self::ResetSession)
        } else {
            None
        }
    }
}
