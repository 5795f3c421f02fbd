/// Host lifecycle callbacks the controller reacts to, in the order the host
/// fires them within a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    SaveLoaded,
    ReturnedToTitle,
    Warped,
    UpdateTicked,
    ButtonPressed { button: String, held: Vec<String> },
    AssetsInvalidated(Vec<String>),
}

impl HostEvent {
    #[must_use]
    pub fn pressed(button: &str) -> Self {
        Self::ButtonPressed {
            button: button.to_string(),
            held: Vec::new(),
        }
    }
}
