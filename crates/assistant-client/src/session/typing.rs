/// Written only by the dispatcher; the presentation layer reads it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypingIndicator {
    active: bool,
}

impl TypingIndicator {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn on(&mut self) -> bool {
        let changed = !self.active;
        self.active = true;
        changed
    }

    pub(crate) fn off(&mut self) -> bool {
        let changed = self.active;
        self.active = false;
        changed
    }
}
