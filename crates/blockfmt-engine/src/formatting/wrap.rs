use crate::blocks::WrapType;

/// A line-break policy shared by one or more blocks.
///
/// A `ChopIfNeeded` wrap lays its members out flat while remembering the
/// first place it could have broken. When the line later overflows, the
/// formatter takes that entry, goes back, and breaks there. From then on the
/// wrap is chopped: every remaining member starts its own line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrap {
    kind: WrapType,
    first_entry: Option<usize>,
    chopped: bool,
}

impl Wrap {
    pub fn new(kind: WrapType) -> Self {
        Self {
            kind,
            first_entry: None,
            chopped: false,
        }
    }

    pub fn kind(&self) -> WrapType {
        self.kind
    }

    /// Whether a block at `column` must start a new line.
    pub fn should_apply(&self, column: usize, right_margin: usize) -> bool {
        match self.kind {
            WrapType::None => false,
            WrapType::Always => true,
            WrapType::AsNeeded => column >= right_margin,
            WrapType::ChopIfNeeded => self.chopped || column >= right_margin,
        }
    }

    /// Store a candidate break offset unless one is already stored or the
    /// wrap has been chopped. Returns whether it was stored.
    pub fn remember_entry(&mut self, offset: usize) -> bool {
        if self.chopped || self.first_entry.is_some() {
            return false;
        }
        self.first_entry = Some(offset);
        true
    }

    pub fn entry(&self) -> Option<usize> {
        self.first_entry
    }

    /// Consume the remembered entry. Taking an entry chops the wrap.
    pub fn take_entry(&mut self) -> Option<usize> {
        let entry = self.first_entry.take();
        if entry.is_some() {
            self.chopped = true;
        }
        entry
    }

    pub fn is_chopped(&self) -> bool {
        self.chopped
    }

    pub fn reset(&mut self) {
        self.first_entry = None;
        self.chopped = false;
    }

    /// Rollback support: forget an entry remembered inside a re-walked subtree.
    pub(crate) fn forget_entry(&mut self) {
        self.first_entry = None;
    }
}
