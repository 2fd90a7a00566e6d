/// A column shared by every block in the group.
///
/// The first member laid out on an output line moves the column to where it
/// stands; members that start a line are indented to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    offset: Option<usize>,
}

impl Alignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current column, once a member has been laid out.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Move the column. Returns whether it changed.
    pub fn set_offset(&mut self, column: usize) -> bool {
        let changed = self.offset != Some(column);
        self.offset = Some(column);
        changed
    }

    pub fn reset(&mut self) {
        self.offset = None;
    }

    /// Rollback support for re-walked subtrees.
    pub(crate) fn restore(&mut self, offset: Option<usize>) {
        self.offset = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_offset_reports_changes() {
        let mut alignment = Alignment::new();
        assert_eq!(alignment.offset(), None);

        assert!(alignment.set_offset(10));
        assert!(!alignment.set_offset(10));
        assert!(alignment.set_offset(4));
        assert_eq!(alignment.offset(), Some(4));
    }

    #[test]
    fn reset_clears_offset() {
        let mut alignment = Alignment::new();
        alignment.set_offset(3);
        alignment.reset();

        assert_eq!(alignment.offset(), None);
        assert!(alignment.set_offset(7));
    }
}
