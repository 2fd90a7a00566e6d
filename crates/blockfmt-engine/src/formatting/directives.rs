use crate::blocks::{AlignmentId, WrapId, WrapType};

use super::{alignment::Alignment, wrap::Wrap};

/// Alignment groups and wraps referenced by a block tree.
///
/// Owned by whoever builds the tree. The formatter resets the pass-local
/// state of every entry when a pass starts.
#[derive(Debug, Clone, Default)]
pub struct Directives {
    alignments: Vec<Alignment>,
    wraps: Vec<Wrap>,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_alignment(&mut self) -> AlignmentId {
        self.alignments.push(Alignment::new());
        AlignmentId(self.alignments.len() - 1)
    }

    pub fn add_wrap(&mut self, kind: WrapType) -> WrapId {
        self.wraps.push(Wrap::new(kind));
        WrapId(self.wraps.len() - 1)
    }

    pub fn alignment(&self, id: AlignmentId) -> Option<&Alignment> {
        self.alignments.get(id.0)
    }

    pub fn alignment_mut(&mut self, id: AlignmentId) -> Option<&mut Alignment> {
        self.alignments.get_mut(id.0)
    }

    pub fn wrap(&self, id: WrapId) -> Option<&Wrap> {
        self.wraps.get(id.0)
    }

    pub fn wrap_mut(&mut self, id: WrapId) -> Option<&mut Wrap> {
        self.wraps.get_mut(id.0)
    }

    /// Wraps that currently hold a remembered entry.
    pub(crate) fn remembered_entries(&self) -> impl Iterator<Item = (WrapId, usize)> + '_ {
        self.wraps
            .iter()
            .enumerate()
            .filter_map(|(i, w)| w.entry().map(|e| (WrapId(i), e)))
    }

    pub fn reset(&mut self) {
        self.alignments.iter_mut().for_each(Alignment::reset);
        self.wraps.iter_mut().for_each(Wrap::reset);
    }
}
