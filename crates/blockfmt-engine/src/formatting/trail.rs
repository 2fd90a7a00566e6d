use std::collections::HashSet;

use crate::blocks::{AlignmentId, WrapId};

use super::{directives::Directives, engine::Frame};

/// Pass-local state a frame carried before a leaf marked it processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameState {
    pub(crate) current_indent: Option<usize>,
    pub(crate) first_element_processed: bool,
    pub(crate) at_line_start: bool,
}

/// One reversible mutation made during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Undo {
    AlignmentOffset {
        alignment: AlignmentId,
        previous: Option<usize>,
    },
    Frame {
        depth: usize,
        previous: FrameState,
    },
    RememberedEntry {
        wrap: WrapId,
    },
    AlignedOnLine {
        alignment: AlignmentId,
    },
    LineAlignmentsCleared {
        previous: Vec<AlignmentId>,
    },
}

/// Undo log for re-walking a subtree.
///
/// Taking a wrap entry is deliberately not recorded: the consumed entry is
/// what guarantees the re-walk makes different choices.
#[derive(Debug, Default)]
pub(crate) struct Trail {
    entries: Vec<Undo>,
}

impl Trail {
    pub(crate) fn mark(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn record(&mut self, undo: Undo) {
        self.entries.push(undo);
    }

    /// Revert everything recorded after `mark`, newest first. Frames already
    /// popped off `stack` are skipped.
    pub(crate) fn unwind(
        &mut self,
        mark: usize,
        stack: &mut [Frame],
        directives: &mut Directives,
        aligned_on_line: &mut HashSet<AlignmentId>,
    ) {
        while self.entries.len() > mark {
            let Some(undo) = self.entries.pop() else {
                break;
            };
            match undo {
                Undo::AlignmentOffset {
                    alignment,
                    previous,
                } => {
                    if let Some(alignment) = directives.alignment_mut(alignment) {
                        alignment.restore(previous);
                    }
                }
                Undo::Frame { depth, previous } => {
                    if let Some(frame) = stack.get_mut(depth) {
                        frame.restore(previous);
                    }
                }
                Undo::RememberedEntry { wrap } => {
                    if let Some(wrap) = directives.wrap_mut(wrap) {
                        wrap.forget_entry();
                    }
                }
                Undo::AlignedOnLine { alignment } => {
                    aligned_on_line.remove(&alignment);
                }
                Undo::LineAlignmentsCleared { previous } => {
                    aligned_on_line.extend(previous);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{BlockId, WrapType};

    #[test]
    fn unwind_restores_directives_newest_first() {
        let mut directives = Directives::new();
        let alignment = directives.add_alignment();
        let wrap = directives.add_wrap(WrapType::ChopIfNeeded);
        let mut trail = Trail::default();

        let mark = trail.mark();
        directives.alignment_mut(alignment).unwrap().set_offset(6);
        trail.record(Undo::AlignmentOffset {
            alignment,
            previous: None,
        });
        directives.wrap_mut(wrap).unwrap().remember_entry(3);
        trail.record(Undo::RememberedEntry { wrap });

        trail.unwind(mark, &mut [], &mut directives, &mut HashSet::new());

        assert_eq!(directives.alignment(alignment).unwrap().offset(), None);
        assert_eq!(directives.wrap(wrap).unwrap().entry(), None);
        assert_eq!(trail.mark(), mark);
    }

    #[test]
    fn unwind_keeps_entries_before_mark() {
        let mut directives = Directives::new();
        let alignment = directives.add_alignment();
        let mut trail = Trail::default();

        directives.alignment_mut(alignment).unwrap().set_offset(2);
        trail.record(Undo::AlignmentOffset {
            alignment,
            previous: None,
        });
        let mark = trail.mark();

        trail.unwind(mark, &mut [], &mut directives, &mut HashSet::new());

        assert_eq!(directives.alignment(alignment).unwrap().offset(), Some(2));
    }

    #[test]
    fn unwind_skips_popped_frames() {
        let mut directives = Directives::new();
        let mut trail = Trail::default();
        let mut stack = vec![Frame::new(BlockId(0), None, None)];
        let fresh = stack[0].state();

        stack[0].mark_processed(4, true);
        trail.record(Undo::Frame {
            depth: 0,
            previous: fresh,
        });
        trail.record(Undo::Frame {
            depth: 3,
            previous: fresh,
        });

        trail.unwind(0, &mut stack, &mut directives, &mut HashSet::new());

        assert_eq!(stack[0].state(), fresh);
    }

    #[test]
    fn unwind_restores_the_line_alignment_set() {
        let mut directives = Directives::new();
        let first = directives.add_alignment();
        let second = directives.add_alignment();
        let mut aligned = HashSet::from([first]);
        let mut trail = Trail::default();

        let mark = trail.mark();
        aligned.clear();
        trail.record(Undo::LineAlignmentsCleared {
            previous: vec![first],
        });
        aligned.insert(second);
        trail.record(Undo::AlignedOnLine { alignment: second });

        trail.unwind(mark, &mut [], &mut directives, &mut aligned);

        assert_eq!(aligned, HashSet::from([first]));
    }
}
