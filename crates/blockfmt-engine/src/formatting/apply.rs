use log::trace;

use crate::text::FormattingModel;

use super::{gaps::GapTable, patch::AppliedEdit};

/// Write every gap back into `model`, left to right.
///
/// Each gap is replaced at its original range shifted by the net length
/// change of all earlier replacements.
pub(crate) fn commit<M: FormattingModel>(gaps: &GapTable, model: &mut M) -> Vec<AppliedEdit> {
    let mut drift: isize = 0;
    let mut edits = Vec::new();

    for gap in gaps.commit_order() {
        let Some(space) = gaps.space(gap) else {
            continue;
        };
        if space.is_unchanged() {
            continue;
        }

        let original = space.range();
        let mapped = original.shifted(drift);
        let text = space.generate_text();
        model.replace_range(mapped.as_range(), &text);
        trace!("replaced {mapped:?} with {text:?}");

        drift += text.len() as isize - original.len() as isize;
        edits.push(AppliedEdit {
            original,
            mapped,
            text,
        });
    }
    edits
}
