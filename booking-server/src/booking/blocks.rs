//! Schedule Block Planning
//!
//! A block request `[start, end)` is cut into fixed increments of `step`
//! minutes (the last one may be shorter). Planning is all-or-nothing:
//! one increment overlapping a live appointment rejects the whole range.

use super::availability::{Span, overlaps};

/// Increments to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPlan {
    /// `(start_minute, duration)` per new block
    pub increments: Vec<(u32, u32)>,
    /// Increments already covered by an existing block
    pub skipped: usize,
}

/// Increment that hit a live appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockConflict {
    pub start: u32,
    pub end: u32,
}

/// Cut `[start, end)` into increments of `step` minutes
pub fn increments(start: u32, end: u32, step: u32) -> Vec<Span> {
    let step = step.max(1);
    let mut out = Vec::new();
    let mut t = start;
    while t < end {
        let next = (t + step).min(end);
        out.push((t, next));
        t = next;
    }
    out
}

/// Plan the blocks for a range
///
/// `live` are spans of pending / confirmed appointments, `blocked` the
/// spans of existing blocks.
pub fn plan_blocks(
    start: u32,
    end: u32,
    step: u32,
    live: &[Span],
    blocked: &[Span],
) -> Result<BlockPlan, BlockConflict> {
    let mut plan = BlockPlan {
        increments: Vec::new(),
        skipped: 0,
    };

    for span in increments(start, end, step) {
        if live.iter().any(|a| overlaps(span, *a)) {
            return Err(BlockConflict {
                start: span.0,
                end: span.1,
            });
        }
        if blocked.iter().any(|b| overlaps(span, *b)) {
            plan.skipped += 1;
            continue;
        }
        plan.increments.push((span.0, span.1 - span.0));
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increments_with_short_tail() {
        assert_eq!(increments(540, 630, 30), vec![(540, 570), (570, 600), (600, 630)]);
        assert_eq!(increments(540, 585, 30), vec![(540, 570), (570, 585)]);
        assert!(increments(600, 600, 30).is_empty());
    }

    #[test]
    fn test_plan_skips_existing_blocks() {
        let plan = plan_blocks(540, 660, 30, &[], &[(570, 600)]).unwrap();
        assert_eq!(plan.increments, vec![(540, 30), (600, 30), (630, 30)]);
        assert_eq!(plan.skipped, 1);
    }

    #[test]
    fn test_plan_rejects_whole_range_on_conflict() {
        // appointment 10:15-10:45 sits in the third increment
        let err = plan_blocks(540, 720, 30, &[(615, 645)], &[]).unwrap_err();
        assert_eq!(err, BlockConflict { start: 600, end: 630 });
    }
}
