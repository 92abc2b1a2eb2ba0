//! Decide whether a freshly captured layout is worth sending.

use splitsync_layout::{LayoutNode, SIZE_TOLERANCE};

use crate::ignore::IgnoreList;

/// Why a candidate layout differs from the last one sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    /// Nothing has been sent yet.
    Initial,
    /// Buffer set, active flags or view states differ.
    Buffers,
    /// Split shape, pane sizes or focus differ.
    Structure,
}

#[derive(Debug, Clone)]
pub struct ChangeDetector {
    snapshot: Option<LayoutNode>,
    ignore: IgnoreList,
    tolerance: f64,
}

impl ChangeDetector {
    pub fn new(ignore: IgnoreList, tolerance: f64) -> Self {
        Self {
            snapshot: None,
            ignore,
            tolerance,
        }
    }

    pub fn snapshot(&self) -> Option<&LayoutNode> {
        self.snapshot.as_ref()
    }

    /// Compare `candidate` against the stored snapshot without updating it.
    pub fn classify(&self, candidate: &LayoutNode) -> Option<ChangeReason> {
        let Some(previous) = &self.snapshot else {
            return Some(ChangeReason::Initial);
        };
        if self.ignore.visible_refs(previous) != self.ignore.visible_refs(candidate) {
            return Some(ChangeReason::Buffers);
        }
        let previous = self.ignore.filter_tree(previous);
        let candidate = self.ignore.filter_tree(candidate);
        (!previous.same_layout(&candidate, self.tolerance)).then_some(ChangeReason::Structure)
    }

    pub fn should_send(&self, candidate: &LayoutNode) -> bool {
        self.classify(candidate).is_some()
    }

    pub fn record(&mut self, tree: LayoutNode) {
        self.snapshot = Some(tree);
    }

    /// Classify and, on any difference, store `candidate` as the new snapshot.
    pub fn observe(&mut self, candidate: &LayoutNode) -> Option<ChangeReason> {
        let reason = self.classify(candidate)?;
        self.snapshot = Some(candidate.clone());
        Some(reason)
    }

    pub fn reset(&mut self) {
        self.snapshot = None;
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new(IgnoreList::default(), SIZE_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitsync_layout::{BufferRef, ViewState};

    fn view(line: u32) -> ViewState {
        ViewState {
            cursor_line: line,
            cursor_char: 0,
            scroll_top_line: 0,
            scroll_bottom_line: 30,
        }
    }

    fn pair(left_view: Option<ViewState>) -> LayoutNode {
        LayoutNode::side_by_side(vec![
            LayoutNode::leaf(vec![BufferRef::active("a.rs", left_view)]),
            LayoutNode::leaf_showing("b.rs"),
        ])
    }

    #[test]
    fn first_candidate_is_always_sent() {
        let detector = ChangeDetector::default();
        assert_eq!(detector.classify(&LayoutNode::default()), Some(ChangeReason::Initial));
    }

    #[test]
    fn identical_layout_is_skipped() {
        let mut detector = ChangeDetector::default();
        assert!(detector.observe(&pair(None)).is_some());
        assert_eq!(detector.observe(&pair(None)), None);
    }

    #[test]
    fn cursor_move_is_a_change() {
        let mut detector = ChangeDetector::default();
        detector.record(pair(Some(view(1))));
        assert_eq!(detector.classify(&pair(Some(view(2)))), Some(ChangeReason::Buffers));
    }

    #[test]
    fn active_flag_is_a_change() {
        let mut detector = ChangeDetector::default();
        let before = LayoutNode::leaf(vec![
            BufferRef::active("a.rs", None),
            BufferRef::background("b.rs"),
        ]);
        let after = LayoutNode::leaf(vec![
            BufferRef::background("a.rs"),
            BufferRef::active("b.rs", None),
        ]);
        detector.record(before);
        assert_eq!(detector.classify(&after), Some(ChangeReason::Buffers));
    }

    #[test]
    fn shape_change_with_same_buffers_is_sent() {
        let mut detector = ChangeDetector::default();
        detector.record(pair(None));
        let stacked = LayoutNode::stacked(vec![
            LayoutNode::leaf_showing("a.rs"),
            LayoutNode::leaf_showing("b.rs"),
        ]);
        assert_eq!(detector.classify(&stacked), Some(ChangeReason::Structure));
    }

    #[test]
    fn size_noise_within_tolerance_is_ignored() {
        let mut detector = ChangeDetector::new(IgnoreList::default(), 0.02);
        detector.record(pair(None).with_sizes(&[0.5, 0.5]));
        assert!(!detector.should_send(&pair(None).with_sizes(&[0.51, 0.49])));
        assert!(detector.should_send(&pair(None).with_sizes(&[0.6, 0.4])));
    }

    #[test]
    fn ignored_paths_do_not_count() {
        let ignore = IgnoreList::new(&[r"\.log$"]).unwrap();
        let mut detector = ChangeDetector::new(ignore, SIZE_TOLERANCE);
        detector.record(LayoutNode::leaf(vec![BufferRef::active("a.rs", None)]));
        let with_log = LayoutNode::leaf(vec![
            BufferRef::active("a.rs", None),
            BufferRef::background("out.log"),
        ]);
        assert_eq!(detector.classify(&with_log), None);
    }

    #[test]
    fn reset_forces_resend() {
        let mut detector = ChangeDetector::default();
        detector.record(pair(None));
        detector.reset();
        assert_eq!(detector.classify(&pair(None)), Some(ChangeReason::Initial));
    }
}
