//! Paths that never take part in sync (scratch buffers, VCS internals).

use regex::Regex;
use splitsync_layout::{BufferRef, LayoutNode};
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    patterns: Vec<Regex>,
}

impl IgnoreList {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    /// Like [`IgnoreList::new`], but invalid patterns are logged and skipped.
    pub fn lenient<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| {
                let pattern: &str = p.as_ref();
                match Regex::new(pattern) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!(pattern, error = %e, "ignoring invalid ignore pattern");
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(path))
    }

    pub fn filter_paths(&self, paths: &[String]) -> Vec<String> {
        paths
            .iter()
            .filter(|p| !self.is_ignored(p))
            .cloned()
            .collect()
    }

    /// Copy of `tree` with ignored buffers removed from every leaf.
    pub fn filter_tree(&self, tree: &LayoutNode) -> LayoutNode {
        let mut out = tree.clone();
        if !self.is_empty() {
            out.for_each_leaf_mut(&mut |leaf| leaf.buffers.retain(|b| !self.is_ignored(&b.path)));
        }
        out
    }

    /// Non-ignored buffer refs of `tree`, flattened in leaf order.
    pub fn visible_refs<'a>(&self, tree: &'a LayoutNode) -> Vec<&'a BufferRef> {
        tree.buffer_refs()
            .into_iter()
            .filter(|b| !self.is_ignored(&b.path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_any_pattern() {
        let list = IgnoreList::new(&[r"\.git/", r"^/tmp/"]).unwrap();
        assert!(list.is_ignored("/repo/.git/COMMIT_EDITMSG"));
        assert!(list.is_ignored("/tmp/scratch"));
        assert!(!list.is_ignored("/repo/src/main.rs"));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(IgnoreList::new(&["("]).is_err());
        let lenient = IgnoreList::lenient(&["(", r"\.log$"]);
        assert!(lenient.is_ignored("build.log"));
    }

    #[test]
    fn filter_tree_removes_ignored_buffers() {
        let list = IgnoreList::new(&[r"\.log$"]).unwrap();
        let tree = LayoutNode::side_by_side(vec![
            LayoutNode::leaf(vec![
                BufferRef::active("a.rs", None),
                BufferRef::background("build.log"),
            ]),
            LayoutNode::leaf_showing("run.log"),
        ]);
        let filtered = list.filter_tree(&tree);
        let paths: Vec<&str> = filtered
            .buffer_refs()
            .into_iter()
            .map(|b| b.path.as_str())
            .collect();
        assert_eq!(paths, vec!["a.rs"]);
        assert_eq!(filtered.leaf_count(), 2);
    }

    #[test]
    fn empty_list_ignores_nothing() {
        let list = IgnoreList::default();
        assert!(!list.is_ignored("anything"));
        assert_eq!(list.filter_paths(&["a".into()]), vec!["a".to_string()]);
    }
}
