//! Positional addressing into recursively nested trees.
//!
//! An access path is the sequence of child indices walked from the top-level
//! list down to a node: `[2, 0]` is the first child of the third root. Paths
//! are never stored on nodes; any insertion or removal among an ancestor's
//! siblings shifts them, so callers recompute paths from the current snapshot
//! (see [`find_path`]) instead of caching them.
//!
//! Every helper fails closed: an index that is out of range at any level
//! yields `None`/`false` and leaves the tree untouched.

/// Child indices from the top-level list down to a node.
pub type AccessPath = Vec<usize>;

/// A node that owns an ordered list of children of its own type.
pub trait Nested: Sized {
    fn children(&self) -> &[Self];
    fn children_mut(&mut self) -> &mut Vec<Self>;
}

/// Resolve `path` to a node. The empty path names the (implicit) root list,
/// which is not a node, so it resolves to `None`.
pub fn resolve<'a, T: Nested>(roots: &'a [T], path: &[usize]) -> Option<&'a T> {
    let (first, rest) = path.split_first()?;
    let mut node = roots.get(*first)?;
    for &idx in rest {
        node = node.children().get(idx)?;
    }
    Some(node)
}

/// Mutable variant of [`resolve`].
pub fn resolve_mut<'a, T: Nested>(roots: &'a mut [T], path: &[usize]) -> Option<&'a mut T> {
    let (first, rest) = path.split_first()?;
    let mut node = roots.get_mut(*first)?;
    for &idx in rest {
        node = node.children_mut().get_mut(idx)?;
    }
    Some(node)
}

/// Child list addressed by `path`: the root list for `[]`, otherwise the
/// children of the node at `path`.
pub fn child_list_mut<'a, T: Nested>(roots: &'a mut Vec<T>, path: &[usize]) -> Option<&'a mut Vec<T>> {
    if path.is_empty() {
        return Some(roots);
    }
    resolve_mut(roots, path).map(Nested::children_mut)
}

/// Sibling list containing the node at `path`, plus the node's index in it.
/// Only returns when the node itself exists.
pub fn siblings_mut<'a, T: Nested>(roots: &'a mut Vec<T>, path: &[usize]) -> Option<(&'a mut Vec<T>, usize)> {
    let (&last, parent) = path.split_last()?;
    let list = child_list_mut(roots, parent)?;
    if last < list.len() { Some((list, last)) } else { None }
}

/// Insert `node` as the sibling immediately before the node at `path`.
pub fn insert_before<T: Nested>(roots: &mut Vec<T>, path: &[usize], node: T) -> bool {
    match siblings_mut(roots, path) {
        Some((list, idx)) => {
            list.insert(idx, node);
            true
        }
        None => false,
    }
}

/// Insert `node` as the sibling immediately after the node at `path`.
pub fn insert_after<T: Nested>(roots: &mut Vec<T>, path: &[usize], node: T) -> bool {
    match siblings_mut(roots, path) {
        Some((list, idx)) => {
            list.insert(idx + 1, node);
            true
        }
        None => false,
    }
}

/// Append `node` as the last child of the node at `path` (`[]` appends a root).
pub fn insert_child<T: Nested>(roots: &mut Vec<T>, path: &[usize], node: T) -> bool {
    match child_list_mut(roots, path) {
        Some(list) => {
            list.push(node);
            true
        }
        None => false,
    }
}

/// Remove the node at `path` together with its whole subtree.
pub fn remove<T: Nested>(roots: &mut Vec<T>, path: &[usize]) -> Option<T> {
    let (list, idx) = siblings_mut(roots, path)?;
    Some(list.remove(idx))
}

/// Pre-order search; returns the path of the first node matching `pred`.
pub fn find_path<T: Nested>(roots: &[T], pred: impl Fn(&T) -> bool + Copy) -> Option<AccessPath> {
    fn search<T: Nested>(list: &[T], pred: impl Fn(&T) -> bool + Copy, prefix: &mut AccessPath) -> bool {
        for (idx, node) in list.iter().enumerate() {
            prefix.push(idx);
            if pred(node) || search(node.children(), pred, prefix) {
                return true;
            }
            prefix.pop();
        }
        false
    }

    let mut path = AccessPath::new();
    search(roots, pred, &mut path).then_some(path)
}

/// Visit every node in pre-order together with its path.
pub fn walk<T: Nested>(roots: &[T], mut visit: impl FnMut(&[usize], &T)) {
    fn inner<T: Nested>(list: &[T], prefix: &mut AccessPath, visit: &mut impl FnMut(&[usize], &T)) {
        for (idx, node) in list.iter().enumerate() {
            prefix.push(idx);
            visit(prefix.as_slice(), node);
            inner(node.children(), prefix, visit);
            prefix.pop();
        }
    }
    inner(roots, &mut AccessPath::new(), &mut visit);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Node {
        tag: &'static str,
        kids: Vec<Node>,
    }

    impl Nested for Node {
        fn children(&self) -> &[Self] {
            &self.kids
        }
        fn children_mut(&mut self) -> &mut Vec<Self> {
            &mut self.kids
        }
    }

    fn n(tag: &'static str, kids: Vec<Node>) -> Node {
        Node { tag, kids }
    }

    fn sample() -> Vec<Node> {
        vec![n("a", vec![n("a0", vec![]), n("a1", vec![n("a10", vec![])])]), n("b", vec![])]
    }

    #[test]
    fn test_resolve_walks_children() {
        let tree = sample();
        assert_eq!(resolve(&tree, &[0, 1, 0]).map(|x| x.tag), Some("a10"));
        assert_eq!(resolve(&tree, &[1]).map(|x| x.tag), Some("b"));
        assert!(resolve(&tree, &[]).is_none());
        assert!(resolve(&tree, &[0, 5]).is_none());
        assert!(resolve(&tree, &[2]).is_none());
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut tree = sample();
        assert!(insert_before(&mut tree, &[0, 1], n("x", vec![])));
        assert_eq!(resolve(&tree, &[0, 1]).map(|x| x.tag), Some("x"));
        assert_eq!(resolve(&tree, &[0, 2]).map(|x| x.tag), Some("a1"));

        assert!(insert_after(&mut tree, &[1], n("y", vec![])));
        assert_eq!(resolve(&tree, &[2]).map(|x| x.tag), Some("y"));
    }

    #[test]
    fn test_stale_paths_leave_tree_untouched() {
        let mut tree = sample();
        let before = tree.clone();
        assert!(!insert_before(&mut tree, &[3], n("x", vec![])));
        assert!(!insert_after(&mut tree, &[0, 9], n("x", vec![])));
        assert!(!insert_child(&mut tree, &[1, 0], n("x", vec![])));
        assert!(remove(&mut tree, &[]).is_none());
        assert!(remove(&mut tree, &[0, 1, 4]).is_none());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_insert_child_is_reachable_at_len() {
        let mut tree = sample();
        let len = resolve(&tree, &[0]).map(|x| x.kids.len()).unwrap();
        assert!(insert_child(&mut tree, &[0], n("new", vec![])));
        assert_eq!(resolve(&tree, &[0, len]).map(|x| x.tag), Some("new"));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut tree = sample();
        let removed = remove(&mut tree, &[0]).unwrap();
        assert_eq!(removed.tag, "a");
        assert_eq!(tree.len(), 1);
        assert!(find_path(&tree, |x| x.tag == "a10").is_none());
    }

    #[test]
    fn test_find_path_and_walk() {
        let tree = sample();
        assert_eq!(find_path(&tree, |x| x.tag == "a10"), Some(vec![0, 1, 0]));
        assert_eq!(find_path(&tree, |x| x.tag == "zzz"), None);

        let mut seen = Vec::new();
        walk(&tree, |path, node| seen.push((path.to_vec(), node.tag)));
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[3], (vec![0, 1, 0], "a10"));
    }
}
