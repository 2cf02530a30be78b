use std::{convert::Infallible, fmt, mem};

use crate::ast::{CompOp, FilterNode, Joiner, Operand};

/// A node of the filter tree.
///
/// A node is either a leaf holding one [`FilterNode`], or a branch with a
/// left subtree and an optional right subtree. The joiner is attached to the
/// right subtree, so a right child without a joiner cannot be built, and
/// neither can a right child without a left one. Nodes are immutable once
/// constructed and own their subtrees exclusively, which makes a finished
/// tree safe to share between threads.
///
/// Parenthesized groups are branches with a left child and no right child.
///
/// # Examples
///
/// ```
/// use sift_query::ast::{CompOp, FilterNode, Joiner, JoinerNode, Literal};
///
/// let a = JoinerNode::leaf(FilterNode::scalar("a", CompOp::Equal, Literal::Integer(1)));
/// let b = JoinerNode::leaf(FilterNode::scalar("b", CompOp::Equal, Literal::Integer(2)));
/// let tree = JoinerNode::join(a, Joiner::And, b);
///
/// assert_eq!(tree.joiner(), Some(Joiner::And));
/// assert_eq!(tree.to_string(), "{ [a == 1] and [b == 2] }");
/// ```
pub struct JoinerNode {
    kind: NodeKind,
}

enum NodeKind {
    Leaf(FilterNode),
    Branch {
        left: Box<JoinerNode>,
        right: Option<(Joiner, Box<JoinerNode>)>,
    },
}

/// Work left over while folding a tree without recursion.
enum Frame<'a, V> {
    /// Visit this right subtree once the left value is known
    Right(Joiner, &'a JoinerNode),
    /// Combine this left value with the value of the right subtree
    Combine(V, Joiner),
}

/// Visitor form of [`JoinerNode::walk`].
///
/// Useful when the evaluation carries state that both callbacks need, such
/// as a record being matched or a buffer being written.
pub trait FilterVisitor {
    type Output;

    fn visit_filter(&mut self, filter: &FilterNode) -> Self::Output;

    fn combine(&mut self, left: Self::Output, joiner: Joiner, right: Self::Output)
        -> Self::Output;
}

impl JoinerNode {
    /// A node holding a single comparison.
    pub fn leaf(filter: FilterNode) -> Self {
        JoinerNode {
            kind: NodeKind::Leaf(filter),
        }
    }

    /// A node wrapping `inner` as its only (left) child.
    pub fn group(inner: JoinerNode) -> Self {
        JoinerNode {
            kind: NodeKind::Branch {
                left: Box::new(inner),
                right: None,
            },
        }
    }

    /// A node combining `left` and `right` with `joiner`.
    pub fn join(left: JoinerNode, joiner: Joiner, right: JoinerNode) -> Self {
        JoinerNode {
            kind: NodeKind::Branch {
                left: Box::new(left),
                right: Some((joiner, Box::new(right))),
            },
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn leaf_filter(&self) -> Option<&FilterNode> {
        match &self.kind {
            NodeKind::Leaf(filter) => Some(filter),
            NodeKind::Branch { .. } => None,
        }
    }

    pub fn left(&self) -> Option<&JoinerNode> {
        match &self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Branch { left, .. } => Some(left.as_ref()),
        }
    }

    pub fn right(&self) -> Option<&JoinerNode> {
        match &self.kind {
            NodeKind::Branch {
                right: Some((_, right)),
                ..
            } => Some(right.as_ref()),
            _ => None,
        }
    }

    /// The joiner between left and right, `None` when there is no right child.
    pub fn joiner(&self) -> Option<Joiner> {
        match &self.kind {
            NodeKind::Branch {
                right: Some((joiner, _)),
                ..
            } => Some(*joiner),
            _ => None,
        }
    }

    pub fn has_right(&self) -> bool {
        self.right().is_some()
    }

    /// Folds the tree into a single value.
    ///
    /// Leaves are handed to `evaluate`. A branch walks its left subtree and,
    /// if it has a right subtree, walks that too and returns
    /// `combine(left, joiner, right)`; otherwise the left value is returned
    /// unchanged. Subtrees are visited left before right.
    ///
    /// The walk keeps its own stack, so tree depth is bounded by memory only.
    ///
    /// # Examples
    ///
    /// ```
    /// let query = sift_query::parse("a == 1 and b == 2 or c == 3").unwrap();
    /// let tree = query.filter_root().unwrap();
    ///
    /// let rendered = tree.walk(
    ///     |filter| filter.key().to_string(),
    ///     |left, joiner, right| format!("({} {} {})", left, joiner, right),
    /// );
    /// assert_eq!(rendered, "((a and b) or c)");
    /// ```
    pub fn walk<'a, V, E, C>(&'a self, mut evaluate: E, mut combine: C) -> V
    where
        E: FnMut(&'a FilterNode) -> V,
        C: FnMut(V, Joiner, V) -> V,
    {
        let Ok(value) = self.drive(
            &mut (),
            |_, filter| Ok::<V, Infallible>(evaluate(filter)),
            |_, left, joiner, right| Ok(combine(left, joiner, right)),
        );
        value
    }

    /// Like [`walk`](Self::walk), but stops at the first error returned by
    /// either callback.
    pub fn try_walk<'a, V, X, E, C>(&'a self, mut evaluate: E, mut combine: C) -> Result<V, X>
    where
        E: FnMut(&'a FilterNode) -> Result<V, X>,
        C: FnMut(V, Joiner, V) -> Result<V, X>,
    {
        self.drive(
            &mut (),
            |_, filter| evaluate(filter),
            |_, left, joiner, right| combine(left, joiner, right),
        )
    }

    /// Visitor form of [`walk`](Self::walk), with the same associativity.
    pub fn fold<V: FilterVisitor>(&self, visitor: &mut V) -> V::Output {
        let Ok(value) = self.drive(
            visitor,
            |visitor, filter| Ok::<_, Infallible>(visitor.visit_filter(filter)),
            |visitor, left, joiner, right| Ok(visitor.combine(left, joiner, right)),
        );
        value
    }

    /// Post-order fold over the tree with an explicit stack.
    ///
    /// `state` is lent to both callbacks in turn, which lets the visitor form
    /// share one `&mut` between them. Groups pass their child's value through.
    fn drive<'a, S, V, X>(
        &'a self,
        state: &mut S,
        mut evaluate: impl FnMut(&mut S, &'a FilterNode) -> Result<V, X>,
        mut combine: impl FnMut(&mut S, V, Joiner, V) -> Result<V, X>,
    ) -> Result<V, X>
    where
        S: ?Sized,
    {
        let mut pending: Vec<Frame<'a, V>> = Vec::new();
        let mut node = self;
        loop {
            let mut value = loop {
                match &node.kind {
                    NodeKind::Leaf(filter) => break evaluate(state, filter)?,
                    NodeKind::Branch { left, right } => {
                        if let Some((joiner, right)) = right {
                            pending.push(Frame::Right(*joiner, right.as_ref()));
                        }
                        node = left.as_ref();
                    }
                }
            };

            loop {
                match pending.pop() {
                    None => return Ok(value),
                    Some(Frame::Combine(left, joiner)) => {
                        value = combine(state, left, joiner, value)?;
                    }
                    Some(Frame::Right(joiner, right)) => {
                        pending.push(Frame::Combine(value, joiner));
                        node = right;
                        break;
                    }
                }
            }
        }
    }

    /// All comparisons of the tree, left to right.
    pub fn filters(&self) -> Vec<&FilterNode> {
        self.walk(
            |filter| vec![filter],
            |mut left, _, right| {
                left.extend(right);
                left
            },
        )
    }
}

impl From<FilterNode> for JoinerNode {
    fn from(filter: FilterNode) -> Self {
        JoinerNode::leaf(filter)
    }
}

impl fmt::Display for JoinerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Step<'a> {
            Node(&'a JoinerNode),
            Joiner(Joiner),
            Close,
        }

        let mut steps = vec![Step::Node(self)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Node(node) => match &node.kind {
                    NodeKind::Leaf(filter) => write!(f, "{}", filter)?,
                    NodeKind::Branch { left, right: None } => steps.push(Step::Node(left.as_ref())),
                    NodeKind::Branch {
                        left,
                        right: Some((joiner, right)),
                    } => {
                        f.write_str("{ ")?;
                        steps.push(Step::Close);
                        steps.push(Step::Node(right.as_ref()));
                        steps.push(Step::Joiner(*joiner));
                        steps.push(Step::Node(left.as_ref()));
                    }
                },
                Step::Joiner(joiner) => write!(f, " {} ", joiner)?,
                Step::Close => f.write_str(" }")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for JoinerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JoinerNode({})", self)
    }
}

impl Clone for JoinerNode {
    fn clone(&self) -> Self {
        enum Step<'a> {
            Group,
            Right(Joiner, &'a JoinerNode),
            Join(JoinerNode, Joiner),
        }

        let mut pending = Vec::new();
        let mut node = self;
        loop {
            let mut copy = loop {
                match &node.kind {
                    NodeKind::Leaf(filter) => break JoinerNode::leaf(filter.clone()),
                    NodeKind::Branch { left, right } => {
                        pending.push(match right {
                            Some((joiner, right)) => Step::Right(*joiner, right.as_ref()),
                            None => Step::Group,
                        });
                        node = left.as_ref();
                    }
                }
            };

            loop {
                match pending.pop() {
                    None => return copy,
                    Some(Step::Group) => copy = JoinerNode::group(copy),
                    Some(Step::Join(left, joiner)) => copy = JoinerNode::join(left, joiner, copy),
                    Some(Step::Right(joiner, right)) => {
                        pending.push(Step::Join(copy, joiner));
                        node = right;
                        break;
                    }
                }
            }
        }
    }
}

impl PartialEq for JoinerNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            match (&a.kind, &b.kind) {
                (NodeKind::Leaf(x), NodeKind::Leaf(y)) => {
                    if x != y {
                        return false;
                    }
                }
                (
                    NodeKind::Branch {
                        left: a_left,
                        right: a_right,
                    },
                    NodeKind::Branch {
                        left: b_left,
                        right: b_right,
                    },
                ) => {
                    match (a_right, b_right) {
                        (Some((a_joiner, a_right)), Some((b_joiner, b_right))) => {
                            if a_joiner != b_joiner {
                                return false;
                            }
                            pending.push((a_right.as_ref(), b_right.as_ref()));
                        }
                        (None, None) => {}
                        _ => return false,
                    }
                    pending.push((a_left.as_ref(), b_left.as_ref()));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Drop for JoinerNode {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        self.kind.detach(&mut detached);
        while let Some(mut node) = detached.pop() {
            node.kind.detach(&mut detached);
        }
    }
}

impl NodeKind {
    /// Turns a branch into an empty leaf and hands its children to `out`,
    /// so dropping them does not recurse.
    fn detach(&mut self, out: &mut Vec<Box<JoinerNode>>) {
        if let NodeKind::Leaf(_) = self {
            return;
        }
        let empty = NodeKind::Leaf(FilterNode::new(
            String::new(),
            CompOp::Equal,
            Operand::List(Vec::new()),
        ));
        if let NodeKind::Branch { left, right } = mem::replace(self, empty) {
            out.push(left);
            out.extend(right.map(|(_, right)| right));
        }
    }
}
