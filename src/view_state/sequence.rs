//! Marker-bounded fragment sequence.
//!
//! Each rendered item owns a `Begin`/`End` marker pair. Everything between the
//! two markers is that item's output, however many fragments the view factory
//! produced, so an item can be replaced in place without knowing its size.

use crate::model::MarkerId;
use thiserror::Error;

/// One node of the rendered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<F> {
    /// Opening boundary of an item's output.
    Begin(MarkerId),
    /// One output fragment.
    Fragment(F),
    /// Closing boundary of an item's output.
    End(MarkerId),
}

/// Marker lookup failure during a splice.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
    /// Marker is not part of this sequence.
    #[error("{0} is not in the rendered sequence")]
    UnknownMarker(MarkerId),

    /// End marker precedes its begin marker.
    #[error("{end} precedes {begin}")]
    Misordered {
        /// Begin marker of the pair.
        begin: MarkerId,
        /// End marker of the pair.
        end: MarkerId,
    },
}

/// Ordered arena of marker pairs and fragments.
#[derive(Debug, Clone)]
pub struct RenderedSequence<F> {
    nodes: Vec<Node<F>>,
    next_marker: u64,
}

impl<F> Default for RenderedSequence<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> RenderedSequence<F> {
    /// Empty sequence.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            next_marker: 0,
        }
    }

    fn allocate_pair(&mut self) -> (MarkerId, MarkerId) {
        let begin = MarkerId::from_raw(self.next_marker);
        let end = MarkerId::from_raw(self.next_marker + 1);
        self.next_marker += 2;
        (begin, end)
    }

    /// Append `fragments` at the tail, bounded by a fresh marker pair.
    pub fn push_back(&mut self, fragments: Vec<F>) -> (MarkerId, MarkerId) {
        let (begin, end) = self.allocate_pair();
        self.nodes.reserve(fragments.len() + 2);
        self.nodes.push(Node::Begin(begin));
        self.nodes.extend(fragments.into_iter().map(Node::Fragment));
        self.nodes.push(Node::End(end));
        (begin, end)
    }

    /// Insert `fragments` at the very front, bounded by a fresh marker pair.
    pub fn push_front(&mut self, fragments: Vec<F>) -> (MarkerId, MarkerId) {
        let (begin, end) = self.allocate_pair();
        let block = std::iter::once(Node::Begin(begin))
            .chain(fragments.into_iter().map(Node::Fragment))
            .chain(std::iter::once(Node::End(end)));
        self.nodes.splice(0..0, block);
        (begin, end)
    }

    /// Replace everything strictly between `begin` and `end` with `fragments`.
    ///
    /// The markers keep their identity and position. Returns the fragments that
    /// were removed.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError` if either marker is missing or the pair is reversed.
    pub fn splice(
        &mut self,
        begin: MarkerId,
        end: MarkerId,
        fragments: Vec<F>,
    ) -> Result<Vec<F>, SequenceError> {
        let start = self
            .position(begin)
            .ok_or(SequenceError::UnknownMarker(begin))?;
        let stop = self
            .position(end)
            .ok_or(SequenceError::UnknownMarker(end))?;
        if stop <= start {
            return Err(SequenceError::Misordered { begin, end });
        }

        let removed = self
            .nodes
            .splice(start + 1..stop, fragments.into_iter().map(Node::Fragment))
            .filter_map(|node| match node {
                Node::Fragment(fragment) => Some(fragment),
                Node::Begin(_) | Node::End(_) => None,
            })
            .collect();
        Ok(removed)
    }

    /// Index of a marker node.
    pub fn position(&self, marker: MarkerId) -> Option<usize> {
        self.nodes.iter().position(|node| match node {
            Node::Begin(m) | Node::End(m) => *m == marker,
            Node::Fragment(_) => false,
        })
    }

    /// Fragments between a marker pair, in order.
    pub fn fragments_between(&self, begin: MarkerId, end: MarkerId) -> Option<Vec<&F>> {
        let start = self.position(begin)?;
        let stop = self.position(end)?;
        if stop <= start {
            return None;
        }
        Some(
            self.nodes[start + 1..stop]
                .iter()
                .filter_map(|node| match node {
                    Node::Fragment(fragment) => Some(fragment),
                    _ => None,
                })
                .collect(),
        )
    }

    /// All fragments in display order, markers skipped.
    pub fn fragments(&self) -> impl Iterator<Item = &F> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            Node::Fragment(fragment) => Some(fragment),
            Node::Begin(_) | Node::End(_) => None,
        })
    }

    /// Raw node view, markers included.
    pub fn nodes(&self) -> &[Node<F>] {
        &self.nodes
    }

    /// Begin markers in display order.
    pub fn begin_markers(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            Node::Begin(marker) => Some(*marker),
            _ => None,
        })
    }

    /// Number of fragments.
    pub fn fragment_count(&self) -> usize {
        self.fragments().count()
    }

    /// True when no marker pair is present.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node. Marker ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}
