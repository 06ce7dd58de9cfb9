//! Block-based node arena.
//!
//! Nodes are bump-allocated into fixed-capacity blocks. A block never grows
//! past its capacity, so nodes never move once allocated; a full block is
//! followed by a fresh one. There is no way to free a single node, the
//! whole arena is dropped with the [`Ast`](super::Ast) that owns it.

use serde::{Serialize, Serializer};

use super::Node;

/// Number of nodes per block.
pub const BLOCK_CAPACITY: usize = 256;

/// Stable handle of a node inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Global index of the node: `block * BLOCK_CAPACITY + slot`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    const fn block(self) -> usize {
        self.index() / BLOCK_CAPACITY
    }

    const fn slot(self) -> usize {
        self.index() % BLOCK_CAPACITY
    }
}

/// Owner of every node of one parse.
#[derive(Debug, Clone, Default)]
pub struct NodeArena<'a> {
    blocks: Vec<Vec<Node<'a>>>,
}

impl<'a> NodeArena<'a> {
    /// Creates an empty arena. The first block is opened on first use.
    #[must_use]
    pub const fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Stores a node and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics when the node count no longer fits a `u32` handle.
    pub fn alloc(&mut self, node: Node<'a>) -> NodeId {
        if self
            .blocks
            .last()
            .is_none_or(|block| block.len() == BLOCK_CAPACITY)
        {
            self.blocks.push(Vec::with_capacity(BLOCK_CAPACITY));
        }
        let block_index = self.blocks.len() - 1;
        let block = &mut self.blocks[block_index];
        let index = block_index * BLOCK_CAPACITY + block.len();
        let Ok(raw) = u32::try_from(index) else {
            panic!("node arena index overflow");
        };
        block.push(node);
        NodeId(raw)
    }

    /// Returns the node behind a handle.
    ///
    /// # Panics
    ///
    /// Panics when the handle comes from another arena and is out of range.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node<'a> {
        &self.blocks[id.block()][id.slot()]
    }

    /// Mutable access for the parser. Besides filling in a node under
    /// construction, enclosing rules use it to set modifier flags (`NOT`,
    /// sign, parentheses, sort order) on a node a child rule returned. No
    /// node changes once the parse has finished.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<'a> {
        &mut self.blocks[id.block()][id.slot()]
    }

    /// Number of allocated nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.iter().map(Vec::len).sum()
    }

    /// Returns true when nothing was allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of blocks opened so far.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Iterates all nodes with their handles, in allocation order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<'a>)> {
        self.blocks
            .iter()
            .flatten()
            .enumerate()
            .map(|(index, node)| (NodeId(index as u32), node))
    }
}

/// Serialized as one flat sequence, so a node's position is its handle.
impl Serialize for NodeArena<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.blocks.iter().flatten())
    }
}
