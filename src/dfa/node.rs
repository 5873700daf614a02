use std::fmt;

/// Number of byte values that can label a transition.
///
/// Byte `0xFF` has no transition slot: it never continues a walk and a word
/// containing it cannot be stored.
pub const ALPHABET_SIZE: usize = 255;

/// Index of a node in the automaton's arena.
///
/// The all-ones value is reserved as the "absent" sentinel and never refers to
/// a node, so every valid index is strictly below `u32::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NodeIndex(u32);

impl NodeIndex {
    /// The root node. Always present in a built automaton.
    pub const ROOT: NodeIndex = NodeIndex(0);

    /// Sentinel stored in a transition slot that leads nowhere.
    pub const ABSENT: NodeIndex = NodeIndex(u32::MAX);

    /// Largest number of nodes an arena can address.
    pub const MAX_NODES: usize = u32::MAX as usize;

    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index < Self::MAX_NODES);
        NodeIndex(index as u32)
    }

    /// Position of the node in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// True for the sentinel value.
    #[inline]
    pub fn is_absent(self) -> bool {
        self == Self::ABSENT
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absent() {
            f.write_str("absent")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// One flag per byte value, packed into 256 bits.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ByteSet([u64; 4]);

impl ByteSet {
    /// An empty set.
    pub const fn new() -> Self {
        ByteSet([0; 4])
    }

    /// Adds `byte` to the set.
    #[inline]
    pub fn insert(&mut self, byte: u8) {
        self.0[usize::from(byte >> 6)] |= 1u64 << (byte & 63);
    }

    /// True if `byte` is in the set.
    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        self.0[usize::from(byte >> 6)] & (1u64 << (byte & 63)) != 0
    }

    /// Number of bytes in the set.
    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True if no byte is in the set.
    pub fn is_empty(&self) -> bool {
        self.0 == [0; 4]
    }

    /// Iterates over the bytes in the set in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(move |&b| self.contains(b))
    }
}

impl fmt::Debug for ByteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// A state of the automaton.
///
/// Transitions are direct-indexed by byte value. The end set records which
/// bytes, when consumed *from this node*, complete a word: the flag lives on
/// the parent of the terminal node, keyed by the word's last byte.
#[derive(Clone, PartialEq, Eq)]
pub struct DfaNode {
    next: [NodeIndex; ALPHABET_SIZE],
    ends: ByteSet,
}

impl DfaNode {
    /// Creates a node with no transitions and no end bytes.
    pub fn new() -> Self {
        DfaNode {
            next: [NodeIndex::ABSENT; ALPHABET_SIZE],
            ends: ByteSet::new(),
        }
    }

    /// Returns the child reached by consuming `byte`, if any.
    #[inline]
    pub fn get(&self, byte: u8) -> Option<NodeIndex> {
        let child = *self.next.get(usize::from(byte))?;
        (!child.is_absent()).then_some(child)
    }

    /// True if consuming `byte` from this node completes a word.
    #[inline]
    pub fn is_end(&self, byte: u8) -> bool {
        self.ends.contains(byte)
    }

    /// The set of bytes that complete a word from this node.
    pub fn ends(&self) -> &ByteSet {
        &self.ends
    }

    /// Iterates over `(byte, child)` for every present transition.
    pub fn children(&self) -> impl Iterator<Item = (u8, NodeIndex)> + '_ {
        self.next
            .iter()
            .enumerate()
            .filter(|(_, child)| !child.is_absent())
            .map(|(byte, &child)| (byte as u8, child))
    }

    /// Returns the number of present transitions.
    pub fn child_count(&self) -> usize {
        self.next.iter().filter(|child| !child.is_absent()).count()
    }

    /// Records the transition for `byte`.
    pub(crate) fn set(&mut self, byte: u8, child: NodeIndex) {
        debug_assert!(self.get(byte).is_none());
        self.next[usize::from(byte)] = child;
    }

    /// Marks `byte` as completing a word from this node.
    pub(crate) fn mark_end(&mut self, byte: u8) {
        debug_assert!(self.get(byte).is_some());
        self.ends.insert(byte);
    }
}

impl Default for DfaNode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DfaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DfaNode")
            .field("children", &self.children().collect::<Vec<_>>())
            .field("ends", &self.ends)
            .finish()
    }
}
