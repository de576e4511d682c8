//! LZ77 match engine with a sliding window and an ordered substring index.
//!
//! The engine walks the input emitting (offset, length, literal) triples.
//! Match search keeps every live window suffix in a lexicographically
//! ordered multiset: the longest common prefix with the best match is
//! guaranteed to appear adjacent to the candidate's sort position, so only
//! the two neighboring entries need to be compared.

use std::collections::{BTreeSet, VecDeque};
use std::ops::Bound;

/// Sliding search buffer size: how far back a match may reach.
pub const SEARCH_BUFFER_SIZE: usize = 2048;

/// Look-ahead buffer size: the longest candidate string matched at once.
pub const LOOKAHEAD_SIZE: usize = 255;

/// Longest emittable match. One byte of look-ahead is always reserved for
/// the trailing literal every match triple carries.
pub const MAX_MATCH_LENGTH: usize = LOOKAHEAD_SIZE - 1;

/// One LZ77 emission: a back-reference run followed by one literal byte.
///
/// `offset == 0 && length == 0` encodes "no match, literal only".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triple {
    /// Distance back from the current position to the match start (0..=2048).
    pub offset: u16,
    /// Length of the matched run (0..=254).
    pub length: u8,
    /// The literal byte following the matched run.
    pub literal: u8,
}

impl Triple {
    /// A literal-only triple.
    pub fn literal(byte: u8) -> Self {
        Self {
            offset: 0,
            length: 0,
            literal: byte,
        }
    }

    /// True when this triple carries no back-reference.
    pub fn is_literal(&self) -> bool {
        self.length == 0
    }

    /// Input bytes consumed by this triple: the matched run plus the literal.
    pub fn consumed(&self) -> usize {
        self.length as usize + 1
    }
}

/// Index entry: the window suffix anchored at a position, capped at
/// [`LOOKAHEAD_SIZE`] bytes since no common prefix can be longer.
type Entry = (Box<[u8]>, usize);

/// Ordered multiset of the suffixes anchored at every live window position.
///
/// Entries are ordered lexicographically by suffix, then by anchor
/// position to keep duplicates distinct. Eviction follows insertion order
/// exactly (first in, first out) so the index always mirrors the live
/// window.
#[derive(Debug, Default)]
pub struct SubstringIndex {
    entries: BTreeSet<Entry>,
    order: VecDeque<Entry>,
}

impl SubstringIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries. Never exceeds [`SEARCH_BUFFER_SIZE`].
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the first position has been consumed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert the suffix anchored at `anchor`.
    fn insert(&mut self, suffix: Box<[u8]>, anchor: usize) {
        self.order.push_back((suffix.clone(), anchor));
        self.entries.insert((suffix, anchor));
    }

    /// Remove entries whose anchor slid out of the search buffer.
    fn evict_before(&mut self, oldest_live: usize) {
        while let Some(front) = self.order.front() {
            if front.1 >= oldest_live {
                break;
            }
            let entry = self.order.pop_front().unwrap();
            self.entries.remove(&entry);
        }
    }

    /// Find the best match for `candidate` among the live suffixes.
    ///
    /// Locates the candidate's insertion point and compares the common
    /// prefix against the lexicographic predecessor and successor only.
    /// The longer prefix wins; a tie prefers the anchor closer to
    /// `current` (the smaller offset). Returns `(anchor, length)`.
    fn best_match(&self, candidate: &[u8], current: usize) -> Option<(usize, usize)> {
        if candidate.is_empty() {
            return None;
        }
        let probe: Entry = (Box::from(candidate), 0);

        let below = self
            .entries
            .range((Bound::Unbounded, Bound::Excluded(&probe)))
            .next_back();
        let above = self
            .entries
            .range((Bound::Included(&probe), Bound::Unbounded))
            .next();

        let mut best: Option<(usize, usize)> = None;
        for (suffix, anchor) in below.into_iter().chain(above) {
            // Anchors are evicted eagerly, but never trust a stale entry.
            if current - anchor > SEARCH_BUFFER_SIZE {
                continue;
            }
            let length = common_prefix_len(suffix, candidate);
            if length == 0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_anchor, best_length)) => {
                    length > best_length || (length == best_length && *anchor > best_anchor)
                }
            };
            if better {
                best = Some((*anchor, length));
            }
        }
        best
    }
}

/// Length of the common prefix of two byte strings.
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Drives the sliding window over the input, emitting one triple per step.
///
/// The window is two contiguous views over the input: the search buffer
/// (up to [`SEARCH_BUFFER_SIZE`] already-consumed bytes) and the
/// look-ahead buffer (up to [`LOOKAHEAD_SIZE`] upcoming bytes). Both move
/// together as triples are emitted.
pub struct MatchFinder<'a> {
    data: &'a [u8],
    pos: usize,
    index: SubstringIndex,
}

impl<'a> MatchFinder<'a> {
    /// Create a match finder over the whole input.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            index: SubstringIndex::new(),
        }
    }

    /// Current position: the boundary between search and look-ahead buffers.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The already-consumed bytes reachable by a match.
    pub fn search_buffer(&self) -> &[u8] {
        &self.data[self.pos.saturating_sub(SEARCH_BUFFER_SIZE)..self.pos]
    }

    /// The upcoming bytes being matched.
    pub fn lookahead(&self) -> &[u8] {
        let end = (self.pos + LOOKAHEAD_SIZE).min(self.data.len());
        &self.data[self.pos..end]
    }

    /// Number of live entries in the substring index.
    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    /// Emit the next triple, or `None` once the look-ahead is empty.
    pub fn next_triple(&mut self) -> Option<Triple> {
        if self.pos >= self.data.len() {
            return None;
        }

        let remaining = self.data.len() - self.pos;
        // The trailing literal must always exist, so a match may cover at
        // most remaining - 1 bytes.
        let max_length = (remaining - 1).min(MAX_MATCH_LENGTH);

        let triple = match self.index.best_match(self.lookahead(), self.pos) {
            Some((anchor, length)) if max_length > 0 => {
                let length = length.min(max_length);
                Triple {
                    offset: (self.pos - anchor) as u16,
                    length: length as u8,
                    literal: self.data[self.pos + length],
                }
            }
            _ => Triple::literal(self.data[self.pos]),
        };

        self.advance(triple.consumed());
        Some(triple)
    }

    /// Slide the window forward by `n` consumed positions, inserting the
    /// suffix anchored at each and evicting anchors that fell out of the
    /// search buffer, in insertion order.
    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            let end = (self.pos + LOOKAHEAD_SIZE).min(self.data.len());
            self.index
                .insert(Box::from(&self.data[self.pos..end]), self.pos);
            self.pos += 1;
            let oldest_live = self.pos.saturating_sub(SEARCH_BUFFER_SIZE);
            self.index.evict_before(oldest_live);
        }
    }
}
