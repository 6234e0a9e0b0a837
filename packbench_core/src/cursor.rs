/// Read or write position inside one integer buffer.
///
/// A cursor starts at zero and only moves forward. Codec calls take their
/// cursors by value and hand the advanced pair back in a [`Progress`], so two
/// consecutive calls (bulk then remainder) share one logical buffer without
/// either of them knowing about the other: the second call simply starts
/// where the first one stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor(usize);

impl Cursor {
    /// Cursor at offset 0.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Cursor at an explicit offset, for callers that embed a codec stream
    /// inside a larger buffer.
    pub const fn at(pos: usize) -> Self {
        Self(pos)
    }

    #[inline]
    pub const fn value(self) -> usize {
        self.0
    }

    #[inline]
    pub fn advance(&mut self, by: usize) {
        self.0 += by;
    }

    /// Copy of this cursor advanced by `by`.
    #[inline]
    pub const fn advanced(self, by: usize) -> Self {
        Self(self.0 + by)
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cursor pair returned by every codec call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Input position after the call: elements consumed on compress, words
    /// consumed on decompress.
    pub input: Cursor,
    /// Output position after the call: words written on compress, elements
    /// written on decompress.
    pub output: Cursor,
}

impl Progress {
    pub const fn new(input: Cursor, output: Cursor) -> Self {
        Self { input, output }
    }

    /// Elements or words consumed since `start`.
    pub fn consumed_since(&self, start: Cursor) -> usize {
        self.input.value() - start.value()
    }

    /// Words or elements produced since `start`.
    pub fn produced_since(&self, start: Cursor) -> usize {
        self.output.value() - start.value()
    }
}
