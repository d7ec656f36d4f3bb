/// Redraw counter.
///
/// There is no animation loop; a frame is produced only when an input event
/// changes what is on screen, so the index counts redraws.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
}

impl Frame {
    pub fn new(index: u64) -> Self {
        Self { index }
    }

    pub fn next(self) -> Self {
        Self::new(self.index.wrapping_add(1))
    }
}
