//! Frame selection - which incoming frames get sampled.

use crate::source::{Frame, FrameSource, SourceError};

/// What to do with the next incoming frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Sample this frame.
    Take,
    /// Discard this frame unprocessed.
    Skip,
    /// The frame cap is reached; stop reading.
    Stop,
}

/// Skip/cap policy over a 0-indexed frame stream.
///
/// Frame `i` is taken iff `i % (skip + 1) == 0`, until `max_frames` frames
/// have been taken (0 = unlimited).
#[derive(Debug, Clone)]
pub struct FrameSelector {
    skip: u64,
    max_frames: u64,
    seen: u64,
    selected: u64,
}

impl FrameSelector {
    pub fn new(skip: u64, max_frames: u64) -> Self {
        Self {
            skip,
            max_frames,
            seen: 0,
            selected: 0,
        }
    }

    /// Whether the cap has been reached.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.max_frames > 0 && self.selected >= self.max_frames
    }

    /// Decide the fate of the next incoming frame and advance.
    pub fn next_selection(&mut self) -> Selection {
        if self.is_done() {
            return Selection::Stop;
        }

        let index = self.seen;
        self.seen += 1;
        if index % (self.skip + 1) == 0 {
            self.selected += 1;
            Selection::Take
        } else {
            Selection::Skip
        }
    }

    /// Frames read from upstream so far.
    pub fn seen(&self) -> u64 {
        self.seen
    }

    /// Frames taken so far.
    pub fn selected(&self) -> u64 {
        self.selected
    }

    /// Number of frames taken from a stream of `len` frames.
    pub fn expected_count(len: u64, skip: u64, max_frames: u64) -> u64 {
        let taken = len.div_ceil(skip + 1);
        if max_frames > 0 {
            taken.min(max_frames)
        } else {
            taken
        }
    }

    /// Pull selected frames from `source`, discarding the rest unprocessed.
    pub fn select<'s, S: FrameSource + ?Sized>(self, source: &'s mut S) -> SelectedFrames<'s, S> {
        SelectedFrames {
            source,
            selector: self,
        }
    }
}

/// Iterator over `(source_index, frame)` pairs chosen by a [`FrameSelector`].
pub struct SelectedFrames<'s, S: ?Sized> {
    source: &'s mut S,
    selector: FrameSelector,
}

impl<S: ?Sized> SelectedFrames<'_, S> {
    pub fn selector(&self) -> &FrameSelector {
        &self.selector
    }
}

impl<S: FrameSource + ?Sized> Iterator for SelectedFrames<'_, S> {
    type Item = Result<(u64, Frame), SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.selector.is_done() {
                return None;
            }
            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            };

            let index = self.selector.seen();
            match self.selector.next_selection() {
                Selection::Take => return Some(Ok((index, frame))),
                Selection::Skip => continue,
                Selection::Stop => return None,
            }
        }
    }
}
