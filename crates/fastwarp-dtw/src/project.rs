//! Projection of a coarse-resolution warp path into a fine-resolution
//! search window.

use crate::paa::Paa;
use crate::path::WarpPath;
use crate::window::SearchWindow;

/// Tracks the fine-resolution origin of the block occupied by a coarse path
/// as it advances along one axis.
///
/// The origin moves by the block size of the *previous* coarse index, at the
/// moment the path first leaves it — not by the size of the block being
/// entered. The two differ whenever block sizes are uneven, and the projected
/// window is only correct with the former.
#[derive(Debug)]
struct BlockCursor<'a> {
    blocks: &'a [usize],
    position: usize,
    last: Option<usize>,
}

impl<'a> BlockCursor<'a> {
    fn new(blocks: &'a [usize]) -> Self {
        Self {
            blocks,
            position: 0,
            last: None,
        }
    }

    /// Move the cursor to coarse index `index`; returns true if the axis
    /// advanced (the path moved along it since the previous step).
    fn advance_to(&mut self, index: usize) -> bool {
        let moved = match self.last {
            Some(last) if index > last => {
                self.position += self.blocks[last];
                true
            }
            _ => false,
        };
        self.last = Some(index);
        moved
    }

    /// Fine-resolution origin of the current block.
    fn position(&self) -> usize {
        self.position
    }
}

/// Build a search window at full resolution from a warp path computed on the
/// downsampled pair, then dilate it by `radius`.
///
/// Each coarse step is projected onto the fine-resolution block it occupies
/// (block extents come from the downsamplers' block-size tables). When a
/// coarse step moves diagonally, the two cells bridging the adjoining blocks
/// are also marked so the projected region stays 4-connected instead of
/// touching only at corners.
pub(crate) fn expanded_window(
    n_cols: usize,
    n_rows: usize,
    shrunk_i: &Paa,
    shrunk_j: &Paa,
    coarse_path: &WarpPath,
    radius: usize,
) -> SearchWindow {
    let mut window = SearchWindow::new(n_cols, n_rows);
    let mut cursor_i = BlockCursor::new(shrunk_i.block_sizes());
    let mut cursor_j = BlockCursor::new(shrunk_j.block_sizes());

    for step in coarse_path {
        let moved_i = cursor_i.advance_to(step.i);
        let moved_j = cursor_j.advance_to(step.j);
        let origin_i = cursor_i.position();
        let origin_j = cursor_j.position();
        let block_i = shrunk_i.block_size(step.i);
        let block_j = shrunk_j.block_size(step.j);

        if moved_i && moved_j {
            window.mark_visited(origin_i - 1, origin_j);
            window.mark_visited(origin_i, origin_j - 1);
        }

        // Bottom and top rows of the block across its width; the window's
        // interval representation fills the rows in between.
        for x in 0..block_i {
            window.mark_visited(origin_i + x, origin_j);
            window.mark_visited(origin_i + x, origin_j + block_j - 1);
        }
    }

    window.expand(radius);
    window
}
