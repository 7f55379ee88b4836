//! Zero-copy views over matrices.
//!
//! Views own no element storage. Every read and write is remapped to a
//! coordinate of the backing matrix (or, for [`WrapCols`], of a backing column
//! tensor), so several views may alias the same buffer and edits through any
//! of them are seen by all. Views borrow their backing store and cannot
//! outlive it.

mod access;
mod transposed;
mod wrap;

pub use access::{AccessCol, AccessRow};
pub use transposed::TransposedMatrix;
pub use wrap::WrapCols;

use crate::error::{GraphmatError, Result};

pub(crate) fn check_position(pos: usize, size: usize) -> Result<()> {
    if pos >= size {
        return Err(GraphmatError::IndexOutOfBounds(pos, size));
    }
    Ok(())
}
