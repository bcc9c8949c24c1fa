//! Image recycle pool
//!
//! Decoding a steady stream of raster tiles churns through pixel
//! buffers; the pool hands previously used decode targets back out so
//! the renderer is not allocating a fresh buffer per fetch. The pool
//! owns idle handles exclusively: a caller borrows one with
//! [`ImagePool::pop`] and returns it with [`ImagePool::push`] when the
//! tile leaves the screen.
//!
//! The pool never inspects or resets handle contents - a caller must
//! clear a handle's pixels itself before decoding new data into it. It
//! also never evicts; it only refuses returns once at capacity, letting
//! the excess handles drop out of scope for normal reclamation.
//!
//! Designed for single-threaded (renderer-thread) use; callers sharing
//! a pool across threads must wrap it in their own mutual exclusion.

use image::RgbaImage;
use tracing::trace;

/// Returns above this queue size are dropped.
pub const DEFAULT_POOL_CAPACITY: usize = 50;

/// Bounded recycle pool of RGBA tile decode targets.
///
/// Handles are reused LIFO: the most recently returned buffer is the
/// next one handed out (warmest cache lines first).
#[derive(Debug)]
pub struct ImagePool {
    images: Vec<RgbaImage>,
    tile_size: u32,
    capacity: usize,
}

impl ImagePool {
    /// Creates an empty pool producing `tile_size` x `tile_size` buffers
    /// with the reference capacity of 50.
    pub fn new(tile_size: u32) -> Self {
        Self::with_capacity(tile_size, DEFAULT_POOL_CAPACITY)
    }

    /// Creates an empty pool with an explicit capacity.
    pub fn with_capacity(tile_size: u32, capacity: usize) -> Self {
        Self {
            images: Vec::new(),
            tile_size,
            capacity,
        }
    }

    /// Borrows a decode target from the pool.
    ///
    /// Returns the most recently pushed handle if any are queued,
    /// otherwise allocates a fresh zeroed buffer. Handles are created
    /// lazily on pool-miss only.
    pub fn pop(&mut self) -> RgbaImage {
        match self.images.pop() {
            Some(image) => image,
            None => {
                trace!(tile_size = self.tile_size, "image pool miss, allocating");
                RgbaImage::new(self.tile_size, self.tile_size)
            }
        }
    }

    /// Returns a handle to the pool.
    ///
    /// A no-op once the queue size exceeds the capacity: the handle is
    /// simply dropped instead of queued.
    pub fn push(&mut self, image: RgbaImage) {
        if self.images.len() > self.capacity {
            return;
        }
        self.images.push(image);
    }

    /// Returns a batch of handles to the pool.
    ///
    /// Like [`ImagePool::push`], the whole batch is dropped when the
    /// queue size already exceeds the capacity.
    pub fn push_all(&mut self, images: impl IntoIterator<Item = RgbaImage>) {
        if self.images.len() > self.capacity {
            return;
        }
        self.images.extend(images);
    }

    /// Number of idle handles currently queued.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// True if no idle handles are queued.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
