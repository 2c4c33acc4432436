//! Two-dimensional buffers of pixels or other data.

use alloc::vec::Vec;
use core::fmt::{self, Debug, Formatter};
use core::iter::repeat_n;
use core::ops::{Index, IndexMut};

use super::Dims;

/// A `w` × `h` grid of values stored row by row in a single `Vec`.
///
/// Element (x, y) lives at index `y * w + x`. Indexing with `[x, y]`
/// yields an element, indexing with a row number `y` yields the whole
/// row as a slice.
///
/// # Examples
/// ```
/// # use softrast_core::util::buf::Buf2;
/// let mut buf = Buf2::new_default(3, 2);
/// buf[[1, 1]] = 5;
/// assert_eq!(buf[1usize], [0, 5, 0]);
/// assert_eq!(buf.get(1, 1), Some(&5));
/// assert_eq!(buf.get(3, 1), None);
/// ```
#[derive(Clone, Eq, PartialEq)]
pub struct Buf2<T> {
    w: usize,
    h: usize,
    data: Vec<T>,
}

impl<T> Buf2<T> {
    /// Returns a buffer filled row by row from the first `w * h` items
    /// of `init`.
    ///
    /// # Panics
    /// If `init` runs out before the buffer is full.
    pub fn new<I>(w: usize, h: usize, init: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let data: Vec<_> = init.into_iter().take(w * h).collect();
        assert_eq!(data.len(), w * h);
        Self { w, h, data }
    }
    /// Returns a buffer of default values.
    pub fn new_default(w: usize, h: usize) -> Self
    where
        T: Clone + Default,
    {
        Self::new(w, h, repeat_n(T::default(), w * h))
    }
    /// Returns a buffer with element (x, y) set to `init_fn(x, y)`.
    pub fn new_with<F>(w: usize, h: usize, mut init_fn: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            data.extend((0..w).map(|x| init_fn(x, y)));
        }
        Self { w, h, data }
    }

    /// Returns the number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }
    /// Returns the number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }
    /// Returns the number of columns and rows.
    #[inline]
    pub fn dims(&self) -> Dims {
        (self.w, self.h)
    }

    /// Returns all elements, row by row.
    pub fn data(&self) -> &[T] {
        &self.data
    }
    /// Returns all elements mutably, row by row.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns the element at (x, y) if it is within bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        (x < self.w && y < self.h).then(|| &self.data[y * self.w + x])
    }
    /// Returns the element at (x, y) mutably if it is within bounds.
    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        (x < self.w && y < self.h).then(|| &mut self.data[y * self.w + x])
    }

    /// Returns an iterator over the rows, bottom row first.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks panics on zero size
        self.data.chunks(self.w.max(1))
    }
    /// Returns an iterator over the rows as mutable slices.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [T]> {
        self.data.chunks_mut(self.w.max(1))
    }
    /// Returns an iterator over all elements, row by row.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Sets every element to `val`.
    pub fn fill(&mut self, val: T)
    where
        T: Clone,
    {
        self.data.fill(val);
    }

    /// Reverses the order of the rows of `self`.
    ///
    /// The rasterizer uses a y-up convention where row 0 is the bottom of
    /// the image, whereas most image formats store the top row first.
    pub fn flip_vertically(&mut self) {
        let (w, h) = (self.w, self.h);
        for y in 0..h / 2 {
            let (top, bot) = self.data.split_at_mut((h - 1 - y) * w);
            top[y * w..(y + 1) * w].swap_with_slice(&mut bot[..w]);
        }
    }

    /// Returns a buffer of the same size holding `f` of each element.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Buf2<U> {
        Buf2::new(self.w, self.h, self.data.iter().map(f))
    }
}

impl<T> Index<usize> for Buf2<T> {
    type Output = [T];

    /// Returns the row at index `y`.
    ///
    /// # Panics
    /// If `y` is out of bounds.
    fn index(&self, y: usize) -> &[T] {
        assert!(y < self.h, "row index {y} out of bounds (height {})", self.h);
        &self.data[y * self.w..(y + 1) * self.w]
    }
}

impl<T> IndexMut<usize> for Buf2<T> {
    fn index_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.h, "row index {y} out of bounds (height {})", self.h);
        &mut self.data[y * self.w..(y + 1) * self.w]
    }
}

impl<T> Index<[usize; 2]> for Buf2<T> {
    type Output = T;

    /// Returns the element at column `x`, row `y`.
    ///
    /// # Panics
    /// If `x` or `y` is out of bounds.
    fn index(&self, [x, y]: [usize; 2]) -> &T {
        assert!(x < self.w, "column index {x} out of bounds (width {})", self.w);
        &self[y][x]
    }
}

impl<T> IndexMut<[usize; 2]> for Buf2<T> {
    fn index_mut(&mut self, [x, y]: [usize; 2]) -> &mut T {
        assert!(x < self.w, "column index {x} out of bounds (width {})", self.w);
        &mut self[y][x]
    }
}

impl<T> Debug for Buf2<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Buf2<{}>({}×{})", core::any::type_name::<T>(), self.w, self.h)
    }
}
