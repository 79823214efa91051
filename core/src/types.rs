/// Single coordinate axis used for rows and columns.
pub type Coord = u8;

/// Count type used for cell tallies.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Inclusive bounding box of a drag gesture; `min` never exceeds `max`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    min: Coord2,
    max: Coord2,
}

impl Rect {
    /// Normalizes two corners, in any order, into inclusive bounds.
    pub fn from_corners(a: Coord2, b: Coord2) -> Self {
        Self {
            min: (a.0.min(b.0), a.1.min(b.1)),
            max: (a.0.max(b.0), a.1.max(b.1)),
        }
    }

    pub const fn min(&self) -> Coord2 {
        self.min
    }

    pub const fn max(&self) -> Coord2 {
        self.max
    }

    pub const fn rows(&self) -> Coord {
        self.max.0 - self.min.0 + 1
    }

    pub const fn cols(&self) -> Coord {
        self.max.1 - self.min.1 + 1
    }

    pub const fn area(&self) -> CellCount {
        mult(self.rows(), self.cols())
    }

    pub const fn contains(&self, (row, col): Coord2) -> bool {
        row >= self.min.0 && row <= self.max.0 && col >= self.min.1 && col <= self.max.1
    }

    pub fn iter_coords(self) -> RectIter {
        RectIter::new(self)
    }
}

/// Row-major walk over every coordinate of a [`Rect`].
#[derive(Debug)]
pub struct RectIter {
    rect: Rect,
    next: Option<Coord2>,
}

impl RectIter {
    fn new(rect: Rect) -> Self {
        Self {
            rect,
            next: Some(rect.min),
        }
    }
}

impl Iterator for RectIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let (row, col) = current;

        self.next = if col < self.rect.max.1 {
            Some((row, col + 1))
        } else if row < self.rect.max.0 {
            Some((row + 1, self.rect.min.1))
        } else {
            None
        };

        Some(current)
    }
}
