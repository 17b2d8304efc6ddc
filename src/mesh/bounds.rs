/// Axis aligned bounding box `[xmin, xmax, ymin, ymax, zmin, zmax]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Bounds {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// the smallest box containing every point. `None` if there are no points
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = [f64; 3]>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds::new(first, first);

        for point in iter {
            bounds.expand(point);
        }

        Some(bounds)
    }

    pub fn expand(&mut self, point: [f64; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(point[axis]);
            self.max[axis] = self.max[axis].max(point[axis]);
        }
    }

    /// grow the box by `tol` in every direction
    pub fn inflate(&self, tol: f64) -> Self {
        let mut out = *self;
        for axis in 0..3 {
            out.min[axis] -= tol;
            out.max[axis] += tol;
        }
        out
    }

    pub fn length(&self, axis: usize) -> f64 {
        self.max[axis] - self.min[axis]
    }

    /// length of the diagonal of the box
    pub fn diagonal(&self) -> f64 {
        (0..3)
            .map(|axis| self.length(axis).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    pub fn contains(&self, point: [f64; 3]) -> bool {
        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }

    /// the flat VTK ordering `[xmin, xmax, ymin, ymax, zmin, zmax]`
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.min[0],
            self.max[0],
            self.min[1],
            self.max[1],
            self.min[2],
            self.max[2],
        ]
    }

    pub fn is_valid(&self) -> bool {
        (0..3).all(|axis| {
            self.min[axis].is_finite() && self.max[axis].is_finite() && self.min[axis] <= self.max[axis]
        })
    }
}
