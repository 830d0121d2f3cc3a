use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// 2D KD-tree over scatter points for hover lookup.
///
/// Points are stored scaled to the unit square of their bounding box so that
/// axes with very different ranges still give sensible neighbours. The tree is
/// built in one pass from a slice, so any number of points may share a
/// coordinate.
pub struct HoverTree {
    tree: ImmutableKdTree<f64, u64, 2, 32>,
    /// Row index of each point, in the order the tree was built from.
    rows: Vec<usize>,
    origin: [f64; 2],
    span: [f64; 2],
}

impl HoverTree {
    /// Build from x,y data. Non-finite points are skipped. Returns `None`
    /// when no point is finite.
    pub fn build(x: &[f64], y: &[f64]) -> Option<Self> {
        let rows: Vec<usize> = x
            .iter()
            .zip(y.iter())
            .enumerate()
            .filter(|(_, (xv, yv))| xv.is_finite() && yv.is_finite())
            .map(|(i, _)| i)
            .collect();
        if rows.is_empty() {
            return None;
        }

        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        for &i in &rows {
            min = [min[0].min(x[i]), min[1].min(y[i])];
            max = [max[0].max(x[i]), max[1].max(y[i])];
        }
        let origin = min;
        let span = [(max[0] - min[0]).max(1e-12), (max[1] - min[1]).max(1e-12)];

        let points: Vec<[f64; 2]> = rows
            .iter()
            .map(|&i| scale_point(origin, span, x[i], y[i]))
            .collect();
        let tree = ImmutableKdTree::new_from_slice(&points);
        Some(Self { tree, rows, origin, span })
    }

    /// Row index of the point nearest to (qx, qy) in data coordinates.
    pub fn nearest(&self, qx: f64, qy: f64) -> usize {
        let query = scale_point(self.origin, self.span, qx, qy);
        let slot = self.tree.nearest_one::<SquaredEuclidean>(&query).item as usize;
        self.rows[slot]
    }
}

fn scale_point(origin: [f64; 2], span: [f64; 2], x: f64, y: f64) -> [f64; 2] {
    [(x - origin[0]) / span[0], (y - origin[1]) / span[1]]
}
