/// Uniform-grid spatial index over entity positions, rebuilt every tick.
///
/// Each cell keeps a singly linked list of entries (`heads`/`next`) so a
/// rebuild is a plain sequence of pushes with no per-cell allocation.
/// Queries return candidate entity indices from the covered cell range;
/// callers do the exact distance filtering.
pub struct SpatialHash {
    pub cell_size: f64,
    pub cols: usize,
    pub rows: usize,
    heads: Vec<i32>,
    next: Vec<i32>,
    entity_indices: Vec<usize>,
}

impl SpatialHash {
    pub fn new(cell_size: f64, width: f64, height: f64) -> Self {
        let cols = (width / cell_size).ceil().max(1.0) as usize;
        let rows = (height / cell_size).ceil().max(1.0) as usize;
        Self {
            cell_size,
            cols,
            rows,
            heads: vec![-1; cols * rows],
            next: Vec::new(),
            entity_indices: Vec::new(),
        }
    }

    pub fn new_empty() -> Self {
        Self::new(64.0, 1.0, 1.0)
    }

    pub fn clear(&mut self) {
        if self.heads.len() != self.cols * self.rows {
            self.heads = vec![-1; self.cols * self.rows];
        } else {
            self.heads.fill(-1);
        }
        self.next.clear();
        self.entity_indices.clear();
    }

    /// Finite positions outside the grid are clamped into the edge cells;
    /// points sitting exactly on the far boundary stay indexable.
    #[inline(always)]
    fn get_cell_idx(&self, x: f64, y: f64) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let cx = ((x / self.cell_size).floor() as i64).clamp(0, self.cols as i64 - 1) as usize;
        let cy = ((y / self.cell_size).floor() as i64).clamp(0, self.rows as i64 - 1) as usize;
        Some(cy * self.cols + cx)
    }

    pub fn insert(&mut self, x: f64, y: f64, index: usize) {
        if let Some(cell_idx) = self.get_cell_idx(x, y) {
            let entry_idx = self.entity_indices.len() as i32;
            self.entity_indices.push(index);
            self.next.push(self.heads[cell_idx]);
            self.heads[cell_idx] = entry_idx;
        }
    }

    /// Collects entity indices from every cell overlapping the query circle.
    /// May include indices farther than `radius`; never misses one within it.
    pub fn query(&self, x: f64, y: f64, radius: f64) -> Vec<usize> {
        let mut result = Vec::new();
        let min_cx = ((x - radius) / self.cell_size).floor() as i32;
        let max_cx = ((x + radius) / self.cell_size).floor() as i32;
        let min_cy = ((y - radius) / self.cell_size).floor() as i32;
        let max_cy = ((y + radius) / self.cell_size).floor() as i32;

        for cy in min_cy..=max_cy {
            if cy < 0 || cy >= self.rows as i32 {
                continue;
            }
            for cx in min_cx..=max_cx {
                if cx < 0 || cx >= self.cols as i32 {
                    continue;
                }

                let cell_idx = (cy as usize * self.cols) + cx as usize;
                let mut head = self.heads[cell_idx];
                while head != -1 {
                    result.push(self.entity_indices[head as usize]);
                    head = self.next[head as usize];
                }
            }
        }
        result
    }
}
