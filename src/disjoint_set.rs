//! Union-find with path compression and union by rank.
//!
//! The original Python this was ported from had two bugs: `union`'s rank
//! update was a no-op comparison (`self.ranks[p_y] != 1`) instead of an
//! increment, and `make_sets` walked raw parent pointers instead of calling
//! the compressing `find`, which could silently drop non-root indices from
//! the enumerated partition. Both are fixed here rather than reproduced.

#[derive(Debug, Clone)]
pub struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl DisjointSets {
    pub fn new(n: usize) -> Self {
        DisjointSets {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    pub fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return;
        }

        if self.rank[root_x] < self.rank[root_y] {
            self.parent[root_x] = root_y;
        } else if self.rank[root_x] > self.rank[root_y] {
            self.parent[root_y] = root_x;
        } else {
            self.parent[root_y] = root_x;
            self.rank[root_x] += 1;
        }
    }

    /// Returns the partition as groups of original indices, by calling
    /// `find` on every element so path compression is fully applied before
    /// grouping — a non-root index is never silently left out.
    pub fn enumerate_sets(&mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut groups: std::collections::HashMap<usize, Vec<usize>> = std::collections::HashMap::new();
        for i in 0..n {
            let root = self.find(i);
            groups.entry(root).or_default().push(i);
        }
        groups.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unions_merge_into_one_set() {
        let mut ds = DisjointSets::new(5);
        ds.union(0, 1);
        ds.union(1, 2);
        assert_eq!(ds.find(0), ds.find(2));
        assert_ne!(ds.find(0), ds.find(3));
    }

    #[test]
    fn enumerate_sets_includes_every_element() {
        let mut ds = DisjointSets::new(6);
        ds.union(0, 1);
        ds.union(2, 3);
        let sets = ds.enumerate_sets();
        let total: usize = sets.iter().map(|s| s.len()).sum();
        assert_eq!(total, 6);
        assert_eq!(sets.len(), 4);
    }

    #[test]
    fn rank_increments_only_on_equal_rank_union() {
        let mut ds = DisjointSets::new(4);
        ds.union(0, 1);
        ds.union(2, 3);
        let root01 = ds.find(0);
        let root23 = ds.find(2);
        assert_eq!(ds.rank[root01], 1);
        assert_eq!(ds.rank[root23], 1);
        ds.union(0, 2);
        let merged_root = ds.find(0);
        assert_eq!(ds.rank[merged_root], 2);
    }
}
