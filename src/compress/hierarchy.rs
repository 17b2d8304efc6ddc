use super::error::{self, CompressError};

/// Dyadic hierarchy of the nodes of a uniform 1D mesh with `len` nodes
///
/// Level 0 holds the two end nodes. Level `l` adds the odd multiples of
/// `2^(L - l)` below the last node, so the finest level `L` holds every node. `L` is the
/// smallest integer with `2^L >= len - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshHierarchy {
    len: usize,
    finest: u32,
}

impl MeshHierarchy {
    pub fn new(len: usize) -> Result<Self, CompressError> {
        if len == 0 {
            return Err(error::EmptyHierarchy.into());
        }

        let span = len - 1;
        let finest = if span <= 1 {
            0
        } else {
            usize::BITS - (span - 1).leading_zeros()
        };

        Ok(Self { len, finest })
    }

    /// number of nodes on the finest level
    pub fn len(&self) -> usize {
        self.len
    }

    /// always false, a hierarchy cannot be built without nodes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// index of the finest level
    pub fn finest_level(&self) -> u32 {
        self.finest
    }

    pub fn num_levels(&self) -> usize {
        self.finest as usize + 1
    }

    /// distance between neighboring nodes of `level`
    pub fn stride(&self, level: u32) -> usize {
        1 << (self.finest - level.min(self.finest))
    }

    /// the end nodes making up level 0
    pub fn coarse_nodes(&self) -> Vec<usize> {
        if self.len == 1 {
            vec![0]
        } else {
            vec![0, self.len - 1]
        }
    }

    /// the nodes first appearing on `level`, in ascending order. Empty for level 0
    pub fn new_nodes(&self, level: u32) -> impl Iterator<Item = usize> {
        let last = self.len - 1;
        let stride = self.stride(level);
        let active = level >= 1 && level <= self.finest;

        (stride..last)
            .step_by(2 * stride)
            .filter(move |_| active)
    }

    /// every node of `level`, in ascending order
    pub fn level_nodes(&self, level: u32) -> Vec<usize> {
        let stride = self.stride(level);
        let mut nodes: Vec<usize> = (0..self.len).step_by(stride).collect();

        if nodes.last() != Some(&(self.len - 1)) {
            nodes.push(self.len - 1);
        }
        nodes
    }

    /// the two coarser nodes bracketing `node` on `level`
    pub fn parents(&self, node: usize, level: u32) -> (usize, usize) {
        let stride = self.stride(level);
        (node - stride, (node + stride).min(self.len - 1))
    }

    /// every node in the order it is visited: level 0 followed by the new nodes of each
    /// finer level
    pub fn traversal(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        let coarse = self.coarse_nodes().into_iter().map(|node| (0, node));
        let finer = (1..=self.finest)
            .flat_map(move |level| self.new_nodes(level).map(move |node| (level, node)));

        coarse.chain(finer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rejected() {
        assert!(matches!(
            MeshHierarchy::new(0),
            Err(CompressError::EmptyHierarchy(_))
        ));
    }

    #[test]
    fn level_counts() {
        assert_eq!(MeshHierarchy::new(1).unwrap().finest_level(), 0);
        assert_eq!(MeshHierarchy::new(2).unwrap().finest_level(), 0);
        assert_eq!(MeshHierarchy::new(3).unwrap().finest_level(), 1);
        assert_eq!(MeshHierarchy::new(5).unwrap().finest_level(), 2);
        assert_eq!(MeshHierarchy::new(6).unwrap().finest_level(), 3);
        assert_eq!(MeshHierarchy::new(2500).unwrap().finest_level(), 12);
    }

    #[test]
    fn dyadic_levels() {
        let hierarchy = MeshHierarchy::new(9).unwrap();
        assert_eq!(hierarchy.level_nodes(0), vec![0, 8]);
        assert_eq!(hierarchy.level_nodes(1), vec![0, 4, 8]);
        assert_eq!(hierarchy.new_nodes(2).collect::<Vec<_>>(), vec![2, 6]);
        assert_eq!(hierarchy.level_nodes(3), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn non_dyadic_last_node() {
        let hierarchy = MeshHierarchy::new(7).unwrap();
        assert_eq!(hierarchy.finest_level(), 3);
        assert_eq!(hierarchy.level_nodes(1), vec![0, 4, 6]);
        assert_eq!(hierarchy.new_nodes(2).collect::<Vec<_>>(), vec![2]);
        assert_eq!(hierarchy.parents(2, 2), (0, 4));
        assert_eq!(hierarchy.parents(5, 3), (4, 6));
    }

    #[test]
    fn traversal_visits_every_node_once() {
        for len in [1, 2, 3, 10, 17, 100, 2500] {
            let hierarchy = MeshHierarchy::new(len).unwrap();
            let mut seen: Vec<usize> = hierarchy.traversal().map(|(_, node)| node).collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..len).collect::<Vec<_>>(), "len {len}");
        }
    }

    #[test]
    fn parents_are_visited_first() {
        let hierarchy = MeshHierarchy::new(37).unwrap();
        let mut visited = vec![false; 37];

        for (level, node) in hierarchy.traversal() {
            if level > 0 {
                let (lo, hi) = hierarchy.parents(node, level);
                assert!(visited[lo] && visited[hi], "node {node}");
            }
            visited[node] = true;
        }
    }
}
