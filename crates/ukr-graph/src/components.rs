//! Connected components over the builder's undirected edge list.

use fixedbitset::FixedBitSet;

use crate::network::EdgeRecord;

/// Disjoint-set forest with path halving and union by size.
pub struct UnionFind {
    parent: Vec<u32>,
    size:   Vec<u32>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            size:   vec![1; n],
        }
    }

    pub fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    pub fn union(&mut self, a: u32, b: u32) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra as usize] >= self.size[rb as usize] { (ra, rb) } else { (rb, ra) };
        self.parent[small as usize] = big;
        self.size[big as usize] += self.size[small as usize];
    }

    /// Size of the set containing `x`.
    pub fn set_size(&mut self, x: u32) -> u32 {
        let r = self.find(x);
        self.size[r as usize]
    }
}

/// Bitmask (by node index) of the largest connected component.
///
/// Ties go to the component holding the smallest node id.
pub fn largest_component_mask(node_count: usize, edges: &[EdgeRecord]) -> FixedBitSet {
    let mut mask = FixedBitSet::with_capacity(node_count);
    if node_count == 0 {
        return mask;
    }

    let mut uf = UnionFind::new(node_count);
    for e in edges {
        uf.union(e.start.0, e.end.0);
    }

    let mut best_root = uf.find(0);
    let mut best_size = uf.set_size(0);
    for n in 1..node_count as u32 {
        let size = uf.set_size(n);
        if size > best_size {
            best_size = size;
            best_root = uf.find(n);
        }
    }

    for n in 0..node_count as u32 {
        if uf.find(n) == best_root {
            mask.insert(n as usize);
        }
    }
    mask
}
