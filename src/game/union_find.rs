//! Weighted union-find over the board cells.
//!
//! Parents are flat cell indices, so the structure lives directly inside
//! [`Grid`] without a separate arena. There is no deletion: a region is
//! split by discarding its trees and rebuilding them (see `regions`).

use crate::game::Grid;

impl Grid {
    /// Root of the tree containing `index`.
    ///
    /// Every cell on the walked path is re-pointed directly at the root.
    pub(crate) fn find(&mut self, index: usize) -> usize {
        let mut root = index;
        while self.cell(root).parent != root {
            root = self.cell(root).parent;
        }

        let mut current = index;
        while current != root {
            let next = self.cell(current).parent;
            self.cell_mut(current).parent = root;
            current = next;
        }

        root
    }

    /// Join the trees containing `a` and `b`.
    ///
    /// The lighter root goes under the heavier one. On a tie `b`'s root goes
    /// under `a`'s and the surviving weight grows by one.
    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }

        let size_a = self.cell(root_a).tree_size;
        let size_b = self.cell(root_b).tree_size;
        if size_a < size_b {
            self.cell_mut(root_a).parent = root_b;
        } else {
            self.cell_mut(root_b).parent = root_a;
            if size_a == size_b {
                self.cell_mut(root_a).tree_size += 1;
            }
        }
    }

    /// Detach `index` into a singleton tree, keeping its owner.
    pub(crate) fn make_singleton(&mut self, index: usize) {
        let cell = self.cell_mut(index);
        cell.parent = index;
        cell.tree_size = 1;
    }
}
