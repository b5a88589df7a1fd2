//! Система непересекающихся множеств с привязанными значениями

/// Идентификатор ячейки в [`UnionFind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(usize);

#[derive(Debug)]
struct Cell<V> {
    parent: Option<usize>,
    rank: u32,
    value: Option<V>,
}

/// Система непересекающихся множеств
///
/// Каждая компонента несет значение, хранящееся в корне. Объединение двух
/// компонент с разными значениями отвергается; объединение компоненты со
/// значением и компоненты без значения сохраняет значение.
#[derive(Debug, Default)]
pub struct UnionFind<V> {
    cells: Vec<Cell<V>>,
}

impl<V: Clone + PartialEq> UnionFind<V> {
    /// Создает пустую систему
    pub fn new() -> Self {
        UnionFind { cells: Vec::new() }
    }

    /// Добавляет новую ячейку со значением
    pub fn add(&mut self, value: V) -> CellId {
        self.cells.push(Cell {
            parent: None,
            rank: 0,
            value: Some(value),
        });
        CellId(self.cells.len() - 1)
    }

    fn root(&mut self, index: usize) -> usize {
        match self.cells[index].parent {
            None => index,
            Some(parent) => {
                let root = self.root(parent);
                self.cells[index].parent = Some(root);
                root
            }
        }
    }

    /// Значение компоненты, содержащей ячейку
    pub fn value(&mut self, cell: CellId) -> &V {
        let root = self.root(cell.0);
        self.cells[root]
            .value
            .as_ref()
            .expect("union-find component has no value")
    }

    /// Заменяет значение компоненты, содержащей ячейку
    pub fn set_value(&mut self, cell: CellId, value: V) {
        let root = self.root(cell.0);
        self.cells[root].value = Some(value);
    }

    /// Объединяет компоненты двух ячеек
    ///
    /// Возвращает `false`, если обе компоненты несут значения и они не
    /// равны; компоненты при этом остаются раздельными.
    pub fn union(&mut self, left: CellId, right: CellId) -> bool {
        let lhs = self.root(left.0);
        let rhs = self.root(right.0);

        match (&self.cells[lhs].value, &self.cells[rhs].value) {
            (Some(left_value), Some(right_value)) if left_value != right_value => return false,
            _ => {}
        }

        if lhs == rhs {
            return true;
        }

        let merged = self.cells[lhs]
            .value
            .take()
            .or_else(|| self.cells[rhs].value.take());

        // Компонента с меньшим рангом подвешивается под большую
        if self.cells[lhs].rank < self.cells[rhs].rank {
            self.cells[lhs].parent = Some(rhs);
            self.cells[rhs].value = merged;
        } else if self.cells[lhs].rank > self.cells[rhs].rank {
            self.cells[rhs].parent = Some(lhs);
            self.cells[lhs].value = merged;
        } else {
            self.cells[lhs].parent = Some(rhs);
            self.cells[rhs].value = merged;
            self.cells[rhs].rank += 1;
        }

        true
    }

    /// Принадлежат ли ячейки одной компоненте
    pub fn same_component(&mut self, left: CellId, right: CellId) -> bool {
        self.root(left.0) == self.root(right.0)
    }
}
