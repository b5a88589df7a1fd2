//! Ориентированный граф с ключами вершин и аннотациями
//!
//! Вершины хранятся в арене и адресуются идентификаторами; ребра
//! направленные и перечисляются в порядке добавления, так что обход
//! достижимых вершин детерминирован.

/// Идентификатор вершины графа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexId(usize);

#[derive(Debug)]
struct Vertex<K, A> {
    key: K,
    edges: Vec<VertexId>,
    annotations: Vec<A>,
}

/// Ориентированный граф с аннотируемыми вершинами
#[derive(Debug, Default)]
pub struct Graph<K, A> {
    vertices: Vec<Vertex<K, A>>,
}

impl<K, A> Graph<K, A> {
    /// Создает пустой граф
    pub fn new() -> Self {
        Graph {
            vertices: Vec::new(),
        }
    }

    /// Добавляет вершину с заданным ключом
    pub fn add_vertex(&mut self, key: K) -> VertexId {
        self.vertices.push(Vertex {
            key,
            edges: Vec::new(),
            annotations: Vec::new(),
        });
        VertexId(self.vertices.len() - 1)
    }

    /// Добавляет направленное ребро
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) {
        self.vertices[from.0].edges.push(to);
    }

    /// Прикрепляет аннотацию к вершине
    pub fn annotate(&mut self, vertex: VertexId, annotation: A) {
        self.vertices[vertex.0].annotations.push(annotation);
    }

    /// Ключ вершины
    pub fn key(&self, vertex: VertexId) -> &K {
        &self.vertices[vertex.0].key
    }

    /// Аннотации вершины
    pub fn annotations(&self, vertex: VertexId) -> &[A] {
        &self.vertices[vertex.0].annotations
    }

    /// Число вершин в графе
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Обходит вершины, достижимые из `start`, в глубину
    ///
    /// Каждая вершина посещается ровно один раз; стартовая вершина
    /// посещается первой, ребра перебираются в порядке добавления.
    pub fn visit_reachable(&self, start: VertexId, visitor: &mut impl FnMut(VertexId)) {
        let mut visited = vec![false; self.vertices.len()];
        self.visit_impl(start, visitor, &mut visited);
    }

    fn visit_impl(
        &self,
        vertex: VertexId,
        visitor: &mut impl FnMut(VertexId),
        visited: &mut [bool],
    ) {
        if visited[vertex.0] {
            return;
        }

        visited[vertex.0] = true;
        visitor(vertex);

        for index in 0..self.vertices[vertex.0].edges.len() {
            let next = self.vertices[vertex.0].edges[index];
            self.visit_impl(next, visitor, visited);
        }
    }

    /// Достижима ли вершина `target` из `from`
    pub fn can_reach(&self, from: VertexId, target: VertexId) -> bool {
        let mut found = false;
        self.visit_reachable(from, &mut |vertex| {
            if vertex == target {
                found = true;
            }
        });
        found
    }
}
