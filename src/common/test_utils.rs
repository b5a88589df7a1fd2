//! Общие утилиты для тестирования

use crate::algebra::view::View;

/// Эквивалентны ли два представления (взаимное предшествование)
pub fn views_equivalent(left: &View, right: &View) -> bool {
    left.precedes(right) && right.precedes(left)
}

/// Проверяет, что список представлений поэлементно эквивалентен ожидаемому
pub fn assert_equivalent_views(actual: &[View], expected: &[View]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Число представлений ({}) не совпадает с ожидаемым ({})",
        actual.len(),
        expected.len()
    );

    for (index, (actual_view, expected_view)) in actual.iter().zip(expected).enumerate() {
        assert!(
            views_equivalent(actual_view, expected_view),
            "Представление #{} не эквивалентно ожидаемому:\n  получено: {:?}\n  ожидалось: {:?}",
            index,
            actual_view,
            expected_view
        );
    }
}
