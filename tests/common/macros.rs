/// Asserts that the grid holds exactly the given population counts.
#[macro_export]
macro_rules! assert_counts {
    ($grid:expr, $expected:expr) => {
        assert_eq!(
            $grid.counts(),
            $expected,
            "Population counts changed:\n{}",
            $grid
        );
    };
}

/// Asserts that every cell in the grid is happy under the given rule.
#[macro_export]
macro_rules! assert_all_happy {
    ($grid:expr, $rule:expr) => {
        for pos in $grid.occupied_positions() {
            assert!(
                segregation_lib::sim::is_happy(&$grid, pos, &$rule).unwrap(),
                "Agent at {} is unhappy:\n{}",
                pos,
                $grid
            );
        }
    };
}
