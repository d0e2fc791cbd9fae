#[cfg(test)]
mod tests {
    use crate::game::*;

    #[test]
    fn test_board_dimensions() {
        // Ten columns, with three hidden spawn rows above the usual twenty
        assert_eq!(BOARD_WIDTH, 10);
        assert_eq!(BOARD_HEIGHT, 23);
    }

    #[test]
    fn test_scoring_constants() {
        // Verify scoring values are correctly defined
        assert_eq!(POINTS_SINGLE, 40);
        assert_eq!(POINTS_DOUBLE, 100);
        assert_eq!(POINTS_TRIPLE, 300);
        assert_eq!(POINTS_TETRIS, 1200);
    }

    #[test]
    fn test_gravity_constants() {
        // The interval must start above the floor and actually shrink
        assert!(BASE_TICK_MS > TICK_FLOOR_MS);
        assert!(TICK_DECREMENT_MS > 0);
        assert!(TICK_FLOOR_MS > 0);
    }

    #[test]
    fn test_level_progression() {
        assert_eq!(LEVEL_UP_LINES, 2);
    }
}
