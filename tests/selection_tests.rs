//! Range geometry: containment, edges, union of ranges and fill extension.

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use test_case::test_case;
    use vgrid::{
        Boundary, CellRange, CellSelection, Coordinate, FillDirection, FillRange, Fillable,
        SelectionRange,
    };

    fn c(x: u32, y: u32) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn every_cell_of_a_range_is_contained_and_nothing_else() {
        let range = CellRange::new(c(4, 3), c(1, 1));
        for y in 0..6 {
            for x in 0..6 {
                let inside = (1..=4).contains(&x) && (1..=3).contains(&y);
                assert_eq!(range.contains(c(x, y)), inside, "({x}, {y})");
            }
        }
        assert_eq!(range.cells().count(), 12);
    }

    #[test]
    fn edges_partition_the_perimeter() {
        let range = CellRange::new(c(1, 1), c(4, 3));
        let perimeter = range
            .cells()
            .filter(|&coord| range.boundary(coord).any())
            .count();
        // 4 wide, 3 tall: 2 * 4 + 2 * 1 cells on the border.
        assert_eq!(perimeter, 10);
        assert_eq!(range.cells().filter(|&p| range.is_left(p)).count(), 3);
        assert_eq!(range.cells().filter(|&p| range.is_top(p)).count(), 4);
    }

    #[test_case(c(0, 0), Boundary { left: true, top: true, right: false, bottom: false } ; "top left corner")]
    #[test_case(c(2, 2), Boundary { left: false, top: false, right: true, bottom: true } ; "bottom right corner")]
    #[test_case(c(1, 0), Boundary { left: false, top: true, right: false, bottom: false } ; "top edge")]
    #[test_case(c(1, 1), Boundary::default() ; "interior")]
    #[test_case(c(5, 5), Boundary::default() ; "outside")]
    fn boundary_flags(coord: Coordinate, expected: Boundary) {
        let range = CellRange::new(c(0, 0), c(2, 2));
        assert_eq!(range.boundary(coord), expected);
    }

    #[test]
    fn single_cell_range_touches_all_edges() {
        let range = CellRange::single(c(3, 3));
        let b = range.boundary(c(3, 3));
        assert!(b.left && b.right && b.top && b.bottom);
    }

    #[test]
    fn union_of_overlapping_ranges_ors_the_flags() {
        let ranges = [
            SelectionRange::new(c(0, 0), c(2, 2)),
            SelectionRange::new(c(2, 2), c(4, 4)),
        ];
        let shared = CellSelection::evaluate(&ranges, c(2, 2));
        assert!(shared.selected);
        assert_eq!(
            shared.boundary,
            Boundary {
                left: true,
                right: true,
                top: true,
                bottom: true,
            }
        );

        let only_first = CellSelection::evaluate(&ranges, c(1, 2));
        assert!(only_first.selected);
        assert!(only_first.boundary.bottom);
        assert!(!only_first.boundary.top);

        let none = CellSelection::evaluate(&ranges, c(0, 4));
        assert!(!none.selected);
        assert!(!none.boundary.any());
    }

    #[test]
    fn selection_range_keeps_its_anchor_when_extended() {
        let range = SelectionRange::single(c(3, 3)).extend_to(c(1, 5));
        assert_eq!(range.anchor(), c(3, 3));
        assert_eq!(range.range(), CellRange::new(c(1, 3), c(3, 5)));
        assert_eq!(
            range.clamp_to(c(2, 4)).range(),
            CellRange::new(c(1, 3), c(2, 4))
        );
    }

    const EXTENT: Coordinate = Coordinate::new(9, 9);

    #[test_case(c(2, 5), CellRange::new(c(2, 2), c(2, 5)), FillDirection::Down ; "down")]
    #[test_case(c(6, 2), CellRange::new(c(2, 2), c(6, 2)), FillDirection::Right ; "right")]
    #[test_case(c(2, 0), CellRange::new(c(2, 0), c(2, 2)), FillDirection::Up ; "up")]
    #[test_case(c(0, 2), CellRange::new(c(0, 2), c(2, 2)), FillDirection::Left ; "left")]
    #[test_case(c(5, 5), CellRange::new(c(2, 2), c(2, 5)), FillDirection::Down ; "diagonal tie goes vertical")]
    #[test_case(c(8, 3), CellRange::new(c(2, 2), c(8, 2)), FillDirection::Right ; "larger horizontal delta wins")]
    fn fill_from_single_cell(pointer: Coordinate, range: CellRange, direction: FillDirection) {
        let fill =
            FillRange::compute(CellRange::single(c(2, 2)), pointer, EXTENT, Fillable::Xy).unwrap();
        assert_eq!(fill.range(), range);
        assert_eq!(fill.direction(), direction);
        assert_eq!(fill.source(), CellRange::single(c(2, 2)));
    }

    #[test]
    fn fill_inside_source_or_on_a_locked_axis_is_none() {
        let source = CellRange::new(c(1, 1), c(3, 3));
        assert_eq!(FillRange::compute(source, c(2, 3), EXTENT, Fillable::Xy), None);
        assert_eq!(FillRange::compute(source, c(1, 8), EXTENT, Fillable::X), None);
    }

    #[test]
    fn fill_is_clamped_to_the_grid() {
        let fill =
            FillRange::compute(CellRange::single(c(0, 0)), c(40, 0), EXTENT, Fillable::X).unwrap();
        assert_eq!(fill.range().end(), c(9, 0));
        assert_eq!(fill.extension(), CellRange::new(c(1, 0), c(9, 0)));
    }

    #[test]
    fn extension_repeats_a_multi_cell_source() {
        let source = CellRange::new(c(0, 0), c(1, 2));
        let fill = FillRange::compute(source, c(1, 7), EXTENT, Fillable::Y).unwrap();
        assert_eq!(fill.extension(), CellRange::new(c(0, 3), c(1, 7)));
        let rows: Vec<u32> = (3..=7).map(|y| fill.source_for(c(1, y)).y).collect();
        assert_eq!(rows, vec![0, 1, 2, 0, 1]);
    }
}
