use std::num::NonZeroUsize;

use proptest::prelude::*;

use super::{CollectionView, PageRequest, PaginationOptions, apply, page_count};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    name: String,
    group: u8,
}

fn row(name: &str, group: u8) -> Row {
    Row {
        name: name.to_owned(),
        group,
    }
}

fn size(value: usize) -> NonZeroUsize {
    NonZeroUsize::new(value).unwrap_or(NonZeroUsize::MIN)
}

fn names<'a>(rows: &[&'a Row]) -> Vec<&'a str> {
    rows.iter().map(|row| row.name.as_str()).collect()
}

#[test]
fn last_page_of_twelve_roles_holds_two_items() {
    let roles: Vec<Row> = (0..12).map(|index| row(&format!("role-{index}"), 0)).collect();

    let slice = apply(
        &roles,
        "",
        |row: &Row| row.name.as_str(),
        PageRequest::new(2, size(5)),
        None,
    );

    assert_eq!(slice.total, 12);
    assert_eq!(names(&slice.visible), vec!["role-10", "role-11"]);
}

#[test]
fn search_is_case_insensitive_substring() {
    let rows = vec![row("Admin", 0), row("Editor", 0), row("SUPERADMIN", 0)];

    let slice = apply(
        &rows,
        "aDmIn",
        |row: &Row| row.name.as_str(),
        PageRequest::new(0, size(10)),
        None,
    );

    assert_eq!(slice.total, 2);
    assert_eq!(names(&slice.visible), vec!["Admin", "SUPERADMIN"]);
}

#[test]
fn extra_predicate_composes_with_search() {
    let rows = vec![row("ann", 1), row("anna", 2), row("bob", 1)];
    let only_group_one = |row: &Row| row.group == 1;

    let slice = apply(
        &rows,
        "an",
        |row: &Row| row.name.as_str(),
        PageRequest::new(0, size(5)),
        Some(&only_group_one),
    );

    assert_eq!(slice.total, 1);
    assert_eq!(names(&slice.visible), vec!["ann"]);
}

#[test]
fn page_beyond_filtered_range_is_empty_but_keeps_total() {
    let rows = vec![row("a", 0), row("b", 0)];

    let slice = apply(
        &rows,
        "",
        |row: &Row| row.name.as_str(),
        PageRequest::new(usize::MAX, size(5)),
        None,
    );

    assert!(slice.visible.is_empty());
    assert_eq!(slice.total, 2);
}

#[test]
fn page_count_rounds_up() {
    assert_eq!(page_count(0, size(5)), 0);
    assert_eq!(page_count(5, size(5)), 1);
    assert_eq!(page_count(12, size(5)), 3);
}

#[test]
fn changing_search_text_returns_to_first_page() {
    let mut view = CollectionView::new(PaginationOptions::default());
    view.set_page(2, 30);
    assert_eq!(view.page(), 2);

    view.set_search_text("ed");
    assert_eq!(view.page(), 0);
}

#[test]
fn repeating_same_search_text_keeps_page() {
    let mut view = CollectionView::new(PaginationOptions::default());
    view.set_search_text("ed");
    view.set_page(1, 30);

    view.set_search_text("ed");
    assert_eq!(view.page(), 1);
}

#[test]
fn page_size_change_returns_to_first_page() {
    let mut view = CollectionView::new(PaginationOptions::default());
    view.set_page(3, 30);

    let result = view.set_page_size(10);
    assert!(result.is_ok());
    assert_eq!(view.page(), 0);
    assert_eq!(view.page_size().get(), 10);
}

#[test]
fn unlisted_page_size_is_rejected() {
    let mut view = CollectionView::new(PaginationOptions::default());
    assert!(view.set_page_size(7).is_err());
    assert!(view.set_page_size(0).is_err());
    assert_eq!(view.page_size().get(), 5);
}

#[test]
fn set_page_clamps_to_last_page() {
    let mut view = CollectionView::new(PaginationOptions::default());
    view.set_page(9, 12);
    assert_eq!(view.page(), 2);

    view.set_page(4, 0);
    assert_eq!(view.page(), 0);
}

#[test]
fn default_options_offer_five_ten_twenty_five() {
    let options = PaginationOptions::default();
    let sizes: Vec<usize> = options.page_sizes().iter().map(|size| size.get()).collect();
    assert_eq!(sizes, vec![5, 10, 25]);
    assert_eq!(options.default_page_size().get(), 5);
}

#[test]
fn options_require_selectable_default() {
    assert!(PaginationOptions::new(vec![size(5), size(10)], size(20)).is_err());
    assert!(PaginationOptions::new(vec![size(5), size(20)], size(20)).is_ok());
}

fn rows_strategy() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(("[a-dA-D]{0,4}", 0_u8..3), 0..40).prop_map(|values| {
        values
            .into_iter()
            .map(|(name, group)| Row { name, group })
            .collect()
    })
}

proptest! {
    #[test]
    fn pages_concatenate_to_filtered_collection(
        rows in rows_strategy(),
        search in "[a-d]{0,2}",
        page_size in 1_usize..8,
    ) {
        let page_size = size(page_size);
        let first = apply(&rows, &search, |row: &Row| row.name.as_str(), PageRequest::new(0, page_size), None);

        let mut reassembled: Vec<&Row> = Vec::new();
        for page in 0..=page_count(first.total, page_size) {
            let slice = apply(&rows, &search, |row: &Row| row.name.as_str(), PageRequest::new(page, page_size), None);
            prop_assert!(slice.visible.len() <= page_size.get());
            prop_assert_eq!(slice.total, first.total);
            reassembled.extend(slice.visible);
        }

        let expected: Vec<&Row> = rows
            .iter()
            .filter(|row| row.name.to_lowercase().contains(&search))
            .collect();
        prop_assert_eq!(reassembled, expected);
    }

    #[test]
    fn predicate_and_search_order_do_not_matter(
        rows in rows_strategy(),
        search in "[a-d]{0,2}",
        group in 0_u8..3,
        page in 0_usize..5,
    ) {
        let in_group = |row: &Row| row.group == group;
        let combined = apply(&rows, &search, |row: &Row| row.name.as_str(), PageRequest::new(page, size(3)), Some(&in_group));

        let searched_first: Vec<Row> = apply(&rows, &search, |row: &Row| row.name.as_str(), PageRequest::new(0, size(usize::MAX)), None)
            .visible
            .into_iter()
            .filter(|row| in_group(*row))
            .cloned()
            .collect();
        let sequential = apply(&searched_first, "", |row: &Row| row.name.as_str(), PageRequest::new(page, size(3)), None);

        prop_assert_eq!(combined.total, sequential.total);
        let combined_rows: Vec<Row> = combined.visible.into_iter().cloned().collect();
        let sequential_rows: Vec<Row> = sequential.visible.into_iter().cloned().collect();
        prop_assert_eq!(combined_rows, sequential_rows);
    }
}
