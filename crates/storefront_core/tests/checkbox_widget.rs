use std::cell::Cell;
use storefront_core::widget::{EMPTY_MESSAGE, HEADER_TITLE, LOADING_MESSAGE};
use storefront_core::{
    selection_summary, Category, CategoryCheckboxes, CategorySource, CategoryStore, CategoryTree,
    CheckState, LoadFailure, LoadState, RowClick, SelectionOwner, SelectionSet, SourceError,
    WidgetView,
};

/// Form stand-in that records every `on_change` call.
#[derive(Default)]
struct RecordingForm {
    selected: SelectionSet,
    changes: Vec<SelectionSet>,
}

impl SelectionOwner for RecordingForm {
    fn selected_ids(&self) -> &SelectionSet {
        &self.selected
    }

    fn on_change(&mut self, next: SelectionSet) {
        self.changes.push(next.clone());
        self.selected = next;
    }
}

struct FixedSource {
    categories: Vec<Category>,
    calls: Cell<usize>,
}

impl CategorySource for FixedSource {
    fn fetch_all(&self) -> Result<Vec<Category>, SourceError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.categories.clone())
    }
}

fn storefront_tree() -> CategoryTree {
    CategoryTree::try_new(vec![
        Category::root(1, "Women"),
        Category::root(2, "Men"),
        Category::child(3, 1, "Shoes"),
        Category::child(4, 1, "Bags"),
        Category::child(5, 3, "Boots"),
    ])
    .unwrap()
}

#[test]
fn empty_list_renders_admin_hint_and_never_reports_selection() {
    let mut store = CategoryStore::new(FixedSource {
        categories: Vec::new(),
        calls: Cell::new(0),
    });
    let widget = CategoryCheckboxes::new();
    let form = RecordingForm::default();

    let state = widget.mount(&mut store);
    let view = widget.view(state, form.selected_ids()).unwrap();

    assert_eq!(
        view,
        WidgetView::Empty {
            message: EMPTY_MESSAGE
        }
    );
    assert!(form.changes.is_empty());
    assert_eq!(store.source().calls.get(), 1);
}

#[test]
fn idle_and_loading_render_loading_message() {
    let widget = CategoryCheckboxes::new();
    let expected = WidgetView::Loading {
        message: LOADING_MESSAGE,
    };

    assert_eq!(
        widget.view(&LoadState::Idle, &SelectionSet::new()).unwrap(),
        expected
    );
    assert_eq!(
        widget
            .view(&LoadState::Loading, &SelectionSet::new())
            .unwrap(),
        expected
    );
}

#[test]
fn failed_load_renders_error_message() {
    let widget = CategoryCheckboxes::new();
    let state = LoadState::Failed(LoadFailure::Fetch(SourceError::Status {
        url: "http://localhost:3000/categories/flat".to_string(),
        status: 500,
    }));

    match widget.view(&state, &SelectionSet::new()).unwrap() {
        WidgetView::Error { message } => assert!(message.contains("500")),
        other => panic!("unexpected view: {other:?}"),
    }
}

#[test]
fn loaded_tree_renders_rows_in_pre_order_with_depth_and_check_state() {
    let widget = CategoryCheckboxes::new();
    let state = LoadState::Loaded(storefront_tree());
    let selected = SelectionSet::from([1, 3, 5]);

    let WidgetView::Tree {
        header,
        rows,
        selected_count,
        summary,
    } = widget.view(&state, &selected).unwrap()
    else {
        panic!("expected tree view");
    };

    assert_eq!(header, HEADER_TITLE);
    assert_eq!(selected_count, 3);
    assert_eq!(
        summary.as_deref(),
        Some("3 categories selected: Women, Shoes, Boots")
    );

    let layout = rows
        .iter()
        .map(|row| (row.id, row.depth, row.has_children, row.check))
        .collect::<Vec<_>>();
    assert_eq!(
        layout,
        vec![
            (1, 0, true, CheckState::Indeterminate),
            (3, 1, true, CheckState::Checked),
            (5, 2, false, CheckState::Checked),
            (4, 1, false, CheckState::Unchecked),
            (2, 0, false, CheckState::Unchecked),
        ]
    );
}

#[test]
fn row_click_on_parent_collapses_without_touching_selection() {
    let tree = storefront_tree();
    let mut widget = CategoryCheckboxes::new();
    let mut form = RecordingForm::default();

    let outcome = widget.click_row(&tree, &mut form, 1).unwrap();

    assert_eq!(outcome, RowClick::Collapsed(true));
    assert!(form.changes.is_empty());
    let visible = widget
        .rows(&tree, &form.selected)
        .unwrap()
        .iter()
        .map(|row| row.id)
        .collect::<Vec<_>>();
    assert_eq!(visible, vec![1, 2]);

    assert_eq!(
        widget.click_row(&tree, &mut form, 1).unwrap(),
        RowClick::Collapsed(false)
    );
    assert_eq!(widget.rows(&tree, &form.selected).unwrap().len(), 5);
}

#[test]
fn row_click_on_leaf_toggles_selection_through_owner() {
    let tree = storefront_tree();
    let mut widget = CategoryCheckboxes::new();
    let mut form = RecordingForm::default();

    let outcome = widget.click_row(&tree, &mut form, 5).unwrap();

    assert_eq!(outcome, RowClick::SelectionChanged);
    assert_eq!(form.changes, vec![SelectionSet::from([1, 3, 5])]);
    assert!(!widget.collapse_state().is_collapsed(5));
}

#[test]
fn checkbox_click_on_parent_selects_subtree_and_never_collapses() {
    let tree = storefront_tree();
    let widget = CategoryCheckboxes::new();
    let mut form = RecordingForm::default();

    widget.click_checkbox(&tree, &mut form, 1).unwrap();

    assert_eq!(form.selected, SelectionSet::from([1, 3, 4, 5]));
    assert!(!widget.collapse_state().is_collapsed(1));
}

#[test]
fn collapse_flags_survive_selection_changes() {
    let tree = storefront_tree();
    let mut widget = CategoryCheckboxes::new();
    let mut form = RecordingForm::default();

    widget.toggle_collapse(3);
    widget.click_checkbox(&tree, &mut form, 3).unwrap();
    widget.click_checkbox(&tree, &mut form, 3).unwrap();

    assert!(widget.collapse_state().is_collapsed(3));
    assert_eq!(form.changes.len(), 2);
}

#[test]
fn unknown_row_click_is_rejected_without_side_effects() {
    let tree = storefront_tree();
    let mut widget = CategoryCheckboxes::new();
    let mut form = RecordingForm::default();

    assert!(widget.click_row(&tree, &mut form, 404).is_err());
    assert!(form.changes.is_empty());
}

#[test]
fn summary_uses_singular_noun_and_list_order() {
    let tree = storefront_tree();

    assert_eq!(selection_summary(&tree, &SelectionSet::new()), None);
    assert_eq!(
        selection_summary(&tree, &SelectionSet::from([2])).as_deref(),
        Some("1 category selected: Men")
    );
    assert_eq!(
        selection_summary(&tree, &SelectionSet::from([4, 2])).as_deref(),
        Some("2 categories selected: Men, Bags")
    );
}
