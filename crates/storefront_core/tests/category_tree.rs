use storefront_core::{Category, CategoryTree, MalformedTreeError};

fn storefront_categories() -> Vec<Category> {
    vec![
        Category::root(1, "Women"),
        Category::root(2, "Men"),
        Category::child(3, 1, "Shoes"),
        Category::child(4, 1, "Bags"),
        Category::child(5, 3, "Boots"),
        Category::child(6, 3, "Sandals"),
        Category::child(7, 2, "Shirts"),
    ]
}

fn ids(categories: &[&Category]) -> Vec<i64> {
    categories.iter().map(|category| category.id).collect()
}

#[test]
fn roots_and_children_follow_source_order() {
    let tree = CategoryTree::try_new(storefront_categories()).unwrap();

    assert_eq!(ids(&tree.roots()), vec![1, 2]);
    assert_eq!(ids(&tree.get_children(1)), vec![3, 4]);
    assert_eq!(ids(&tree.get_children(3)), vec![5, 6]);
    assert!(tree.get_children(5).is_empty());
    assert!(tree.get_children(404).is_empty());
}

#[test]
fn children_order_is_not_sorted_by_id() {
    let tree = CategoryTree::try_new(vec![
        Category::root(10, "Root"),
        Category::child(30, 10, "Later id first"),
        Category::child(20, 10, "Earlier id second"),
    ])
    .unwrap();

    assert_eq!(ids(&tree.get_children(10)), vec![30, 20]);
}

#[test]
fn descendants_are_collected_depth_first_pre_order() {
    let tree = CategoryTree::try_new(storefront_categories()).unwrap();

    assert_eq!(tree.get_all_descendants(1).unwrap(), vec![3, 5, 6, 4]);
    assert_eq!(tree.get_all_descendants(2).unwrap(), vec![7]);
    assert!(tree.get_all_descendants(5).unwrap().is_empty());
    assert!(tree.get_all_descendants(404).unwrap().is_empty());
}

#[test]
fn parent_and_ancestor_queries() {
    let tree = CategoryTree::try_new(storefront_categories()).unwrap();

    assert_eq!(tree.get_parent(5), Some(3));
    assert_eq!(tree.get_parent(1), None);
    assert_eq!(tree.get_parent(404), None);
    assert_eq!(tree.ancestors(5).unwrap(), vec![3, 1]);
    assert!(tree.ancestors(2).unwrap().is_empty());
    assert!(tree.has_children(3));
    assert!(!tree.has_children(4));
}

#[test]
fn empty_list_builds_an_empty_tree() {
    let tree = CategoryTree::try_new(Vec::new()).unwrap();

    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert!(tree.roots().is_empty());
}

#[test]
fn validate_rejects_duplicate_ids() {
    let err = CategoryTree::try_new(vec![
        Category::root(1, "Women"),
        Category::child(1, 1, "Women again"),
    ])
    .unwrap_err();

    assert_eq!(err, MalformedTreeError::DuplicateId(1));
}

#[test]
fn validate_rejects_dangling_parent() {
    let err = CategoryTree::try_new(vec![
        Category::root(1, "Women"),
        Category::child(2, 99, "Orphan"),
    ])
    .unwrap_err();

    assert_eq!(
        err,
        MalformedTreeError::DanglingParent {
            id: 2,
            parent_id: 99
        }
    );
}

#[test]
fn validate_rejects_two_node_cycle() {
    let err = CategoryTree::try_new(vec![
        Category::child(1, 2, "A"),
        Category::child(2, 1, "B"),
    ])
    .unwrap_err();

    assert!(matches!(err, MalformedTreeError::NodeRevisited(_)));
}

#[test]
fn unvalidated_cycle_fails_descendant_walk_instead_of_looping() {
    let tree = CategoryTree::new(vec![
        Category::root(1, "Root"),
        Category::child(2, 3, "A"),
        Category::child(3, 2, "B"),
    ]);

    assert_eq!(
        tree.get_all_descendants(2),
        Err(MalformedTreeError::NodeRevisited(2))
    );
    assert_eq!(tree.ancestors(2), Err(MalformedTreeError::NodeRevisited(2)));
    assert!(tree.get_all_descendants(1).unwrap().is_empty());
}
