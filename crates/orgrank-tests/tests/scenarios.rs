//! End-to-end scenarios: hand-built trees with figures checked by hand.

use orgrank_core::{MiningRate, NewNode, NodeId, NodeUpdate, Project, Rank, Tree};
use orgrank_engine::{compute_metrics, compute_report, compute_rewards};
use orgrank_tests::helpers::{assert_close, children, TreeBuilder};

fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

fn rate(f: f64) -> MiningRate {
    MiningRate::new(f).unwrap()
}

// ------------------------------------------------------------------
// Metrics
// ------------------------------------------------------------------

#[test]
fn two_small_branches_give_root_s1() {
    let tree = TreeBuilder::root("root", 0.0)
        .child("root", "a", 3_000.0)
        .child("root", "b", 3_000.0)
        .build();
    let metrics = compute_metrics(&tree);

    let root = &metrics[&id("root")];
    assert_eq!(root.children_total_value, 6_000.0);
    assert_eq!(root.rank, Some(Rank::S1));
    for leaf in ["a", "b"] {
        assert_eq!(metrics[&id(leaf)].children_total_value, 0.0);
        assert_eq!(metrics[&id(leaf)].rank, None);
    }
}

/// Root over two S2 branches, each built from two S1 sub-branches.
fn two_s2_branches() -> Tree {
    let mut b = TreeBuilder::root("root", 0.0);
    for branch in ["x", "y"] {
        b = b.child("root", branch, 0.0);
        for sub in ["1", "2"] {
            let g = format!("{branch}{sub}");
            let leaf = format!("{g}-leaf");
            b = b.child(branch, &g, 0.0).child(&g, &leaf, 7_500.0);
        }
    }
    b.build()
}

#[test]
fn s2_branches_lift_root_to_s2_not_s1() {
    let tree = two_s2_branches();
    let metrics = compute_metrics(&tree);

    assert_eq!(metrics[&id("x1")].rank, Some(Rank::S1));
    assert_eq!(metrics[&id("x")].children_total_value, 15_000.0);
    assert_eq!(metrics[&id("x")].rank, Some(Rank::S2));
    assert_eq!(metrics[&id("y")].rank, Some(Rank::S2));

    let root = &metrics[&id("root")];
    assert_eq!(root.children_total_value, 30_000.0);
    assert_eq!(root.rank, Some(Rank::S2));
    assert_eq!(root.max_rank_in_subtree, 2);
}

#[test]
fn totals_hold_bottom_up_on_four_levels() {
    let tree = TreeBuilder::root("r", 11.0)
        .child("r", "a", 100.0)
        .child("r", "b", 200.0)
        .child("a", "a1", 1_000.0)
        .child("a", "a2", 2_000.0)
        .child("b", "b1", 3_000.0)
        .child("a1", "a1x", 10_000.0)
        .child("a1", "a1y", 20_000.0)
        .child("b1", "b1x", 40_000.0)
        .build();
    let metrics = compute_metrics(&tree);

    for node in tree.iter() {
        let m = &metrics[&node.id];
        let child_sum: f64 = children(&tree, &node.id)
            .map(|c| metrics[&c.id].total_with_self)
            .sum();
        assert_eq!(m.children_total_value, child_sum, "node {}", node.id);
        assert_eq!(m.total_with_self, node.value + child_sum, "node {}", node.id);
    }
    assert_eq!(metrics[&id("r")].total_with_self, 76_311.0);
    assert_eq!(metrics[&id("a1x")].level, 3);
}

#[test]
fn s1_appears_exactly_at_threshold() {
    let mut tree = TreeBuilder::root("r", 0.0)
        .child("r", "a", 2_500.0)
        .child("r", "b", 2_499.99)
        .build();
    assert_eq!(compute_metrics(&tree)[&id("r")].rank, None);

    tree.update_node(&id("b"), NodeUpdate { value: Some(2_500.0), ..NodeUpdate::default() })
        .unwrap();
    assert_eq!(compute_metrics(&tree)[&id("r")].rank, Some(Rank::S1));
}

#[test]
fn s2_appears_exactly_at_threshold() {
    let mut tree = TreeBuilder::root("x", 0.0)
        .child("x", "g1", 0.0)
        .child("x", "g2", 0.0)
        .child("g1", "g1-leaf", 9_999.0)
        .child("g2", "g2-leaf", 5_000.0)
        .build();
    let before = compute_metrics(&tree);
    assert_eq!(before[&id("g1")].rank, Some(Rank::S1));
    assert_eq!(before[&id("g2")].rank, Some(Rank::S1));
    assert_eq!(before[&id("x")].rank, Some(Rank::S1));

    tree.update_node(&id("g1-leaf"), NodeUpdate { value: Some(10_000.0), ..NodeUpdate::default() })
        .unwrap();
    assert_eq!(compute_metrics(&tree)[&id("x")].rank, Some(Rank::S2));
}

#[test]
fn one_strong_branch_is_not_enough() {
    // One S2 branch carries all the value; the root has no second branch.
    let tree = TreeBuilder::root("root", 0.0)
        .child("root", "x", 0.0)
        .child("root", "y", 0.0)
        .child("x", "x1", 0.0)
        .child("x", "x2", 0.0)
        .child("x1", "x1-leaf", 50_000.0)
        .child("x2", "x2-leaf", 50_000.0)
        .build();
    let metrics = compute_metrics(&tree);
    // 100,000 clears the S3 total but x1 and x2 are only S1.
    assert_eq!(metrics[&id("x")].rank, Some(Rank::S2));
    assert_eq!(metrics[&id("root")].children_total_value, 100_000.0);
    assert_eq!(metrics[&id("root")].rank, Some(Rank::S1));
    assert_eq!(metrics[&id("root")].max_rank_in_subtree, 2);
}

// ------------------------------------------------------------------
// Rewards
// ------------------------------------------------------------------

#[test]
fn referral_follows_display_name() {
    let mut tree = TreeBuilder::root("Alice", 0.0)
        .recruit("Alice", "Bob", " alice ", 10_000.0)
        .build();
    let r = rate(0.007);

    let report = compute_rewards(&tree, &compute_metrics(&tree), r);
    let alice = report.entry(&id("Alice")).unwrap();
    assert_close(alice.referral, 10_000.0 * 0.007 * 0.10);

    tree.update_node(&id("Alice"), NodeUpdate { name: Some("Alicia".into()), ..NodeUpdate::default() })
        .unwrap();
    let report = compute_rewards(&tree, &compute_metrics(&tree), r);
    assert_eq!(report.entry(&id("Alice")).unwrap().referral, 0.0);
}

#[test]
fn rate_presets_on_a_two_node_tree() {
    let tree = TreeBuilder::root("root", 100_000.0)
        .child("root", "child", 5_000.0)
        .build();
    let metrics = compute_metrics(&tree);
    assert_eq!(metrics[&id("root")].rank, Some(Rank::S1));

    let low = compute_rewards(&tree, &metrics, rate(0.007));
    let root = low.entry(&id("root")).unwrap();
    assert_close(root.mining, 700.0);
    assert_eq!(root.referral, 0.0);
    assert_close(root.community, 3.5);
    assert_close(root.total, 703.5);
    assert_close(low.entry(&id("child")).unwrap().mining, 35.0);
    assert_close(low.grand_total, 738.5);

    let high = compute_rewards(&tree, &metrics, rate(0.009));
    let root = high.entry(&id("root")).unwrap();
    assert_close(root.mining, 900.0);
    assert_close(root.community, 4.5);
    assert_close(high.grand_total, 949.5);

    // Every component is linear in the rate, so the totals scale by 9/7.
    assert_close(high.grand_total, low.grand_total * 9.0 / 7.0);
}

#[test]
fn report_lists_every_node_root_first() {
    let tree = two_s2_branches();
    let (metrics, report) = compute_report(&tree, MiningRate::default());
    assert_eq!(report.len(), tree.len());
    assert_eq!(report.entries[0].id, id("root"));
    assert!(report.entries.windows(2).all(|w| w[0].level <= w[1].level));
    for entry in &report.entries {
        assert_eq!(entry.level, metrics[&entry.id].level);
        assert_eq!(entry.rank, metrics[&entry.id].rank);
    }
}

#[test]
fn community_scales_with_rank() {
    let tree = two_s2_branches();
    let (_, report) = compute_report(&tree, rate(0.008));
    let root = report.entry(&id("root")).unwrap();
    // S2: 30,000 × 0.008 × 0.10 × 2
    assert_close(root.community, 48.0);
    let x = report.entry(&id("x")).unwrap();
    assert_close(x.community, 15_000.0 * 0.008 * 0.10 * 2.0);
    let x1 = report.entry(&id("x1")).unwrap();
    assert_close(x1.community, 7_500.0 * 0.008 * 0.10);
}

// ------------------------------------------------------------------
// Mutation then recompute
// ------------------------------------------------------------------

#[test]
fn project_lifecycle_recomputes_from_scratch() {
    let mut project = Project::new(Project::default_title(1));
    let root = project.tree.root.clone().unwrap();
    let a = project
        .tree
        .add_child(&root, NewNode::new("Ann", "ceo", 3_000.0))
        .unwrap();
    let b = project
        .tree
        .add_child(&root, NewNode::placeholder())
        .unwrap();
    project
        .tree
        .update_node(&b, NodeUpdate { value: Some(3_000.0), ..NodeUpdate::default() })
        .unwrap();

    let (metrics, report) = compute_report(&project.tree, MiningRate::default());
    assert_eq!(metrics[&root].rank, Some(Rank::S1));
    // Ann names the root ("CEO") as recommender.
    assert_close(report.entry(&root).unwrap().referral, 3_000.0 * 0.007 * 0.10);

    project.tree.remove_subtree(&a).unwrap();
    project.tree.check_integrity().unwrap();
    let (metrics, report) = compute_report(&project.tree, MiningRate::default());
    assert_eq!(metrics[&root].rank, None);
    assert_eq!(metrics[&root].children_total_value, 3_000.0);
    assert_eq!(report.entry(&root).unwrap().referral, 0.0);
    assert!(report.entry(&a).is_none());
}

#[test]
fn exported_project_round_trips_through_engine() {
    let raw = serde_json::json!({
        "id": "p",
        "title": "Imported",
        "createdAt": 1_700_000_000_000i64,
        "rootNodeId": "r",
        "nodes": {
            "r": { "id": "r", "name": "Boss", "employeeId": "CEO-01", "value": "0", "children": ["a", "b", "ghost"], "parentId": null },
            "a": { "id": "a", "name": "A", "employeeId": "boss", "value": 3000, "children": [], "parentId": "r" },
            "b": { "id": "b", "name": "B", "employeeId": "Boss", "value": "3000", "children": [], "parentId": "r" }
        }
    });
    let projects = orgrank_core::project::parse_projects(&raw.to_string()).unwrap();
    let tree = &projects[0].tree;

    let (metrics, report) = compute_report(tree, rate(0.007));
    assert_eq!(metrics.len(), 3);
    assert_eq!(metrics[&id("r")].rank, Some(Rank::S1));
    let boss = report.entry(&id("r")).unwrap();
    assert_close(boss.referral, 6_000.0 * 0.007 * 0.10);
    assert_close(boss.community, 6_000.0 * 0.007 * 0.10);
}
