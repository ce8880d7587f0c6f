use std::collections::BTreeMap;

use super::*;

fn shared(objs: Vec<DynamicObject>) -> Vec<Arc<DynamicObject>> {
    objs.into_iter().map(Arc::new).collect()
}

fn current_names(objs: &[Arc<DynamicObject>], table: &CurrencyTable) -> Vec<String> {
    objs.iter()
        .filter(|obj| table.is_current(&obj.object_key()))
        .map(|obj| obj.name_any())
        .collect()
}

#[rstest]
fn test_newest_replicaset_is_current() {
    let objs = shared(vec![
        depl_replicaset("rs-old", TEST_CREATION_TS, 1),
        depl_replicaset("rs-new", TEST_CREATION_TS + 100, 1),
        depl_replicaset("rs-middle", TEST_CREATION_TS + 50, 7),
    ]);

    let table = select_current(&objs);
    assert_eq!(table.len(), 3);
    assert_eq!(current_names(&objs, &table), vec!["rs-new"]);
}

#[rstest]
fn test_generation_breaks_ties() {
    let objs = shared(vec![
        depl_replicaset("rs-gen-1", TEST_CREATION_TS, 1),
        depl_replicaset("rs-gen-3", TEST_CREATION_TS, 3),
        depl_replicaset("rs-gen-2", TEST_CREATION_TS, 2),
    ]);

    let table = select_current(&objs);
    assert_eq!(current_names(&objs, &table), vec!["rs-gen-3"]);
}

#[rstest]
#[case::forward(vec!["rs-a", "rs-b"], "rs-a")]
#[case::reverse(vec!["rs-b", "rs-a"], "rs-b")]
fn test_full_tie_first_in_list_wins(#[case] order: Vec<&str>, #[case] expected: &str) {
    let objs = shared(order.iter().map(|name| depl_replicaset(name, TEST_CREATION_TS, 2)).collect());

    let table = select_current(&objs);
    assert_eq!(current_names(&objs, &table), vec![expected]);
}

#[rstest]
fn test_ownerless_replicaset_is_current() {
    let objs = shared(vec![
        to_dyn(&test_replicaset(TEST_NAMESPACE, "rs-orphan", vec![], TEST_CREATION_TS, 1)),
        depl_replicaset("rs-owned", TEST_CREATION_TS + 10, 1),
    ]);

    let table = select_current(&objs);
    assert_eq!(current_names(&objs, &table), vec!["rs-orphan", "rs-owned"]);
}

#[rstest]
fn test_current_in_any_owner_group() {
    let objs = shared(vec![
        to_dyn(&test_replicaset(
            TEST_NAMESPACE,
            "rs-shared",
            vec![owner_ref("Deployment", "depl-1"), owner_ref("Deployment", "depl-2")],
            TEST_CREATION_TS,
            1,
        )),
        to_dyn(&test_replicaset(
            TEST_NAMESPACE,
            "rs-depl-2",
            vec![owner_ref("Deployment", "depl-2")],
            TEST_CREATION_TS + 10,
            1,
        )),
    ]);

    let table = select_current(&objs);
    assert_eq!(table.current_count(), 2);
    assert_eq!(current_names(&objs, &table), vec!["rs-shared", "rs-depl-2"]);
}

#[rstest]
fn test_groups_are_per_namespace() {
    let owners = || vec![owner_ref("Deployment", TEST_DEPLOYMENT)];
    let objs = shared(vec![
        to_dyn(&test_replicaset(TEST_NAMESPACE, "rs-1", owners(), TEST_CREATION_TS, 1)),
        to_dyn(&test_replicaset(TEST_OTHER_NAMESPACE, "rs-2", owners(), TEST_CREATION_TS - 10, 1)),
    ]);

    let table = select_current(&objs);
    assert_eq!(current_names(&objs, &table), vec!["rs-1", "rs-2"]);
}

#[rstest]
fn test_exactly_one_current_per_group() {
    let mut objs = vec![];
    for (i, owner) in ["depl-a", "depl-b", "depl-c"].iter().enumerate() {
        for j in 0..4 {
            let created = TEST_CREATION_TS + ((i as i64 * 7 + j * 3) % 5);
            let name = format!("{owner}-{j}");
            objs.push(to_dyn(&test_replicaset(
                TEST_NAMESPACE,
                &name,
                vec![owner_ref("Deployment", owner)],
                created,
                j % 2,
            )));
        }
    }
    let objs = shared(objs);

    let table = select_current(&objs);
    let mut per_owner: BTreeMap<String, usize> = BTreeMap::new();
    for obj in objs.iter().filter(|obj| table.is_current(&obj.object_key())) {
        *per_owner.entry(obj.controller().1).or_default() += 1;
    }
    assert_eq!(per_owner, BTreeMap::from([("depl-a".into(), 1), ("depl-b".into(), 1), ("depl-c".into(), 1)]));
}

#[rstest]
fn test_select_current_does_not_mutate_objects() {
    let objs = shared(vec![depl_replicaset("rs-1", TEST_CREATION_TS, 1), depl_replicaset("rs-2", TEST_CREATION_TS, 2)]);
    let before: Vec<DynamicObject> = objs.iter().map(|obj| (**obj).clone()).collect();

    let _ = select_current(&objs);
    let after: Vec<DynamicObject> = objs.iter().map(|obj| (**obj).clone()).collect();
    assert_eq!(before, after);
}

#[rstest]
fn test_empty_input() {
    let table = select_current(&[]);
    assert!(table.is_empty());
    assert_eq!(table.current_count(), 0);
}
