use std::cmp::Reverse;
use std::collections::{
    BTreeMap,
    HashMap,
};
use std::sync::Arc;

use ks_core::k8s::ObjectKey;
use ks_core::prelude::*;
use tracing::*;

// Replicasets are grouped by who owns them; a deployment keeps old replicasets around after a
// rollout, and only the newest one in each group is "current".
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OwnerGroupKey {
    pub namespace: String,
    pub owner_kind: String,
    pub owner_name: String,
}

// Pass-local answer to "is this replicaset current?".  Every object handed to `select_current`
// has an entry, so `len` is the number of replicasets considered.
#[derive(Clone, Debug, Default)]
pub struct CurrencyTable {
    current: HashMap<ObjectKey, bool>,
}

impl CurrencyTable {
    pub fn is_current(&self, key: &ObjectKey) -> bool {
        self.current.get(key).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn current_count(&self) -> usize {
        self.current.values().filter(|c| **c).count()
    }
}

fn group_keys(obj: &DynamicObject) -> Vec<OwnerGroupKey> {
    let namespace = obj.namespace().unwrap_or_default();
    let owners = obj.owner_references();

    // An ownerless replicaset is its own group, so it's always current
    if owners.is_empty() {
        return vec![OwnerGroupKey { namespace, owner_kind: String::new(), owner_name: obj.name_any() }];
    }

    owners
        .iter()
        .map(|rf| OwnerGroupKey {
            namespace: namespace.clone(),
            owner_kind: rf.kind.clone(),
            owner_name: rf.name.clone(),
        })
        .collect()
}

// Within a group the winner is the newest object by creation time, with generation breaking
// ties; if those are both equal, the first one in list order wins.  An object that belongs to
// several groups is current if it wins any of them.
pub fn select_current(objs: &[Arc<DynamicObject>]) -> CurrencyTable {
    let mut table = CurrencyTable::default();
    let mut groups: BTreeMap<OwnerGroupKey, Vec<&DynamicObject>> = BTreeMap::new();

    for obj in objs {
        table.current.insert(obj.object_key(), false);
        for key in group_keys(obj) {
            groups.entry(key).or_default().push(obj);
        }
    }

    for (key, members) in &groups {
        // min_by_key returns the first of several equal elements
        let Some(winner) = members
            .iter()
            .min_by_key(|obj| Reverse((obj.creation_ts(), obj.generation_or_zero())))
        else {
            continue;
        };
        debug!(
            "current replicaset for {}/{}/{} is {}",
            key.namespace,
            key.owner_kind,
            key.owner_name,
            winner.name_any()
        );
        table.current.insert(winner.object_key(), true);
    }

    table
}
