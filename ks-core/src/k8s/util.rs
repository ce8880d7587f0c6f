use kube::Resource;

use super::*;
use crate::prelude::*;

// Identity of an object for the lifetime of a single collection pass.  The uid is the stable part;
// objects without one (which really only happens in tests) fall back to the resource version.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
    pub version: String,
}

impl<T: Resource> KubeResourceExt for T {
    fn namespaced_name(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{}/{}", ns, self.name_any()),
            None => self.name_any(),
        }
    }

    fn creation_ts(&self) -> i64 {
        self.meta().creation_timestamp.as_ref().map(|t| t.0.timestamp()).unwrap_or(0)
    }

    fn generation_or_zero(&self) -> i64 {
        self.meta().generation.unwrap_or(0)
    }

    // Only the first owner reference counts; owners-of-owners are not followed.
    fn controller(&self) -> (String, String) {
        match self.owner_references().first() {
            Some(rf) => (rf.kind.clone(), rf.name.clone()),
            None => (String::new(), String::new()),
        }
    }

    fn object_key(&self) -> ObjectKey {
        ObjectKey {
            namespace: self.namespace().unwrap_or_default(),
            name: self.name_any(),
            version: self.uid().or_else(|| self.resource_version()).unwrap_or_default(),
        }
    }
}
