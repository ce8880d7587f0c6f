use ks_core::prelude::*;
use serde::Serialize;

use super::*;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRefRecord {
    pub api_group: String,
    pub kind: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRecord {
    pub kind: String,
    pub name: String,
    pub namespace: String,
    pub api_group: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleBindingRecord {
    pub role_ref: RoleRefRecord,
    pub subjects: Vec<SubjectRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleBindingRecord {
    pub role_ref: RoleRefRecord,
    pub subjects: Vec<SubjectRecord>,
}

impl From<rbacv1::RoleRef> for RoleRefRecord {
    fn from(rf: rbacv1::RoleRef) -> RoleRefRecord {
        RoleRefRecord { api_group: rf.api_group, kind: rf.kind, name: rf.name }
    }
}

impl From<rbacv1::Subject> for SubjectRecord {
    fn from(s: rbacv1::Subject) -> SubjectRecord {
        SubjectRecord {
            kind: s.kind,
            name: s.name,
            namespace: s.namespace.unwrap_or_default(),
            api_group: s.api_group.unwrap_or_default(),
        }
    }
}

fn subjects(subjects: Option<Vec<rbacv1::Subject>>) -> Vec<SubjectRecord> {
    subjects.into_iter().flatten().map(SubjectRecord::from).collect()
}

pub(super) fn transform_role_binding(obj: &DynamicObject, _: &TransformContext) -> Option<Payload> {
    let rb: rbacv1::RoleBinding = parse_as(obj)?;
    Some(Payload::RoleBinding(RoleBindingRecord { role_ref: rb.role_ref.into(), subjects: subjects(rb.subjects) }))
}

pub(super) fn transform_cluster_role_binding(obj: &DynamicObject, _: &TransformContext) -> Option<Payload> {
    let crb: rbacv1::ClusterRoleBinding = parse_as(obj)?;
    Some(Payload::ClusterRoleBinding(ClusterRoleBindingRecord {
        role_ref: crb.role_ref.into(),
        subjects: subjects(crb.subjects),
    }))
}
