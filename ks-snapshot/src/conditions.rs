use std::collections::BTreeMap;

use ks_core::prelude::*;

use crate::record::Tristate;

// All the status condition types we deal with have the same shape, but there's no common trait
// for them in k8s-openapi.
pub trait ConditionLike {
    fn type_(&self) -> &str;
    fn status(&self) -> &str;
    fn reason(&self) -> Option<&str>;
    fn last_transition_time(&self) -> Option<&metav1::Time>;
}

macro_rules! impl_condition_like {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ConditionLike for $ty {
                fn type_(&self) -> &str {
                    &self.type_
                }

                fn status(&self) -> &str {
                    &self.status
                }

                fn reason(&self) -> Option<&str> {
                    self.reason.as_deref()
                }

                fn last_transition_time(&self) -> Option<&metav1::Time> {
                    self.last_transition_time.as_ref()
                }
            }
        )+
    };
}

impl_condition_like!(
    appsv1::DeploymentCondition,
    appsv1::ReplicaSetCondition,
    autoscalingv2::HorizontalPodAutoscalerCondition,
    corev1::PodCondition,
    corev1::ReplicationControllerCondition,
);

// If a condition type shows up more than once, the first one wins.
pub fn find_condition<'a, C: ConditionLike>(conds: Option<&'a Vec<C>>, type_: &str) -> Option<&'a C> {
    conds.into_iter().flatten().find(|c| c.type_() == type_)
}

pub fn condition_status<C: ConditionLike>(conds: Option<&Vec<C>>, type_: &str) -> Tristate {
    find_condition(conds, type_).map_or(Tristate::Unknown, |c| Tristate::from_status(c.status()))
}

pub fn condition_map<C: ConditionLike>(conds: Option<&Vec<C>>) -> BTreeMap<String, Tristate> {
    let mut map = BTreeMap::new();
    for c in conds.into_iter().flatten() {
        map.entry(c.type_().into()).or_insert_with(|| Tristate::from_status(c.status()));
    }
    map
}

pub fn is_true<C: ConditionLike>(conds: Option<&Vec<C>>, type_: &str) -> bool {
    condition_status(conds, type_) == Tristate::True
}

// When the condition became true, if it is true
pub fn true_since<C: ConditionLike>(conds: Option<&Vec<C>>, type_: &str) -> Option<metav1::Time> {
    find_condition(conds, type_)
        .filter(|c| c.status() == CONDITION_TRUE)
        .and_then(|c| c.last_transition_time().cloned())
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    fn cond(type_: &str, status: &str) -> appsv1::ReplicaSetCondition {
        appsv1::ReplicaSetCondition {
            type_: type_.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    #[rstest]
    fn test_condition_map_first_wins() {
        let conds = vec![cond("Available", "True"), cond("Progressing", "Bogus"), cond("Available", "False")];
        let map = condition_map(Some(&conds));
        assert_eq!(
            map,
            BTreeMap::from([("Available".into(), Tristate::True), ("Progressing".into(), Tristate::Unknown)])
        );
    }

    #[rstest]
    fn test_condition_status_missing() {
        let conds: Vec<appsv1::ReplicaSetCondition> = vec![];
        assert_eq!(condition_status(Some(&conds), AVAILABLE_CONDITION), Tristate::Unknown);
        assert_eq!(condition_status::<appsv1::ReplicaSetCondition>(None, AVAILABLE_CONDITION), Tristate::Unknown);
    }

    #[rstest]
    fn test_true_since_only_when_true() {
        let mut ready = cond("Ready", "False");
        ready.last_transition_time = Some(metav1::Time(Default::default()));
        let conds = vec![ready];
        assert_eq!(true_since(Some(&conds), "Ready"), None);
    }
}
