pub mod constants;
pub mod errors;
pub mod k8s;
pub mod logging;
pub mod macros;
pub mod metrics;
pub mod quantity;

pub mod prelude {
    pub use k8s_openapi::api::apps::v1 as appsv1;
    pub use k8s_openapi::api::autoscaling::v2 as autoscalingv2;
    pub use k8s_openapi::api::core::v1 as corev1;
    pub use k8s_openapi::api::rbac::v1 as rbacv1;
    pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
    pub use kube::ResourceExt;
    pub use kube::api::DynamicObject;

    pub use crate::constants::*;
    pub use crate::errors::EmptyResult;
    pub use crate::k8s::{
        KubeResourceExt,
        ResourceKind,
    };
}
