mod currency_test;

use std::sync::Arc;

use assertables::*;
use ks_core::prelude::*;
use ks_testutils::*;
use rstest::*;

use crate::transform::*;
use crate::*;

fn payload_of(kind: ResourceKind, obj: &DynamicObject) -> Option<Payload> {
    transformer_for(kind)(obj, &TransformContext::default())
}
