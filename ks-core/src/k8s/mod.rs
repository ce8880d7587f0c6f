mod kind;
mod util;

pub use kind::*;
pub use util::*;

pub trait KubeResourceExt {
    fn namespaced_name(&self) -> String;
    fn creation_ts(&self) -> i64;
    fn generation_or_zero(&self) -> i64;
    fn controller(&self) -> (String, String);
    fn object_key(&self) -> ObjectKey;
}

#[cfg(test)]
pub mod tests;
