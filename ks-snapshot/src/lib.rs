mod conditions;
mod currency;
mod engine;
mod record;
pub mod transform;

pub use crate::currency::{
    CurrencyTable,
    OwnerGroupKey,
    select_current,
};
pub use crate::engine::{
    Collector,
    KindOutput,
    Snapshot,
};
pub use crate::record::{
    Payload,
    Record,
    RecordMeta,
    Tristate,
};

#[cfg(test)]
mod tests;
