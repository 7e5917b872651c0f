//! Extension traits

mod dates;
mod depot;
mod result;

pub(crate) use dates::{ClockExt as _, parse_civil_date};
pub(crate) use depot::DepotExt as _;
pub(crate) use result::ResultExt as _;
