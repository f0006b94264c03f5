mod nfr;
pub(super) mod properties;
mod stress;
