use candid::{Decode, Encode};
use ic_stable_structures::{storable::Bound, storable::Storable};
use std::borrow::Cow;

use crate::collateral::params::RiskParameters;

macro_rules! impl_storable_candid {
    ($type:ty) => {
        impl Storable for $type {
            fn to_bytes(&self) -> Cow<[u8]> {
                Cow::Owned(Encode!(self).expect("candid encoding should always succeed"))
            }

            fn from_bytes(bytes: Cow<[u8]>) -> Self {
                Decode!(bytes.as_ref(), $type).unwrap_or_else(|e| {
                    panic!(
                        "failed to decode candid bytes {}: {}",
                        hex::encode(&bytes),
                        e
                    )
                })
            }

            const BOUND: Bound = Bound::Unbounded;
        }
    };
}

impl_storable_candid!(RiskParameters);
