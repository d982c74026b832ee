//! # Internal Macros
//!
//! ## zerocopy_accessors!
//!
//! Generates getter and setter methods for zerocopy struct fields that use
//! little-endian wrapper types (U32, F64). Fields in the shared segment are
//! stored little-endian and unaligned, so every access goes through
//! `.get()` / `::new()`.
//!
//! ### Usage
//!
//! ```ignore
//! use zerocopy::little_endian::{F64, U32};
//!
//! #[repr(C)]
//! struct Header {
//!     count: U32,
//!     deadline: F64,
//! }
//!
//! impl Header {
//!     zerocopy_accessors! {
//!         count: u32,
//!         deadline: f64,
//!     }
//! }
//!
//! // Generates:
//! // pub fn count(&self) -> u32 { self.count.get() }
//! // pub fn set_count(&mut self, val: u32) { self.count = U32::new(val); }
//! // pub fn deadline(&self) -> f64 { self.deadline.get() }
//! // pub fn set_deadline(&mut self, val: f64) { self.deadline = F64::new(val); }
//! ```

/// Generates getter and setter methods for zerocopy little-endian fields.
#[macro_export]
macro_rules! zerocopy_accessors {
    (@impl $field:ident, u32) => {
        ::paste::paste! {
            #[inline]
            pub fn $field(&self) -> u32 {
                self.$field.get()
            }

            #[inline]
            pub fn [<set_ $field>](&mut self, val: u32) {
                self.$field = ::zerocopy::little_endian::U32::new(val);
            }
        }
    };
    (@impl $field:ident, f64) => {
        ::paste::paste! {
            #[inline]
            pub fn $field(&self) -> f64 {
                self.$field.get()
            }

            #[inline]
            pub fn [<set_ $field>](&mut self, val: f64) {
                self.$field = ::zerocopy::little_endian::F64::new(val);
            }
        }
    };
    ($($field:ident : $ty:tt),* $(,)?) => {
        $(
            $crate::zerocopy_accessors!(@impl $field, $ty);
        )*
    };
}
