//! Shared macros for the codebase
//!
//! Provides the newtype id macro used for every interned handle (classes,
//! methods, variables, pointers, objects, contexts).

/// Declare a `u32` newtype handle with serde support and a prefixed `Display`
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Position of this handle in its owning table
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::define_id!(
        /// Test handle
        DemoId,
        "demo#"
    );

    #[test]
    fn test_id_roundtrip() {
        let id = DemoId::from_index(7);
        assert_eq!(id.index(), 7);
        assert_eq!(id, DemoId::new(7));
        assert_eq!(id.to_string(), "demo#7");
    }

    #[test]
    fn test_id_serde_transparent() {
        let json = serde_json::to_string(&DemoId::new(3)).unwrap();
        assert_eq!(json, "3");
    }
}
