//! Arena handles. Each is an index into the owning [`crate::Map`].

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) usize);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

arena_id!(
    /// Handle of a [`crate::Record`].
    RecordId
);
arena_id!(
    /// Handle of a [`crate::Field`].
    FieldId
);
arena_id!(
    /// Handle of a [`crate::View`]. The main view is always index 0.
    ViewId
);
