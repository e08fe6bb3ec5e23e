//! Macros for declaring state and trigger catalogs.

/// Generate a state enum with its `State` implementation.
///
/// The enum derives everything the engine needs (`Copy`, `Eq`, `Hash`,
/// serde) and gets an `ALL` constant listing the variants in declaration
/// order, plus a `Display` impl that prints the state name.
///
/// # Example
///
/// ```
/// use machinist::core::State;
/// use machinist::state_enum;
///
/// state_enum! {
///     pub enum Press {
///         Open,
///         Closing,
///         Closed,
///         Jammed,
///     }
///     final: [Closed]
///     error: [Jammed]
/// }
///
/// assert_eq!(Press::ALL.len(), 4);
/// assert_eq!(Press::Closing.name(), "Closing");
/// assert!(Press::Jammed.is_error());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}

/// Generate a trigger enum with its `Trigger` implementation.
///
/// # Example
///
/// ```
/// use machinist::core::Trigger;
/// use machinist::trigger_enum;
///
/// trigger_enum! {
///     pub enum Pedal {
///         Press,
///         Release,
///     }
/// }
///
/// assert_eq!(Pedal::Release.name(), "Release");
/// assert_eq!(Pedal::Press.to_string(), "Press");
/// ```
#[macro_export]
macro_rules! trigger_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::Trigger for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::Trigger::name(self))
            }
        }
    };
}
