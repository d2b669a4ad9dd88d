//! Declarative macros shared across the crate

/// Define an enum with name() and all() methods, plus custom data per variant
///
/// # Example
/// ```
/// use p8pmu::enum_with_data;
///
/// enum_with_data! {
///     pub enum Unit: u8 {
///         Ifu => ("IFU", 0x1),
///         Lsu => ("LSU", 0xc),
///     }
///     impl unit -> u8
/// }
///
/// let unit = Unit::Lsu;
/// assert_eq!(unit.name(), "LSU");
/// assert_eq!(unit.unit(), 0xc);
/// assert_eq!(Unit::all().len(), 2);
/// ```
#[macro_export]
macro_rules! enum_with_data {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $data_type:ty {
            $($variant:ident => ($str:literal, $data:expr)),* $(,)?
        }
        impl $method:ident -> $return_type:ty
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant,)*
        }

        impl $name {
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $str,)*
                }
            }

            pub fn $method(&self) -> $return_type {
                match self {
                    $($name::$variant => $data,)*
                }
            }

            pub fn all() -> Vec<$name> {
                vec![$($name::$variant,)*]
            }
        }
    };
}
