//! Procedural macros for ordenum.
//!
//! Provides derive macros:
//! * `#[derive(Enumeration)]` - declares an enumeration from an element list

use proc_macro::TokenStream;

/// Enumeration derive macro implementation.
mod enumeration;

/// Declares a struct as an enumeration with a fixed element list.
///
/// ```ignore
/// #[derive(Enumeration)]
/// #[enumeration(args = (f64, f64), serde)]
/// #[elements(
///     MERCURY(3.303e+23, 2.4397e6),
///     VENUS(4.869e+24, 6.0518e6),
/// )]
/// pub struct Planet {
///     mass: f64,
///     radius: f64,
/// }
///
/// impl Planet {
///     fn new(mass: f64, radius: f64) -> Self {
///         Self { mass, radius }
///     }
/// }
/// ```
///
/// Generates:
/// * `impl Enumeration for Planet` with a `Final` declaration
/// * One accessor per element (`Planet::VENUS()`), panicking only if the
///   declaration fails to resolve
/// * A catalog registration, so `"Planet"` resolves by name
///
/// # Attributes
///
/// - `#[elements(A, B, ..)]` - Required: element names in ordinal order, each
///   optionally followed by its constructor arguments
/// - `name = "Name"` - Optional: declaring type name (default: the struct name).
///   Name-based lookups reject a name claimed by two types, so same-named
///   structs in different modules need distinct names here
/// - `kind = final | abstract` - Optional: declaration kind (default `final`)
/// - `args = (T, ..)` - Required when elements carry arguments: their types
/// - `constructor = path` - Optional: builds the payload from the arguments
///   (default `Self::new`, or `Default::default` without arguments)
/// - `serde` - Optional: elements serialize as their name
///
/// Element names, duplicates, argument presence and argument count are
/// checked at compile time.
#[proc_macro_derive(Enumeration, attributes(enumeration, elements))]
pub fn derive_enumeration(input: TokenStream) -> TokenStream {
	enumeration::derive_enumeration(input)
}
