//! Column type conversion.
//!
//! Maps database type names such as `Int32` or `Optional<Decimal(22,9)>` to the
//! shape a driver must scan into, the output field type, and the value
//! conversion.

mod entry;
mod registry;
pub mod values;

pub use entry::ConverterEntry;
pub use registry::TypeConverterRegistry;
pub use values::ConvertFn;
