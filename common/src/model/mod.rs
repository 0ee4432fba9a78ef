pub mod definition;
pub mod value;

pub use definition::ConfigDefinition;
pub use value::ConfigValue;
