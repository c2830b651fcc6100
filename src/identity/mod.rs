/// Identity fields and derived values.
pub mod fields;
