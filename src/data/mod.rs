/// Labeled row storage and the row splitter
pub mod dataset;
/// Attribute values and label bounds
pub mod value;
