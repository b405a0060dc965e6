pub mod element;
pub mod feature;
pub mod value;
