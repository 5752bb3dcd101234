pub mod adjustments;
pub mod shapes;
pub mod transform;
