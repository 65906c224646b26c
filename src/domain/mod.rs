// Domain layer: annotation records, raw tables and ports (interfaces).

pub mod model;
pub mod ports;
pub mod table;
