// Domain layer: stadium records, report rows and ports. No I/O here.

pub mod model;
pub mod ports;
pub mod report;
