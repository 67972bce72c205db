// Domain layer: wire models of the analysis service and the ports the report pipeline is built on.

pub mod model;
pub mod ports;
