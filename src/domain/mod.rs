// Domain layer: packaging models and ports. No filesystem access here.

pub mod model;
pub mod ports;
