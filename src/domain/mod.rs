// Domain layer: request/response models and the ports the handlers call through.

pub mod model;
pub mod ports;
