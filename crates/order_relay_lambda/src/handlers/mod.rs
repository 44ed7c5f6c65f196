pub mod change;
pub mod gateway;
pub mod ingress;
