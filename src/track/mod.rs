/// Last-known positions of monitored nodes.
pub mod tracker;
