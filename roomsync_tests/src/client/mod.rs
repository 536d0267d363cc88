mod connection;
mod interpolation;
mod prediction;
mod render;
mod replication;
