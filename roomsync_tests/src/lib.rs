/*! # roomsync tests

A [`RoomStepper`](stepper::RoomStepper) drives a client `App` frame by frame, with manual time,
against a [`ScriptedRoom`](room::ScriptedRoom) on the other end of a crossbeam channel.
*/

pub mod room;
pub mod stepper;

#[cfg(test)]
mod client;
