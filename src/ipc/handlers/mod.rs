// Author: Dustin Pilgrim
// License: MIT

pub mod control;
pub mod info;
pub mod notify;
