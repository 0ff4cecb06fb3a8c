pub mod ports;

pub mod email;
pub mod payments;
pub mod storage;
pub mod summarize;
pub mod transcribe;
