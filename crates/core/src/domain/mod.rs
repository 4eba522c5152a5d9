pub mod call;
pub mod decision;
pub mod staff;
