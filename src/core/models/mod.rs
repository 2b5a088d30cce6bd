pub mod audit;
pub mod category;
pub mod history;
pub mod operation;
pub mod outcome;
pub mod receipt;
