pub mod logging_ref_cell;
pub mod queue;
