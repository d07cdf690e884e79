mod report;
mod summary;

pub use report::{render_brief, render_flights, render_hotels, render_outcome_line};
pub use summary::render_summary;
