pub mod category_style;
pub mod errors;
pub mod history;
pub mod models;
pub mod reconciler;
pub mod services;
