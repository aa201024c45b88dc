pub mod category_view;
pub mod notes;
pub mod state;
