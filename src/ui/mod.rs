pub mod status_item;
