pub mod appearance;
pub mod notification_center;
pub mod skylight;
pub mod window_server;
