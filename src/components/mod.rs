pub mod modal;
pub mod notification_host;
pub mod sidebar;
